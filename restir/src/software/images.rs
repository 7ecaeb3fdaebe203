use derivative::Derivative;
use fxhash::FxHashMap;
use glam::{UVec2, Vec4};

use crate::{gpu, Access, Barrier, Error, Node, Resource, Result};

/// Screen-sized images owned by the software renderer, along with the state
/// each of them is in.
///
/// States aren't needed for correctness on the CPU; they are tracked so that
/// every access a stage makes can be checked against the barriers derived by
/// the frame graph.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Images {
    size: UVec2,

    #[derivative(Debug = "ignore")]
    texels: FxHashMap<Resource, Vec<Vec4>>,
    states: FxHashMap<Resource, Access>,
}

impl Images {
    pub fn new(size: UVec2) -> Self {
        let len = (size.x * size.y) as usize;

        let texels = Resource::ALL
            .into_iter()
            .filter(|res| Self::is_owned(*res))
            .map(|res| (res, vec![Vec4::ZERO; len]))
            .collect();

        let states = Resource::ALL
            .into_iter()
            .map(|res| (res, Access::ShaderRead))
            .collect();

        Self {
            size,
            texels,
            states,
        }
    }

    /// Returns whether given resource is stored here; the G-buffer and lights
    /// come from the outside.
    pub fn is_owned(res: Resource) -> bool {
        !matches!(res, Resource::GBuffer | Resource::Lights)
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Returns given image.
    ///
    /// # Panics
    ///
    /// Panics if the image isn't owned or is currently taken.
    pub fn get(&self, res: Resource) -> gpu::Image<'_> {
        gpu::Image::new(self.size, &self.texels[&res])
    }

    pub(crate) fn take(&mut self, res: Resource) -> Vec<Vec4> {
        self.texels.remove(&res).unwrap_or_default()
    }

    pub(crate) fn put(&mut self, res: Resource, texels: Vec<Vec4>) {
        assert_eq!((self.size.x * self.size.y) as usize, texels.len());

        self.texels.insert(res, texels);
    }

    pub(crate) fn copy(&mut self, src: Resource, dst: Resource) {
        let texels = self.texels[&src].clone();

        self.texels.insert(dst, texels);
    }

    pub fn state(&self, res: Resource) -> Access {
        self.states.get(&res).copied().unwrap_or_default()
    }

    pub fn transition(&mut self, barrier: &Barrier) -> Result<()> {
        let state = self.state(barrier.resource);

        if state != barrier.from {
            return Err(Error::GraphHazard(format!(
                "{:?} is in {state:?}, but barrier expects {:?}",
                barrier.resource, barrier.from
            )));
        }

        self.states.insert(barrier.resource, barrier.to);

        Ok(())
    }

    /// Checks that every resource the node touches is in the state it needs.
    pub fn check(&self, node: &Node) -> Result<()> {
        for (res, access) in node.reads.iter().chain(&node.writes) {
            let state = self.state(*res);

            if state != *access {
                return Err(Error::GraphHazard(format!(
                    "stage `{}` accesses {res:?} as {access:?}, but it's in \
                     {state:?}",
                    node.stage
                )));
            }
        }

        Ok(())
    }
}
