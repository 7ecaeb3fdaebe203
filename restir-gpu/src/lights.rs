use bytemuck::{Pod, Zeroable};

use crate::{Light, LightId, WhiteNoise, MAX_LIGHTS};

/// Fixed-capacity light array, uploaded as a single uniform buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightsBuffer {
    pub count: u32,
    pub _padding: [u32; 3],
    pub items: [Light; MAX_LIGHTS],
}

impl Default for LightsBuffer {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

impl LightsBuffer {
    pub fn view(&self) -> LightsView<'_> {
        LightsView::new(&self.items[..(self.count as usize).min(MAX_LIGHTS)])
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LightsView<'a> {
    items: &'a [Light],
}

impl<'a> LightsView<'a> {
    pub fn new(items: &'a [Light]) -> Self {
        Self { items }
    }

    /// Returns light with given id; ids out of range yield a non-existing
    /// light that contributes nothing.
    pub fn get(&self, id: LightId) -> Light {
        self.items
            .get(id.get() as usize)
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Picks a light uniformly; returns its id and the source pdf of having
    /// picked it.
    pub fn sample(&self, wnoise: &mut WhiteNoise) -> (LightId, f32) {
        let len = self.items.len() as u32;

        if len == 0 {
            return (LightId::NONE, 0.0);
        }

        (LightId::new(wnoise.sample_below(len)), 1.0 / (len as f32))
    }
}
