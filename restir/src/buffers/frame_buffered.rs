use crate::{Bindable, FrameBindable};

/// Resource replicated once per frame slot.
#[derive(Debug)]
pub struct FrameBuffered<T> {
    items: Vec<T>,
}

impl<T> FrameBuffered<T> {
    pub fn new(slots: usize, mut f: impl FnMut(usize) -> T) -> Self {
        Self {
            items: (0..slots).map(&mut f).collect(),
        }
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut T {
        &mut self.items[slot]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Binds each slot's version of the resource into its own bind group.
    pub fn bind<'a, B>(
        &'a self,
        f: impl Fn(&'a T) -> B,
    ) -> impl FrameBindable + 'a
    where
        B: Bindable + 'a,
    {
        FrameBufferedBinder {
            items: self.items.iter().map(f).collect(),
        }
    }
}

pub struct FrameBufferedBinder<B> {
    items: Vec<B>,
}

impl<B> FrameBindable for FrameBufferedBinder<B>
where
    B: Bindable,
{
    fn bind(
        &self,
        binding: u32,
        slots: usize,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, Vec<wgpu::BindingResource<'_>>)> {
        assert_eq!(slots, self.items.len());

        let mut entries: Vec<(wgpu::BindGroupLayoutEntry, Vec<_>)> = Vec::new();

        for item in &self.items {
            for (idx, (layout, resource)) in
                item.bind(binding).into_iter().enumerate()
            {
                if let Some((known_layout, resources)) = entries.get_mut(idx) {
                    assert_eq!(*known_layout, layout);

                    resources.push(resource);
                } else {
                    entries.push((layout, vec![resource]));
                }
            }
        }

        entries
    }
}
