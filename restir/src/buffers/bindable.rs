/// Object that can be attached to a pipeline, e.g. a buffer or a texture
pub trait Bindable {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'_>)>;
}

/// Object that can be attached to a pipeline and exists in one version per
/// frame slot (e.g. a uniform buffer that's rewritten each frame)
pub trait FrameBindable {
    fn bind(
        &self,
        binding: u32,
        slots: usize,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, Vec<wgpu::BindingResource<'_>>)>;
}

impl<T> FrameBindable for T
where
    T: Bindable,
{
    fn bind(
        &self,
        binding: u32,
        slots: usize,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, Vec<wgpu::BindingResource<'_>>)> {
        T::bind(self, binding)
            .into_iter()
            .map(|(layout, resource)| (layout, vec![resource; slots]))
            .collect()
    }
}
