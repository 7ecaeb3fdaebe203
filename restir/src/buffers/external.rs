use crate::{Bindable, TextureBinder};

/// Images produced by the external G-buffer pass; all of them have to match
/// camera's viewport.
///
/// See [`crate::gpu::GBufferEntry`] for the expected contents.
#[derive(Clone, Debug, PartialEq)]
pub struct GBuffer {
    pub position: wgpu::TextureView,
    pub normal: wgpu::TextureView,
    pub albedo: wgpu::TextureView,
    pub material: wgpu::TextureView,
    pub depth: wgpu::TextureView,
}

impl GBuffer {
    pub fn bind_readable(&self) -> [impl Bindable + '_; 5] {
        [
            &self.position,
            &self.normal,
            &self.albedo,
            &self.material,
            &self.depth,
        ]
        .map(|view| TextureBinder {
            view,
            // Read-only bindings don't care about the format
            format: wgpu::TextureFormat::Rgba32Float,
            writable: false,
        })
    }
}

/// Top-level acceleration structure of the scene, used for shadow rays.
pub struct TlasBinder<'a> {
    pub tlas: &'a wgpu::Tlas,
}

impl Bindable for TlasBinder<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'_>)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::AccelerationStructure {
                vertex_return: false,
            },
            count: None,
        };

        let resource = wgpu::BindingResource::AccelerationStructure(self.tlas);

        vec![(layout, resource)]
    }
}
