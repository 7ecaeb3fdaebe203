use crate::{
    Camera, CameraBuffers, CameraComputePass, CameraController, Engine,
    GBuffer, MappedUniformBuffer, PipelineMode, Texture, TlasBinder,
};

/// Shades either the fully resampled reservoirs or the raw candidates; both
/// variants share the shader and differ only in their bindings.
#[derive(Debug)]
pub struct DiShadingPass {
    resampled: CameraComputePass,
    candidates: CameraComputePass,
}

impl DiShadingPass {
    pub fn new(
        engine: &Engine,
        device: &wgpu::Device,
        _: &Camera,
        buffers: &CameraBuffers,
        gbuffer: &GBuffer,
        tlas: &wgpu::Tlas,
    ) -> Self {
        let [position, normal, albedo, material, depth] =
            gbuffer.bind_readable();

        let build = |label: &str, reservoirs: &Texture| {
            CameraComputePass::builder(label, buffers.slots())
                .bind([&buffers.lights.bind(MappedUniformBuffer::bind_readable)])
                .bind([
                    &buffers.camera.bind(MappedUniformBuffer::bind_readable),
                    &TlasBinder { tlas },
                    &position,
                    &normal,
                    &albedo,
                    &material,
                    &depth,
                    &reservoirs.bind_readable(),
                    &buffers.shading.bind_writable(),
                ])
                .build(device, &engine.shaders.di_shading)
        };

        Self {
            resampled: build("di_shading", &buffers.spatial_reservoirs),
            candidates: build(
                "di_shading_candidates",
                &buffers.candidate_reservoirs,
            ),
        }
    }

    pub fn run(
        &self,
        camera: &CameraController,
        encoder: &mut wgpu::CommandEncoder,
        slot: usize,
        pipeline: PipelineMode,
    ) {
        let pass = match pipeline {
            PipelineMode::Full => &self.resampled,
            PipelineMode::CandidatesOnly => &self.candidates,
        };

        pass.run(camera, encoder, slot);
    }
}
