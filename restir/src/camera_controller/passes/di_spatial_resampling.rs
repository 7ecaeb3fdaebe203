use crate::{
    Camera, CameraBuffers, CameraComputePass, CameraController, Combination,
    Engine, GBuffer, MappedUniformBuffer, ShaderEntry, TlasBinder,
};

#[derive(Debug)]
pub struct DiSpatialResamplingPass {
    biased: CameraComputePass,
    unbiased: CameraComputePass,
}

impl DiSpatialResamplingPass {
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

        let build = |label: &str, shader: &ShaderEntry| {
            CameraComputePass::builder(label, buffers.slots())
                .bind([&buffers.lights.bind(MappedUniformBuffer::bind_readable)])
                .bind([
                    &buffers.camera.bind(MappedUniformBuffer::bind_readable),
                    &buffers
                        .spatial_params
                        .bind(MappedUniformBuffer::bind_readable),
                    &TlasBinder { tlas },
                    &position,
                    &normal,
                    &albedo,
                    &material,
                    &depth,
                    &buffers.temporal_reservoirs.bind_readable(),
                    &buffers.spatial_reservoirs.bind_writable(),
                ])
                .build(device, shader)
        };

        Self {
            biased: build(
                "di_spatial_resampling_biased",
                &engine.shaders.di_spatial_resampling_biased,
            ),
            unbiased: build(
                "di_spatial_resampling_unbiased",
                &engine.shaders.di_spatial_resampling_unbiased,
            ),
        }
    }

    pub fn run(
        &self,
        camera: &CameraController,
        encoder: &mut wgpu::CommandEncoder,
        slot: usize,
        combination: Combination,
    ) {
        let pass = match combination {
            Combination::Biased => &self.biased,
            Combination::Unbiased => &self.unbiased,
        };

        pass.run(camera, encoder, slot);
    }
}
