use crate::{
    Camera, CameraBuffers, CameraComputePass, CameraController, Engine,
    GBuffer, MappedUniformBuffer, TlasBinder,
};

#[derive(Debug)]
pub struct DiSamplingPass {
    pass: CameraComputePass,
}

impl DiSamplingPass {
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

        let pass = CameraComputePass::builder("di_sampling", buffers.slots())
            .bind([&buffers.lights.bind(MappedUniformBuffer::bind_readable)])
            .bind([
                &buffers.camera.bind(MappedUniformBuffer::bind_readable),
                &buffers
                    .candidates_params
                    .bind(MappedUniformBuffer::bind_readable),
                &TlasBinder { tlas },
                &position,
                &normal,
                &albedo,
                &material,
                &depth,
                &buffers.candidate_reservoirs.bind_writable(),
                &buffers.candidate_shading.bind_writable(),
            ])
            .build(device, &engine.shaders.di_sampling);

        Self { pass }
    }

    pub fn run(
        &self,
        camera: &CameraController,
        encoder: &mut wgpu::CommandEncoder,
        slot: usize,
    ) {
        self.pass.run(camera, encoder, slot);
    }
}
