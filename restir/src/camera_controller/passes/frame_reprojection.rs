use crate::{
    Camera, CameraBuffers, CameraComputePass, CameraController, Engine,
    GBuffer, MappedUniformBuffer,
};

#[derive(Debug)]
pub struct FrameReprojectionPass {
    pass: CameraComputePass,
}

impl FrameReprojectionPass {
    pub fn new(
        engine: &Engine,
        device: &wgpu::Device,
        _: &Camera,
        buffers: &CameraBuffers,
        gbuffer: &GBuffer,
        _: &wgpu::Tlas,
    ) -> Self {
        let [position, normal, albedo, material, depth] =
            gbuffer.bind_readable();

        let pass =
            CameraComputePass::builder("frame_reprojection", buffers.slots())
                .bind([
                    &buffers.camera.bind(MappedUniformBuffer::bind_readable),
                    &buffers
                        .prev_camera
                        .bind(MappedUniformBuffer::bind_readable),
                    &position,
                    &normal,
                    &albedo,
                    &material,
                    &depth,
                    &buffers.motion.bind_writable(),
                    &buffers.surfaces.bind_writable(),
                ])
                .build(device, &engine.shaders.frame_reprojection);

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
