use crate::{
    Camera, CameraBuffers, CameraComputePass, CameraController, Engine,
    GBuffer, MappedUniformBuffer, ShaderEntry,
};

#[derive(Debug)]
pub struct HistoryAccumulationPass {
    accumulate: CameraComputePass,
    clear: CameraComputePass,
}

impl HistoryAccumulationPass {
    pub fn new(
        engine: &Engine,
        device: &wgpu::Device,
        _: &Camera,
        buffers: &CameraBuffers,
        _: &GBuffer,
        _: &wgpu::Tlas,
    ) -> Self {
        let build = |label: &str, shader: &ShaderEntry| {
            CameraComputePass::builder(label, buffers.slots())
                .bind([
                    &buffers.camera.bind(MappedUniformBuffer::bind_readable),
                    &buffers
                        .history_params
                        .bind(MappedUniformBuffer::bind_readable),
                    &buffers.shading.bind_readable(),
                    &buffers.history.bind_readable(),
                    &buffers.history_next.bind_writable(),
                ])
                .build(device, shader)
        };

        Self {
            accumulate: build(
                "history_accumulation",
                &engine.shaders.history_accumulation,
            ),

            // Clearing writes the image accumulation reads from
            clear: CameraComputePass::builder("history_clear", buffers.slots())
                .bind([
                    &buffers.camera.bind(MappedUniformBuffer::bind_readable),
                    &buffers
                        .history_params
                        .bind(MappedUniformBuffer::bind_readable),
                    &buffers.shading.bind_readable(),
                    &buffers.history_next.bind_readable(),
                    &buffers.history.bind_writable(),
                ])
                .build(device, &engine.shaders.history_clear),
        }
    }

    pub fn run(
        &self,
        camera: &CameraController,
        encoder: &mut wgpu::CommandEncoder,
        slot: usize,
    ) {
        self.accumulate.run(camera, encoder, slot);
    }

    pub fn clear(
        &self,
        camera: &CameraController,
        encoder: &mut wgpu::CommandEncoder,
        slot: usize,
    ) {
        self.clear.run(camera, encoder, slot);
    }
}
