use bytemuck::Pod;
use glam::UVec2;
use log::debug;

use crate::{gpu, Camera, FrameBuffered, MappedUniformBuffer, Texture};

/// Images and uniforms owned by a single camera.
///
/// Uniforms are written by the CPU each frame, so they exist in one version
/// per frame slot; images are only ever touched by the GPU and exist once.
#[derive(Debug)]
pub struct CameraBuffers {
    pub camera: FrameBuffered<MappedUniformBuffer<gpu::Camera>>,
    pub prev_camera: FrameBuffered<MappedUniformBuffer<gpu::Camera>>,
    pub lights: FrameBuffered<MappedUniformBuffer<gpu::LightsBuffer>>,
    pub candidates_params:
        FrameBuffered<MappedUniformBuffer<gpu::CandidatesPassParams>>,
    pub temporal_params:
        FrameBuffered<MappedUniformBuffer<gpu::TemporalPassParams>>,
    pub spatial_params:
        FrameBuffered<MappedUniformBuffer<gpu::SpatialPassParams>>,
    pub history_params:
        FrameBuffered<MappedUniformBuffer<gpu::HistoryPassParams>>,

    pub candidate_reservoirs: Texture,
    pub candidate_shading: Texture,
    pub motion: Texture,
    pub surfaces: Texture,
    pub prev_surfaces: Texture,
    pub temporal_reservoirs: Texture,
    pub spatial_reservoirs: Texture,
    pub prev_reservoirs: Texture,
    pub shading: Texture,
    pub history: Texture,
    pub history_next: Texture,
}

impl CameraBuffers {
    pub fn new(device: &wgpu::Device, camera: &Camera, slots: usize) -> Self {
        debug!("Initializing camera buffers; slots={slots}");

        let size = camera.viewport.size;

        Self {
            camera: uniform(device, "camera", slots),
            prev_camera: uniform(device, "prev_camera", slots),
            lights: uniform(device, "lights", slots),
            candidates_params: uniform(device, "candidates_params", slots),
            temporal_params: uniform(device, "temporal_params", slots),
            spatial_params: uniform(device, "spatial_params", slots),
            history_params: uniform(device, "history_params", slots),

            candidate_reservoirs: image(device, "candidate_reservoirs", size),
            candidate_shading: image(device, "candidate_shading", size),
            motion: image(device, "motion", size),
            surfaces: image(device, "surfaces", size),
            prev_surfaces: image(device, "prev_surfaces", size),
            temporal_reservoirs: image(device, "temporal_reservoirs", size),
            spatial_reservoirs: image(device, "spatial_reservoirs", size),
            prev_reservoirs: image(device, "prev_reservoirs", size),
            shading: image(device, "shading", size),
            history: image(device, "history", size),
            history_next: image(device, "history_next", size),
        }
    }

    pub fn slots(&self) -> usize {
        self.camera.len()
    }

    /// Uploads given slot's uniforms.
    pub fn flush(&mut self, queue: &wgpu::Queue, slot: usize) {
        self.camera.get_mut(slot).flush(queue);
        self.prev_camera.get_mut(slot).flush(queue);
        self.lights.get_mut(slot).flush(queue);
        self.candidates_params.get_mut(slot).flush(queue);
        self.temporal_params.get_mut(slot).flush(queue);
        self.spatial_params.get_mut(slot).flush(queue);
        self.history_params.get_mut(slot).flush(queue);
    }
}

fn uniform<T>(
    device: &wgpu::Device,
    name: &str,
    slots: usize,
) -> FrameBuffered<MappedUniformBuffer<T>>
where
    T: Pod + Default,
{
    FrameBuffered::new(slots, |slot| {
        MappedUniformBuffer::new_default(device, format!("restir_{name}_{slot}"))
    })
}

fn image(device: &wgpu::Device, name: &str, size: UVec2) -> Texture {
    Texture::new(
        device,
        format!("restir_{name}"),
        size,
        wgpu::TextureFormat::Rgba32Float,
    )
}
