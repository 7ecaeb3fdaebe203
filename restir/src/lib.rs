//! Real-time direct lighting through ReSTIR: reservoir-based spatiotemporal
//! importance resampling of many lights.
//!
//! The renderer runs as a chain of compute passes on top of `wgpu` - see
//! [`FrameGraph::for_frame()`] for the exact set and order - and consumes a
//! G-buffer plus a top-level acceleration structure provided by the caller.
//!
//! The same per-pixel kernels also power [`software`], a CPU pipeline used
//! to validate the renderer without a GPU.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::too_many_arguments)]

mod buffers;
mod camera;
mod camera_controller;
mod config;
mod error;
mod frames;
mod graph;
mod history;
mod light;
mod lights;
mod shaders;
mod utils;

pub mod software;

use log::info;
pub use restir_gpu as gpu;

pub use self::buffers::GBuffer;
pub(crate) use self::buffers::*;
pub use self::camera::*;
pub use self::camera_controller::*;
pub use self::config::*;
pub use self::error::*;
pub use self::frames::*;
pub use self::gpu::stages::Combination;
pub use self::graph::*;
pub use self::history::*;
pub use self::light::*;
pub use self::lights::*;
pub(crate) use self::shaders::*;
pub(crate) use self::utils::*;

#[derive(Debug)]
pub struct Engine {
    shaders: Shaders,
    lights: Lights,
    config: RendererConfig,
}

impl Engine {
    /// Features the device has to be created with.
    ///
    /// Note that ray queries are experimental in `wgpu`, so the device has to
    /// be requested with experimental features enabled as well.
    pub const fn required_features() -> wgpu::Features {
        wgpu::Features::EXPERIMENTAL_RAY_QUERY
    }

    pub fn new(
        device: &wgpu::Device,
        adapter_features: wgpu::Features,
        config: RendererConfig,
    ) -> Result<Self> {
        info!("Initializing engine");

        let missing = Self::required_features().difference(adapter_features);

        if !missing.is_empty() {
            return Err(Error::MissingFeatures(missing));
        }

        config.validate()?;

        Ok(Self {
            shaders: Shaders::new(device),
            lights: Lights::default(),
            config,
        })
    }

    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut Lights {
        &mut self.lights
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Returns configuration for modification; it's validated again when the
    /// next frame gets rendered.
    pub fn config_mut(&mut self) -> &mut RendererConfig {
        &mut self.config
    }

    pub fn create_camera(
        &self,
        device: &wgpu::Device,
        camera: Camera,
        gbuffer: GBuffer,
        tlas: wgpu::Tlas,
    ) -> Result<CameraController> {
        CameraController::new(self, device, camera, gbuffer, tlas)
    }
}
