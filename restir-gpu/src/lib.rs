//! Common structs, algorithms etc. shared by the renderer's shaders, its host
//! code and its software pipeline.
//!
//! Everything that's uploaded into the GPU lives here as a `#[repr(C)]` POD
//! struct, and every compute stage has a per-pixel counterpart in
//! [`stages`] - WGSL shaders mirror those functions one-to-one.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::too_many_arguments)]

mod brdf;
mod camera;
mod frame;
mod gbuffer;
mod hit;
mod image;
mod light;
mod lights;
mod noise;
mod passes;
mod ray;
mod reprojection;
mod reservoir;
mod surface;
mod utils;

pub mod stages;

pub use self::brdf::*;
pub use self::camera::*;
pub use self::frame::*;
pub use self::gbuffer::*;
pub use self::hit::*;
pub use self::image::*;
pub use self::light::*;
pub use self::lights::*;
pub use self::noise::*;
pub use self::passes::*;
pub use self::ray::*;
pub use self::reprojection::*;
pub use self::reservoir::*;
pub use self::surface::*;
pub use self::utils::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;

    pub use crate::*;
}

/// Maximum number of lights a scene can hold at once.
pub const MAX_LIGHTS: usize = 100;

/// Maximum number of neighbours the spatial resampler can visit per pixel.
pub const MAX_SPATIAL_SAMPLES: u32 = 16;
