use glam::{uvec2, Mat4, UVec2, Vec3};

use crate::{gpu, Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// World-to-view transform
    pub view: Mat4,

    /// Vertical field of view, in radians
    pub fov: f32,

    pub near: f32,
    pub far: f32,
    pub viewport: Viewport,
}

impl Camera {
    /// Creates a perspective camera at `eye`, looking at `target`.
    pub fn looking_at(
        eye: Vec3,
        target: Vec3,
        fov: f32,
        viewport: Viewport,
    ) -> Self {
        let dir = (target - eye).normalize_or_zero();
        let up = if dir.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };

        Self {
            view: Mat4::look_at_rh(eye, target, up),
            fov,
            near: 0.1,
            far: 1000.0,
            viewport,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.view.inverse().transform_point3(Vec3::ZERO)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov,
            self.viewport.aspect_ratio(),
            self.near,
            self.far,
        )
    }

    /// Returns whether switching from `self` to `other` requires the camera's
    /// images to be re-created.
    pub(crate) fn is_invalidated_by(&self, other: &Self) -> bool {
        self.viewport.size != other.viewport.size
    }

    pub(crate) fn describe(&self) -> String {
        format!(
            "size={}x{}, fov={:.1}deg",
            self.viewport.size.x,
            self.viewport.size.y,
            self.fov.to_degrees()
        )
    }

    pub fn serialize(&self) -> gpu::Camera {
        let projection_view = self.projection() * self.view;

        gpu::Camera {
            projection_view,
            ndc_to_world: projection_view.inverse(),
            origin: self.origin().extend(self.fov),
            screen: self
                .viewport
                .size
                .as_vec2()
                .extend(self.near)
                .extend(self.far),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub size: UVec2,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }

        Ok(Self {
            size: uvec2(width, height),
        })
    }

    pub fn aspect_ratio(&self) -> f32 {
        (self.size.x as f32) / (self.size.y as f32)
    }

    pub fn len(&self) -> usize {
        (self.size.x * self.size.y) as usize
    }
}
