use glam::Vec3;

use crate::{GBufferEntry, Light, Surface, Visibility};

#[derive(Clone, Copy, Debug, Default)]
pub struct Hit {
    /// Where the primary ray started, i.e. camera's origin
    pub origin: Vec3,

    /// Surface point nudged along the normal, used as shadow rays' origin
    pub point: Vec3,

    pub gbuffer: GBufferEntry,
}

impl Hit {
    /// How far to move a hit point away from its surface to avoid
    /// self-intersection when casting shadow rays
    pub const NUDGE_OFFSET: f32 = 0.01;

    pub fn new(origin: Vec3, gbuffer: GBufferEntry) -> Self {
        Self {
            origin,
            point: gbuffer.position + gbuffer.normal * Self::NUDGE_OFFSET,
            gbuffer,
        }
    }

    pub fn is_some(&self) -> bool {
        self.gbuffer.is_some()
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    /// Direction from the surface towards the viewer.
    pub fn view_dir(&self) -> Vec3 {
        (self.origin - self.gbuffer.position).normalize_or_zero()
    }

    pub fn surface(&self) -> Surface {
        Surface {
            normal: self.gbuffer.normal,
            depth: self.gbuffer.depth,
        }
    }

    /// Traces a shadow ray towards given light.
    pub fn is_visible(&self, vis: &impl Visibility, light: &Light) -> bool {
        light
            .visibility_ray(self)
            .is_some_and(|ray| !vis.is_occluded(ray))
    }
}
