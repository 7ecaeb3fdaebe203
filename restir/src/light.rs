use glam::Vec3;

use crate::gpu;

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    /// Light shining from `position` towards the world's origin, with no
    /// falloff.
    Directional {
        position: Vec3,
        color: Vec3,
        intensity: f32,
    },

    Spot {
        position: Vec3,
        target: Vec3,

        /// Half-angle of the cone, in radians
        angle: f32,

        color: Vec3,
        intensity: f32,
        range: f32,
    },
}

impl Light {
    pub fn position(&self) -> Vec3 {
        match self {
            Light::Directional { position, .. } => *position,
            Light::Spot { position, .. } => *position,
        }
    }

    pub fn with_position(&self, new_position: Vec3) -> Self {
        let mut this = self.clone();

        match &mut this {
            Light::Directional { position, .. } => *position = new_position,
            Light::Spot { position, .. } => *position = new_position,
        }

        this
    }

    pub(crate) fn serialize(&self) -> gpu::Light {
        match *self {
            Light::Directional {
                position,
                color,
                intensity,
            } => gpu::Light::directional(position, color, intensity),

            Light::Spot {
                position,
                target,
                angle,
                color,
                intensity,
                range,
            } => {
                gpu::Light::spot(position, target, angle, color, intensity, range)
            }
        }
    }
}
