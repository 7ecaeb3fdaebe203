use core::ops::{Deref, DerefMut};

use glam::{vec4, Vec4};

use crate::{Hit, LightId, LightsView, Reservoir, ReservoirSample};

/// Reservoir of direct-lighting samples, one per pixel.
///
/// Stored as a single `Rgba32Float` texel:
///
/// - x - light id (see [`LightId::to_f32()`]),
/// - y - unbiased contribution weight (`W`),
/// - z - sample count (`M`),
/// - w - target pdf of the sample, evaluated at the owning pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DiReservoir {
    pub reservoir: Reservoir<DiSample>,
}

impl DiReservoir {
    pub fn serialize(&self) -> Vec4 {
        vec4(
            self.sample.light_id.to_f32(),
            self.w,
            self.m,
            self.sample.pdf,
        )
    }

    pub fn deserialize(d0: Vec4) -> Self {
        Self {
            reservoir: Reservoir {
                sample: DiSample {
                    light_id: LightId::from_f32(d0.x),
                    pdf: d0.w,
                },
                m: d0.z,
                w: d0.y,
                priority: 0.0,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.m <= 0.0
    }
}

impl Deref for DiReservoir {
    type Target = Reservoir<DiSample>;

    fn deref(&self) -> &Self::Target {
        &self.reservoir
    }
}

impl DerefMut for DiReservoir {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reservoir
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiSample {
    pub light_id: LightId,

    /// Target pdf of this sample at the pixel that currently holds it
    pub pdf: f32,
}

impl Default for DiSample {
    fn default() -> Self {
        Self {
            light_id: LightId::NONE,
            pdf: 0.0,
        }
    }
}

impl ReservoirSample for DiSample {
    fn id(&self) -> u32 {
        self.light_id.get()
    }
}

impl DiSample {
    /// Evaluates this sample's target pdf at given hit point.
    pub fn pdf_at(&self, lights: LightsView, hit: &Hit) -> f32 {
        lights.get(self.light_id).target_pdf(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization() {
        let target = DiReservoir {
            reservoir: Reservoir {
                sample: DiSample {
                    light_id: LightId::new(42),
                    pdf: 0.125,
                },
                m: 640.0,
                w: 3.75,
                priority: 0.0,
            },
        };

        assert_eq!(target, DiReservoir::deserialize(target.serialize()));
    }

    #[test]
    fn default_reservoir_is_empty_and_points_at_no_light() {
        let target = DiReservoir::deserialize(DiReservoir::default().serialize());

        assert!(target.is_empty());
        assert!(target.sample.light_id.is_none());
    }
}
