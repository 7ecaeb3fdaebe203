use std::f32::consts::PI;

use glam::{vec3, Vec3};
use log::debug;
use rand::Rng;

use crate::{gpu, Error, Light, Result};

/// Scene's light set, with optional animation.
#[derive(Clone, Debug, Default)]
pub struct Lights {
    items: Vec<Light>,
    time: Option<f32>,
}

impl Lights {
    pub const CAPACITY: usize = gpu::MAX_LIGHTS;

    /// Horizontal radius of the animation's orbit
    const ORBIT_RADIUS: f32 = 12.0;

    /// Vertical amplitude of the animation
    const ORBIT_HEIGHT: f32 = 4.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, light: Light) -> Result<gpu::LightId> {
        if self.items.len() >= Self::CAPACITY {
            return Err(Error::TooManyLights {
                count: self.items.len() + 1,
                capacity: Self::CAPACITY,
            });
        }

        self.items.push(light);

        Ok(gpu::LightId::new(self.items.len() as u32 - 1))
    }

    /// Adds `count` spot lights of random colors, hovering over the
    /// `[-extent, extent]` square and pointing down.
    pub fn scatter(
        &mut self,
        rng: &mut impl Rng,
        count: usize,
        extent: f32,
        height: f32,
    ) -> Result<()> {
        let total = self.items.len() + count;

        if total > Self::CAPACITY {
            return Err(Error::TooManyLights {
                count: total,
                capacity: Self::CAPACITY,
            });
        }

        debug!("Scattering {count} lights");

        for _ in 0..count {
            let x = rng.gen_range(-extent..=extent);
            let z = rng.gen_range(-extent..=extent);

            self.items.push(Light::Spot {
                position: vec3(x, height, z),
                target: vec3(x, 0.0, z),
                angle: PI / 4.0,
                color: vec3(rng.gen(), rng.gen(), rng.gen()),
                intensity: height * height,
                range: 4.0 * height,
            });
        }

        Ok(())
    }

    pub fn get(&self, id: gpu::LightId) -> Option<&Light> {
        self.items.get(id.get() as usize)
    }

    /// Removes given light; ids of the lights added after it shift down by
    /// one.
    pub fn remove(&mut self, id: gpu::LightId) -> Option<Light> {
        let id = id.get() as usize;

        if id < self.items.len() {
            Some(self.items.remove(id))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> + '_ {
        self.items.iter()
    }

    /// Moves lights along their orbits, to where they are at given time (in
    /// seconds since the animation started).
    pub fn animate(&mut self, time: f32) {
        self.time = Some(time);
    }

    /// Brings all lights back to their base positions.
    pub fn stop_animating(&mut self) {
        self.time = None;
    }

    pub fn is_animating(&self) -> bool {
        self.time.is_some()
    }

    /// Returns light as it should be rendered right now, i.e. with animation
    /// applied.
    pub fn current(&self, id: gpu::LightId) -> Option<Light> {
        let light = self.get(id)?;

        Some(match self.time {
            Some(time) => {
                let offset = Self::orbit(id.get() as f32, time);

                light.with_position(light.position() + offset)
            }
            None => light.clone(),
        })
    }

    /// Returns offset from light's base position at given time; each light
    /// (`i`) orbits with its own speed and phase.
    fn orbit(i: f32, time: f32) -> Vec3 {
        let speed = 0.3 + i * 0.1;

        vec3(
            (time * speed + i).cos() * Self::ORBIT_RADIUS,
            (time * (0.5 + i * 0.2)).sin() * Self::ORBIT_HEIGHT,
            (time * speed + i * 0.5).sin() * Self::ORBIT_RADIUS,
        )
    }

    pub(crate) fn serialize(&self) -> gpu::LightsBuffer {
        let mut buffer = gpu::LightsBuffer {
            count: self.items.len() as u32,
            ..Default::default()
        };

        for idx in 0..self.items.len() {
            let id = gpu::LightId::new(idx as u32);

            if let Some(light) = self.current(id) {
                buffer.items[idx] = light.serialize();
            }
        }

        buffer
    }
}
