use core::f32::consts::PI;

use glam::{vec2, UVec2, Vec2};

/// Per-pixel PCG-based white noise.
///
/// Shaders use the very same hash (`wnoise_*` in `common.wgsl`), so a given
/// seed and pixel produce an identical stream on both sides.
#[derive(Clone, Copy, Debug)]
pub struct WhiteNoise {
    seed: u32,
    state: u32,
}

impl WhiteNoise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        let seed = seed
            ^ 48619u32.wrapping_mul(id.x)
            ^ 95461u32.wrapping_mul(id.y);

        Self { seed, state: seed }
    }

    /// Generates a uniform sample in range `<0.0, 1.0>`.
    pub fn sample(&mut self) -> f32 {
        (self.sample_int() as f32) / (u32::MAX as f32)
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        pcg(self.state)
    }

    /// Generates a uniform sample in range `<0.0, 1.0>` that depends only on
    /// the seed and given key; it doesn't advance the stream, and it doesn't
    /// depend on how far the stream has already advanced.
    pub fn sample_keyed<const N: usize>(&self, key: [u32; N]) -> f32 {
        let hash = key.into_iter().fold(self.seed, |hash, word| {
            pcg((hash ^ word)
                .wrapping_mul(747796405)
                .wrapping_add(2891336453))
        });

        (hash as f32) / (u32::MAX as f32)
    }

    /// Generates a uniform sample in range `<0, max)`.
    pub fn sample_below(&mut self, max: u32) -> u32 {
        if max == 0 {
            0
        } else {
            self.sample_int() % max
        }
    }

    /// Generates a uniform sample on a circle.
    pub fn sample_circle(&mut self) -> Vec2 {
        let angle = self.sample() * PI * 2.0;

        vec2(angle.cos(), angle.sin())
    }

    /// Generates a uniform sample inside of a disk.
    pub fn sample_disk(&mut self) -> Vec2 {
        let radius = self.sample().sqrt();

        self.sample_circle() * radius
    }
}

fn pcg(state: u32) -> u32 {
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277803737);

    (word >> 22) ^ word
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn samples_stay_in_range() {
        let mut wnoise = WhiteNoise::new(1234, uvec2(17, 5));

        for _ in 0..10_000 {
            let sample = wnoise.sample();

            assert!((0.0..=1.0).contains(&sample));
            assert!(wnoise.sample_below(7) < 7);
            assert!(wnoise.sample_disk().length() <= 1.0 + f32::EPSILON);
        }
    }

    #[test]
    fn streams_are_deterministic_per_pixel() {
        let mut a = WhiteNoise::new(42, uvec2(3, 4));
        let mut b = WhiteNoise::new(42, uvec2(3, 4));
        let mut c = WhiteNoise::new(42, uvec2(4, 3));

        let a: Vec<_> = (0..16).map(|_| a.sample_int()).collect();
        let b: Vec<_> = (0..16).map(|_| b.sample_int()).collect();
        let c: Vec<_> = (0..16).map(|_| c.sample_int()).collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn keyed_samples_ignore_the_stream() {
        let mut wnoise = WhiteNoise::new(42, uvec2(3, 4));
        let before = wnoise.sample_keyed([1, 2, 3]);

        for _ in 0..16 {
            wnoise.sample();
        }

        assert_eq!(before, wnoise.sample_keyed([1, 2, 3]));
        assert_ne!(before, wnoise.sample_keyed([1, 2, 4]));
        assert_ne!(
            before,
            WhiteNoise::new(43, uvec2(3, 4)).sample_keyed([1, 2, 3])
        );
    }

    #[test]
    fn samples_are_roughly_uniform() {
        let mut wnoise = WhiteNoise::new(7, uvec2(0, 0));
        let mut buckets = [0u32; 4];

        for _ in 0..40_000 {
            buckets[wnoise.sample_below(4) as usize] += 1;
        }

        for bucket in buckets {
            assert!((9_000..11_000).contains(&bucket), "{buckets:?}");
        }
    }
}
