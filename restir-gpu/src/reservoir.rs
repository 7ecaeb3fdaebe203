mod di;

pub use self::di::*;

use crate::WhiteNoise;

/// Weighted reservoir over a stream of samples.
///
/// While samples are being streamed in, `w` holds the running sum of their
/// resampling weights; [`Self::normalize()`] then turns it into the sample's
/// unbiased contribution weight (`W`).
///
/// Candidates race for the chosen slot: each one draws `u` and gets the
/// priority `weight / -ln(u)`, the highest priority wins. This picks every
/// candidate with a probability proportional to its weight, and the winner
/// doesn't depend on the order in which candidates arrive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reservoir<T> {
    pub sample: T,
    pub m: f32,
    pub w: f32,

    /// Priority of `sample`; only meaningful while samples are being
    /// streamed in, never serialized.
    pub priority: f32,
}

impl<T> Reservoir<T>
where
    T: ReservoirSample,
{
    pub fn update(
        &mut self,
        wnoise: &mut WhiteNoise,
        sample: T,
        weight: f32,
    ) -> bool {
        let u = wnoise.sample();

        self.add(sample, weight, u)
    }

    /// Streams another, already normalized, reservoir into this one;
    /// `pdf` is the target pdf of `rhs`'s sample evaluated at this
    /// reservoir's pixel.
    ///
    /// `source` tells apart the inputs merged into a single reservoir (e.g.
    /// it's the neighbour's index) - the random number gets keyed on it and
    /// on `rhs` instead of being drawn from the stream, so merging the same
    /// inputs in any order picks the same sample.
    pub fn merge(
        &mut self,
        wnoise: &WhiteNoise,
        source: u32,
        rhs: &Self,
        pdf: f32,
    ) -> bool {
        if rhs.m <= 0.0 {
            return false;
        }

        let u = wnoise.sample_keyed([
            source,
            rhs.sample.id(),
            rhs.m.to_bits(),
            rhs.w.to_bits(),
        ]);

        self.m += rhs.m - 1.0;
        self.add(rhs.sample, rhs.w * rhs.m * pdf, u)
    }

    fn add(&mut self, sample: T, weight: f32, u: f32) -> bool {
        self.m += 1.0;
        self.w += weight;

        if weight <= 0.0 {
            return false;
        }

        let priority = weight / -u.clamp(1e-7, 1.0 - 1e-7).ln();

        if priority > self.priority {
            self.sample = sample;
            self.priority = priority;
            true
        } else {
            false
        }
    }

    pub fn normalize(&mut self, pdf: f32) {
        self.normalize_ex(pdf, self.m);
    }

    /// Normalizes this reservoir using a custom normalization factor instead
    /// of the sample count; used by the unbiased combination, where only
    /// samples that could've produced the chosen one count.
    pub fn normalize_ex(&mut self, pdf: f32, norm: f32) {
        let t = norm * pdf;

        self.w = if t <= 0.0 { 0.0 } else { self.w / t };
    }

    pub fn clamp_m(&mut self, max: f32) {
        self.m = self.m.min(max);
    }
}

/// Sample that can be held by a [`Reservoir`].
pub trait ReservoirSample: Clone + Copy {
    /// Identifies this sample when it takes part in a merge.
    fn id(&self) -> u32;
}

impl ReservoirSample for u32 {
    fn id(&self) -> u32 {
        *self
    }
}
