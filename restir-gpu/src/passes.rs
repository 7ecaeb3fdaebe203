use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct CandidatesPassParams {
    pub seed: u32,

    /// Number of light candidates streamed through each pixel's reservoir
    pub candidates: u32,

    pub _padding: [u32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct TemporalPassParams {
    pub seed: u32,

    /// Maximum sample count of the merged reservoir
    pub max_m: f32,

    pub _padding: [u32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct SpatialPassParams {
    pub seed: u32,

    /// Number of neighbours visited per pixel, at most
    /// [`crate::MAX_SPATIAL_SAMPLES`]
    pub samples: u32,

    /// Search radius, in pixels
    pub radius: f32,

    /// Maximum sample count of the merged reservoir
    pub max_m: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct HistoryPassParams {
    /// Number of frames accumulated so far, or [`Self::DISABLED`]
    pub frame_index: i32,

    /// Number of frames after which the accumulation freezes
    pub max_frames: u32,

    pub _padding: [u32; 2],
}

impl HistoryPassParams {
    pub const DISABLED: i32 = -1;

    pub fn is_enabled(&self) -> bool {
        self.frame_index >= 0
    }

    pub fn is_frozen(&self) -> bool {
        self.is_enabled() && (self.frame_index as u32) >= self.max_frames
    }

    /// Weight of the current frame in the running average.
    pub fn blend_factor(&self) -> f32 {
        if !self.is_enabled() {
            1.0
        } else if self.is_frozen() {
            0.0
        } else {
            1.0 / (self.frame_index as f32 + 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(frame_index: i32) -> HistoryPassParams {
        HistoryPassParams {
            frame_index,
            max_frames: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn blend_factor_decreases_and_then_freezes() {
        assert_eq!(1.0, params(HistoryPassParams::DISABLED).blend_factor());
        assert_eq!(1.0, params(0).blend_factor());
        assert_eq!(0.5, params(1).blend_factor());

        let mut prev = f32::MAX;

        for frame_index in 0..1000 {
            let curr = params(frame_index).blend_factor();

            assert!(curr < prev);
            prev = curr;
        }

        assert!(params(1000).is_frozen());
        assert_eq!(0.0, params(1000).blend_factor());
    }
}
