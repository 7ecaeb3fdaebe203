use crate::gpu;
use crate::gpu::stages::Combination;
use crate::{Error, Result};

/// Runtime configuration of the renderer; changes are picked up at the
/// beginning of the next frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    /// Which reservoirs get shaded
    pub pipeline: PipelineMode,

    /// How the temporal and spatial resamplers combine reservoirs
    pub combination: Combination,

    /// Whether shaded frames get accumulated into the history image
    pub accumulate: bool,

    /// Number of light candidates generated per pixel (`M`)
    pub candidates: u32,

    /// Maximum sample count a reservoir can carry over from the previous
    /// frame, expressed as a multiple of [`Self::candidates`]
    pub temporal_history_cap: f32,

    /// Number of neighbours visited by the spatial resampler
    pub spatial_samples: u32,

    /// Radius, in pixels, within which the spatial resampler looks for
    /// neighbours
    pub spatial_radius: f32,

    /// Number of frames that can be in flight at once
    pub frames_in_flight: usize,

    /// Number of frames after which the accumulation freezes
    pub max_history_frames: u32,

    /// Which image gets handed over to the compositor
    pub output: OutputSource,
}

impl RendererConfig {
    pub fn validate(&self) -> Result<()> {
        if self.candidates == 0 {
            return Err(Error::InvalidConfig(
                "candidates must be greater than zero".into(),
            ));
        }

        let cap = self.temporal_history_cap;

        if cap.is_nan() || cap < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "temporal_history_cap must be at least 1, got {cap}"
            )));
        }

        if self.spatial_samples > gpu::MAX_SPATIAL_SAMPLES {
            return Err(Error::InvalidConfig(format!(
                "spatial_samples must be at most {}, got {}",
                gpu::MAX_SPATIAL_SAMPLES,
                self.spatial_samples
            )));
        }

        if self.spatial_radius.is_nan() || self.spatial_radius <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "spatial_radius must be positive, got {}",
                self.spatial_radius
            )));
        }

        if self.frames_in_flight == 0 {
            return Err(Error::InvalidConfig(
                "frames_in_flight must be greater than zero".into(),
            ));
        }

        if self.max_history_frames == 0 {
            return Err(Error::InvalidConfig(
                "max_history_frames must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Freezes this configuration for the duration of given frame.
    pub fn snapshot(&self, frame: gpu::Frame) -> FrameConfig {
        FrameConfig {
            frame,
            pipeline: self.pipeline,
            combination: self.combination,
            accumulate: self.accumulate,
            candidates: self.candidates,
            max_m: self.temporal_history_cap * (self.candidates as f32),
            spatial_samples: self.spatial_samples,
            spatial_radius: self.spatial_radius,
            output: self.output,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineMode::default(),
            combination: Combination::default(),
            accumulate: false,
            candidates: 32,
            temporal_history_cap: 20.0,
            spatial_samples: 5,
            spatial_radius: 30.0,
            frames_in_flight: 2,
            max_history_frames: 1000,
            output: OutputSource::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PipelineMode {
    /// Candidates get resampled temporally and spatially before shading
    #[default]
    Full,

    /// Candidates get shaded as-is, without any reuse
    CandidatesOnly,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputSource {
    #[default]
    Shading,
    History,
}

/// Immutable, per-frame view of [`RendererConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameConfig {
    pub frame: gpu::Frame,
    pub pipeline: PipelineMode,
    pub combination: Combination,
    pub accumulate: bool,
    pub candidates: u32,
    pub max_m: f32,
    pub spatial_samples: u32,
    pub spatial_radius: f32,
    pub output: OutputSource,
}

impl FrameConfig {
    pub const STAGE_CANDIDATES: u32 = 0;
    pub const STAGE_TEMPORAL: u32 = 1;
    pub const STAGE_SPATIAL: u32 = 2;

    pub fn candidates_params(&self) -> gpu::CandidatesPassParams {
        gpu::CandidatesPassParams {
            seed: self.frame.seed(Self::STAGE_CANDIDATES),
            candidates: self.candidates,
            ..Default::default()
        }
    }

    pub fn temporal_params(&self) -> gpu::TemporalPassParams {
        gpu::TemporalPassParams {
            seed: self.frame.seed(Self::STAGE_TEMPORAL),
            max_m: self.max_m,
            ..Default::default()
        }
    }

    pub fn spatial_params(&self) -> gpu::SpatialPassParams {
        gpu::SpatialPassParams {
            seed: self.frame.seed(Self::STAGE_SPATIAL),
            samples: self.spatial_samples,
            radius: self.spatial_radius,
            max_m: self.max_m,
        }
    }

    pub fn is_resampling(&self) -> bool {
        self.pipeline == PipelineMode::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        RendererConfig::default().validate().unwrap();
    }

    #[test]
    fn invalid_configs() {
        let cases = [
            RendererConfig {
                candidates: 0,
                ..Default::default()
            },
            RendererConfig {
                temporal_history_cap: 0.5,
                ..Default::default()
            },
            RendererConfig {
                temporal_history_cap: f32::NAN,
                ..Default::default()
            },
            RendererConfig {
                spatial_samples: 17,
                ..Default::default()
            },
            RendererConfig {
                spatial_radius: 0.0,
                ..Default::default()
            },
            RendererConfig {
                frames_in_flight: 0,
                ..Default::default()
            },
            RendererConfig {
                max_history_frames: 0,
                ..Default::default()
            },
        ];

        for case in cases {
            assert!(
                matches!(case.validate(), Err(Error::InvalidConfig(_))),
                "{case:?}"
            );
        }
    }

    #[test]
    fn snapshot() {
        let config = RendererConfig::default().snapshot(gpu::Frame::new(3));

        assert_eq!(640.0, config.max_m);
        assert_eq!(32, config.candidates_params().candidates);
        assert_eq!(640.0, config.temporal_params().max_m);
        assert_eq!(30.0, config.spatial_params().radius);

        assert_ne!(
            config.candidates_params().seed,
            config.temporal_params().seed
        );
    }
}
