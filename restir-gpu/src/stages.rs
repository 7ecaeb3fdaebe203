//! Per-pixel bodies of the compute stages.
//!
//! Each `main()` processes a single pixel, given its `global_id`, exactly the
//! way the corresponding WGSL entry point does on the GPU; the software
//! pipeline runs them over whole images.

pub mod di_sampling;
pub mod di_shading;
pub mod di_spatial_resampling;
pub mod di_temporal_resampling;
pub mod frame_reprojection;
pub mod history_accumulation;

#[cfg(test)]
mod testing;

/// How reservoirs coming from other pixels get combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Combination {
    /// Reuses the neighbours' weights as-is; cheap, but slightly darkens
    /// geometric and shadow edges.
    #[default]
    Biased,

    /// Re-tests visibility of the chosen sample and only normalizes by the
    /// reservoirs that could have produced it.
    Unbiased,
}
