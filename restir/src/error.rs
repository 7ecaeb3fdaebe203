use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("adapter is missing required features: {0:?}")]
    MissingFeatures(wgpu::Features),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid viewport: {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("too many lights: got {count}, but there's space for {capacity}")]
    TooManyLights { count: usize, capacity: usize },

    #[error("couldn't wait for frame to finish: {0}")]
    FenceWait(String),

    #[error("frame graph contains a cycle: {0}")]
    CyclicGraph(String),

    #[error("frame graph contains a hazard: {0}")]
    GraphHazard(String),
}
