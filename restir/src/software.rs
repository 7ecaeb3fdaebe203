//! CPU counterpart of the renderer, executing the very same frame graph and
//! per-pixel kernels as the GPU, on an analytic scene.
//!
//! It's meant for validation: it's slow, but it needs no GPU and exposes
//! every intermediate image.

mod images;
mod renderer;
mod scene;

pub use self::images::*;
pub use self::renderer::*;
pub use self::scene::*;
