mod bind_group;
mod bindable;
mod external;
mod frame_buffered;
mod mapped_uniform_buffer;
mod texture;

pub use self::bind_group::*;
pub use self::bindable::*;
pub use self::external::*;
pub use self::frame_buffered::*;
pub use self::mapped_uniform_buffer::*;
pub use self::texture::*;
