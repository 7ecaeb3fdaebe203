mod f32_ext;
mod vec3_ext;

pub use self::f32_ext::*;
pub use self::vec3_ext::*;
