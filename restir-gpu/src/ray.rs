use glam::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ray {
    origin: Vec3,
    dir: Vec3,
    max_t: f32,
}

impl Ray {
    /// Stand-in for "infinitely far", used by directional lights' shadow rays.
    pub const FAR: f32 = 1.0e30;

    pub fn new(origin: Vec3, dir: Vec3, max_t: f32) -> Self {
        Self { origin, dir, max_t }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    /// Maximum distance at which a hit still counts as an occlusion.
    pub fn max_t(&self) -> f32 {
        self.max_t
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Answers whether anything blocks given ray - on the GPU that's a ray query
/// against the top-level acceleration structure, on the CPU it's whatever the
/// software scene provides.
pub trait Visibility {
    fn is_occluded(&self, ray: Ray) -> bool;
}

/// Visibility for an empty scene, where nothing ever occludes anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unoccluded;

impl Visibility for Unoccluded {
    fn is_occluded(&self, _: Ray) -> bool {
        false
    }
}
