use glam::{Vec3, Vec4, Vec4Swizzles};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Surface {
    pub normal: Vec3,
    pub depth: f32,
}

impl Surface {
    /// Minimum cosine between two normals for surfaces to be considered the
    /// same.
    pub const MIN_NORMAL_SIMILARITY: f32 = 0.9;

    /// Maximum relative difference between two depths for surfaces to be
    /// considered the same.
    pub const MAX_DEPTH_DIFFERENCE: f32 = 0.1;

    pub fn serialize(&self) -> Vec4 {
        self.normal.extend(self.depth)
    }

    pub fn deserialize(d0: Vec4) -> Self {
        Self {
            normal: d0.xyz(),
            depth: d0.w,
        }
    }

    pub fn is_some(&self) -> bool {
        self.depth > 0.0
    }

    /// Returns whether reservoirs can be exchanged between both surfaces, i.e.
    /// whether their normals and depths are close enough for them to be
    /// considered the same piece of geometry.
    pub fn is_similar_to(&self, other: &Self) -> bool {
        if !self.is_some() || !other.is_some() {
            return false;
        }

        let normal_similarity = self.normal.dot(other.normal);

        let depth_difference = (self.depth - other.depth).abs()
            / self.depth.max(other.depth);

        normal_similarity >= Self::MIN_NORMAL_SIMILARITY
            && depth_difference <= Self::MAX_DEPTH_DIFFERENCE
    }
}
