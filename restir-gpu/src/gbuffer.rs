use glam::{UVec2, Vec3, Vec4, Vec4Swizzles};

use crate::Image;

/// Per-pixel surface attributes produced by the external G-buffer pass.
///
/// Layout of the G-buffer images:
///
/// - position: `xyz` - world-space position,
/// - normal: `xyz` - world-space normal,
/// - albedo: `rgb` - base color,
/// - material: `x` - metallic, `y` - perceptual roughness,
/// - depth: `x` - distance from camera, `0.0` if nothing got hit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GBufferEntry {
    pub position: Vec3,
    pub normal: Vec3,
    pub albedo: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub depth: f32,
}

impl GBufferEntry {
    pub fn from_texels(
        position: Vec4,
        normal: Vec4,
        albedo: Vec4,
        material: Vec4,
        depth: Vec4,
    ) -> Self {
        Self {
            position: position.xyz(),
            normal: normal.xyz().normalize_or_zero(),
            albedo: albedo.xyz(),
            metallic: material.x,
            roughness: material.y,
            depth: depth.x,
        }
    }

    pub fn to_texels(&self) -> [Vec4; 5] {
        [
            self.position.extend(1.0),
            self.normal.extend(0.0),
            self.albedo.extend(1.0),
            Vec4::new(self.metallic, self.roughness, 0.0, 0.0),
            Vec4::new(self.depth, 0.0, 0.0, 0.0),
        ]
    }

    pub fn is_some(&self) -> bool {
        self.depth > 0.0
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    /// Returns roughness remapped into the GGX's alpha, clamped to avoid
    /// singularities on perfectly smooth surfaces.
    pub fn clamped_roughness(&self) -> f32 {
        let roughness = self.roughness.clamp(0.089, 1.0);

        roughness * roughness
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GBufferView<'a> {
    pub position: Image<'a>,
    pub normal: Image<'a>,
    pub albedo: Image<'a>,
    pub material: Image<'a>,
    pub depth: Image<'a>,
}

impl GBufferView<'_> {
    pub fn get(&self, screen_pos: UVec2) -> GBufferEntry {
        GBufferEntry::from_texels(
            self.position.load(screen_pos),
            self.normal.load(screen_pos),
            self.albedo.load(screen_pos),
            self.material.load(screen_pos),
            self.depth.load(screen_pos),
        )
    }
}
