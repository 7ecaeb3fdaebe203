use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

use crate::{DiffuseBrdf, F32Ext, Hit, Ray, SpecularBrdf, Vec3Ext};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Light {
    /// x - position x (spot) or direction x (directional)
    /// y - position y (spot) or direction y (directional)
    /// z - position z (spot) or direction z (directional)
    /// w - light type, see `Light::TYPE_*`
    pub d0: Vec4,

    /// x - color r
    /// y - color g
    /// z - color b
    /// w - intensity
    pub d1: Vec4,

    /// x - if it's a spot light: direction x
    /// y - if it's a spot light: direction y
    /// z - if it's a spot light: direction z
    /// w - if it's a spot light: range
    pub d2: Vec4,

    /// Light's view-projection transform; for spot lights its frustum spans
    /// the cone, which is how the cone attenuation gets evaluated.
    pub light_space: Mat4,
}

impl Light {
    pub const TYPE_NONE: f32 = 0.0;
    pub const TYPE_DIRECTIONAL: f32 = 1.0;
    pub const TYPE_SPOT: f32 = 2.0;

    /// Creates a directional light shining from `position` towards the
    /// world's origin.
    pub fn directional(position: Vec3, color: Vec3, intensity: f32) -> Self {
        let direction = (-position).normalize_or_zero();

        let light_space =
            Mat4::orthographic_rh(-11.0, 11.0, -11.0, 11.0, 1.0, 28.1)
                * Mat4::look_at_rh(position, Vec3::ZERO, up_for(direction));

        Self {
            d0: direction.extend(Self::TYPE_DIRECTIONAL),
            d1: color.extend(intensity),
            d2: Vec4::ZERO,
            light_space,
        }
    }

    /// Creates a spot light at `position` pointing towards `target`, with
    /// given half-angle of its cone.
    pub fn spot(
        position: Vec3,
        target: Vec3,
        angle: f32,
        color: Vec3,
        intensity: f32,
        range: f32,
    ) -> Self {
        let direction = (target - position).normalize_or_zero();

        let light_space = Mat4::perspective_rh(2.0 * angle, 1.0, 0.05, range)
            * Mat4::look_at_rh(position, target, up_for(direction));

        Self {
            d0: position.extend(Self::TYPE_SPOT),
            d1: color.extend(intensity),
            d2: direction.extend(range),
            light_space,
        }
    }

    pub fn kind(&self) -> f32 {
        self.d0.w
    }

    pub fn is_none(&self) -> bool {
        self.kind() == Self::TYPE_NONE
    }

    pub fn is_directional(&self) -> bool {
        self.kind() == Self::TYPE_DIRECTIONAL
    }

    pub fn is_spot(&self) -> bool {
        self.kind() == Self::TYPE_SPOT
    }

    pub fn position(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn radiance(&self) -> Vec3 {
        self.d1.xyz() * self.d1.w
    }

    pub fn range(&self) -> f32 {
        self.d2.w
    }

    /// Returns how much of the spot's cone covers given point, `<0.0, 1.0>`.
    pub fn cone_factor(&self, point: Vec3) -> f32 {
        let clip = self.light_space * point.extend(1.0);

        if clip.w <= 0.0 {
            return 0.0;
        }

        let ndc = clip.xy() / clip.w;

        (1.0 - ndc.length_squared()).saturate().sqr()
    }

    /// Returns the direction towards this light and the light's incoming
    /// radiance at given point; radiance is zero for points out of reach.
    pub fn incident(&self, point: Vec3) -> (Vec3, Vec3) {
        if self.is_directional() {
            return (-self.d0.xyz(), self.radiance());
        }

        if !self.is_spot() {
            return (Vec3::ZERO, Vec3::ZERO);
        }

        let to_light = self.position() - point;
        let distance_squared = to_light.length_squared().max(0.0001);

        let range_factor = {
            let factor = distance_squared / self.range().sqr().max(0.0001);
            let smooth_factor = (1.0 - factor * factor).saturate();

            smooth_factor * smooth_factor
        };

        let attenuation =
            self.cone_factor(point) * range_factor / distance_squared;

        (to_light.normalize_or_zero(), self.radiance() * attenuation)
    }

    /// Returns contribution of this light on given hit point, i.e. BRDF times
    /// incoming radiance times the cosine term.
    ///
    /// Note that this function doesn't perform visibility check (see:
    /// [`Self::visibility_ray()`]).
    pub fn contribution(&self, hit: &Hit) -> Vec3 {
        let (l, radiance) = self.incident(hit.gbuffer.position);

        if radiance == Vec3::ZERO {
            return Vec3::ZERO;
        }

        let n = hit.gbuffer.normal;
        let n_o_l = n.dot(l);

        if n_o_l <= 0.0 {
            return Vec3::ZERO;
        }

        let v = hit.view_dir();
        let diffuse = DiffuseBrdf::new(&hit.gbuffer).eval(l, v, n, n_o_l);
        let specular = SpecularBrdf::new(&hit.gbuffer).eval(l, v, n);

        (diffuse + specular) * radiance * n_o_l
    }

    /// Returns the target function used for resampling: luminance of the
    /// unshadowed contribution.
    pub fn target_pdf(&self, hit: &Hit) -> f32 {
        self.contribution(hit).luma()
    }

    /// Returns the shadow ray connecting given hit point with this light, or
    /// `None` if this light doesn't exist.
    pub fn visibility_ray(&self, hit: &Hit) -> Option<Ray> {
        if self.is_directional() {
            Some(Ray::new(hit.point, -self.d0.xyz(), Ray::FAR))
        } else if self.is_spot() {
            let to_light = self.position() - hit.point;
            let distance = to_light.length();

            Some(Ray::new(
                hit.point,
                to_light / distance.max(0.0001),
                (distance - Hit::NUDGE_OFFSET).max(0.0),
            ))
        } else {
            None
        }
    }
}

/// Returns an up-vector that's not parallel to given direction.
fn up_for(direction: Vec3) -> Vec3 {
    if direction.y.abs() > 0.99 {
        Vec3::Z
    } else {
        Vec3::Y
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct LightId(u32);

impl LightId {
    pub const NONE: Self = Self(u32::MAX);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Encodes this id so that it survives a trip through a float texture;
    /// `-1.0` stands for "no light".
    pub fn to_f32(self) -> f32 {
        if self.is_none() {
            -1.0
        } else {
            self.0 as f32
        }
    }

    pub fn from_f32(value: f32) -> Self {
        if value < 0.0 {
            Self::NONE
        } else {
            Self(value as u32)
        }
    }
}
