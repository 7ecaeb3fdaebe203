use core::f32::consts::PI;

use glam::Vec3;

use crate::{F32Ext, GBufferEntry};

#[derive(Clone, Copy)]
pub struct DiffuseBrdf<'a> {
    gbuffer: &'a GBufferEntry,
}

impl<'a> DiffuseBrdf<'a> {
    pub fn new(gbuffer: &'a GBufferEntry) -> Self {
        Self { gbuffer }
    }

    pub fn eval(self, l: Vec3, v: Vec3, n: Vec3, n_o_l: f32) -> Vec3 {
        let h = (l + v).normalize_or_zero();
        let n_o_v = n.dot(v).max(0.0001);
        let l_o_h = l.dot(h).saturate();

        self.gbuffer.albedo
            * fd_burley(self.gbuffer.clamped_roughness(), n_o_v, n_o_l, l_o_h)
            * (1.0 - self.gbuffer.metallic)
    }
}

#[derive(Clone, Copy)]
pub struct SpecularBrdf<'a> {
    gbuffer: &'a GBufferEntry,
}

impl<'a> SpecularBrdf<'a> {
    pub fn new(gbuffer: &'a GBufferEntry) -> Self {
        Self { gbuffer }
    }

    pub fn eval(self, l: Vec3, v: Vec3, n: Vec3) -> Vec3 {
        let h = (l + v).normalize_or_zero();
        let n_o_l = n.dot(l).saturate();
        let n_o_v = n.dot(v).max(0.0001);
        let n_o_h = n.dot(h).saturate();
        let l_o_h = l.dot(h).saturate();

        let f0 = Vec3::splat(0.04 * (1.0 - self.gbuffer.metallic))
            + self.gbuffer.albedo * self.gbuffer.metallic;

        let roughness = self.gbuffer.clamped_roughness();
        let d = d_ggx(roughness, n_o_h);
        let v = v_smith_ggx_correlated(roughness, n_o_v, n_o_l);
        let f = f_schlick(f0, l_o_h);

        d * v * f
    }
}

fn fd_burley(roughness: f32, n_o_v: f32, n_o_l: f32, l_o_h: f32) -> f32 {
    let f90 = 0.5 + 2.0 * roughness * l_o_h * l_o_h;
    let light_scatter = f_schlick_scalar(1.0, f90, n_o_l);
    let view_scatter = f_schlick_scalar(1.0, f90, n_o_v);

    light_scatter * view_scatter * (1.0 / PI)
}

fn d_ggx(roughness: f32, n_o_h: f32) -> f32 {
    let one_minus_noh_squared = 1.0 - n_o_h * n_o_h;
    let a = n_o_h * roughness;
    let k = roughness / (one_minus_noh_squared + a * a);

    k * k * (1.0 / PI)
}

fn v_smith_ggx_correlated(roughness: f32, n_o_v: f32, n_o_l: f32) -> f32 {
    let a2 = roughness * roughness;
    let lambda_v = n_o_l * ((n_o_v - a2 * n_o_v) * n_o_v + a2).sqrt();
    let lambda_l = n_o_v * ((n_o_l - a2 * n_o_l) * n_o_l + a2).sqrt();

    0.5 / (lambda_v + lambda_l).max(0.0001)
}

fn f_schlick(f0: Vec3, v_o_h: f32) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - v_o_h).max(0.001).powf(5.0)
}

fn f_schlick_scalar(f0: f32, f90: f32, v_o_h: f32) -> f32 {
    f0 + (f90 - f0) * (1.0 - v_o_h).max(0.001).powf(5.0)
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    fn gbuffer(metallic: f32) -> GBufferEntry {
        GBufferEntry {
            normal: Vec3::Y,
            albedo: vec3(0.8, 0.6, 0.4),
            metallic,
            roughness: 0.5,
            depth: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn fully_metallic_surfaces_have_no_diffuse_lobe() {
        let gbuffer = gbuffer(1.0);
        let l = vec3(0.3, 1.0, 0.0).normalize();
        let v = vec3(-0.3, 1.0, 0.2).normalize();

        let diffuse = DiffuseBrdf::new(&gbuffer).eval(l, v, Vec3::Y, l.y);

        assert_eq!(Vec3::ZERO, diffuse);
    }

    #[test]
    fn brdf_is_positive_and_finite_above_the_surface() {
        let gbuffer = gbuffer(0.0);

        for l in [Vec3::Y, vec3(1.0, 0.1, 0.0).normalize()] {
            for v in [Vec3::Y, vec3(0.0, 0.2, 1.0).normalize()] {
                let diffuse =
                    DiffuseBrdf::new(&gbuffer).eval(l, v, Vec3::Y, l.y);

                let specular = SpecularBrdf::new(&gbuffer).eval(l, v, Vec3::Y);

                assert!(diffuse.min_element() > 0.0);
                assert!(specular.min_element() > 0.0);
                assert!((diffuse + specular).is_finite());
            }
        }
    }
}
