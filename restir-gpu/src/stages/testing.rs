use glam::{uvec2, vec3, vec4, Mat4, UVec2, Vec3, Vec4};

use crate::{Camera, GBufferEntry, GBufferView, Hit, Image};

/// Tiny viewport rendering a white floor (`y = 0`), with G-buffer filled in
/// analytically.
pub struct Fixture {
    pub camera: Camera,
    pub gbuffer: [Vec<Vec4>; 5],
    pub size: UVec2,
}

impl Fixture {
    /// 4x4 viewport looking straight down at the floor.
    pub fn floor() -> Self {
        Self::new(uvec2(4, 4), vec3(0.0, 5.0, 0.0), Vec3::ZERO)
    }

    /// 4x4 viewport looking up, where nothing gets hit.
    pub fn sky() -> Self {
        Self::new(uvec2(4, 4), vec3(0.0, 5.0, 0.0), vec3(0.0, 10.0, 0.0))
    }

    pub fn new(size: UVec2, eye: Vec3, target: Vec3) -> Self {
        let camera = camera(size, eye, target);
        let mut gbuffer: [Vec<Vec4>; 5] = Default::default();

        for y in 0..size.y {
            for x in 0..size.x {
                let ray = camera.ray(uvec2(x, y));

                let entry = if ray.dir().y < 0.0 {
                    let t = -ray.origin().y / ray.dir().y;

                    GBufferEntry {
                        position: ray.at(t),
                        normal: Vec3::Y,
                        albedo: Vec3::splat(0.8),
                        metallic: 0.0,
                        roughness: 0.8,
                        depth: t,
                    }
                } else {
                    GBufferEntry::default()
                };

                for (image, texel) in gbuffer.iter_mut().zip(entry.to_texels())
                {
                    image.push(texel);
                }
            }
        }

        Self {
            camera,
            gbuffer,
            size,
        }
    }

    pub fn gbuffer(&self) -> GBufferView<'_> {
        GBufferView {
            position: Image::new(self.size, &self.gbuffer[0]),
            normal: Image::new(self.size, &self.gbuffer[1]),
            albedo: Image::new(self.size, &self.gbuffer[2]),
            material: Image::new(self.size, &self.gbuffer[3]),
            depth: Image::new(self.size, &self.gbuffer[4]),
        }
    }

    pub fn hit(&self, pos: UVec2) -> Hit {
        Hit::new(self.camera.origin(), self.gbuffer().get(pos))
    }

    /// Returns a zeroed image of this fixture's size.
    pub fn image(&self) -> Vec<Vec4> {
        vec![Vec4::ZERO; (self.size.x * self.size.y) as usize]
    }

    /// Returns an image of this fixture's size filled with given texel.
    pub fn image_of(&self, texel: Vec4) -> Vec<Vec4> {
        vec![texel; (self.size.x * self.size.y) as usize]
    }

    /// Iterates over all pixels, in the row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = UVec2> {
        let size = self.size;

        (0..size.y).flat_map(move |y| (0..size.x).map(move |x| uvec2(x, y)))
    }
}

pub fn camera(size: UVec2, eye: Vec3, target: Vec3) -> Camera {
    let dir = (target - eye).normalize();
    let up = if dir.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };

    let projection_view =
        Mat4::perspective_rh(0.5, size.x as f32 / size.y as f32, 0.1, 100.0)
            * Mat4::look_at_rh(eye, target, up);

    Camera {
        projection_view,
        ndc_to_world: projection_view.inverse(),
        origin: eye.extend(0.5),
        screen: vec4(size.x as f32, size.y as f32, 0.1, 100.0),
    }
}
