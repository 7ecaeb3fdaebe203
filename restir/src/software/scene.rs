use glam::{uvec2, UVec2, Vec3, Vec4};

use crate::gpu;

/// Minimum distance at which an intersection counts; avoids surfaces
/// shadowing themselves.
const MIN_T: f32 = 0.0001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Infinite plane going through `point`
    Plane { point: Vec3, normal: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

impl Shape {
    /// Returns distance to the closest intersection along given ray, if any.
    pub fn intersect(&self, ray: gpu::Ray) -> Option<f32> {
        match *self {
            Shape::Plane { point, normal } => {
                let denom = normal.dot(ray.dir());

                if denom.abs() < 1.0e-6 {
                    return None;
                }

                let t = (point - ray.origin()).dot(normal) / denom;

                (t > MIN_T).then_some(t)
            }

            Shape::Sphere { center, radius } => {
                let oc = ray.origin() - center;
                let b = oc.dot(ray.dir());
                let c = oc.length_squared() - radius * radius;
                let disc = b * b - c;

                if disc < 0.0 {
                    return None;
                }

                let disc = disc.sqrt();

                [-b - disc, -b + disc].into_iter().find(|&t| t > MIN_T)
            }
        }
    }

    pub fn normal(&self, point: Vec3) -> Vec3 {
        match *self {
            Shape::Plane { normal, .. } => normal.normalize_or_zero(),
            Shape::Sphere { center, .. } => (point - center).normalize_or_zero(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Object {
    pub shape: Shape,
    pub albedo: Vec3,
    pub metallic: f32,
    pub roughness: f32,
}

impl Object {
    pub fn new(shape: Shape, albedo: Vec3) -> Self {
        Self {
            shape,
            albedo,
            metallic: 0.0,
            roughness: 0.8,
        }
    }
}

/// Analytic scene made of planes and spheres; provides both the G-buffer and
/// the visibility queries for the software pipeline.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<Object>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: Object) -> &mut Self {
        self.objects.push(object);
        self
    }

    pub fn with_plane(mut self, point: Vec3, normal: Vec3, albedo: Vec3) -> Self {
        self.add(Object::new(Shape::Plane { point, normal }, albedo));
        self
    }

    pub fn with_sphere(mut self, center: Vec3, radius: f32, albedo: Vec3) -> Self {
        self.add(Object::new(Shape::Sphere { center, radius }, albedo));
        self
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Returns the closest object hit by given ray, along with the distance.
    pub fn trace(&self, ray: gpu::Ray) -> Option<(f32, &Object)> {
        self.objects
            .iter()
            .filter_map(|object| Some((object.shape.intersect(ray)?, object)))
            .filter(|(t, _)| *t < ray.max_t())
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
    }

    /// Rasterizes this scene into G-buffer images (position, normal, albedo,
    /// material, depth), in the row-major order.
    pub fn gbuffer(&self, camera: &gpu::Camera) -> [Vec<Vec4>; 5] {
        let size = camera.screen_size();
        let mut gbuffer: [Vec<Vec4>; 5] = Default::default();

        for image in &mut gbuffer {
            image.reserve((size.x * size.y) as usize);
        }

        for pos in pixels(size) {
            let ray = camera.ray(pos);

            let entry = if let Some((t, object)) = self.trace(ray) {
                let position = ray.at(t);
                let mut normal = object.shape.normal(position);

                // Planes are two-sided
                if normal.dot(ray.dir()) > 0.0 {
                    normal = -normal;
                }

                gpu::GBufferEntry {
                    position,
                    normal,
                    albedo: object.albedo,
                    metallic: object.metallic,
                    roughness: object.roughness,
                    depth: t,
                }
            } else {
                gpu::GBufferEntry::default()
            };

            for (image, texel) in gbuffer.iter_mut().zip(entry.to_texels()) {
                image.push(texel);
            }
        }

        gbuffer
    }
}

impl gpu::Visibility for Scene {
    fn is_occluded(&self, ray: gpu::Ray) -> bool {
        self.objects.iter().any(|object| {
            object
                .shape
                .intersect(ray)
                .is_some_and(|t| t < ray.max_t())
        })
    }
}

/// Iterates over all pixels of given viewport, in the row-major order.
pub fn pixels(size: UVec2) -> impl Iterator<Item = UVec2> {
    (0..size.y).flat_map(move |y| (0..size.x).map(move |x| uvec2(x, y)))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;
    use crate::gpu::Visibility;

    fn ray(origin: Vec3, dir: Vec3) -> gpu::Ray {
        gpu::Ray::new(origin, dir.normalize(), gpu::Ray::FAR)
    }

    #[test]
    fn plane_intersection() {
        let plane = Shape::Plane {
            point: Vec3::ZERO,
            normal: Vec3::Y,
        };

        let t = plane.intersect(ray(vec3(0.0, 2.0, 0.0), -Vec3::Y));

        assert_relative_eq!(t.unwrap(), 2.0);
        assert!(plane.intersect(ray(vec3(0.0, 2.0, 0.0), Vec3::Y)).is_none());
        assert!(plane.intersect(ray(vec3(0.0, 2.0, 0.0), Vec3::X)).is_none());
    }

    #[test]
    fn sphere_intersection() {
        let sphere = Shape::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };

        let t = sphere.intersect(ray(vec3(0.0, 0.0, 5.0), -Vec3::Z));

        assert_relative_eq!(t.unwrap(), 4.0);

        // From the inside, the far side gets hit
        let t = sphere.intersect(ray(Vec3::ZERO, Vec3::Z));

        assert_relative_eq!(t.unwrap(), 1.0);

        assert!(sphere.intersect(ray(vec3(0.0, 2.0, 5.0), -Vec3::Z)).is_none());
    }

    #[test]
    fn occlusion_respects_max_t() {
        let scene = Scene::new().with_sphere(vec3(0.0, 2.0, 0.0), 0.5, Vec3::ONE);
        let origin = vec3(0.0, 0.01, 0.0);

        assert!(scene.is_occluded(gpu::Ray::new(origin, Vec3::Y, 10.0)));
        assert!(!scene.is_occluded(gpu::Ray::new(origin, Vec3::Y, 1.0)));
        assert!(!scene.is_occluded(gpu::Ray::new(origin, Vec3::X, 10.0)));
    }

    #[test]
    fn gbuffer_of_a_floor() {
        let scene = Scene::new().with_plane(Vec3::ZERO, Vec3::Y, Vec3::ONE);

        let camera = crate::Camera::looking_at(
            vec3(0.0, 5.0, 0.0),
            Vec3::ZERO,
            1.0,
            crate::Viewport::new(4, 4).unwrap(),
        )
        .serialize();

        let [position, normal, _, _, depth] = scene.gbuffer(&camera);

        assert_eq!(16, position.len());

        for ((position, normal), depth) in position.iter().zip(&normal).zip(&depth)
        {
            assert_relative_eq!(position.y, 0.0, epsilon = 0.0001);
            assert_relative_eq!(normal.y, 1.0);
            assert!(depth.x >= 5.0);
        }
    }
}
