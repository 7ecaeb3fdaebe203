use bytemuck::{Pod, Zeroable};
use glam::{vec2, IVec2, Mat4, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::Ray;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct Camera {
    pub projection_view: Mat4,
    pub ndc_to_world: Mat4,

    /// x - origin x
    /// y - origin y
    /// z - origin z
    /// w - vertical field of view, in radians
    pub origin: Vec4,

    /// x - viewport width
    /// y - viewport height
    /// z - near plane
    /// w - far plane
    pub screen: Vec4,
}

impl Camera {
    pub fn origin(&self) -> Vec3 {
        self.origin.xyz()
    }

    /// Given a point in world-coordinates, returns it in clip-coordinates.
    pub fn world_to_clip(&self, pos: Vec3) -> Vec4 {
        self.projection_view * pos.extend(1.0)
    }

    /// Given a point in world-coordinates, returns it in screen-coordinates.
    pub fn world_to_screen(&self, pos: Vec3) -> Vec2 {
        self.clip_to_screen(self.world_to_clip(pos))
    }

    /// Given a point in clip-coordinates, returns it in screen-coordinates.
    ///
    /// Note that this doesn't handle points behind the camera (`pos.w <= 0.0`)
    /// - callers have to check for that on their own.
    pub fn clip_to_screen(&self, pos: Vec4) -> Vec2 {
        let ndc = pos.xy() / pos.w;
        let ndc = vec2(ndc.x, -ndc.y);

        (0.5 * ndc + 0.5) * self.screen.xy()
    }

    pub fn screen_size(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    /// Returns whether given point lays inside the screen.
    pub fn contains(&self, pos: IVec2) -> bool {
        let screen_size = self.screen.xy().as_ivec2();

        pos.x >= 0
            && pos.y >= 0
            && pos.x < screen_size.x
            && pos.y < screen_size.y
    }

    /// Casts a ray from camera's origin through the center of given pixel.
    pub fn ray(&self, screen_pos: UVec2) -> Ray {
        let screen_size = self.screen.xy();
        let ndc = (screen_pos.as_vec2() + 0.5) * 2.0 / screen_size - Vec2::ONE;
        let ndc = vec2(ndc.x, -ndc.y);

        let near_plane = self.ndc_to_world.project_point3(ndc.extend(0.0));
        let far_plane = self.ndc_to_world.project_point3(ndc.extend(1.0));

        Ray::new(self.origin(), (far_plane - near_plane).normalize(), f32::MAX)
    }

    pub fn is_eq(&self, rhs: &Self) -> bool {
        self.projection_view.abs_diff_eq(rhs.projection_view, 0.0001)
            && self.screen == rhs.screen
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3, vec4};

    use super::*;

    fn camera() -> Camera {
        let projection = Mat4::perspective_rh(
            60.0f32.to_radians(),
            64.0 / 48.0,
            0.1,
            100.0,
        );

        let view = Mat4::look_at_rh(
            vec3(0.0, 1.0, 0.0),
            vec3(0.0, 1.0, -1.0),
            Vec3::Y,
        );

        let projection_view = projection * view;

        Camera {
            projection_view,
            ndc_to_world: projection_view.inverse(),
            origin: vec4(0.0, 1.0, 0.0, 60.0f32.to_radians()),
            screen: vec4(64.0, 48.0, 0.1, 100.0),
        }
    }

    #[test]
    fn ray_and_world_to_screen_agree() {
        let camera = camera();

        for pos in [uvec2(0, 0), uvec2(13, 27), uvec2(63, 47)] {
            let ray = camera.ray(pos);
            let screen = camera.world_to_screen(ray.at(5.0));

            assert_relative_eq!(screen.x, pos.x as f32 + 0.5, epsilon = 0.01);
            assert_relative_eq!(screen.y, pos.y as f32 + 0.5, epsilon = 0.01);
        }
    }

    #[test]
    fn contains() {
        let camera = camera();

        assert!(camera.contains(IVec2::new(0, 0)));
        assert!(camera.contains(IVec2::new(63, 47)));
        assert!(!camera.contains(IVec2::new(-1, 0)));
        assert!(!camera.contains(IVec2::new(64, 0)));
        assert!(!camera.contains(IVec2::new(0, 48)));
    }

    #[test]
    fn points_behind_the_camera_have_negative_w() {
        let camera = camera();

        assert!(camera.world_to_clip(vec3(0.0, 1.0, 5.0)).w < 0.0);
        assert!(camera.world_to_clip(vec3(0.0, 1.0, -5.0)).w > 0.0);
    }
}
