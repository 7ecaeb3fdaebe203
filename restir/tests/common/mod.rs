#![allow(dead_code)]

use glam::{vec3, Vec3, Vec4, Vec4Swizzles};
use restir::gpu::Image;
use restir::software::{pixels, Scene, SoftwareRenderer};
use restir::{Camera, Light, Lights, RendererConfig, Viewport};

pub const SIZE: u32 = 12;

pub fn camera() -> Camera {
    Camera::looking_at(
        vec3(0.0, 6.0, 8.0),
        Vec3::ZERO,
        1.0,
        Viewport::new(SIZE, SIZE).unwrap(),
    )
}

/// Ground plane with a sphere casting shadows on it.
pub fn scene() -> Scene {
    Scene::new()
        .with_plane(Vec3::ZERO, Vec3::Y, vec3(0.8, 0.8, 0.8))
        .with_sphere(vec3(0.0, 1.0, 0.0), 1.0, vec3(0.9, 0.4, 0.3))
}

pub fn plane() -> Scene {
    Scene::new().with_plane(Vec3::ZERO, Vec3::Y, vec3(0.8, 0.8, 0.8))
}

pub fn directional_light() -> Lights {
    let mut lights = Lights::new();

    lights
        .add(Light::Directional {
            position: vec3(3.0, 10.0, 4.0),
            color: Vec3::ONE,
            intensity: 1.0,
        })
        .unwrap();

    lights
}

/// Four spot lights of different colors, pointing down at the corners of the
/// visible part of the plane, plus a dim directional one.
pub fn spot_lights() -> Lights {
    let mut lights = Lights::new();

    let spots = [
        (vec3(-2.0, 4.0, -2.0), vec3(1.0, 0.2, 0.2), 16.0),
        (vec3(2.0, 4.0, -2.0), vec3(0.2, 1.0, 0.2), 24.0),
        (vec3(-2.0, 4.0, 2.0), vec3(0.2, 0.2, 1.0), 12.0),
        (vec3(2.0, 4.0, 2.0), vec3(1.0, 1.0, 1.0), 8.0),
    ];

    for (position, color, intensity) in spots {
        lights
            .add(Light::Spot {
                position,
                target: position * vec3(1.0, 0.0, 1.0),
                angle: 45.0f32.to_radians(),
                color,
                intensity,
                range: 30.0,
            })
            .unwrap();
    }

    lights
        .add(Light::Directional {
            position: vec3(-4.0, 10.0, 1.0),
            color: Vec3::ONE,
            intensity: 0.25,
        })
        .unwrap();

    lights
}

pub fn renderer(scene: Scene, config: &RendererConfig) -> SoftwareRenderer {
    SoftwareRenderer::new(scene, camera(), config).unwrap()
}

pub fn render(
    target: &mut SoftwareRenderer,
    lights: &Lights,
    config: &RendererConfig,
    frames: usize,
) {
    for _ in 0..frames {
        target.render(lights, config).unwrap();
    }
}

pub fn texels(image: Image) -> Vec<Vec4> {
    pixels(image.size()).map(|pos| image.load(pos)).collect()
}

/// Returns the sum of absolute per-pixel differences, relative to the sum of
/// the expected image.
pub fn relative_error(actual: Image, expected: &[Vec4]) -> f32 {
    let (diff, total) = texels(actual).into_iter().zip(expected).fold(
        (0.0, 0.0),
        |(diff, total), (actual, expected)| {
            (
                diff + (actual.xyz() - expected.xyz()).abs().element_sum(),
                total + expected.xyz().element_sum(),
            )
        },
    );

    diff / total
}

/// Returns the relative difference between images' average brightness.
pub fn relative_bias(actual: Image, expected: &[Vec4]) -> f32 {
    let actual: f32 = texels(actual).iter().map(|c| c.xyz().element_sum()).sum();
    let expected: f32 = expected.iter().map(|c| c.xyz().element_sum()).sum();

    (actual - expected).abs() / expected
}
