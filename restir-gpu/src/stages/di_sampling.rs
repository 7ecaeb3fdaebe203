use glam::{UVec2, Vec4};

use crate::{
    CandidatesPassParams, Camera, DiReservoir, DiSample, GBufferView, Hit,
    ImageMut, LightsView, Visibility, WhiteNoise,
};

/// Generates each pixel's initial reservoir by streaming `M` uniformly picked
/// light candidates through it, and shades the winner as a preview.
pub fn main(
    global_id: UVec2,
    params: &CandidatesPassParams,
    camera: &Camera,
    lights: LightsView,
    gbuffer: GBufferView,
    vis: &impl Visibility,
    reservoirs: &mut ImageMut,
    shading: &mut ImageMut,
) {
    let screen_pos = global_id;

    if !camera.contains(screen_pos.as_ivec2()) {
        return;
    }

    let mut wnoise = WhiteNoise::new(params.seed, screen_pos);

    // -------------------------------------------------------------------------

    let hit = Hit::new(camera.origin(), gbuffer.get(screen_pos));

    if hit.is_none() {
        reservoirs.store(screen_pos, DiReservoir::default().serialize());
        shading.store(screen_pos, Vec4::ZERO);
        return;
    }

    let mut res = DiReservoir::default();

    for _ in 0..params.candidates {
        let (light_id, source_pdf) = lights.sample(&mut wnoise);

        if light_id.is_none() {
            break;
        }

        let sample = DiSample {
            light_id,
            pdf: lights.get(light_id).target_pdf(&hit),
        };

        res.update(&mut wnoise, sample, sample.pdf / source_pdf);
    }

    let pdf = res.sample.pdf;

    res.normalize(pdf);

    // -------------------------------------------------------------------------

    let light = lights.get(res.sample.light_id);

    if res.w > 0.0 && !hit.is_visible(vis, &light) {
        res.w = 0.0;
    }

    reservoirs.store(screen_pos, res.serialize());

    shading.store(
        screen_pos,
        (light.contribution(&hit) * res.w).extend(1.0),
    );
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3, vec4, Vec3};

    use super::*;
    use crate::stages::testing::Fixture;
    use crate::{Light, Ray, Unoccluded};

    fn run(
        fixture: &Fixture,
        lights: &[Light],
        candidates: u32,
        vis: &impl Visibility,
    ) -> (Vec<Vec4>, Vec<Vec4>) {
        let mut reservoirs = fixture.image();
        let mut shading = fixture.image();

        {
            let mut reservoirs = ImageMut::new(fixture.size, &mut reservoirs);
            let mut shading = ImageMut::new(fixture.size, &mut shading);

            let params = CandidatesPassParams {
                seed: 1234,
                candidates,
                ..Default::default()
            };

            for global_id in fixture.pixels() {
                main(
                    global_id,
                    &params,
                    &fixture.camera,
                    LightsView::new(lights),
                    fixture.gbuffer(),
                    vis,
                    &mut reservoirs,
                    &mut shading,
                );
            }
        }

        (reservoirs, shading)
    }

    struct Blocked;

    impl Visibility for Blocked {
        fn is_occluded(&self, _: Ray) -> bool {
            true
        }
    }

    #[test]
    fn single_light_is_estimated_exactly() {
        let fixture = Fixture::floor();
        let light = Light::directional(vec3(1.0, 10.0, 0.0), Vec3::ONE, 3.0);
        let (reservoirs, shading) = run(&fixture, &[light], 32, &Unoccluded);

        for (pos, (res, color)) in
            fixture.pixels().zip(reservoirs.iter().zip(&shading))
        {
            let res = DiReservoir::deserialize(*res);
            let expected = light.contribution(&fixture.hit(pos));

            assert_eq!(32.0, res.m);
            assert_eq!(0, res.sample.light_id.get());
            assert_relative_eq!(res.w, 1.0, max_relative = 0.0001);
            assert_relative_eq!(color.x, expected.x, max_relative = 0.0001);
        }
    }

    #[test]
    fn occluded_candidates_contribute_nothing() {
        let fixture = Fixture::floor();
        let light = Light::directional(vec3(0.0, 10.0, 0.0), Vec3::ONE, 3.0);
        let (reservoirs, shading) = run(&fixture, &[light], 8, &Blocked);

        for (res, color) in reservoirs.iter().zip(&shading) {
            let res = DiReservoir::deserialize(*res);

            assert_eq!(8.0, res.m);
            assert_eq!(0.0, res.w);
            assert_eq!(vec4(0.0, 0.0, 0.0, 1.0), *color);
        }
    }

    #[test]
    fn no_lights_means_empty_reservoirs() {
        let fixture = Fixture::floor();
        let (reservoirs, shading) = run(&fixture, &[], 32, &Unoccluded);

        for (res, color) in reservoirs.iter().zip(&shading) {
            assert!(DiReservoir::deserialize(*res).is_empty());
            assert_eq!(vec4(0.0, 0.0, 0.0, 1.0), *color);
        }
    }

    #[test]
    fn background_pixels_stay_black() {
        let fixture = Fixture::sky();
        let light = Light::directional(vec3(0.0, 10.0, 0.0), Vec3::ONE, 3.0);
        let (reservoirs, shading) = run(&fixture, &[light], 32, &Unoccluded);

        for (res, color) in reservoirs.iter().zip(&shading) {
            assert!(DiReservoir::deserialize(*res).is_empty());
            assert_eq!(Vec4::ZERO, *color);
        }
    }

    #[test]
    fn brighter_lights_get_picked_more_often() {
        let fixture = Fixture::floor();

        let lights = [
            Light::directional(vec3(0.0, 10.0, 0.0), Vec3::ONE, 1.0),
            Light::directional(vec3(0.0, 10.0, 0.0), Vec3::ONE, 9.0),
        ];

        let (reservoirs, _) = run(&fixture, &lights, 32, &Unoccluded);

        let picks = reservoirs
            .iter()
            .map(|res| DiReservoir::deserialize(*res))
            .filter(|res| res.sample.light_id.get() == 1)
            .count();

        assert!(picks >= 10, "picks = {picks}");
        assert_eq!(uvec2(4, 4), fixture.size);
    }
}
