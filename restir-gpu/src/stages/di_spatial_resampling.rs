use glam::{UVec2, Vec2};

use crate::stages::Combination;
use crate::{
    Camera, DiReservoir, GBufferView, Hit, Image, ImageMut, LightsView,
    SpatialPassParams, Visibility, WhiteNoise, MAX_SPATIAL_SAMPLES,
};

/// Minimum search radius, in pixels; the radius shrinks each time a
/// neighbour gets rejected, but never below this.
const MIN_RADIUS: f32 = 3.0;

/// Merges each pixel's reservoir with reservoirs of a couple of randomly
/// chosen neighbours that lay on a similar surface.
pub fn main(
    global_id: UVec2,
    params: &SpatialPassParams,
    combination: Combination,
    camera: &Camera,
    lights: LightsView,
    gbuffer: GBufferView,
    vis: &impl Visibility,
    input: Image,
    out: &mut ImageMut,
) {
    let screen_pos = global_id;

    if !camera.contains(screen_pos.as_ivec2()) {
        return;
    }

    let hit = Hit::new(camera.origin(), gbuffer.get(screen_pos));
    let center = DiReservoir::deserialize(input.load(screen_pos));

    if hit.is_none() {
        out.store(screen_pos, center.serialize());
        return;
    }

    let mut wnoise = WhiteNoise::new(params.seed, screen_pos);
    let mut res = DiReservoir::default();

    res.merge(&wnoise, 0, &center, center.sample.pdf);

    // -------------------------------------------------------------------------

    let mut neighbours = [UVec2::ZERO; MAX_SPATIAL_SAMPLES as usize];
    let mut neighbours_m = [0.0; MAX_SPATIAL_SAMPLES as usize];
    let mut neighbours_len = 0;
    let mut radius = params.radius;

    for i in 0..params.samples.min(MAX_SPATIAL_SAMPLES) {
        let offset = wnoise.sample_disk() * radius;
        let neighbour_pos = (screen_pos.as_vec2() + Vec2::splat(0.5) + offset)
            .floor()
            .as_ivec2();

        if neighbour_pos == screen_pos.as_ivec2()
            || !camera.contains(neighbour_pos)
        {
            radius = (radius * 0.5).max(MIN_RADIUS);
            continue;
        }

        let neighbour_pos = neighbour_pos.as_uvec2();

        let neighbour_hit =
            Hit::new(camera.origin(), gbuffer.get(neighbour_pos));

        if !hit.surface().is_similar_to(&neighbour_hit.surface()) {
            radius = (radius * 0.5).max(MIN_RADIUS);
            continue;
        }

        let mut neighbour =
            DiReservoir::deserialize(input.load(neighbour_pos));

        if neighbour.is_empty() {
            continue;
        }

        neighbour.reservoir.sample.pdf = neighbour.sample.pdf_at(lights, &hit);

        res.merge(&wnoise, i + 1, &neighbour, neighbour.sample.pdf);

        neighbours[neighbours_len] = neighbour_pos;
        neighbours_m[neighbours_len] = neighbour.m;
        neighbours_len += 1;
    }

    // -------------------------------------------------------------------------

    let pdf = res.sample.pdf;

    match combination {
        Combination::Biased => {
            res.normalize(pdf);
        }

        Combination::Unbiased => {
            let light = lights.get(res.sample.light_id);
            let mut z = 0.0;

            if pdf > 0.0 {
                z += center.m;
            }

            for i in 0..neighbours_len {
                let neighbour_hit =
                    Hit::new(camera.origin(), gbuffer.get(neighbours[i]));

                if light.target_pdf(&neighbour_hit) > 0.0
                    && neighbour_hit.is_visible(vis, &light)
                {
                    z += neighbours_m[i];
                }
            }

            res.normalize_ex(pdf, z);
        }
    }

    res.clamp_m(params.max_m);

    out.store(screen_pos, res.serialize());
}
