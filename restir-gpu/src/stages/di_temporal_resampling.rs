use glam::UVec2;

use crate::stages::Combination;
use crate::{
    Camera, DiReservoir, GBufferEntry, GBufferView, Hit, Image, ImageMut,
    LightsView, MotionVector, Surface, TemporalPassParams, Visibility,
    WhiteNoise,
};

/// Merges each pixel's candidate reservoir with the reservoir its surface had
/// in the previous frame.
///
/// History is rejected (and the candidate reservoir passes through untouched)
/// when the motion vector points outside of the screen or at a different
/// surface.
///
/// In the unbiased mode the merged reservoir gets normalized only by the
/// sample counts of those inputs that could've produced the chosen sample,
/// i.e. for which it's got a non-zero target pdf and is visible - the
/// previous input being evaluated at the previous frame's surface.
pub fn main(
    global_id: UVec2,
    params: &TemporalPassParams,
    combination: Combination,
    camera: &Camera,
    prev_camera: &Camera,
    lights: LightsView,
    gbuffer: GBufferView,
    vis: &impl Visibility,
    motion: Image,
    prev_surfaces: Image,
    curr_reservoirs: Image,
    prev_reservoirs: Image,
    out: &mut ImageMut,
) {
    let screen_pos = global_id;

    if !camera.contains(screen_pos.as_ivec2()) {
        return;
    }

    let hit = Hit::new(camera.origin(), gbuffer.get(screen_pos));
    let curr = DiReservoir::deserialize(curr_reservoirs.load(screen_pos));

    let Some((mut prev, prev_hit)) = history(
        screen_pos,
        camera,
        prev_camera,
        &hit,
        motion,
        prev_surfaces,
        prev_reservoirs,
    ) else {
        out.store(screen_pos, curr.serialize());
        return;
    };

    // -------------------------------------------------------------------------

    let wnoise = WhiteNoise::new(params.seed, screen_pos);
    let mut res = DiReservoir::default();

    prev.clamp_m((params.max_m - curr.m).max(0.0));
    prev.reservoir.sample.pdf = prev.sample.pdf_at(lights, &hit);

    res.merge(&wnoise, 0, &curr, curr.sample.pdf);
    res.merge(&wnoise, 1, &prev, prev.sample.pdf);

    let pdf = res.sample.pdf;

    match combination {
        Combination::Biased => {
            res.normalize(pdf);
        }

        Combination::Unbiased => {
            let light = lights.get(res.sample.light_id);

            let can_produce = |hit: &Hit| {
                light.target_pdf(hit) > 0.0 && hit.is_visible(vis, &light)
            };

            let mut z = 0.0;

            if can_produce(&hit) {
                z += curr.m;
            }

            if can_produce(&prev_hit) {
                z += prev.m;
            }

            res.normalize_ex(pdf, z);
        }
    }

    res.clamp_m(params.max_m);

    out.store(screen_pos, res.serialize());
}

/// Looks up the reservoir this pixel's surface had in the previous frame,
/// together with that surface as seen from the previous camera.
fn history(
    screen_pos: UVec2,
    camera: &Camera,
    prev_camera: &Camera,
    hit: &Hit,
    motion: Image,
    prev_surfaces: Image,
    prev_reservoirs: Image,
) -> Option<(DiReservoir, Hit)> {
    if hit.is_none() {
        return None;
    }

    let prev_pos =
        MotionVector::deserialize(motion.load(screen_pos)).prev_pos(screen_pos);

    if !camera.contains(prev_pos) {
        return None;
    }

    let prev_pos = prev_pos.as_uvec2();
    let prev_surface = Surface::deserialize(prev_surfaces.load(prev_pos));

    if !hit.surface().is_similar_to(&prev_surface) {
        return None;
    }

    let prev = DiReservoir::deserialize(prev_reservoirs.load(prev_pos));

    if prev.is_empty() {
        return None;
    }

    // Materials aren't kept around, so the previous surface borrows the
    // current one's
    let prev_hit = Hit::new(
        prev_camera.origin(),
        GBufferEntry {
            position: prev_camera.ray(prev_pos).at(prev_surface.depth),
            normal: prev_surface.normal,
            depth: prev_surface.depth,
            ..hit.gbuffer
        },
    );

    Some((prev, prev_hit))
}
