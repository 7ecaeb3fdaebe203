use glam::{UVec2, Vec3, Vec4};

use crate::{
    Camera, DiReservoir, GBufferView, Hit, Image, ImageMut, LightsView,
    Visibility,
};

/// Evaluates each pixel's radiance from its reservoir: contribution of the
/// chosen light times the reservoir's weight, provided the light is visible.
///
/// Which reservoirs come in here (raw candidates or the resampled ones) is
/// decided once per frame by the caller.
pub fn main(
    global_id: UVec2,
    camera: &Camera,
    lights: LightsView,
    gbuffer: GBufferView,
    vis: &impl Visibility,
    reservoirs: Image,
    out: &mut ImageMut,
) {
    let screen_pos = global_id;

    if !camera.contains(screen_pos.as_ivec2()) {
        return;
    }

    let hit = Hit::new(camera.origin(), gbuffer.get(screen_pos));

    if hit.is_none() {
        out.store(screen_pos, Vec4::ZERO);
        return;
    }

    let res = DiReservoir::deserialize(reservoirs.load(screen_pos));
    let light = lights.get(res.sample.light_id);

    let color = if res.w > 0.0 && hit.is_visible(vis, &light) {
        light.contribution(&hit) * res.w
    } else {
        Vec3::ZERO
    };

    out.store(screen_pos, color.extend(1.0));
}
