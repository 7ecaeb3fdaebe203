use glam::UVec2;

use crate::{Camera, GBufferView, ImageMut, MotionVector, Surface};

/// Reprojects each pixel's surface into the previous frame, writing its motion
/// vector and its current surface (which, once copied at the end of the frame,
/// becomes the next frame's previous surface).
///
/// Vectors are emitted for every pixel, including the ones that have no valid
/// previous-frame counterpart - rejecting those is up to the temporal
/// resampler.
pub fn main(
    global_id: UVec2,
    camera: &Camera,
    prev_camera: &Camera,
    gbuffer: GBufferView,
    motion: &mut ImageMut,
    surfaces: &mut ImageMut,
) {
    let screen_pos = global_id;

    if !camera.contains(screen_pos.as_ivec2()) {
        return;
    }

    let gbuffer = gbuffer.get(screen_pos);
    let motion_vector = MotionVector::estimate(screen_pos, &gbuffer, prev_camera);

    let surface = Surface {
        normal: gbuffer.normal,
        depth: gbuffer.depth,
    };

    motion.store(screen_pos, motion_vector.serialize());
    surfaces.store(screen_pos, surface.serialize());
}
