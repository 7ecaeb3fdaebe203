use glam::{vec2, vec4, IVec2, UVec2, Vec2, Vec4, Vec4Swizzles};

use crate::{Camera, GBufferEntry};

/// Screen-space offset from a pixel's center to where its surface was seen
/// in the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionVector {
    pub offset: Vec2,
}

impl MotionVector {
    /// Offset emitted for pixels that have no previous-frame position at all
    /// (e.g. surfaces behind the previous camera); it's far enough to land
    /// outside of any viewport, so that the temporal resampler rejects it
    /// through its usual bounds check.
    pub const OFFSCREEN: Vec2 = vec2(-1.0e9, -1.0e9);

    /// Reprojects given surface into the previous frame.
    pub fn estimate(
        screen_pos: UVec2,
        gbuffer: &GBufferEntry,
        prev_camera: &Camera,
    ) -> Self {
        if gbuffer.is_none() {
            return Self {
                offset: Self::OFFSCREEN,
            };
        }

        let clip = prev_camera.world_to_clip(gbuffer.position);

        if clip.w <= 0.0 {
            return Self {
                offset: Self::OFFSCREEN,
            };
        }

        let prev_screen = prev_camera.clip_to_screen(clip);

        Self {
            offset: prev_screen - (screen_pos.as_vec2() + 0.5),
        }
    }

    pub fn serialize(&self) -> Vec4 {
        vec4(self.offset.x, self.offset.y, 0.0, 0.0)
    }

    pub fn deserialize(d0: Vec4) -> Self {
        Self { offset: d0.xy() }
    }

    /// Returns the previous-frame pixel this motion vector points at; might
    /// lay outside of the screen.
    pub fn prev_pos(&self, screen_pos: UVec2) -> IVec2 {
        (screen_pos.as_vec2() + 0.5 + self.offset).floor().as_ivec2()
    }
}
