use glam::{UVec2, Vec4};

use crate::{Camera, HistoryPassParams, Image, ImageMut};

/// Blends the freshly shaded frame into the running average.
///
/// Reads `history` and writes `out`, which are always different images - the
/// result gets copied back into `history` at the end of the frame.
pub fn main(
    global_id: UVec2,
    params: &HistoryPassParams,
    camera: &Camera,
    shading: Image,
    history: Image,
    out: &mut ImageMut,
) {
    let screen_pos = global_id;

    if !camera.contains(screen_pos.as_ivec2()) {
        return;
    }

    let curr = shading.load(screen_pos);

    let color = if !params.is_enabled() {
        curr
    } else {
        let prev = history.load(screen_pos);

        if params.is_frozen() {
            prev
        } else {
            prev + (curr - prev) * params.blend_factor()
        }
    };

    out.store(screen_pos, color);
}

/// Wipes the history, so that the next accumulated frame starts from scratch.
pub fn clear(global_id: UVec2, camera: &Camera, out: &mut ImageMut) {
    let screen_pos = global_id;

    if !camera.contains(screen_pos.as_ivec2()) {
        return;
    }

    out.store(screen_pos, Vec4::ZERO);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec4;

    use super::*;
    use crate::stages::testing::Fixture;

    fn run(
        fixture: &Fixture,
        frame_index: i32,
        shading: &[Vec4],
        history: &[Vec4],
    ) -> Vec<Vec4> {
        let mut out = fixture.image();

        {
            let mut out = ImageMut::new(fixture.size, &mut out);

            let params = HistoryPassParams {
                frame_index,
                max_frames: 1000,
                ..Default::default()
            };

            for global_id in fixture.pixels() {
                main(
                    global_id,
                    &params,
                    &fixture.camera,
                    Image::new(fixture.size, shading),
                    Image::new(fixture.size, history),
                    &mut out,
                );
            }
        }

        out
    }

    #[test]
    fn running_average() {
        let fixture = Fixture::floor();
        let mut history = fixture.image();

        for (frame_index, value) in [1.0, 2.0, 3.0, 6.0].into_iter().enumerate()
        {
            let shading = fixture.image_of(Vec4::splat(value));

            history = run(&fixture, frame_index as i32, &shading, &history);
        }

        for color in history {
            assert_relative_eq!(color.x, 3.0);
        }
    }

    #[test]
    fn disabled_history_passes_shading_through() {
        let fixture = Fixture::floor();
        let shading = fixture.image_of(vec4(0.1, 0.2, 0.3, 1.0));
        let history = fixture.image_of(Vec4::splat(123.0));

        assert_eq!(
            shading,
            run(&fixture, HistoryPassParams::DISABLED, &shading, &history),
        );
    }

    #[test]
    fn history_freezes_at_the_cap() {
        let fixture = Fixture::floor();
        let shading = fixture.image_of(Vec4::splat(100.0));
        let history = fixture.image_of(Vec4::splat(0.5));

        assert_eq!(history, run(&fixture, 1000, &shading, &history));
        assert_eq!(history, run(&fixture, 5000, &shading, &history));
    }

    #[test]
    fn first_frame_overwrites_history() {
        let fixture = Fixture::floor();
        let shading = fixture.image_of(vec4(0.1, 0.2, 0.3, 1.0));
        let history = fixture.image_of(Vec4::splat(123.0));

        for color in run(&fixture, 0, &shading, &history) {
            assert_relative_eq!(color.x, 0.1, epsilon = 0.0001);
            assert_relative_eq!(color.w, 1.0, epsilon = 0.0001);
        }
    }

    #[test]
    fn clearing() {
        let fixture = Fixture::floor();
        let mut history = fixture.image_of(Vec4::ONE);

        {
            let mut out = ImageMut::new(fixture.size, &mut history);

            for global_id in fixture.pixels() {
                clear(global_id, &fixture.camera, &mut out);
            }
        }

        assert_eq!(fixture.image(), history);
    }
}
