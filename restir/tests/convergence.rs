mod common;

use approx::assert_relative_eq;
use restir::software::pixels;
use restir::{Combination, OutputSource, PipelineMode, RendererConfig};

use self::common::*;

fn accumulating(pipeline: PipelineMode) -> RendererConfig {
    RendererConfig {
        pipeline,
        accumulate: true,
        candidates: 8,
        output: OutputSource::History,
        ..Default::default()
    }
}

#[test]
fn single_light_matches_reference() {
    let config = accumulating(PipelineMode::Full);
    let lights = directional_light();
    let mut target = renderer(plane(), &config);

    render(&mut target, &lights, &config, 1000);

    let reference = target.reference(&lights);

    for (pos, expected) in pixels(target.camera().viewport.size).zip(reference)
    {
        let actual = target.output().load(pos);

        assert_relative_eq!(actual.x, expected.x, epsilon = 0.001);
        assert_relative_eq!(actual.y, expected.y, epsilon = 0.001);
        assert_relative_eq!(actual.z, expected.z, epsilon = 0.001);
    }
}

#[test]
fn many_lights_converge_without_resampling() {
    let config = accumulating(PipelineMode::CandidatesOnly);
    let lights = spot_lights();
    let mut target = renderer(scene(), &config);

    render(&mut target, &lights, &config, 10);

    let reference = target.reference(&lights);
    let early = relative_error(target.output(), &reference);

    render(&mut target, &lights, &config, 990);

    let late = relative_error(target.output(), &reference);

    assert!(late < 0.05, "late = {late}");
    assert!(late < early * 0.5, "early = {early}, late = {late}");
}

#[test]
fn error_keeps_falling_until_the_history_freezes() {
    const MAX_FRAMES: usize = 120;
    const WINDOW: usize = 20;

    let config = RendererConfig {
        max_history_frames: MAX_FRAMES as u32,
        ..accumulating(PipelineMode::CandidatesOnly)
    };

    let lights = spot_lights();
    let mut target = renderer(scene(), &config);
    let reference = target.reference(&lights);
    let mut errors = Vec::new();

    for _ in 0..MAX_FRAMES {
        target.render(&lights, &config).unwrap();
        errors.push(relative_error(target.output(), &reference));
    }

    let windows: Vec<f32> = errors
        .chunks(WINDOW)
        .map(|window| window.iter().sum::<f32>() / window.len() as f32)
        .collect();

    for pair in windows.windows(2) {
        assert!(pair[1] <= pair[0] * 1.1, "windows = {windows:?}");
    }

    assert!(
        windows[windows.len() - 1] < windows[0] * 0.5,
        "windows = {windows:?}"
    );

    // Past the cap, frames stop contributing at all
    let frozen = texels(target.output());
    let frozen_error = errors[MAX_FRAMES - 1];

    for _ in 0..40 {
        target.render(&lights, &config).unwrap();

        assert_eq!(frozen, texels(target.output()));
        assert_eq!(
            frozen_error,
            relative_error(target.output(), &reference)
        );
    }
}

#[test]
fn many_lights_converge_with_unbiased_resampling() {
    let config = RendererConfig {
        combination: Combination::Unbiased,
        ..accumulating(PipelineMode::Full)
    };

    let lights = spot_lights();
    let mut target = renderer(plane(), &config);

    render(&mut target, &lights, &config, 200);

    let reference = target.reference(&lights);
    let bias = relative_bias(target.output(), &reference);

    assert!(bias < 0.1, "bias = {bias}");
}

#[test]
fn resampling_reduces_noise() {
    let lights = spot_lights();

    let error = |pipeline| {
        let config = RendererConfig {
            pipeline,
            candidates: 4,
            ..Default::default()
        };

        let mut target = renderer(plane(), &config);

        // Warm up temporal history, then compare raw (unaccumulated) frames
        render(&mut target, &lights, &config, 20);

        relative_error(target.output(), &target.reference(&lights))
    };

    let candidates_only = error(PipelineMode::CandidatesOnly);
    let full = error(PipelineMode::Full);

    assert!(
        full < candidates_only,
        "full = {full}, candidates_only = {candidates_only}"
    );
}
