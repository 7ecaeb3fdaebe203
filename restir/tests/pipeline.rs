mod common;

use glam::{uvec2, vec3, Vec3};
use restir::gpu::DiReservoir;
use restir::software::{pixels, Images, SoftwareRenderer};
use restir::{
    Camera, HistoryState, Light, OutputSource, PipelineMode, RendererConfig,
    Resource, Stage, Viewport,
};

use self::common::*;

#[test]
fn temporal_sample_count_is_capped() {
    let config = RendererConfig {
        candidates: 4,
        temporal_history_cap: 2.0,
        ..Default::default()
    };

    let lights = spot_lights();
    let mut target = renderer(scene(), &config);
    let mut max_m = 0.0f32;

    for _ in 0..30 {
        target.render(&lights, &config).unwrap();

        for texel in texels(target.image(Resource::TemporalReservoirs)) {
            let m = DiReservoir::deserialize(texel).m;

            assert!(m <= 8.0, "m = {m}");
            max_m = max_m.max(m);
        }
    }

    // Static camera, so history gets reused up to the cap
    assert_eq!(8.0, max_m);
}

#[test]
fn turning_around_discards_temporal_history() {
    let config = RendererConfig::default();
    let lights = spot_lights();
    let viewport = Viewport::new(SIZE, SIZE).unwrap();
    let eye = vec3(0.0, 4.0, 0.0);
    let front = Camera::looking_at(eye, vec3(0.0, 0.0, -4.0), 0.5, viewport);
    let back = Camera::looking_at(eye, vec3(0.0, 0.0, 4.0), 0.5, viewport);

    let mut target = SoftwareRenderer::new(plane(), front, &config).unwrap();

    render(&mut target, &lights, &config, 5);
    target.update(back);
    target.render(&lights, &config).unwrap();

    // None of the surfaces seen now were visible a frame ago
    assert_eq!(
        texels(target.image(Resource::CandidateReservoirs)),
        texels(target.image(Resource::TemporalReservoirs)),
    );
}

#[test]
fn turning_sideways_discards_temporal_history() {
    let config = RendererConfig::default();
    let lights = spot_lights();
    let viewport = Viewport::new(SIZE, SIZE).unwrap();
    let eye = vec3(0.0, 1.0, 0.0);
    let front = Camera::looking_at(eye, vec3(0.0, 1.0, -1.0), 1.0, viewport);
    let right = Camera::looking_at(eye, vec3(1.0, 1.0, 0.0), 1.0, viewport);

    let mut target = SoftwareRenderer::new(plane(), front, &config).unwrap();

    render(&mut target, &lights, &config, 5);
    target.update(right);
    target.render(&lights, &config).unwrap();

    // Both frustums are narrower than the turn, so they share no surfaces
    assert_eq!(
        texels(target.image(Resource::CandidateReservoirs)),
        texels(target.image(Resource::TemporalReservoirs)),
    );
}

#[test]
fn candidates_only_shades_candidates() {
    let config = RendererConfig {
        pipeline: PipelineMode::CandidatesOnly,
        ..Default::default()
    };

    let lights = spot_lights();
    let mut target = renderer(scene(), &config);

    render(&mut target, &lights, &config, 3);

    assert_eq!(
        texels(target.image(Resource::CandidateShading)),
        texels(target.image(Resource::Shading)),
    );

    // Previous reservoirs come straight from the candidates
    assert_eq!(
        texels(target.image(Resource::CandidateReservoirs)),
        texels(target.image(Resource::PrevReservoirs)),
    );
}

#[test]
fn history_restarts_after_being_reenabled() {
    let mut config = RendererConfig {
        accumulate: true,
        output: OutputSource::History,
        ..Default::default()
    };

    let mut lights = spot_lights();
    let mut target = renderer(scene(), &config);

    render(&mut target, &lights, &config, 10);
    assert_eq!(HistoryState::Accumulating, target.history().state());

    config.accumulate = false;
    render(&mut target, &lights, &config, 2);
    assert_eq!(HistoryState::Idle, target.history().state());
    assert!(!target.stages().contains(&Stage::HistoryClear));

    lights
        .add(Light::Directional {
            position: vec3(0.0, 10.0, 0.0),
            color: Vec3::ONE,
            intensity: 2.0,
        })
        .unwrap();

    config.accumulate = true;
    target.render(&lights, &config).unwrap();

    assert!(target.stages().contains(&Stage::HistoryClear));

    assert_eq!(
        texels(target.image(Resource::Shading)),
        texels(target.image(Resource::History)),
    );

    target.render(&lights, &config).unwrap();

    assert!(!target.stages().contains(&Stage::HistoryClear));
}

#[test]
fn history_freezes_at_the_cap() {
    let config = RendererConfig {
        accumulate: true,
        max_history_frames: 5,
        output: OutputSource::History,
        ..Default::default()
    };

    let mut lights = spot_lights();
    let mut target = renderer(scene(), &config);

    render(&mut target, &lights, &config, 8);

    let frozen = texels(target.image(Resource::History));

    lights.clear();
    render(&mut target, &lights, &config, 3);

    assert_eq!(frozen, texels(target.image(Resource::History)));
    assert_eq!(frozen, texels(target.output()));
}

#[test]
fn moving_camera_invalidates_history() {
    let config = RendererConfig {
        accumulate: true,
        ..Default::default()
    };

    let lights = spot_lights();
    let mut target = renderer(scene(), &config);

    render(&mut target, &lights, &config, 4);

    let mut camera = target.camera().clone();

    camera.fov = 0.9;
    target.update(camera);
    assert_eq!(HistoryState::ClearPending, target.history().state());

    target.render(&lights, &config).unwrap();
    assert!(target.stages().contains(&Stage::HistoryClear));
}

#[test]
fn resizing_recreates_every_image() {
    let config = RendererConfig::default();
    let lights = spot_lights();
    let mut target = renderer(scene(), &config);

    render(&mut target, &lights, &config, 3);
    target.resize(7, 5).unwrap();
    render(&mut target, &lights, &config, 3);

    for res in Resource::ALL {
        if Images::is_owned(res) {
            assert_eq!(uvec2(7, 5), target.image(res).size(), "{res:?}");
        }
    }

    assert_eq!(uvec2(7, 5), target.output().size());
    assert_eq!(35, pixels(target.output().size()).count());
}

#[test]
fn invalid_config_is_rejected() {
    let config = RendererConfig::default();
    let mut target = renderer(scene(), &config);

    let invalid = RendererConfig {
        candidates: 0,
        ..Default::default()
    };

    assert!(target.render(&spot_lights(), &invalid).is_err());
    assert!(SoftwareRenderer::new(scene(), camera(), &invalid).is_err());

    // Rejected frames don't leave anything behind
    assert!(target.stages().is_empty());
}
