use derivative::Derivative;
use glam::{UVec2, Vec3, Vec4};
use log::{debug, trace};

use super::{pixels, Images, Scene};
use crate::gpu::stages::{
    di_sampling, di_shading, di_spatial_resampling, di_temporal_resampling,
    frame_reprojection, history_accumulation,
};
use crate::{
    gpu, Camera, FrameConfig, FrameGraph, History, HistoryFrame, Lights, Node,
    OutputSource, PipelineMode, RendererConfig, Resource, Result, Stage,
    Viewport,
};

/// Renders frames on the CPU, stage by stage, exactly as the GPU would.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct SoftwareRenderer {
    scene: Scene,
    camera: Camera,

    /// Camera as of the end of the previous frame
    prev_camera: Camera,

    #[derivative(Debug = "ignore")]
    gbuffer: [Vec<Vec4>; 5],

    images: Images,
    history: History,
    frame: gpu::Frame,

    /// Stages executed during the latest frame, in order
    stages: Vec<Stage>,

    output: OutputSource,
}

impl SoftwareRenderer {
    pub fn new(
        scene: Scene,
        camera: Camera,
        config: &RendererConfig,
    ) -> Result<Self> {
        config.validate()?;

        debug!("Creating software renderer: {}", camera.describe());

        let gbuffer = scene.gbuffer(&camera.serialize());
        let images = Images::new(camera.viewport.size);

        Ok(Self {
            scene,
            prev_camera: camera.clone(),
            camera,
            gbuffer,
            images,
            history: History::new(config.max_history_frames),
            frame: gpu::Frame::default(),
            stages: Default::default(),
            output: config.output,
        })
    }

    /// Moves the camera; when the viewport gets resized, every image is
    /// re-created.
    pub fn update(&mut self, camera: Camera) {
        if self.camera == camera {
            return;
        }

        if self.camera.is_invalidated_by(&camera) {
            debug!("Resizing software renderer: {}", camera.describe());

            self.images = Images::new(camera.viewport.size);
        }

        self.history.invalidate();
        self.gbuffer = self.scene.gbuffer(&camera.serialize());
        self.camera = camera;
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let camera = Camera {
            viewport: Viewport::new(width, height)?,
            ..self.camera.clone()
        };

        self.update(camera);

        Ok(())
    }

    pub fn render(
        &mut self,
        lights: &Lights,
        config: &RendererConfig,
    ) -> Result<()> {
        config.validate()?;

        let frame_config = config.snapshot(self.frame);

        self.history.set_max_frames(config.max_history_frames);
        self.history.set_enabled(frame_config.accumulate);

        let history = self.history.advance();
        let schedule = FrameGraph::for_frame(&frame_config, &history).schedule()?;

        let lights = lights.serialize();
        let camera = self.camera.serialize();
        let prev_camera = self.prev_camera.serialize();

        let ctxt = FrameContext {
            config: &frame_config,
            history: &history,
            camera: &camera,
            prev_camera: &prev_camera,
            lights: lights.view(),
        };

        for step in &schedule.steps {
            for barrier in &step.barriers {
                self.images.transition(barrier)?;
            }

            self.images.check(&step.node)?;

            trace!("Running `{}`", step.node.stage);

            self.run(&step.node, &ctxt);
        }

        for barrier in &schedule.final_barriers {
            self.images.transition(barrier)?;
        }

        self.stages = schedule.stages().collect();
        self.prev_camera = self.camera.clone();
        self.frame = self.frame.next();
        self.output = frame_config.output;

        Ok(())
    }

    fn run(&mut self, node: &Node, ctxt: &FrameContext) {
        let scene = &self.scene;
        let images = &mut self.images;
        let gbuffer = gbuffer_view(&self.gbuffer, images.size());
        let camera = ctxt.camera;
        let lights = ctxt.lights;

        match node.stage {
            Stage::Candidates => {
                let size = images.size();
                let params = ctxt.config.candidates_params();
                let mut reservoirs = images.take(Resource::CandidateReservoirs);
                let mut shading = images.take(Resource::CandidateShading);

                {
                    let mut reservoirs =
                        gpu::ImageMut::new(size, &mut reservoirs);

                    let mut shading = gpu::ImageMut::new(size, &mut shading);

                    for pos in pixels(size) {
                        di_sampling::main(
                            pos,
                            &params,
                            camera,
                            lights,
                            gbuffer,
                            scene,
                            &mut reservoirs,
                            &mut shading,
                        );
                    }
                }

                images.put(Resource::CandidateReservoirs, reservoirs);
                images.put(Resource::CandidateShading, shading);
            }

            Stage::Motion => {
                let size = images.size();
                let mut motion = images.take(Resource::Motion);
                let mut surfaces = images.take(Resource::Surfaces);

                {
                    let mut motion = gpu::ImageMut::new(size, &mut motion);
                    let mut surfaces = gpu::ImageMut::new(size, &mut surfaces);

                    for pos in pixels(size) {
                        frame_reprojection::main(
                            pos,
                            camera,
                            ctxt.prev_camera,
                            gbuffer,
                            &mut motion,
                            &mut surfaces,
                        );
                    }
                }

                images.put(Resource::Motion, motion);
                images.put(Resource::Surfaces, surfaces);
            }

            Stage::Temporal => {
                let params = ctxt.config.temporal_params();

                dispatch(images, Resource::TemporalReservoirs, |images, out| {
                    let motion = images.get(Resource::Motion);
                    let prev_surfaces = images.get(Resource::PrevSurfaces);
                    let curr = images.get(Resource::CandidateReservoirs);
                    let prev = images.get(Resource::PrevReservoirs);

                    for pos in pixels(images.size()) {
                        di_temporal_resampling::main(
                            pos,
                            &params,
                            ctxt.config.combination,
                            camera,
                            ctxt.prev_camera,
                            lights,
                            gbuffer,
                            scene,
                            motion,
                            prev_surfaces,
                            curr,
                            prev,
                            out,
                        );
                    }
                });
            }

            Stage::Spatial => {
                let params = ctxt.config.spatial_params();

                dispatch(images, Resource::SpatialReservoirs, |images, out| {
                    let input = images.get(Resource::TemporalReservoirs);

                    for pos in pixels(images.size()) {
                        di_spatial_resampling::main(
                            pos,
                            &params,
                            ctxt.config.combination,
                            camera,
                            lights,
                            gbuffer,
                            scene,
                            input,
                            out,
                        );
                    }
                });
            }

            Stage::Shading => {
                let reservoirs = match ctxt.config.pipeline {
                    PipelineMode::Full => Resource::SpatialReservoirs,
                    PipelineMode::CandidatesOnly => Resource::CandidateReservoirs,
                };

                dispatch(images, Resource::Shading, |images, out| {
                    let reservoirs = images.get(reservoirs);

                    for pos in pixels(images.size()) {
                        di_shading::main(
                            pos, camera, lights, gbuffer, scene, reservoirs, out,
                        );
                    }
                });
            }

            Stage::HistoryClear => {
                dispatch(images, Resource::History, |images, out| {
                    for pos in pixels(images.size()) {
                        history_accumulation::clear(pos, camera, out);
                    }
                });
            }

            Stage::History => {
                let params = ctxt.history.params;

                dispatch(images, Resource::HistoryNext, |images, out| {
                    let shading = images.get(Resource::Shading);
                    let history = images.get(Resource::History);

                    for pos in pixels(images.size()) {
                        history_accumulation::main(
                            pos, &params, camera, shading, history, out,
                        );
                    }
                });
            }

            Stage::ReservoirCopy | Stage::SurfaceCopy | Stage::HistoryCopy => {
                let (src, _) = node.reads[0];
                let (dst, _) = node.writes[0];

                images.copy(src, dst);
            }
        }
    }

    /// Evaluates the exact direct lighting of every pixel, by visiting all
    /// the lights; that's what the renderer converges to.
    pub fn reference(&self, lights: &Lights) -> Vec<Vec4> {
        let lights = lights.serialize();
        let lights = lights.view();
        let camera = self.camera.serialize();
        let gbuffer = self.gbuffer();

        pixels(self.camera.viewport.size)
            .map(|pos| {
                let hit = gpu::Hit::new(camera.origin(), gbuffer.get(pos));

                if hit.is_none() {
                    return Vec4::ZERO;
                }

                let color: Vec3 = (0..lights.len())
                    .map(|id| lights.get(gpu::LightId::new(id as u32)))
                    .filter(|light| hit.is_visible(&self.scene, light))
                    .map(|light| light.contribution(&hit))
                    .sum();

                color.extend(1.0)
            })
            .collect()
    }

    pub fn image(&self, res: Resource) -> gpu::Image<'_> {
        self.images.get(res)
    }

    pub fn images(&self) -> &Images {
        &self.images
    }

    /// Returns the image that'd be handed over to the compositor.
    pub fn output(&self) -> gpu::Image<'_> {
        match self.output {
            OutputSource::Shading => self.image(Resource::Shading),
            OutputSource::History => self.image(Resource::History),
        }
    }

    pub fn gbuffer(&self) -> gpu::GBufferView<'_> {
        gbuffer_view(&self.gbuffer, self.camera.viewport.size)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

/// Everything a frame's stages share.
struct FrameContext<'a> {
    config: &'a FrameConfig,
    history: &'a HistoryFrame,
    camera: &'a gpu::Camera,
    prev_camera: &'a gpu::Camera,
    lights: gpu::LightsView<'a>,
}

/// Runs `f` with image `res` taken out for writing.
fn dispatch(
    images: &mut Images,
    res: Resource,
    f: impl FnOnce(&Images, &mut gpu::ImageMut),
) {
    let size = images.size();
    let mut texels = images.take(res);

    f(images, &mut gpu::ImageMut::new(size, &mut texels));

    images.put(res, texels);
}

fn gbuffer_view(gbuffer: &[Vec<Vec4>; 5], size: UVec2) -> gpu::GBufferView<'_> {
    gpu::GBufferView {
        position: gpu::Image::new(size, &gbuffer[0]),
        normal: gpu::Image::new(size, &gbuffer[1]),
        albedo: gpu::Image::new(size, &gbuffer[2]),
        material: gpu::Image::new(size, &gbuffer[3]),
        depth: gpu::Image::new(size, &gbuffer[4]),
    }
}
