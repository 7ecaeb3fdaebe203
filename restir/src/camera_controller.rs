mod buffers;
mod pass;
mod passes;

use std::ops::DerefMut;

use log::{debug, info, trace, warn};

pub use self::buffers::*;
pub use self::pass::*;
pub use self::passes::*;
use crate::{
    gpu, measure, Camera, Engine, FrameConfig, FrameGraph, FrameSlots,
    GBuffer, History, OutputSource, PipelineMode, Result, Stage,
    SubmissionFence,
};

/// Renderer's state for a single view: its images, passes, frame slots and
/// accumulation history.
#[derive(Debug)]
pub struct CameraController {
    camera: Camera,

    /// Camera as of the end of the previous frame
    prev_camera: Camera,

    gbuffer: GBuffer,
    tlas: wgpu::Tlas,
    buffers: CameraBuffers,
    passes: CameraPasses,
    slots: FrameSlots<SubmissionFence>,
    history: History,
    frame: gpu::Frame,
    output: OutputSource,
}

impl CameraController {
    pub(crate) fn new(
        engine: &Engine,
        device: &wgpu::Device,
        camera: Camera,
        gbuffer: GBuffer,
        tlas: wgpu::Tlas,
    ) -> Result<Self> {
        info!("Creating camera: {}", camera.describe());

        let config = engine.config();

        config.validate()?;

        let buffers =
            CameraBuffers::new(device, &camera, config.frames_in_flight);

        let passes =
            CameraPasses::new(engine, device, &camera, &buffers, &gbuffer, &tlas);

        debug!("Camera created");

        Ok(Self {
            prev_camera: camera.clone(),
            camera,
            gbuffer,
            tlas,
            buffers,
            passes,
            slots: FrameSlots::new(config.frames_in_flight),
            history: History::new(config.max_history_frames),
            frame: gpu::Frame::default(),
            output: config.output,
        })
    }

    /// Updates camera and scene inputs; when the viewport gets resized, waits
    /// for all in-flight frames and re-creates every image and binding.
    pub fn update(
        &mut self,
        engine: &Engine,
        device: &wgpu::Device,
        camera: Camera,
        gbuffer: GBuffer,
        tlas: wgpu::Tlas,
    ) -> Result<()> {
        let needs_resizing = self.camera.is_invalidated_by(&camera);

        let needs_rebinding =
            needs_resizing || self.gbuffer != gbuffer || self.tlas != tlas;

        if self.camera != camera {
            self.history.invalidate();
        }

        self.camera = camera;
        self.gbuffer = gbuffer;
        self.tlas = tlas;

        if needs_resizing {
            self.slots.drain()?;
            self.rebuild_buffers(device, self.slots.len());
        }

        if needs_rebinding {
            self.rebuild_passes(engine, device);
        }

        Ok(())
    }

    fn rebuild_buffers(&mut self, device: &wgpu::Device, slots: usize) {
        debug!("Rebuilding buffers for camera: {}", self.camera.describe());

        self.buffers = CameraBuffers::new(device, &self.camera, slots);
    }

    fn rebuild_passes(&mut self, engine: &Engine, device: &wgpu::Device) {
        debug!("Rebuilding passes for camera: {}", self.camera.describe());

        self.passes = CameraPasses::new(
            engine,
            device,
            &self.camera,
            &self.buffers,
            &self.gbuffer,
            &self.tlas,
        );
    }

    /// Renders a single frame and submits it into the queue.
    pub fn render(
        &mut self,
        engine: &Engine,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<()> {
        measure("render", || self.render_frame(engine, device, queue))
    }

    fn render_frame(
        &mut self,
        engine: &Engine,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<()> {
        engine.config().validate()?;

        if self.slots.len() != engine.config().frames_in_flight {
            debug!(
                "Changing number of frames in flight: {} -> {}",
                self.slots.len(),
                engine.config().frames_in_flight
            );

            self.slots.drain()?;
            self.slots = FrameSlots::new(engine.config().frames_in_flight);
            self.rebuild_buffers(device, self.slots.len());
            self.rebuild_passes(engine, device);
        }

        let slot = self.slots.acquire()?;
        let config = engine.config().snapshot(self.frame);

        self.history.set_max_frames(engine.config().max_history_frames);
        self.history.set_enabled(config.accumulate);

        let history = self.history.advance();
        let schedule = FrameGraph::for_frame(&config, &history).schedule()?;

        // ---

        *self.buffers.camera.get_mut(slot).deref_mut() =
            self.camera.serialize();

        *self.buffers.prev_camera.get_mut(slot).deref_mut() =
            self.prev_camera.serialize();

        *self.buffers.lights.get_mut(slot).deref_mut() =
            engine.lights().serialize();

        *self.buffers.candidates_params.get_mut(slot).deref_mut() =
            config.candidates_params();

        *self.buffers.temporal_params.get_mut(slot).deref_mut() =
            config.temporal_params();

        *self.buffers.spatial_params.get_mut(slot).deref_mut() =
            config.spatial_params();

        *self.buffers.history_params.get_mut(slot).deref_mut() =
            history.params;

        self.buffers.flush(queue, slot);

        // ---

        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("restir_frame"),
            });

        for step in &schedule.steps {
            if !step.barriers.is_empty() {
                trace!("{}: barriers={:?}", step.node.stage, step.barriers);
            }

            self.record(&mut encoder, slot, &config, step.node.stage);
        }

        trace!("final barriers={:?}", schedule.final_barriers);

        let submission = queue.submit([encoder.finish()]);

        self.slots.submit(SubmissionFence {
            device: device.clone(),
            submission,
        });

        self.prev_camera = self.camera.clone();
        self.frame = self.frame.next();
        self.output = config.output;

        Ok(())
    }

    fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        slot: usize,
        config: &FrameConfig,
        stage: Stage,
    ) {
        let buffers = &self.buffers;

        match stage {
            Stage::Candidates => {
                self.passes.di_sampling.run(self, encoder, slot);
            }

            Stage::Motion => {
                self.passes.frame_reprojection.run(self, encoder, slot);
            }

            Stage::Temporal => {
                self.passes.di_temporal_resampling.run(
                    self,
                    encoder,
                    slot,
                    config.combination,
                );
            }

            Stage::Spatial => {
                self.passes.di_spatial_resampling.run(
                    self,
                    encoder,
                    slot,
                    config.combination,
                );
            }

            Stage::Shading => {
                self.passes
                    .di_shading
                    .run(self, encoder, slot, config.pipeline);
            }

            Stage::HistoryClear => {
                self.passes.history_accumulation.clear(self, encoder, slot);
            }

            Stage::History => {
                self.passes.history_accumulation.run(self, encoder, slot);
            }

            Stage::ReservoirCopy => {
                let reservoirs = match config.pipeline {
                    PipelineMode::Full => &buffers.spatial_reservoirs,
                    PipelineMode::CandidatesOnly => {
                        &buffers.candidate_reservoirs
                    }
                };

                reservoirs.copy_to(encoder, &buffers.prev_reservoirs);
            }

            Stage::SurfaceCopy => {
                buffers.surfaces.copy_to(encoder, &buffers.prev_surfaces);
            }

            Stage::HistoryCopy => {
                buffers.history_next.copy_to(encoder, &buffers.history);
            }
        }
    }

    /// Returns the image that should be handed over to the compositor, as
    /// selected by [`crate::RendererConfig::output`] of the latest frame.
    pub fn output_view(&self) -> &wgpu::TextureView {
        match self.output {
            OutputSource::Shading => self.buffers.shading.view(),
            OutputSource::History => self.buffers.history.view(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    fn workgroups(&self) -> glam::UVec2 {
        // All passes use 8x8 warps
        (self.camera.viewport.size + 7) / 8
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        info!("Deleting camera: {}", self.camera.describe());

        // Outstanding frames reference our images
        if let Err(err) = self.slots.drain() {
            warn!("Couldn't wait for outstanding frames: {err}");
        }
    }
}
