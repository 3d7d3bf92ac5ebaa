mod buffers;
#[cfg(not(test))]
mod pass;
mod passes;

use glam::UVec2;
use log::{debug, info};

pub use self::buffers::*;
#[cfg(not(test))]
pub(crate) use self::pass::*;
pub use self::passes::*;
#[cfg(test)]
pub(crate) use crate::reference::CameraComputePass;
use crate::{
    gpu, Camera, Config, DebugSink, Device, Error, FrameInputs, FrameStats,
    Image, Shaders, TileCounts, ViewState,
};

#[derive(Debug)]
pub struct CameraController {
    camera: Camera,
    config: Config,
    buffers: CameraBuffers,
    passes: CameraPasses,
    state: ViewState,
}

impl CameraController {
    pub(crate) fn new(
        device: &Device,
        shaders: &Shaders,
        camera: Camera,
        config: &Config,
    ) -> Result<Self, Error> {
        info!("Creating camera: {}", camera.describe());

        let config = config.sanitized();
        let buffers = CameraBuffers::new(device, &camera, &config)?;
        let passes = CameraPasses::new(shaders, &config);

        debug!("Camera created");

        Ok(Self {
            camera,
            config,
            buffers,
            passes,
            state: Default::default(),
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Returns lighting accumulated by the most recently rendered frame.
    pub fn lighting(&self) -> &LightingTextures {
        self.state
            .history()
            .map(|history| &history.lighting)
            .unwrap_or(&self.buffers.lighting)
    }

    pub(crate) fn update(
        &mut self,
        device: &Device,
        camera: Camera,
    ) -> Result<(), Error> {
        if self.camera.is_invalidated_by(&camera) {
            debug!("Rebuilding buffers for camera: {}", camera.describe());

            self.buffers = CameraBuffers::new(device, &camera, &self.config)?;
        }

        self.camera = camera;

        Ok(())
    }

    pub(crate) fn reset_history(&mut self) {
        self.state.request_reset();
    }

    pub(crate) fn render(
        &mut self,
        device: &Device,
        shaders: &Shaders,
        seed: u32,
        config: &Config,
        inputs: &FrameInputs<'_>,
        target: &mut Image,
    ) -> Result<FrameStats, Error> {
        #[cfg(feature = "metrics")]
        let tt = std::time::Instant::now();

        let config = config.sanitized();

        if self.config.is_invalidated_by(&config) {
            debug!(
                "Rebuilding buffers and passes for camera: {}",
                self.camera.describe()
            );

            self.buffers = CameraBuffers::new(device, &self.camera, &config)?;
            self.passes = CameraPasses::new(shaders, &config);
        }

        self.config = config;

        let size = self.camera.viewport_size;

        for (what, actual) in [
            ("G-buffer", inputs.gbuffer.size()),
            ("target image", target.size()),
        ] {
            if actual != size {
                return Err(Error::SizeMismatch {
                    what,
                    expected: size,
                    actual,
                });
            }
        }

        // ---------------------------------------------------------------------

        let history_state =
            self.state
                .begin_frame(&self.config, &self.camera, inputs.camera_cut);

        let camera = self
            .camera
            .serialize(self.state.history().map(|history| &history.camera));

        let frame = self
            .config
            .fixed_state_frame_index
            .unwrap_or(self.state.frame());

        let frame_params = gpu::FrameParams {
            lights_count: inputs.lights.len() as u32,
            ..self.config.frame_params(seed.wrapping_add(frame))
        };

        self.buffers.upload_lights(device, inputs.lights)?;

        let buffers = &self.buffers;
        let passes = &self.passes;

        buffers.frame.write(device, &frame_params);
        buffers.camera.write(device, &camera);

        let (d0, d1) = inputs.gbuffer.packed();

        buffers.gbuffer_d0.upload(device, &d0);
        buffers.gbuffer_d1.upload(device, &d1);
        buffers.scene_color.upload(device, target.pixels());

        let mut encoder = device.create_command_encoder("manylights_frame");

        buffers.debug.clear(&mut encoder);

        passes
            .tile_classification
            .run(device, &mut encoder, buffers);

        passes.tile_indirect_args.run(device, &mut encoder, buffers);
        passes.light_sampling.run(device, &mut encoder, buffers);

        passes.light_visibility.run(
            device,
            &mut encoder,
            buffers,
            inputs.tracer,
        );

        passes.upsample_weights.run(device, &mut encoder, buffers);
        passes.light_shading.run(device, &mut encoder, buffers);

        passes.temporal_accumulation.run(
            device,
            &mut encoder,
            buffers,
            self.config.temporal_params(),
            self.state.history().map(|history| &history.lighting),
        );

        passes.spatial_filter.run(
            device,
            &mut encoder,
            buffers,
            self.config.spatial_params(),
        );

        device.submit(encoder);

        // ---------------------------------------------------------------------

        let stats = FrameStats {
            history: history_state,
            tiles: TileCounts::new(buffers.tiles.counts(device)?),
            downsampled_tiles: TileCounts::new(
                buffers.downsampled_tiles.counts(device)?,
            ),
            samples: self.count_samples(device)?,
        };

        if let Some(sink) = inputs.debug {
            self.flush_debug(device, sink)?;
        }

        target
            .pixels_mut()
            .copy_from_slice(&self.buffers.scene_color.download(device)?);

        self.state.end_frame(
            device,
            &self.config,
            &self.camera,
            &mut self.buffers.lighting,
        );

        #[cfg(feature = "metrics")]
        debug!(
            "Frame took {}; stats={:?}",
            humantime::format_duration(tt.elapsed()),
            stats
        );

        Ok(stats)
    }

    fn count_samples(&self, device: &Device) -> Result<usize, Error> {
        if self.config.samples_per_pixel_2d() == UVec2::ZERO {
            return Ok(0);
        }

        Ok(self
            .buffers
            .light_samples
            .download(device)?
            .into_iter()
            .filter(|&texel| gpu::LightSample::deserialize(texel).is_some())
            .count())
    }

    /// Hands records printed by kernels over to the sink.
    fn flush_debug(
        &self,
        device: &Device,
        sink: &dyn DebugSink,
    ) -> Result<(), Error> {
        let words = self.buffers.debug.download(device)?;

        for idx in 0..gpu::DebugLog::len(&words) {
            let record = gpu::DebugLog::get(&words, idx);

            sink.print(record.screen_pos, format_args!("{record}"));
            sink.line(record.from, record.to, record.color);
        }

        Ok(())
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        info!("Deleting camera: {}", self.camera.describe());
    }
}
