//! Many-lights direct lighting: for each frame, stochastically picks a handful
//! of lights per pixel, resolves their visibility, shades, and then denoises
//! the result temporally and spatially.
//!
//! Passes run on the GPU through wgpu, with kernels compiled to SPIR-V by
//! `manylights-shader-builder`. Screen tiles are classified on the fly and
//! the later passes are dispatched indirectly over tiles of each category.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::too_many_arguments)]

#[cfg(not(test))]
mod buffers;
mod camera;
mod camera_controller;
mod camera_controllers;
mod config;
mod debug;
#[cfg(not(test))]
mod device;
mod error;
mod frame_stats;
mod gbuffer;
mod image;
mod memory;
#[cfg(test)]
mod reference;
#[cfg(not(test))]
mod shaders;
#[cfg(not(test))]
mod tracer;
mod view_state;


use derivative::Derivative;
use log::info;
pub use manylights_gpu as gpu;

#[cfg(not(test))]
pub use self::buffers::*;
pub use self::camera::*;
pub use self::camera_controller::*;
pub use self::camera_controllers::*;
pub use self::config::*;
pub use self::debug::*;
#[cfg(not(test))]
pub use self::device::*;
pub use self::error::*;
pub use self::frame_stats::*;
pub use self::gbuffer::*;
pub use self::image::*;
#[cfg(test)]
pub use self::reference::*;
#[cfg(not(test))]
pub use self::shaders::*;
#[cfg(not(test))]
pub use self::tracer::*;
pub use self::view_state::*;

#[derive(Clone, Debug, Default)]
pub struct EngineSettings {
    /// Maximum number of bytes the engine is allowed to allocate; unlimited
    /// when `None`.
    pub memory_budget: Option<usize>,

    /// Decorrelates noise between engines; rendering with the same seed and
    /// the same inputs yields the same image.
    pub seed: u32,
}

/// Per-frame inputs provided by the renderer.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct FrameInputs<'a> {
    pub gbuffer: &'a GBuffer,
    pub lights: &'a [gpu::Light],

    #[derivative(Debug = "ignore")]
    pub tracer: &'a dyn VisibilityTracer,

    /// Whether the view changed so much that temporal history is worthless.
    pub camera_cut: bool,

    #[derivative(Debug = "ignore")]
    pub debug: Option<&'a dyn DebugSink>,
}

#[derive(Debug)]
pub struct Engine {
    settings: EngineSettings,
    device: Device,
    shaders: Shaders,
    cameras: CameraControllers,
}

impl Engine {
    pub fn new(device: Device, settings: EngineSettings) -> Self {
        info!("Initializing; settings={:?}", settings);

        let device = device.with_memory_budget(settings.memory_budget);
        let shaders = Shaders::new(&device);

        Self {
            device,
            shaders,
            cameras: Default::default(),
            settings,
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn create_camera(
        &mut self,
        camera: Camera,
        config: &Config,
    ) -> Result<CameraHandle, Error> {
        let camera =
            CameraController::new(&self.device, &self.shaders, camera, config)?;

        Ok(self.cameras.add(camera))
    }

    pub fn camera(
        &self,
        handle: CameraHandle,
    ) -> Result<&CameraController, Error> {
        self.cameras.get(handle)
    }

    pub fn update_camera(
        &mut self,
        handle: CameraHandle,
        camera: Camera,
    ) -> Result<(), Error> {
        self.cameras.get_mut(handle)?.update(&self.device, camera)
    }

    /// Makes the next frame of given camera start without temporal history.
    pub fn reset_camera_history(
        &mut self,
        handle: CameraHandle,
    ) -> Result<(), Error> {
        self.cameras.get_mut(handle)?.reset_history();

        Ok(())
    }

    pub fn delete_camera(&mut self, handle: CameraHandle) -> Result<(), Error> {
        self.cameras.remove(handle)
    }

    /// Computes lighting for given camera and composites it into `target`.
    pub fn render_camera(
        &mut self,
        handle: CameraHandle,
        config: &Config,
        inputs: &FrameInputs<'_>,
        target: &mut Image,
    ) -> Result<FrameStats, Error> {
        self.cameras.get_mut(handle)?.render(
            &self.device,
            &self.shaders,
            self.settings.seed,
            config,
            inputs,
            target,
        )
    }
}
