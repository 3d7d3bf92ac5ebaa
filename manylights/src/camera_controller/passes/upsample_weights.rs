use crate::camera_controller::CameraComputePass;
use crate::{CameraBuffers, CommandEncoder, Config, Device, Shaders};

#[derive(Debug)]
pub struct UpsampleWeightsPass {
    pass: CameraComputePass,
}

impl UpsampleWeightsPass {
    pub fn new(shaders: &Shaders, _: &Config) -> Self {
        Self {
            pass: CameraComputePass::new(
                "upsample_weights",
                &shaders.upsample_weights,
            ),
        }
    }

    pub fn run(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        buffers: &CameraBuffers,
    ) {
        self.pass.run(
            device,
            encoder,
            &[
                &buffers.camera,
                &buffers.gbuffer_d0,
                &buffers.gbuffer_d1,
                &buffers.surface_map,
                &buffers.upsample_weights,
            ],
            buffers.upsample_weights.size(),
            (),
        );
    }
}
