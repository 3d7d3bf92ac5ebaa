use crate::camera_controller::CameraComputePass;
use crate::{CameraBuffers, CommandEncoder, Config, Device, Shaders};

#[derive(Debug)]
pub struct TileIndirectArgsPass {
    pass: CameraComputePass,
}

impl TileIndirectArgsPass {
    pub fn new(shaders: &Shaders, _: &Config) -> Self {
        Self {
            pass: CameraComputePass::new(
                "tile_indirect_args",
                &shaders.tile_indirect_args,
            ),
        }
    }

    pub fn run(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        buffers: &CameraBuffers,
    ) {
        self.pass.run_once(
            device,
            encoder,
            &[
                &buffers.tiles.allocator,
                &buffers.downsampled_tiles.allocator,
                &buffers.tiles.args,
                &buffers.downsampled_tiles.args,
            ],
            (),
        );
    }
}
