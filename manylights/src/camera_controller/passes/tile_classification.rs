use crate::camera_controller::CameraComputePass;
use crate::{gpu, CameraBuffers, CommandEncoder, Config, Device, Shaders};

#[derive(Debug)]
pub struct TileClassificationPass {
    pass: CameraComputePass<gpu::TileClassificationPassParams>,
}

impl TileClassificationPass {
    pub fn new(shaders: &Shaders, _: &Config) -> Self {
        Self {
            pass: CameraComputePass::new(
                "tile_classification",
                &shaders.tile_classification,
            ),
        }
    }

    pub fn run(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        buffers: &CameraBuffers,
    ) {
        for (tiles, downsampled) in [
            (&buffers.tiles, false),
            (&buffers.downsampled_tiles, true),
        ] {
            tiles.allocator.clear(encoder);

            self.pass.run(
                device,
                encoder,
                &[
                    &buffers.frame,
                    &buffers.camera,
                    &buffers.gbuffer_d0,
                    &buffers.gbuffer_d1,
                    &buffers.lights,
                    &tiles.allocator,
                    &tiles.data,
                ],
                tiles.grid_size,
                gpu::TileClassificationPassParams {
                    downsampled: downsampled as u32,
                },
            );
        }
    }
}
