use crate::camera_controller::CameraComputePass;
use crate::{gpu, CameraBuffers, CommandEncoder, Config, Device, Shaders};

#[derive(Debug)]
pub struct SpatialFilterPass {
    pass: CameraComputePass<gpu::SpatialFilterPassParams>,
}

impl SpatialFilterPass {
    pub fn new(shaders: &Shaders, config: &Config) -> Self {
        let pass = if config.spatial {
            CameraComputePass::new(
                "spatial_filter",
                &shaders.spatial_filter_filter,
            )
        } else {
            CameraComputePass::new(
                "spatial_filter_pass_through",
                &shaders.spatial_filter_pass_through,
            )
        };

        Self { pass }
    }

    pub fn run(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        buffers: &CameraBuffers,
        params: gpu::SpatialFilterPassParams,
    ) {
        let tiles = &buffers.tiles;

        // Empty tiles have nothing to composite
        for tile_type in gpu::TileType::SHADING {
            self.pass.run_tiles(
                device,
                encoder,
                &[
                    &buffers.frame,
                    &buffers.camera,
                    &buffers.gbuffer_d0,
                    &buffers.gbuffer_d1,
                    &tiles.data,
                    &buffers.lighting.diffuse,
                    &buffers.lighting.specular,
                    &buffers.scene_color,
                ],
                &tiles.args,
                tile_type,
                params.with_tile_type(tile_type),
            );
        }
    }
}
