use crate::camera_controller::CameraComputePass;
use crate::{gpu, CameraBuffers, CommandEncoder, Config, Device, Shaders};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightShadingKernel {
    Clear,
    Simple,
    Complex,
}

#[derive(Debug)]
pub struct LightShadingPass {
    clear_pass: CameraComputePass<gpu::TilePassParams>,
    simple_pass: CameraComputePass,
    complex_pass: CameraComputePass,
    kernels: [LightShadingKernel; gpu::TileType::MAX],
}

impl LightShadingPass {
    pub fn new(shaders: &Shaders, config: &Config) -> Self {
        let is_enabled = config.samples_per_pixel > 0;

        let kernels = gpu::TileType::ALL.map(|tile_type| match tile_type {
            _ if !is_enabled => LightShadingKernel::Clear,
            gpu::TileType::SimpleShading => LightShadingKernel::Simple,
            gpu::TileType::ComplexShading => LightShadingKernel::Complex,
            gpu::TileType::Empty => LightShadingKernel::Clear,
        });

        Self {
            clear_pass: CameraComputePass::new(
                "light_shading_clear",
                &shaders.light_shading_clear,
            ),
            simple_pass: CameraComputePass::new(
                "light_shading_simple",
                &shaders.light_shading_shade_simple,
            ),
            complex_pass: CameraComputePass::new(
                "light_shading_complex",
                &shaders.light_shading_shade_complex,
            ),
            kernels,
        }
    }

    pub fn kernel(&self, tile_type: gpu::TileType) -> LightShadingKernel {
        self.kernels[tile_type.get() as usize]
    }

    pub fn run(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        buffers: &CameraBuffers,
    ) {
        let tiles = &buffers.downsampled_tiles;

        for tile_type in gpu::TileType::ALL {
            let pass = match self.kernel(tile_type) {
                LightShadingKernel::Clear => {
                    self.clear_pass.run_tiles(
                        device,
                        encoder,
                        &[
                            &buffers.camera,
                            &tiles.data,
                            &buffers.resolved_diffuse,
                            &buffers.resolved_specular,
                        ],
                        &tiles.args,
                        tile_type,
                        gpu::TilePassParams::new(tile_type),
                    );

                    continue;
                }

                LightShadingKernel::Simple => &self.simple_pass,
                LightShadingKernel::Complex => &self.complex_pass,
            };

            pass.run_tiles(
                device,
                encoder,
                &[
                    &buffers.frame,
                    &buffers.camera,
                    &buffers.gbuffer_d0,
                    &buffers.gbuffer_d1,
                    &buffers.lights,
                    &tiles.data,
                    &buffers.surface_map,
                    &buffers.light_samples,
                    &buffers.resolved_diffuse,
                    &buffers.resolved_specular,
                ],
                &tiles.args,
                tile_type,
                (),
            );
        }
    }
}
