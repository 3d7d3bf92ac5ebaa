use crate::camera_controller::CameraComputePass;
use crate::{gpu, CameraBuffers, CommandEncoder, Config, Device, Shaders};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightSamplingKernel {
    Clear,
    Simple,
    Complex,
}

#[derive(Debug)]
pub struct LightSamplingPass {
    clear_pass: CameraComputePass<gpu::TilePassParams>,
    simple_pass: CameraComputePass,
    complex_pass: CameraComputePass,
    kernels: [LightSamplingKernel; gpu::TileType::MAX],
}

impl LightSamplingPass {
    pub fn new(shaders: &Shaders, config: &Config) -> Self {
        let is_enabled = config.samples_per_pixel > 0;

        let kernels = gpu::TileType::ALL.map(|tile_type| match tile_type {
            _ if !is_enabled => LightSamplingKernel::Clear,
            gpu::TileType::SimpleShading => LightSamplingKernel::Simple,
            gpu::TileType::ComplexShading => LightSamplingKernel::Complex,
            gpu::TileType::Empty => LightSamplingKernel::Clear,
        });

        Self {
            clear_pass: CameraComputePass::new(
                "light_sampling_clear",
                &shaders.light_sampling_clear,
            ),
            simple_pass: CameraComputePass::new(
                "light_sampling_simple",
                &shaders.light_sampling_sample_simple,
            ),
            complex_pass: CameraComputePass::new(
                "light_sampling_complex",
                &shaders.light_sampling_sample_complex,
            ),
            kernels,
        }
    }

    pub fn kernel(&self, tile_type: gpu::TileType) -> LightSamplingKernel {
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
                LightSamplingKernel::Clear => {
                    self.clear_pass.run_tiles(
                        device,
                        encoder,
                        &[
                            &buffers.frame,
                            &buffers.camera,
                            &tiles.data,
                            &buffers.surface_map,
                            &buffers.light_samples,
                        ],
                        &tiles.args,
                        tile_type,
                        gpu::TilePassParams::new(tile_type),
                    );

                    continue;
                }

                LightSamplingKernel::Simple => &self.simple_pass,
                LightSamplingKernel::Complex => &self.complex_pass,
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
                    &buffers.debug,
                ],
                &tiles.args,
                tile_type,
                (),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernels() {
        let shaders = Shaders::new(&Device::default());
        let pass = LightSamplingPass::new(&shaders, &Config::default());

        assert_eq!(
            LightSamplingKernel::Simple,
            pass.kernel(gpu::TileType::SimpleShading)
        );

        assert_eq!(
            LightSamplingKernel::Complex,
            pass.kernel(gpu::TileType::ComplexShading)
        );

        assert_eq!(LightSamplingKernel::Clear, pass.kernel(gpu::TileType::Empty));

        let pass = LightSamplingPass::new(
            &shaders,
            &Config {
                samples_per_pixel: 0,
                ..Default::default()
            },
        );

        for tile_type in gpu::TileType::ALL {
            assert_eq!(LightSamplingKernel::Clear, pass.kernel(tile_type));
        }
    }
}
