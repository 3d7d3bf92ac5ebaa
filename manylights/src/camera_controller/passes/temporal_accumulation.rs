use crate::camera_controller::CameraComputePass;
use crate::{
    gpu, CameraBuffers, CommandEncoder, Config, Device, HistoryState,
    LightingTextures, Shaders,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemporalAccumulationKernel {
    Clear,
    Cold,
    Warm,
}

type Pass = CameraComputePass<gpu::TemporalAccumulationPassParams>;

#[derive(Debug)]
pub struct TemporalAccumulationPass {
    clear_pass: Pass,
    cold_pass: Pass,
    warm_pass: Pass,
    is_enabled: bool,
}

impl TemporalAccumulationPass {
    pub fn new(shaders: &Shaders, config: &Config) -> Self {
        Self {
            clear_pass: CameraComputePass::new(
                "temporal_accumulation_clear",
                &shaders.temporal_accumulation_clear,
            ),
            cold_pass: CameraComputePass::new(
                "temporal_accumulation_cold",
                &shaders.temporal_accumulation_cold,
            ),
            warm_pass: CameraComputePass::new(
                "temporal_accumulation_warm",
                &shaders.temporal_accumulation_warm,
            ),
            is_enabled: config.temporal,
        }
    }

    pub fn kernel(
        &self,
        tile_type: gpu::TileType,
        history: HistoryState,
    ) -> TemporalAccumulationKernel {
        match (tile_type, history) {
            (gpu::TileType::Empty, _) => TemporalAccumulationKernel::Clear,

            (_, HistoryState::Warm) if self.is_enabled => {
                TemporalAccumulationKernel::Warm
            }

            _ => TemporalAccumulationKernel::Cold,
        }
    }

    pub fn run(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        buffers: &CameraBuffers,
        params: gpu::TemporalAccumulationPassParams,
        history: Option<&LightingTextures>,
    ) {
        let tiles = &buffers.tiles;
        let output = &buffers.lighting;

        let history_state = if history.is_some() {
            HistoryState::Warm
        } else {
            HistoryState::Cold
        };

        for tile_type in gpu::TileType::ALL {
            let params = params.with_tile_type(tile_type);

            match (self.kernel(tile_type, history_state), history) {
                (TemporalAccumulationKernel::Clear, _) => {
                    self.clear_pass.run_tiles(
                        device,
                        encoder,
                        &[
                            &buffers.camera,
                            &buffers.gbuffer_d0,
                            &buffers.gbuffer_d1,
                            &tiles.data,
                            &output.diffuse,
                            &output.specular,
                            &output.frames,
                            &output.depth,
                        ],
                        &tiles.args,
                        tile_type,
                        params,
                    );
                }

                (TemporalAccumulationKernel::Warm, Some(history)) => {
                    self.warm_pass.run_tiles(
                        device,
                        encoder,
                        &[
                            &buffers.camera,
                            &buffers.gbuffer_d0,
                            &buffers.gbuffer_d1,
                            &tiles.data,
                            &buffers.upsample_weights,
                            &buffers.resolved_diffuse,
                            &buffers.resolved_specular,
                            &output.diffuse,
                            &output.specular,
                            &output.frames,
                            &output.depth,
                            &history.diffuse,
                            &history.specular,
                            &history.frames,
                            &history.depth,
                        ],
                        &tiles.args,
                        tile_type,
                        params,
                    );
                }

                _ => {
                    self.cold_pass.run_tiles(
                        device,
                        encoder,
                        &[
                            &buffers.camera,
                            &buffers.gbuffer_d0,
                            &buffers.gbuffer_d1,
                            &tiles.data,
                            &buffers.upsample_weights,
                            &buffers.resolved_diffuse,
                            &buffers.resolved_specular,
                            &output.diffuse,
                            &output.specular,
                            &output.frames,
                            &output.depth,
                        ],
                        &tiles.args,
                        tile_type,
                        params,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernels() {
        let shaders = Shaders::new(&Device::default());
        let pass = TemporalAccumulationPass::new(&shaders, &Config::default());

        assert_eq!(
            TemporalAccumulationKernel::Warm,
            pass.kernel(gpu::TileType::SimpleShading, HistoryState::Warm)
        );

        assert_eq!(
            TemporalAccumulationKernel::Cold,
            pass.kernel(gpu::TileType::ComplexShading, HistoryState::Cold)
        );

        assert_eq!(
            TemporalAccumulationKernel::Clear,
            pass.kernel(gpu::TileType::Empty, HistoryState::Warm)
        );

        let pass = TemporalAccumulationPass::new(
            &shaders,
            &Config {
                temporal: false,
                ..Default::default()
            },
        );

        assert_eq!(
            TemporalAccumulationKernel::Cold,
            pass.kernel(gpu::TileType::SimpleShading, HistoryState::Warm)
        );
    }
}
