use crate::camera_controller::CameraComputePass;
use crate::{
    trace_visibility, CameraBuffers, CommandEncoder, Config, Device, Shaders,
    VisibilityTracer,
};

#[derive(Debug)]
pub struct LightVisibilityPass {
    passes: Option<(CameraComputePass, CameraComputePass)>,
}

impl LightVisibilityPass {
    pub fn new(shaders: &Shaders, config: &Config) -> Self {
        let passes = (config.samples_per_pixel > 0).then(|| {
            (
                CameraComputePass::new(
                    "light_visibility_prepare",
                    &shaders.light_visibility_prepare,
                ),
                CameraComputePass::new(
                    "light_visibility_resolve",
                    &shaders.light_visibility_resolve,
                ),
            )
        });

        Self { passes }
    }

    pub fn run(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        buffers: &CameraBuffers,
        tracer: &dyn VisibilityTracer,
    ) {
        let Some((prepare_pass, resolve_pass)) = &self.passes else {
            return;
        };

        let size = buffers.light_samples.size();

        prepare_pass.run(
            device,
            encoder,
            &[
                &buffers.frame,
                &buffers.camera,
                &buffers.gbuffer_d0,
                &buffers.gbuffer_d1,
                &buffers.lights,
                &buffers.surface_map,
                &buffers.light_samples,
                &buffers.rays,
            ],
            size,
            (),
        );

        trace_visibility(device, encoder, tracer, &buffers.rays, &buffers.hits);

        resolve_pass.run(
            device,
            encoder,
            &[
                &buffers.frame,
                &buffers.camera,
                &buffers.surface_map,
                &buffers.light_samples,
                &buffers.rays,
                &buffers.hits,
                &buffers.debug,
            ],
            size,
            (),
        );
    }
}
