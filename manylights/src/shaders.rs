use std::sync::Arc;

use log::debug;

use crate::Device;

/// Single entry point of a compiled shader module.
#[derive(Clone, Debug)]
pub struct Kernel {
    pub(crate) module: Arc<wgpu::ShaderModule>,
    pub(crate) entry_point: &'static str,
}

macro_rules! shaders {
    ([ $( $name:ident, )* ]) => {
        /// Kernels compiled by `manylights-shader-builder`, loaded once per
        /// engine.
        #[derive(Debug)]
        pub struct Shaders {
            $( pub $name: Kernel, )*
        }

        impl Shaders {
            pub fn new(device: &Device) -> Self {
                debug!("Loading shaders");

                Self {
                    $(
                        $name: Kernel {
                            module: Arc::new(
                                device.raw().create_shader_module(
                                    wgpu::include_spirv!(env!(concat!(
                                        "manylights_shaders::",
                                        stringify!($name),
                                        ".path"
                                    ))),
                                ),
                            ),
                            entry_point: env!(concat!(
                                "manylights_shaders::",
                                stringify!($name),
                                ".entry_point"
                            )),
                        },
                    )*
                }
            }
        }
    };
}

shaders!([
    tile_classification,
    tile_indirect_args,
    upsample_weights,
    light_sampling_clear,
    light_sampling_sample_simple,
    light_sampling_sample_complex,
    light_visibility_prepare,
    light_visibility_resolve,
    light_shading_clear,
    light_shading_shade_simple,
    light_shading_shade_complex,
    temporal_accumulation_clear,
    temporal_accumulation_cold,
    temporal_accumulation_warm,
    spatial_filter_filter,
    spatial_filter_pass_through,
]);
