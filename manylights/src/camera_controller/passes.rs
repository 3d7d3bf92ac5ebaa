use log::debug;

use crate::{Config, Shaders};

macro_rules! passes {
    ([ $( $name:ident => $class:ident, )* ]) => {
        $( mod $name; )*
        $( pub use self::$name::*; )*

        #[derive(Debug)]
        pub struct CameraPasses {
            $( pub $name: $class, )*
        }

        impl CameraPasses {
            pub fn new(shaders: &Shaders, config: &Config) -> Self {
                debug!("Initializing camera passes");

                Self {
                    $( $name: $class::new(shaders, config), )*
                }
            }
        }
    };
}

passes!([
    tile_classification => TileClassificationPass,
    tile_indirect_args => TileIndirectArgsPass,
    light_sampling => LightSamplingPass,
    light_visibility => LightVisibilityPass,
    upsample_weights => UpsampleWeightsPass,
    light_shading => LightShadingPass,
    temporal_accumulation => TemporalAccumulationPass,
    spatial_filter => SpatialFilterPass,
]);
