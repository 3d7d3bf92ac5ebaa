//! Compute kernels of the many-lights pipeline.
//!
//! Each entry point is compiled into SPIR-V by `manylights-shader-builder`;
//! on the host, the very same functions can be called directly, one call per
//! thread, with textures passed as texel slices.
//!
//! Entry points dispatched over tiles take `workgroup_id` and `local_id`,
//! with `workgroup_id.x` indexing the list of tiles of given type.

#![cfg_attr(target_arch = "spirv", no_std)]
#![allow(clippy::too_many_arguments)]

pub mod light_sampling;
pub mod light_shading;
pub mod light_visibility;
pub mod spatial_filter;
pub mod temporal_accumulation;
pub mod tile_classification;
pub mod tile_indirect_args;
pub mod upsample_weights;

#[cfg(test)]
mod test_utils;
