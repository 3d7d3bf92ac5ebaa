use std::fmt;

use glam::{uvec3, UVec3, Vec4};
use manylights_shaders::{
    light_sampling, light_shading, light_visibility, spatial_filter,
    temporal_accumulation, tile_classification, tile_indirect_args,
    upsample_weights,
};

use super::{Bindings, Device};
use crate::gpu;

/// Identifiers of a single kernel invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub global_id: UVec3,
    pub workgroup_id: UVec3,
    pub local_id: UVec3,
}

/// Kernel entry point together with the workgroup size it was compiled for.
#[derive(Clone, Copy)]
pub struct Kernel {
    pub(crate) workgroup_size: UVec3,
    pub(crate) run: fn(Invocation, &Bindings),
}

impl Kernel {
    fn new(run: fn(Invocation, &Bindings)) -> Self {
        Self {
            workgroup_size: uvec3(gpu::TILE_SIZE, gpu::TILE_SIZE, 1),
            run,
        }
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("workgroup_size", &self.workgroup_size)
            .finish()
    }
}

#[derive(Debug)]
pub struct Shaders {
    pub tile_classification: Kernel,
    pub tile_indirect_args: Kernel,
    pub upsample_weights: Kernel,
    pub light_sampling_clear: Kernel,
    pub light_sampling_sample_simple: Kernel,
    pub light_sampling_sample_complex: Kernel,
    pub light_visibility_prepare: Kernel,
    pub light_visibility_resolve: Kernel,
    pub light_shading_clear: Kernel,
    pub light_shading_shade_simple: Kernel,
    pub light_shading_shade_complex: Kernel,
    pub temporal_accumulation_clear: Kernel,
    pub temporal_accumulation_cold: Kernel,
    pub temporal_accumulation_warm: Kernel,
    pub spatial_filter_filter: Kernel,
    pub spatial_filter_pass_through: Kernel,
}

impl Shaders {
    pub fn new(_: &Device) -> Self {
        Self {
            tile_classification: Kernel::new(|inv, b| {
                tile_classification::main(
                    inv.global_id,
                    &b.params(),
                    &b.uniform(0),
                    &b.uniform(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    &b.buffer::<gpu::Light>(4),
                    &mut b.buffer_mut::<u32>(5),
                    &mut b.buffer_mut::<u32>(6),
                );
            }),

            tile_indirect_args: Kernel {
                workgroup_size: uvec3(8, 1, 1),
                run: |inv, b| {
                    tile_indirect_args::main(
                        inv.global_id,
                        &mut b.buffer_mut::<u32>(0),
                        &mut b.buffer_mut::<u32>(1),
                        &mut b.buffer_mut::<u32>(2),
                        &mut b.buffer_mut::<u32>(3),
                    );
                },
            },

            upsample_weights: Kernel::new(|inv, b| {
                upsample_weights::main(
                    inv.global_id,
                    &b.uniform(0),
                    b.texture::<Vec4>(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    b.texture::<Vec4>(4),
                );
            }),

            light_sampling_clear: Kernel::new(|inv, b| {
                light_sampling::clear(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.params(),
                    &b.uniform(0),
                    &b.uniform(1),
                    &b.buffer::<u32>(2),
                    b.texture::<Vec4>(3),
                    b.texture::<Vec4>(4),
                );
            }),

            light_sampling_sample_simple: Kernel::new(|inv, b| {
                light_sampling::sample_simple(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.uniform(0),
                    &b.uniform(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    &b.buffer::<gpu::Light>(4),
                    &b.buffer::<u32>(5),
                    b.texture::<Vec4>(6),
                    b.texture::<Vec4>(7),
                    &mut b.buffer_mut::<u32>(8),
                );
            }),

            light_sampling_sample_complex: Kernel::new(|inv, b| {
                light_sampling::sample_complex(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.uniform(0),
                    &b.uniform(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    &b.buffer::<gpu::Light>(4),
                    &b.buffer::<u32>(5),
                    b.texture::<Vec4>(6),
                    b.texture::<Vec4>(7),
                    &mut b.buffer_mut::<u32>(8),
                );
            }),

            light_visibility_prepare: Kernel::new(|inv, b| {
                light_visibility::prepare(
                    inv.global_id,
                    &b.uniform(0),
                    &b.uniform(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    &b.buffer::<gpu::Light>(4),
                    b.texture::<Vec4>(5),
                    b.texture::<Vec4>(6),
                    &mut b.buffer_mut::<gpu::RayQuery>(7),
                );
            }),

            light_visibility_resolve: Kernel::new(|inv, b| {
                light_visibility::resolve(
                    inv.global_id,
                    &b.uniform(0),
                    &b.uniform(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    &b.buffer::<gpu::RayQuery>(4),
                    &b.buffer::<f32>(5),
                    &mut b.buffer_mut::<u32>(6),
                );
            }),

            light_shading_clear: Kernel::new(|inv, b| {
                light_shading::clear(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.params(),
                    &b.uniform(0),
                    &b.buffer::<u32>(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                );
            }),

            light_shading_shade_simple: Kernel::new(|inv, b| {
                light_shading::shade_simple(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.uniform(0),
                    &b.uniform(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    &b.buffer::<gpu::Light>(4),
                    &b.buffer::<u32>(5),
                    b.texture::<Vec4>(6),
                    b.texture::<Vec4>(7),
                    b.texture::<Vec4>(8),
                    b.texture::<Vec4>(9),
                );
            }),

            light_shading_shade_complex: Kernel::new(|inv, b| {
                light_shading::shade_complex(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.uniform(0),
                    &b.uniform(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    &b.buffer::<gpu::Light>(4),
                    &b.buffer::<u32>(5),
                    b.texture::<Vec4>(6),
                    b.texture::<Vec4>(7),
                    b.texture::<Vec4>(8),
                    b.texture::<Vec4>(9),
                );
            }),

            temporal_accumulation_clear: Kernel::new(|inv, b| {
                temporal_accumulation::clear(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.params(),
                    &b.uniform(0),
                    b.texture::<Vec4>(1),
                    b.texture::<Vec4>(2),
                    &b.buffer::<u32>(3),
                    b.texture::<Vec4>(4),
                    b.texture::<Vec4>(5),
                    b.texture::<f32>(6),
                    b.texture::<f32>(7),
                );
            }),

            temporal_accumulation_cold: Kernel::new(|inv, b| {
                temporal_accumulation::cold(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.params(),
                    &b.uniform(0),
                    b.texture::<Vec4>(1),
                    b.texture::<Vec4>(2),
                    &b.buffer::<u32>(3),
                    b.texture::<Vec4>(4),
                    b.texture::<Vec4>(5),
                    b.texture::<Vec4>(6),
                    b.texture::<Vec4>(7),
                    b.texture::<Vec4>(8),
                    b.texture::<f32>(9),
                    b.texture::<f32>(10),
                );
            }),

            temporal_accumulation_warm: Kernel::new(|inv, b| {
                temporal_accumulation::warm(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.params(),
                    &b.uniform(0),
                    b.texture::<Vec4>(1),
                    b.texture::<Vec4>(2),
                    &b.buffer::<u32>(3),
                    b.texture::<Vec4>(4),
                    b.texture::<Vec4>(5),
                    b.texture::<Vec4>(6),
                    b.texture::<Vec4>(7),
                    b.texture::<Vec4>(8),
                    b.texture::<f32>(9),
                    b.texture::<f32>(10),
                    b.texture::<Vec4>(11),
                    b.texture::<Vec4>(12),
                    b.texture::<f32>(13),
                    b.texture::<f32>(14),
                );
            }),

            spatial_filter_filter: Kernel::new(|inv, b| {
                spatial_filter::filter(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.params(),
                    &b.uniform(0),
                    &b.uniform(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    &b.buffer::<u32>(4),
                    b.texture::<Vec4>(5),
                    b.texture::<Vec4>(6),
                    b.texture::<Vec4>(7),
                );
            }),

            spatial_filter_pass_through: Kernel::new(|inv, b| {
                spatial_filter::pass_through(
                    inv.workgroup_id,
                    inv.local_id,
                    &b.params(),
                    &b.uniform(0),
                    &b.uniform(1),
                    b.texture::<Vec4>(2),
                    b.texture::<Vec4>(3),
                    &b.buffer::<u32>(4),
                    b.texture::<Vec4>(5),
                    b.texture::<Vec4>(6),
                    b.texture::<Vec4>(7),
                );
            }),
        }
    }
}
