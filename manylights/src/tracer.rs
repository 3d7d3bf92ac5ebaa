use log::trace;

use crate::{gpu, CommandEncoder, Device, StorageBuffer};

/// Visibility service the pipeline delegates its shadow rays to.
///
/// Implementors record work that reads `rays` (one [`gpu::RayQuery`] per
/// light sample, unused ones included) and writes `hits`: for each used query,
/// [`gpu::TraceResult::serialize()`] of the closest occluder found within the
/// query's maximum distance.
pub trait VisibilityTracer {
    fn trace(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        rays: &StorageBuffer<gpu::RayQuery>,
        hits: &StorageBuffer<f32>,
    );
}

/// Tracer for scenes without any occluders: every light is visible.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOcclusion;

impl VisibilityTracer for NoOcclusion {
    fn trace(
        &self,
        _: &Device,
        encoder: &mut CommandEncoder,
        _: &StorageBuffer<gpu::RayQuery>,
        hits: &StorageBuffer<f32>,
    ) {
        hits.clear(encoder);
    }
}

pub(crate) fn trace_visibility(
    device: &Device,
    encoder: &mut CommandEncoder,
    tracer: &dyn VisibilityTracer,
    rays: &StorageBuffer<gpu::RayQuery>,
    hits: &StorageBuffer<f32>,
) {
    trace!("Tracing visibility; rays={}", rays.len());

    tracer.trace(device, encoder, rays, hits);
}
