use log::trace;

use super::{CommandEncoder, Device, StorageBuffer};
use crate::gpu;

/// Visibility service the pipeline delegates its shadow rays to, answering
/// one query at a time.
pub trait VisibilityTracer {
    /// Returns the closest occluder along `ray`, up to `max_distance` away.
    fn trace(&self, ray: gpu::Ray, max_distance: f32) -> gpu::TraceResult;
}

/// Tracer for scenes without any occluders: every light is visible.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOcclusion;

impl VisibilityTracer for NoOcclusion {
    fn trace(&self, _: gpu::Ray, _: f32) -> gpu::TraceResult {
        gpu::TraceResult::Miss
    }
}

/// Answers all queries recorded so far; commands already in the encoder get
/// executed first, since they produce the queries.
pub(crate) fn trace_visibility(
    _: &Device,
    encoder: &mut CommandEncoder,
    tracer: &dyn VisibilityTracer,
    rays: &StorageBuffer<gpu::RayQuery>,
    hits: &StorageBuffer<f32>,
) {
    encoder.flush();

    trace!("Tracing visibility; rays={}", rays.len());

    let rays = rays.raw().borrow();
    let mut hits = hits.raw().borrow_mut();

    for (hit, query) in hits.iter_mut().zip(rays.iter()) {
        *hit = if query.is_used() {
            tracer.trace(query.ray(), query.max_distance()).serialize()
        } else {
            0.0
        };
    }
}
