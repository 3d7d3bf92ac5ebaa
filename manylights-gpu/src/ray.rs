use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

#[derive(Copy, Clone, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Ray {
    origin: Vec3,
    dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.dir * distance
    }
}

/// Visibility query handed over to the scene's tracer, one per texel of the
/// light-samples texture.
///
/// Queries with zero `max_distance` are unused and must be left alone.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct RayQuery {
    /// xyz - origin, w - max distance
    pub origin: Vec4,

    /// xyz - normalized direction, w - unused
    pub dir: Vec4,
}

impl RayQuery {
    pub fn new(ray: Ray, max_distance: f32) -> Self {
        Self {
            origin: ray.origin().extend(max_distance),
            dir: ray.dir().extend(0.0),
        }
    }

    pub fn unused() -> Self {
        Self::default()
    }

    pub fn is_used(&self) -> bool {
        self.origin.w > 0.0
    }

    pub fn ray(&self) -> Ray {
        Ray::new(self.origin.xyz(), self.dir.xyz())
    }

    pub fn max_distance(&self) -> f32 {
        self.origin.w
    }
}

/// Outcome of a visibility query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraceResult {
    Miss,
    Hit { distance: f32 },
}

impl TraceResult {
    /// Tolerance for hits that land on the light itself rather than in front
    /// of it, relative to the light's distance.
    pub const TOLERANCE: f32 = 1e-3;

    /// Returns whether a ray aimed at something `distance` units away reached
    /// its target.
    pub fn is_visible(self, distance: f32) -> bool {
        match self {
            TraceResult::Miss => true,
            TraceResult::Hit { distance: hit } => {
                hit >= distance * (1.0 - Self::TOLERANCE)
            }
        }
    }

    /// Returns how far the ray travelled before stopping.
    pub fn distance(self, max_distance: f32) -> f32 {
        match self {
            TraceResult::Miss => max_distance,
            TraceResult::Hit { distance } => distance.min(max_distance),
        }
    }

    /// Encodes the result the way tracers store it in the hits buffer: the
    /// distance to the first occluder, or zero for a miss (so a zeroed
    /// buffer means "nothing got hit").
    pub fn serialize(self) -> f32 {
        match self {
            TraceResult::Miss => 0.0,
            TraceResult::Hit { distance } => distance.max(f32::MIN_POSITIVE),
        }
    }

    pub fn deserialize(hit: f32) -> Self {
        if hit > 0.0 {
            TraceResult::Hit { distance: hit }
        } else {
            TraceResult::Miss
        }
    }
}
