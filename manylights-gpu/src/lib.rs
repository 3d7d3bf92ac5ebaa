//! Common structs, algorithms etc. used by the many-lights kernels and the
//! renderer.

#![cfg_attr(target_arch = "spirv", no_std)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::too_many_arguments)]

mod brdf;
mod camera;
mod debug;
mod gbuffer;
mod hit;
mod indirect_args;
mod light;
mod light_sample;
mod lights;
mod noise;
mod normal;
mod passes;
mod ray;
mod reprojection;
mod sampler;
mod surface;
mod temporal;
mod texture;
mod tile;
mod upsample;
mod utils;

pub use self::brdf::*;
pub use self::camera::*;
pub use self::debug::*;
pub use self::gbuffer::*;
pub use self::hit::*;
pub use self::indirect_args::*;
pub use self::light::*;
pub use self::light_sample::*;
pub use self::lights::*;
pub use self::noise::*;
pub use self::normal::*;
pub use self::passes::*;
pub use self::ray::*;
pub use self::reprojection::*;
pub use self::sampler::*;
pub use self::surface::*;
pub use self::temporal::*;
pub use self::texture::*;
pub use self::tile::*;
pub use self::upsample::*;
pub use self::utils::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;
    #[cfg(target_arch = "spirv")]
    pub use spirv_std::num_traits::Float;
    pub use spirv_std::{spirv, Image};

    pub use crate::*;
}

/// Size (in pixels) of a single screen tile; both the full-resolution and the
/// downsampled grids are split into tiles of this size.
pub const TILE_SIZE: u32 = 8;

/// Ratio between the full resolution and the resolution at which light
/// samples are generated, traced and shaded.
pub const DOWNSAMPLE_FACTOR: u32 = 2;

pub const EPSILON: f32 = 0.000001;

/// Golden angle, used for spatial filters.
pub const GOLDEN_ANGLE: f32 = 2.39996;
