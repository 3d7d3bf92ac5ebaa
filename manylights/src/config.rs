use glam::{uvec2, UVec2};

use crate::gpu;

/// Knobs of the lighting pipeline.
///
/// Config is provided anew for each rendered frame; changing fields that
/// affect resource sizes or kernel selection causes camera's buffers and passes
/// to be rebuilt (see: [`Config::is_invalidated_by()`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of light samples generated per downsampled pixel; rounded down
    /// to the closest supported grid (see: [`Config::samples_per_pixel_2d()`]).
    pub samples_per_pixel: u32,

    /// Lights whose importance falls below this threshold are not considered
    /// as candidates.
    pub min_sample_weight: f32,

    pub temporal: bool,
    pub temporal_max_frames_accumulated: u32,
    pub temporal_neighborhood_clamp_scale: f32,

    pub spatial: bool,
    pub spatial_depth_weight_scale: f32,
    pub spatial_kernel_radius: f32,
    pub spatial_num_samples: u32,

    pub debug: gpu::DebugMode,

    /// Full-resolution pixel for which debug information gets printed.
    pub debug_pixel: Option<UVec2>,

    /// When set, debug output includes only samples of this light.
    pub debug_light_id: Option<u32>,

    /// When set, temporal history gets discarded every n-th frame.
    pub reset_every_nth_frame: Option<u32>,

    /// When set, overrides camera's frame counter; useful for getting the same
    /// noise pattern over and over.
    pub fixed_state_frame_index: Option<u32>,
}

impl Config {
    pub const MAX_SPATIAL_NUM_SAMPLES: u32 = 1024;

    /// Returns a copy of this config with all values clamped into their valid
    /// ranges.
    pub fn sanitized(&self) -> Self {
        Self {
            min_sample_weight: self.min_sample_weight.max(0.0),
            temporal_max_frames_accumulated: self
                .temporal_max_frames_accumulated
                .max(1),
            temporal_neighborhood_clamp_scale: self
                .temporal_neighborhood_clamp_scale
                .max(0.0),
            spatial_depth_weight_scale: self
                .spatial_depth_weight_scale
                .max(0.0),
            spatial_kernel_radius: self.spatial_kernel_radius.max(0.0),
            spatial_num_samples: self
                .spatial_num_samples
                .min(Self::MAX_SPATIAL_NUM_SAMPLES),
            reset_every_nth_frame: self
                .reset_every_nth_frame
                .filter(|&n| n > 0),
            ..self.clone()
        }
    }

    /// Returns the grid of light samples generated for each downsampled pixel.
    pub fn samples_per_pixel_2d(&self) -> UVec2 {
        match self.samples_per_pixel {
            0 => UVec2::ZERO,
            1 => uvec2(1, 1),
            2..=3 => uvec2(2, 1),
            4..=15 => uvec2(2, 2),
            _ => uvec2(4, 4),
        }
    }

    /// Returns whether switching from `self` to `other` requires rebuilding
    /// camera's buffers and passes.
    pub fn is_invalidated_by(&self, other: &Self) -> bool {
        self.samples_per_pixel_2d() != other.samples_per_pixel_2d()
            || self.temporal != other.temporal
            || self.spatial != other.spatial
    }

    pub(crate) fn frame_params(&self, frame: u32) -> gpu::FrameParams {
        let spp = self.samples_per_pixel_2d();

        let (debug_pixel_x, debug_pixel_y) = match self.debug_pixel {
            Some(pos) => (pos.x, pos.y),
            None => (
                gpu::FrameParams::NO_DEBUG_PIXEL,
                gpu::FrameParams::NO_DEBUG_PIXEL,
            ),
        };

        gpu::FrameParams {
            frame,
            samples_per_pixel_x: spp.x,
            samples_per_pixel_y: spp.y,
            min_sample_weight: self.min_sample_weight,
            debug_mode: self.debug.get(),
            debug_light_id: self
                .debug_light_id
                .unwrap_or(gpu::FrameParams::NO_DEBUG_LIGHT),
            debug_pixel_x,
            debug_pixel_y,
            ..Default::default()
        }
    }

    pub(crate) fn temporal_params(
        &self,
    ) -> gpu::TemporalAccumulationPassParams {
        gpu::TemporalAccumulationPassParams {
            max_frames_accumulated: self.temporal_max_frames_accumulated as f32,
            neighborhood_clamp_scale: self.temporal_neighborhood_clamp_scale,
            ..Default::default()
        }
    }

    pub(crate) fn spatial_params(&self) -> gpu::SpatialFilterPassParams {
        gpu::SpatialFilterPassParams {
            depth_weight_scale: self.spatial_depth_weight_scale,
            kernel_radius: self.spatial_kernel_radius,
            num_samples: self.spatial_num_samples,
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            samples_per_pixel: 4,
            min_sample_weight: 0.001,
            temporal: true,
            temporal_max_frames_accumulated: 12,
            temporal_neighborhood_clamp_scale: 2.0,
            spatial: true,
            spatial_depth_weight_scale: 10000.0,
            spatial_kernel_radius: 8.0,
            spatial_num_samples: 4,
            debug: Default::default(),
            debug_pixel: None,
            debug_light_id: None,
            reset_every_nth_frame: None,
            fixed_state_frame_index: None,
        }
    }
}
