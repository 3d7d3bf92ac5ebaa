use bytemuck::{Pod, Zeroable};
use glam::{uvec2, UVec2};

use crate::{DebugMode, TileType, DOWNSAMPLE_FACTOR};

/// Parameters shared by all passes of a frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct FrameParams {
    /// Frame index used to decorrelate noise; frozen when the frame index is
    /// overridden for debugging.
    pub frame: u32,
    pub samples_per_pixel_x: u32,
    pub samples_per_pixel_y: u32,
    pub min_sample_weight: f32,
    pub debug_mode: u32,
    pub debug_light_id: u32,
    pub debug_pixel_x: u32,
    pub debug_pixel_y: u32,

    /// Number of valid entries in the lights buffer (which always contains
    /// at least one item, since graphics APIs don't allow for empty
    /// bindings).
    pub lights_count: u32,
    pub _padding: [u32; 3],
}

impl FrameParams {
    pub const NO_DEBUG_LIGHT: u32 = u32::MAX;
    pub const NO_DEBUG_PIXEL: u32 = u32::MAX;

    pub fn samples_per_pixel_2d(&self) -> UVec2 {
        uvec2(self.samples_per_pixel_x, self.samples_per_pixel_y)
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel_x * self.samples_per_pixel_y
    }

    /// Returns size of the texture holding light samples of a grid of given
    /// size; it's never empty, even when sampling is disabled.
    pub fn light_samples_size(&self, downsampled_size: UVec2) -> UVec2 {
        downsampled_size * self.samples_per_pixel_2d().max(UVec2::ONE)
    }

    pub fn debug_mode(&self) -> DebugMode {
        DebugMode::new(self.debug_mode)
    }

    pub fn debug_pixel(&self) -> Option<UVec2> {
        if self.debug_pixel_x == Self::NO_DEBUG_PIXEL {
            None
        } else {
            Some(uvec2(self.debug_pixel_x, self.debug_pixel_y))
        }
    }

    /// Returns whether given full-resolution pixel should print debug
    /// information for given debug mode.
    pub fn is_debug_pixel(&self, mode: DebugMode, screen_pos: UVec2) -> bool {
        self.debug_mode() == mode && self.debug_pixel() == Some(screen_pos)
    }

    /// Like [`Self::is_debug_pixel()`], but for passes working on the
    /// downsampled grid.
    pub fn is_debug_downsampled_pixel(
        &self,
        mode: DebugMode,
        screen_pos: UVec2,
    ) -> bool {
        self.debug_mode() == mode
            && self.debug_pixel().map(|pos| pos / DOWNSAMPLE_FACTOR)
                == Some(screen_pos)
    }

    /// Returns whether light with given id passes the debug filter.
    pub fn is_debug_light(&self, light_id: u32) -> bool {
        self.debug_light_id == Self::NO_DEBUG_LIGHT
            || self.debug_light_id == light_id
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct TileClassificationPassParams {
    /// Whether we're classifying the downsampled grid (where each tile covers
    /// `TILE_SIZE * DOWNSAMPLE_FACTOR` full-resolution pixels).
    pub downsampled: u32,
}

impl TileClassificationPassParams {
    pub fn is_downsampled(&self) -> bool {
        self.downsampled == 1
    }
}

/// Parameters of passes dispatched over tiles of a single type.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct TilePassParams {
    pub tile_type: u32,
}

impl TilePassParams {
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type: tile_type.get(),
        }
    }

    pub fn tile_type(&self) -> TileType {
        TileType::new(self.tile_type)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct TemporalAccumulationPassParams {
    pub max_frames_accumulated: f32,
    pub neighborhood_clamp_scale: f32,
    pub tile_type: u32,
}

impl TemporalAccumulationPassParams {
    pub fn with_tile_type(self, tile_type: TileType) -> Self {
        Self {
            tile_type: tile_type.get(),
            ..self
        }
    }

    pub fn tile_type(&self) -> TileType {
        TileType::new(self.tile_type)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct SpatialFilterPassParams {
    pub depth_weight_scale: f32,
    pub kernel_radius: f32,
    pub num_samples: u32,
    pub tile_type: u32,
}

impl SpatialFilterPassParams {
    pub fn with_tile_type(self, tile_type: TileType) -> Self {
        Self {
            tile_type: tile_type.get(),
            ..self
        }
    }

    pub fn tile_type(&self) -> TileType {
        TileType::new(self.tile_type)
    }
}
