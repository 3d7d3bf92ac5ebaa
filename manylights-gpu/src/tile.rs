use glam::{uvec2, UVec2, UVec3, Vec3Swizzles};

use crate::{atomic_add, TILE_SIZE};

/// Category of a screen tile; decides which kernel variant processes it.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileType {
    SimpleShading = 0,
    ComplexShading = 1,

    /// Tile without any lit surface; it's skipped by the expensive passes
    /// and only gets its outputs cleared.
    Empty = 2,
}

impl TileType {
    /// Number of tile types that need shading.
    pub const SHADING_MAX: usize = 2;

    /// Number of all tile types.
    pub const MAX: usize = 3;

    pub const ALL: [Self; Self::MAX] =
        [Self::SimpleShading, Self::ComplexShading, Self::Empty];

    pub const SHADING: [Self; Self::SHADING_MAX] =
        [Self::SimpleShading, Self::ComplexShading];

    pub fn new(id: u32) -> Self {
        match id {
            0 => Self::SimpleShading,
            1 => Self::ComplexShading,
            _ => Self::Empty,
        }
    }

    pub fn get(self) -> u32 {
        self as u32
    }

    /// Picks category for a tile, given what's been found inside it.
    pub fn classify(has_surface: bool, is_lit: bool, is_complex: bool) -> Self {
        if !has_surface || !is_lit {
            Self::Empty
        } else if is_complex {
            Self::ComplexShading
        } else {
            Self::SimpleShading
        }
    }
}

/// Returns how many tiles are needed to cover a grid of given size.
pub fn tile_grid_size(size: UVec2) -> UVec2 {
    (size + TILE_SIZE - 1) / TILE_SIZE
}

/// Returns the total number of tiles covering a grid of given size; it's
/// also the stride between per-category lists in [`TileData`].
pub fn tile_count(size: UVec2) -> u32 {
    let grid_size = tile_grid_size(size);

    grid_size.x * grid_size.y
}

/// Per-category tile counters.
pub struct TileAllocator<'a> {
    counters: &'a mut [u32],
}

impl<'a> TileAllocator<'a> {
    pub fn new(counters: &'a mut [u32]) -> Self {
        Self { counters }
    }

    /// Reserves a slot for a tile of given type, returning its index within
    /// that type's list.
    pub fn allocate(&mut self, tile_type: TileType) -> u32 {
        atomic_add(&mut self.counters[tile_type.get() as usize], 1)
    }

    pub fn count(&self, tile_type: TileType) -> u32 {
        self.counters[tile_type.get() as usize]
    }
}

/// Per-category lists of tile coordinates.
///
/// List for category `t` starts at `t * stride`, where `stride` is the total
/// number of tiles on the screen (so that, in the worst case, each category
/// can hold all of them).
#[derive(Clone, Copy)]
pub struct TileData<'a> {
    items: &'a [u32],
    stride: u32,
}

impl<'a> TileData<'a> {
    pub fn new(items: &'a [u32], stride: u32) -> Self {
        Self { items, stride }
    }

    pub fn get(&self, tile_type: TileType, idx: u32) -> UVec2 {
        tile_unpack(self.items[tile_ptr(self.stride, tile_type, idx)])
    }

    /// Returns the pixel processed by given invocation of an indirect
    /// dispatch over tiles of given type (one workgroup per tile).
    pub fn pixel(
        &self,
        tile_type: TileType,
        workgroup_id: UVec3,
        local_id: UVec3,
    ) -> UVec2 {
        self.get(tile_type, workgroup_id.x) * TILE_SIZE + local_id.xy()
    }
}

/// Writable counterpart of [`TileData`], used by the classification pass.
pub struct TileDataMut<'a> {
    items: &'a mut [u32],
    stride: u32,
}

impl<'a> TileDataMut<'a> {
    pub fn new(items: &'a mut [u32], stride: u32) -> Self {
        Self { items, stride }
    }

    pub fn set(&mut self, tile_type: TileType, idx: u32, tile: UVec2) {
        self.items[tile_ptr(self.stride, tile_type, idx)] = tile_pack(tile);
    }

    pub fn as_ref(&self) -> TileData<'_> {
        TileData::new(self.items, self.stride)
    }
}

pub fn tile_pack(tile: UVec2) -> u32 {
    (tile.x & 0xffff) | (tile.y << 16)
}

pub fn tile_unpack(val: u32) -> UVec2 {
    uvec2(val & 0xffff, val >> 16)
}

fn tile_ptr(stride: u32, tile_type: TileType, idx: u32) -> usize {
    (tile_type.get() * stride + idx) as usize
}
