use bytemuck::{Pod, Zeroable};

use crate::TileType;

/// Arguments of an indirect dispatch, laid out the way graphics APIs expect
/// them.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DispatchIndirectArgs {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl DispatchIndirectArgs {
    /// Number of `u32`s occupied by a single entry.
    pub const SIZE: usize = 3;

    /// One workgroup per tile.
    pub fn from_tile_count(count: u32) -> Self {
        Self { x: count, y: 1, z: 1 }
    }

    pub fn offset(tile_type: TileType) -> usize {
        tile_type.get() as usize * Self::SIZE
    }

    pub fn read(buf: &[u32], offset: usize) -> Self {
        Self {
            x: buf[offset],
            y: buf[offset + 1],
            z: buf[offset + 2],
        }
    }

    pub fn write(self, buf: &mut [u32], offset: usize) {
        buf[offset] = self.x;
        buf[offset + 1] = self.y;
        buf[offset + 2] = self.z;
    }

    pub fn group_count(&self) -> u32 {
        self.x * self.y * self.z
    }
}
