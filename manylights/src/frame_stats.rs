use crate::{gpu, HistoryState};

/// Diagnostics of a rendered frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub history: HistoryState,

    /// Full-resolution tiles, per category.
    pub tiles: TileCounts,

    /// Downsampled tiles, per category.
    pub downsampled_tiles: TileCounts,

    /// Number of generated light samples.
    pub samples: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileCounts {
    pub simple: u32,
    pub complex: u32,
    pub empty: u32,
}

impl TileCounts {
    pub fn new(counts: [u32; gpu::TileType::MAX]) -> Self {
        Self {
            simple: counts[gpu::TileType::SimpleShading.get() as usize],
            complex: counts[gpu::TileType::ComplexShading.get() as usize],
            empty: counts[gpu::TileType::Empty.get() as usize],
        }
    }

    pub fn total(&self) -> u32 {
        self.simple + self.complex + self.empty
    }
}
