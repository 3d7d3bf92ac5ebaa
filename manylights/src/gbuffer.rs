use glam::UVec2;

use crate::gpu;

/// Per-pixel surface attributes, as produced by the renderer's geometry pass.
#[derive(Clone, Debug)]
pub struct GBuffer {
    size: UVec2,
    entries: Vec<gpu::GBufferEntry>,
}

impl GBuffer {
    /// Creates a G-buffer with no surfaces.
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            entries: vec![Default::default(); (size.x * size.y) as usize],
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn get(&self, pos: UVec2) -> gpu::GBufferEntry {
        self.entries[self.idx(pos)]
    }

    pub fn set(&mut self, pos: UVec2, entry: gpu::GBufferEntry) {
        let idx = self.idx(pos);

        self.entries[idx] = entry;
    }

    pub(crate) fn packed(&self) -> (Vec<glam::Vec4>, Vec<glam::Vec4>) {
        self.entries
            .iter()
            .map(|entry| {
                let [d0, d1] = entry.pack();

                (d0, d1)
            })
            .unzip()
    }

    fn idx(&self, pos: UVec2) -> usize {
        (pos.y * self.size.x + pos.x) as usize
    }
}
