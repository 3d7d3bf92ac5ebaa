use glam::{UVec2, Vec4};

/// Scene color the lighting gets composited into.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    size: UVec2,
    pixels: Vec<Vec4>,
}

impl Image {
    pub fn new(size: UVec2, color: Vec4) -> Self {
        Self {
            size,
            pixels: vec![color; (size.x * size.y) as usize],
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn get(&self, pos: UVec2) -> Vec4 {
        self.pixels[self.idx(pos)]
    }

    pub fn set(&mut self, pos: UVec2, color: Vec4) {
        let idx = self.idx(pos);

        self.pixels[idx] = color;
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Vec4] {
        &mut self.pixels
    }

    fn idx(&self, pos: UVec2) -> usize {
        (pos.y * self.size.x + pos.x) as usize
    }
}
