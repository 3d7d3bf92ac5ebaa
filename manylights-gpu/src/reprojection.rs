use glam::{ivec2, vec2, vec4, IVec2, UVec2, Vec2, Vec4};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{Camera, TexR};

/// Describes where a pixel was located in the history.
///
/// Coordinates are expressed in texel space (i.e. texel `(x, y)`'s center is
/// at `(x, y)`), so that [`Self::taps()`] and [`Self::uv()`] describe a
/// bilinear filter straight away.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reprojection {
    pub prev_x: f32,
    pub prev_y: f32,

    /// Which of the four taps (see: [`Self::taps()`]) passed the validation.
    pub validity: u32,
}

impl Reprojection {
    /// Maximum difference between the expected and the actual history depth,
    /// relative to the expected depth.
    pub const DEPTH_TOLERANCE: f32 = 0.05;

    /// Positions closer than this to a texel's center are snapped onto it.
    const SNAP_DISTANCE: f32 = 0.001;

    /// Finds the history position of given pixel and validates the bilinear
    /// taps around it against the history's depth.
    pub fn find(
        camera: &Camera,
        screen_pos: UVec2,
        depth: f32,
        prev_depth: TexR,
    ) -> Self {
        let point = camera.world_pos(screen_pos, depth);

        let Some(prev_pos) = camera.world_to_prev_screen(point) else {
            return Self::default();
        };

        let prev_pos = Self::snap(prev_pos - 0.5);
        let expected_depth = camera.prev_depth(point);

        let mut this = Self {
            prev_x: prev_pos.x,
            prev_y: prev_pos.y,
            validity: 0,
        };

        let weights = this.bilinear_weights();
        let taps = this.taps();

        for idx in 0..4 {
            let tap = taps[idx];

            if weights[idx] <= 0.0 || !prev_depth.contains(tap) {
                continue;
            }

            let actual_depth = prev_depth.read(tap.as_uvec2());

            if actual_depth > 0.0
                && (actual_depth - expected_depth).abs()
                    <= Self::DEPTH_TOLERANCE * expected_depth
            {
                this.validity |= 1 << idx;
            }
        }

        this
    }

    pub fn is_some(&self) -> bool {
        self.validity != 0
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    pub fn prev_pos(&self) -> Vec2 {
        vec2(self.prev_x, self.prev_y)
    }

    /// Returns texels surrounding the history position, in order: top-left,
    /// top-right, bottom-left, bottom-right.
    pub fn taps(&self) -> [IVec2; 4] {
        let p00 = self.prev_pos().floor().as_ivec2();

        [p00, p00 + ivec2(1, 0), p00 + ivec2(0, 1), p00 + ivec2(1, 1)]
    }

    /// Returns the history position relative to the top-left tap.
    pub fn uv(&self) -> Vec2 {
        self.prev_pos() - self.prev_pos().floor()
    }

    /// Returns the bilinear weights of [`Self::taps()`], including the ones
    /// that didn't pass the validation.
    pub fn bilinear_weights(&self) -> [f32; 4] {
        let uv = self.uv();

        [
            (1.0 - uv.x) * (1.0 - uv.y),
            uv.x * (1.0 - uv.y),
            (1.0 - uv.x) * uv.y,
            uv.x * uv.y,
        ]
    }

    /// Returns the bilinear weights of [`Self::taps()`], zeroed for taps
    /// that didn't pass the validation.
    pub fn weights(&self) -> Vec4 {
        let [w00, w10, w01, w11] = self.bilinear_weights();
        let valid = |idx: u32| (self.validity >> idx) & 1 == 1;

        vec4(
            if valid(0) { w00 } else { 0.0 },
            if valid(1) { w10 } else { 0.0 },
            if valid(2) { w01 } else { 0.0 },
            if valid(3) { w11 } else { 0.0 },
        )
    }

    fn snap(pos: Vec2) -> Vec2 {
        let rounded = pos.round();

        if (pos - rounded).abs().max_element() < Self::SNAP_DISTANCE {
            rounded
        } else {
            pos
        }
    }
}
