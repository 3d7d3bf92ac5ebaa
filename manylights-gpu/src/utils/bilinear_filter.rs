use glam::{IVec2, UVec2, Vec4};

use crate::Reprojection;

#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct BilinearFilter {
    /// Sample at `f(x=0, y=0)`
    pub s00: Vec4,

    /// Sample at `f(x=1, y=0)`
    pub s10: Vec4,

    /// Sample at `f(x=0, y=1)`
    pub s01: Vec4,

    /// Sample at `f(x=1, y=1)`
    pub s11: Vec4,

    /// Weights for each sample, with invalid samples having zero weight
    pub weights: Vec4,
}

impl BilinearFilter {
    /// Samples the history at reprojected position, skipping taps that
    /// didn't pass the validation.
    pub fn reproject(
        reprojection: &Reprojection,
        sample: impl Fn(UVec2) -> Vec4,
    ) -> Vec4 {
        Self::from_reprojection(reprojection, sample).eval()
    }

    pub fn from_reprojection(
        reprojection: &Reprojection,
        sample: impl Fn(UVec2) -> Vec4,
    ) -> Self {
        let weights = reprojection.weights();
        let [p00, p10, p01, p11] = reprojection.taps();

        let sample = |weight: f32, pos: IVec2| {
            if weight > 0.0 {
                sample(pos.as_uvec2())
            } else {
                Vec4::ZERO
            }
        };

        Self {
            s00: sample(weights.x, p00),
            s10: sample(weights.y, p10),
            s01: sample(weights.z, p01),
            s11: sample(weights.w, p11),
            weights,
        }
    }

    pub fn eval(&self) -> Vec4 {
        let w_sum = self.weights.dot(Vec4::ONE);

        if w_sum <= 0.0 {
            Default::default()
        } else {
            (self.s00 * self.weights.x
                + self.s10 * self.weights.y
                + self.s01 * self.weights.z
                + self.s11 * self.weights.w)
                / w_sum
        }
    }
}
