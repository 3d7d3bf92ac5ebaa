use glam::{ivec2, vec4, IVec2, UVec2, Vec4};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{Surface, SurfaceMap, TexRgba, DOWNSAMPLE_FACTOR};

/// Weights used to bring the downsampled lighting back to full resolution.
///
/// Each full-resolution pixel blends the four nearest downsampled texels,
/// with bilinear weights adjusted by how similar those texels' surfaces are to
/// the pixel's own surface (so that lighting doesn't leak across edges).
pub struct UpsampleWeights;

impl UpsampleWeights {
    /// Returns the downsampled texels around given full-resolution pixel,
    /// together with their bilinear weights.
    pub fn taps(screen_pos: UVec2, downsampled_size: UVec2) -> ([UVec2; 4], [f32; 4]) {
        let pos = (screen_pos.as_vec2() + 0.5) / (DOWNSAMPLE_FACTOR as f32) - 0.5;
        let base = pos.floor();
        let uv = pos - base;
        let base = base.as_ivec2();
        let max = downsampled_size.as_ivec2() - 1;
        let clamp = |pos: IVec2| pos.clamp(IVec2::ZERO, max).as_uvec2();

        (
            [
                clamp(base),
                clamp(base + ivec2(1, 0)),
                clamp(base + ivec2(0, 1)),
                clamp(base + ivec2(1, 1)),
            ],
            [
                (1.0 - uv.x) * (1.0 - uv.y),
                uv.x * (1.0 - uv.y),
                (1.0 - uv.x) * uv.y,
                uv.x * uv.y,
            ],
        )
    }

    pub fn compute(
        screen_pos: UVec2,
        surface: Surface,
        surfaces: SurfaceMap,
    ) -> Vec4 {
        if !surface.is_some() {
            return Vec4::ZERO;
        }

        let (taps, bilinear) = Self::taps(screen_pos, surfaces.size());
        let mut weights = [0.0; 4];
        let mut similarities = [0.0; 4];

        for idx in 0..4 {
            similarities[idx] =
                surface.evaluate_similarity_to(&surfaces.get(taps[idx]));

            weights[idx] = bilinear[idx] * similarities[idx];
        }

        let weights = Vec4::from(weights);
        let sum = weights.x + weights.y + weights.z + weights.w;

        if sum > 0.0001 {
            return weights / sum;
        }

        // None of the taps is a good match (e.g. we're on a thin feature that
        // the downsampled snapshot missed) - fall back to the most similar
        // surface, if there's any
        let mut best = None;

        for idx in 0..4 {
            let is_better = match best {
                Some(best) => similarities[idx] > similarities[best],
                None => similarities[idx] > 0.0,
            };

            if is_better {
                best = Some(idx);
            }
        }

        match best {
            Some(0) => vec4(1.0, 0.0, 0.0, 0.0),
            Some(1) => vec4(0.0, 1.0, 0.0, 0.0),
            Some(2) => vec4(0.0, 0.0, 1.0, 0.0),
            Some(_) => vec4(0.0, 0.0, 0.0, 1.0),
            None => Vec4::ZERO,
        }
    }

    /// Upsamples given downsampled texture at given full-resolution pixel.
    pub fn apply(screen_pos: UVec2, weights: Vec4, tex: TexRgba) -> Vec4 {
        let (taps, _) = Self::taps(screen_pos, tex.size());
        let weights: [f32; 4] = weights.into();
        let mut out = Vec4::ZERO;

        for idx in 0..4 {
            if weights[idx] > 0.0 {
                out += tex.read(taps[idx]) * weights[idx];
            }
        }

        out
    }
}
