use glam::{uvec2, vec2, UVec2, Vec2};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{hash, WhiteNoise};

/// Low-discrepancy noise: R2 sequence, randomized per pixel with interleaved
/// gradient noise.
///
/// Successive samples (`nth = 0, 1, ...`) within a pixel are well-stratified,
/// neighbouring pixels get decorrelated offsets and the whole pattern shifts
/// every frame, so that the temporal accumulation sees fresh samples.
#[derive(Clone, Copy)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct BlueNoise {
    id: UVec2,
    frame: u32,
    offset: Vec2,
}

impl BlueNoise {
    /// Maximum number of samples a single pixel can draw per frame.
    pub const MAX_SAMPLES: u32 = 64;

    pub fn new(id: UVec2, frame: u32) -> Self {
        let offset = vec2(
            Self::ign(id, frame),
            Self::ign(id + uvec2(113, 67), frame),
        );

        Self { id, frame, offset }
    }

    /// Returns `nth` sample of the low-discrepancy sequence, in range
    /// `<0.0, 1.0)^2`.
    pub fn first_sample(&self, nth: u32) -> Vec2 {
        let idx = self
            .frame
            .wrapping_mul(Self::MAX_SAMPLES)
            .wrapping_add(nth);

        fract(Self::r2(idx) + self.offset)
    }

    /// Returns a sample that's independent from [`Self::first_sample()`],
    /// but just as deterministic.
    pub fn second_sample(&self, nth: u32) -> Vec2 {
        let mut wnoise =
            WhiteNoise::new(hash(self.frame, nth), self.id);

        vec2(wnoise.sample(), wnoise.sample())
    }

    fn r2(idx: u32) -> Vec2 {
        // 2^32 / plastic number (and its square)
        const A1: u32 = 3242174889;
        const A2: u32 = 2447445413;

        vec2(
            (idx.wrapping_mul(A1) >> 8) as f32,
            (idx.wrapping_mul(A2) >> 8) as f32,
        ) / ((1 << 24) as f32)
    }

    fn ign(id: UVec2, frame: u32) -> f32 {
        let frame = (frame % 64) as f32;
        let x = id.x as f32 + 5.588238 * frame;
        let y = id.y as f32 + 5.588238 * frame;

        (52.982918 * (0.06711056 * x + 0.00583715 * y).fract()).fract()
    }
}

fn fract(val: Vec2) -> Vec2 {
    let val = val - val.floor();

    // `x - floor(x)` can round up to 1.0 for tiny negative numbers
    vec2(
        if val.x >= 1.0 { 0.0 } else { val.x },
        if val.y >= 1.0 { 0.0 } else { val.y },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_in_range() {
        for frame in 0..8 {
            let noise = BlueNoise::new(uvec2(3, 7), frame);

            for nth in 0..16 {
                let a = noise.first_sample(nth);
                let b = noise.second_sample(nth);

                assert!(a.x >= 0.0 && a.x < 1.0 && a.y >= 0.0 && a.y < 1.0);
                assert!(b.x >= 0.0 && b.x < 1.0 && b.y >= 0.0 && b.y < 1.0);
            }
        }
    }

    #[test]
    fn samples_are_stratified() {
        let noise = BlueNoise::new(uvec2(3, 7), 5);
        let mut buckets = [0; 4];

        for nth in 0..64 {
            buckets[(noise.first_sample(nth).x * 4.0) as usize] += 1;
        }

        for bucket in buckets {
            assert!((12..=20).contains(&bucket), "buckets = {buckets:?}");
        }
    }

    #[test]
    fn determinism() {
        let a = BlueNoise::new(uvec2(3, 7), 5);
        let b = BlueNoise::new(uvec2(3, 7), 5);

        assert_eq!(a.first_sample(3), b.first_sample(3));
        assert_eq!(a.second_sample(3), b.second_sample(3));
    }
}
