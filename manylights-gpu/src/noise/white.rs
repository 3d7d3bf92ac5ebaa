use core::f32::consts::PI;

use glam::{vec2, UVec2, Vec2};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

/// PCG-based white noise.
#[derive(Clone, Copy, Debug)]
pub struct WhiteNoise {
    state: u32,
}

impl WhiteNoise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        Self {
            state: seed
                ^ 48619u32.wrapping_mul(id.x)
                ^ 95461u32.wrapping_mul(id.y),
        }
    }

    /// Generates a uniform sample in range `<0.0, 1.0)`.
    pub fn sample(&mut self) -> f32 {
        // Top 24 bits, so that the result is exactly representable and never
        // rounds up to 1.0
        ((self.sample_int() >> 8) as f32) / ((1 << 24) as f32)
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    /// Generates a uniform sample on a circle.
    pub fn sample_circle(&mut self) -> Vec2 {
        let angle = self.sample() * PI * 2.0;

        vec2(angle.cos(), angle.sin())
    }
}

/// Mixes given values into a single, well-distributed seed.
pub fn hash(a: u32, b: u32) -> u32 {
    let mut noise = WhiteNoise::new(a, UVec2::new(b, 0));

    noise.sample_int()
}
