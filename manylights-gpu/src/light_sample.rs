use glam::{uvec2, vec4, UVec2, Vec4};

use crate::{LightId, TexRgba};

/// Single stochastic light pick for a downsampled pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSample {
    pub light_id: u32,

    /// `1 / (N * p)`, where `N` is the number of samples per pixel and `p`
    /// is the probability of picking this light.
    pub weight: f32,

    pub is_visible: bool,
    pub is_traced: bool,

    /// How far the visibility ray got before stopping.
    pub ray_distance: f32,
}

impl LightSample {
    const FLAG_VISIBLE: u32 = 1;
    const FLAG_TRACED: u32 = 2;

    pub const NONE_ID: u32 = u32::MAX;

    pub fn new(light_id: LightId, weight: f32) -> Self {
        Self {
            light_id: light_id.get(),
            weight,
            is_visible: false,
            is_traced: false,
            ray_distance: 0.0,
        }
    }

    /// Returns a sample that contributes nothing.
    pub fn none() -> Self {
        Self {
            light_id: Self::NONE_ID,
            weight: 0.0,
            is_visible: false,
            is_traced: false,
            ray_distance: 0.0,
        }
    }

    pub fn is_some(&self) -> bool {
        self.light_id != Self::NONE_ID
    }

    pub fn light_id(&self) -> LightId {
        LightId::new(self.light_id)
    }

    pub fn serialize(&self) -> Vec4 {
        let mut flags = 0;

        if self.is_visible {
            flags |= Self::FLAG_VISIBLE;
        }

        if self.is_traced {
            flags |= Self::FLAG_TRACED;
        }

        vec4(
            f32::from_bits(self.light_id),
            self.weight,
            f32::from_bits(flags),
            self.ray_distance,
        )
    }

    pub fn deserialize(d0: Vec4) -> Self {
        let flags = d0.z.to_bits();

        Self {
            light_id: d0.x.to_bits(),
            weight: d0.y,
            is_visible: flags & Self::FLAG_VISIBLE > 0,
            is_traced: flags & Self::FLAG_TRACED > 0,
            ray_distance: d0.w,
        }
    }
}

/// Light samples texture, as seen by a kernel.
///
/// Each downsampled pixel owns a `samples_per_pixel.x * samples_per_pixel.y`
/// block of texels.
#[derive(Clone, Copy)]
pub struct LightSamplesView<'a> {
    tex: TexRgba<'a>,
    samples_per_pixel: UVec2,
}

impl<'a> LightSamplesView<'a> {
    pub fn new(tex: TexRgba<'a>, samples_per_pixel: UVec2) -> Self {
        Self {
            tex,
            samples_per_pixel,
        }
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel.x * self.samples_per_pixel.y
    }

    pub fn get(&self, screen_pos: UVec2, nth: u32) -> LightSample {
        LightSample::deserialize(self.tex.read(self.texel(screen_pos, nth)))
    }

    pub fn set(&self, screen_pos: UVec2, nth: u32, sample: LightSample) {
        self.tex.write(self.texel(screen_pos, nth), sample.serialize());
    }

    /// Maps a texel back into its pixel and sample index.
    pub fn locate(&self, texel: UVec2) -> (UVec2, u32) {
        let screen_pos = texel / self.samples_per_pixel;
        let sub = texel % self.samples_per_pixel;

        (screen_pos, sub.y * self.samples_per_pixel.x + sub.x)
    }

    fn texel(&self, screen_pos: UVec2, nth: u32) -> UVec2 {
        screen_pos * self.samples_per_pixel
            + uvec2(
                nth % self.samples_per_pixel.x,
                nth / self.samples_per_pixel.x,
            )
    }
}
