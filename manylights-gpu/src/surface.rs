use glam::{uvec2, vec4, UVec2, Vec3, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{Normal, TexRgba, DOWNSAMPLE_FACTOR};

#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Surface {
    pub normal: Vec3,
    pub depth: f32,
}

impl Surface {
    /// How quickly similarity falls off with the relative depth difference.
    const DEPTH_SCALE: f32 = 32.0;

    pub fn is_some(&self) -> bool {
        self.depth > 0.0
    }

    /// Returns a score `<0.0, 1.0>` that determines the similarity of two given
    /// surfaces.
    pub fn evaluate_similarity_to(&self, other: &Self) -> f32 {
        if !self.is_some() || !other.is_some() {
            return 0.0;
        }

        let normal_score = self.normal.dot(other.normal).max(0.0);
        let depth_diff = (self.depth - other.depth).abs() / self.depth;
        let depth_score = (-depth_diff * Self::DEPTH_SCALE).exp();

        normal_score * depth_score
    }
}

/// Downsampled snapshot of the G-buffer's geometry.
///
/// Each texel stores the surface of one full-resolution pixel picked out of
/// the 2x2 block it covers, together with which one it was, so that later
/// passes can reach that pixel's material.
#[derive(Clone, Copy)]
pub struct SurfaceMap<'a> {
    tex: TexRgba<'a>,
}

impl<'a> SurfaceMap<'a> {
    pub fn new(tex: TexRgba<'a>) -> Self {
        Self { tex }
    }

    pub fn size(&self) -> UVec2 {
        self.tex.size()
    }

    pub fn get(&self, screen_pos: UVec2) -> Surface {
        let d0 = self.tex.read(screen_pos);

        Surface {
            normal: Normal::decode(d0.xy()),
            depth: d0.z,
        }
    }

    /// Returns offset (within its 2x2 block) of the full-resolution pixel
    /// given texel was captured from.
    pub fn pick(&self, screen_pos: UVec2) -> UVec2 {
        let pick = self.tex.read(screen_pos).w.to_bits();

        uvec2(pick & 1, pick >> 1)
    }

    /// Returns the full-resolution pixel given texel was captured from.
    pub fn full_res_pos(&self, screen_pos: UVec2) -> UVec2 {
        screen_pos * DOWNSAMPLE_FACTOR + self.pick(screen_pos)
    }

    pub fn set(&self, screen_pos: UVec2, surface: Surface, pick: UVec2) {
        let normal = Normal::encode(if surface.is_some() {
            surface.normal
        } else {
            Vec3::Z
        });

        self.tex.write(
            screen_pos,
            vec4(
                normal.x,
                normal.y,
                surface.depth,
                f32::from_bits(pick.x | (pick.y << 1)),
            ),
        );
    }

    pub fn clear(&self, screen_pos: UVec2) {
        self.set(screen_pos, Surface::default(), UVec2::ZERO);
    }
}
