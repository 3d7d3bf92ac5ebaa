use glam::{vec4, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{Normal, TexRgba, U32Ext};

/// Per-pixel surface description produced by the G-buffer pass.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct GBufferEntry {
    pub base_color: Vec3,
    pub normal: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub reflectance: f32,
    pub clear_coat: f32,
    pub clear_coat_roughness: f32,
    pub anisotropy: f32,

    /// Distance from camera's origin; zero means there's no surface here (e.g.
    /// it's the sky).
    pub depth: f32,
}

impl GBufferEntry {
    pub fn unpack([d0, d1]: [Vec4; 2]) -> Self {
        let material = d0.x.to_bits().to_unorm4();
        let normal = Normal::decode(d0.yz());
        let layers = d0.w.to_bits().to_unorm4();

        Self {
            base_color: material.xyz(),
            normal,
            metallic: material.w,
            roughness: layers.x,
            reflectance: layers.y,
            clear_coat: layers.z,
            clear_coat_roughness: layers.w,
            anisotropy: d1.x,
            depth: d1.w,
        }
    }

    pub fn pack(self) -> [Vec4; 2] {
        let d0 = {
            let x = f32::from_bits(u32::from_unorm4(
                self.base_color.extend(self.metallic),
            ));

            let normal = if self.normal == Vec3::ZERO {
                Vec3::Z
            } else {
                self.normal
            };

            let Vec2 { x: y, y: z } = Normal::encode(normal);

            let w = f32::from_bits(u32::from_unorm4(vec4(
                self.roughness,
                self.reflectance,
                self.clear_coat,
                self.clear_coat_roughness,
            )));

            vec4(x, y, z, w)
        };

        let d1 = vec4(self.anisotropy.clamp(-1.0, 1.0), 0.0, 0.0, self.depth);

        [d0, d1]
    }

    pub fn is_some(&self) -> bool {
        self.depth > 0.0
    }

    /// Returns whether this surface needs the full (layered, anisotropic)
    /// BRDF; tiles containing such surfaces are shaded by the complex
    /// kernels.
    pub fn is_complex(&self) -> bool {
        self.clear_coat > 0.0 || self.anisotropy != 0.0
    }

    /// Returns the albedo diffuse lighting gets modulated with.
    pub fn diffuse_color(&self) -> Vec3 {
        self.base_color * (1.0 - self.metallic)
    }

    pub fn specular_color(&self) -> Vec3 {
        Vec3::splat(0.16 * self.reflectance * self.reflectance)
            * (1.0 - self.metallic)
            + self.base_color * self.metallic
    }

    pub fn clamped_roughness(&self) -> f32 {
        self.roughness.clamp(0.089, 1.0)
    }

    pub fn clamped_clear_coat_roughness(&self) -> f32 {
        self.clear_coat_roughness.clamp(0.089, 1.0)
    }
}

/// G-buffer textures, as seen by a kernel.
#[derive(Clone, Copy)]
pub struct GBufferView<'a> {
    pub d0: TexRgba<'a>,
    pub d1: TexRgba<'a>,
}

impl<'a> GBufferView<'a> {
    pub fn new(d0: TexRgba<'a>, d1: TexRgba<'a>) -> Self {
        Self { d0, d1 }
    }

    pub fn get(&self, screen_pos: UVec2) -> GBufferEntry {
        GBufferEntry::unpack([self.d0.read(screen_pos), self.d1.read(screen_pos)])
    }

    pub fn set(&self, screen_pos: UVec2, entry: GBufferEntry) {
        let [d0, d1] = entry.pack();

        self.d0.write(screen_pos, d0);
        self.d1.write(screen_pos, d1);
    }

    /// Returns just the depth, without unpacking the rest of the entry.
    pub fn depth(&self, screen_pos: UVec2) -> f32 {
        self.d1.read(screen_pos).w
    }

    pub fn normal(&self, screen_pos: UVec2) -> Vec3 {
        Normal::decode(self.d0.read(screen_pos).yz())
    }
}
