#[cfg(not(target_arch = "spirv"))]
use core::cell::Cell;

use glam::{IVec2, UVec2, Vec4};
#[cfg(target_arch = "spirv")]
use glam::vec4;
#[cfg(target_arch = "spirv")]
use spirv_std::Image;

#[cfg(target_arch = "spirv")]
pub type ImageRgba32 = Image!(2D, format = rgba32f, sampled = false);

#[cfg(target_arch = "spirv")]
pub type ImageR32 = Image!(2D, format = r32f, sampled = false);

/// Outside of the GPU, storage images are row-major texel arrays; that's what
/// the reference executor binds when kernels are run on the CPU.
#[cfg(not(target_arch = "spirv"))]
pub type ImageRgba32 = [Cell<Vec4>];

#[cfg(not(target_arch = "spirv"))]
pub type ImageR32 = [Cell<f32>];

pub type TexRgba32<'a> = &'a ImageRgba32;
pub type TexR32<'a> = &'a ImageR32;

/// Value stored in a single texel of a storage image.
pub trait Texel: Copy {
    type Image: ?Sized;

    fn load(image: &Self::Image, pos: UVec2, width: u32) -> Self;
    fn store(image: &Self::Image, pos: UVec2, width: u32, value: Self);
}

#[cfg(target_arch = "spirv")]
impl Texel for Vec4 {
    type Image = ImageRgba32;

    fn load(image: &Self::Image, pos: UVec2, _: u32) -> Self {
        image.read(pos)
    }

    fn store(image: &Self::Image, pos: UVec2, _: u32, value: Self) {
        unsafe {
            image.write(pos, value);
        }
    }
}

#[cfg(target_arch = "spirv")]
impl Texel for f32 {
    type Image = ImageR32;

    fn load(image: &Self::Image, pos: UVec2, _: u32) -> Self {
        let texel: f32 = image.read(pos);

        texel
    }

    fn store(image: &Self::Image, pos: UVec2, _: u32, value: Self) {
        unsafe {
            image.write(pos, vec4(value, 0.0, 0.0, 0.0));
        }
    }
}

#[cfg(not(target_arch = "spirv"))]
impl Texel for Vec4 {
    type Image = ImageRgba32;

    fn load(image: &Self::Image, pos: UVec2, width: u32) -> Self {
        image[idx(pos, width)].get()
    }

    fn store(image: &Self::Image, pos: UVec2, width: u32, value: Self) {
        image[idx(pos, width)].set(value);
    }
}

#[cfg(not(target_arch = "spirv"))]
impl Texel for f32 {
    type Image = ImageR32;

    fn load(image: &Self::Image, pos: UVec2, width: u32) -> Self {
        image[idx(pos, width)].get()
    }

    fn store(image: &Self::Image, pos: UVec2, width: u32, value: Self) {
        image[idx(pos, width)].set(value);
    }
}

#[cfg(not(target_arch = "spirv"))]
fn idx(pos: UVec2, width: u32) -> usize {
    debug_assert!(pos.x < width, "out-of-bounds texel: {pos}");

    (pos.y as usize) * (width as usize) + (pos.x as usize)
}

/// Storage image together with its size, as seen by a kernel.
///
/// Kernels get shared views and write through them, the same way a compute
/// shader writes into a bound storage image; it's the dispatcher's job not to
/// bind the same texture as both an input and an output of a single pass.
pub struct Tex<'a, T>
where
    T: Texel,
{
    image: &'a T::Image,
    size: UVec2,
}

pub type TexRgba<'a> = Tex<'a, Vec4>;
pub type TexR<'a> = Tex<'a, f32>;

impl<'a, T> Tex<'a, T>
where
    T: Texel,
{
    pub fn new(image: &'a T::Image, size: UVec2) -> Self {
        Self { image, size }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as u32) < self.size.x
            && (pos.y as u32) < self.size.y
    }

    pub fn read(&self, pos: UVec2) -> T {
        T::load(self.image, pos, self.size.x)
    }

    pub fn write(&self, pos: UVec2, value: T) {
        T::store(self.image, pos, self.size.x, value);
    }
}

impl<T> Clone for Tex<'_, T>
where
    T: Texel,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Tex<'_, T>
where
    T: Texel,
{
    //
}
