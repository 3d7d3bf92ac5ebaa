mod bilinear_filter;
mod f32_ext;
mod u32_ext;
mod vec3_ext;

use core::ops;

use glam::{vec3, Vec3};

pub use self::bilinear_filter::*;
pub use self::f32_ext::*;
pub use self::u32_ext::*;
pub use self::vec3_ext::*;

/// Atomically adds `value` to the counter, returning its previous value.
#[cfg(target_arch = "spirv")]
pub fn atomic_add(counter: &mut u32, value: u32) -> u32 {
    use spirv_std::memory::{Scope, Semantics};

    unsafe {
        spirv_std::arch::atomic_i_add::<
            u32,
            { Scope::Device as u32 },
            { Semantics::UNIFORM_MEMORY.bits() },
        >(counter, value)
    }
}

/// Atomically adds `value` to the counter, returning its previous value.
///
/// On the host, invocations of a dispatch are executed one after another, so
/// a plain addition suffices.
#[cfg(not(target_arch = "spirv"))]
pub fn atomic_add(counter: &mut u32, value: u32) -> u32 {
    let prev = *counter;

    *counter = prev.wrapping_add(value);
    prev
}

pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: ops::Add<Output = T>,
    T: ops::Sub<Output = T>,
    T: ops::Mul<f32, Output = T>,
    T: Copy,
{
    a + (b - a) * t.clamp(0.0, 1.0)
}

pub fn rgb_to_ycocg(val: Vec3) -> Vec3 {
    let co = val.x - val.z;
    let tmp = val.z + co / 2.0;
    let cg = val.y - tmp;
    let y = tmp + cg / 2.0;

    vec3(y, co, cg)
}

pub fn ycocg_to_rgb(val: Vec3) -> Vec3 {
    let tmp = val.x - val.z / 2.0;
    let g = val.z + tmp;
    let b = tmp - val.y / 2.0;
    let r = b + val.y;

    vec3(r, g, b)
}
