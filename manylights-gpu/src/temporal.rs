use glam::{Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{rgb_to_ycocg, ycocg_to_rgb, TexR, TexRgba, Vec3Ext};

/// Textures produced by the temporal accumulation; they are written in one
/// frame and read back as history in the next one.
///
/// Lighting textures keep their luminance's second moment in the alpha
/// channel.
#[derive(Clone, Copy)]
pub struct LightingHistory<'a> {
    pub diffuse: TexRgba<'a>,
    pub specular: TexRgba<'a>,
    pub frames: TexR<'a>,
    pub depth: TexR<'a>,
}

/// Statistics of the current frame's lighting around a pixel; used to reject
/// stale history and to bootstrap variance of pixels without one.
#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Neighborhood {
    sum: Vec3,
    sum_sq: Vec3,
    luma_sq: f32,
    count: f32,
}

impl Neighborhood {
    pub fn add(&mut self, rgb: Vec3) {
        let ycocg = rgb_to_ycocg(rgb);

        self.sum += ycocg;
        self.sum_sq += ycocg * ycocg;
        self.luma_sq += rgb.luma() * rgb.luma();
        self.count += 1.0;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0.0
    }

    /// Mean in YCoCg space.
    pub fn mean(&self) -> Vec3 {
        self.sum / self.count.max(1.0)
    }

    /// Standard deviation in YCoCg space.
    pub fn std_dev(&self) -> Vec3 {
        let mean = self.mean();

        let variance =
            (self.sum_sq / self.count.max(1.0) - mean * mean).max(Vec3::ZERO);

        Vec3::new(variance.x.sqrt(), variance.y.sqrt(), variance.z.sqrt())
    }

    /// Second moment of luminance.
    pub fn second_moment(&self) -> f32 {
        self.luma_sq / self.count.max(1.0)
    }

    /// Pulls `history` into the `mean ± scale * std_dev` box, extended so
    /// that it always contains `current`.
    pub fn clamp(&self, history: Vec3, current: Vec3, scale: f32) -> Vec3 {
        if self.is_empty() {
            return history;
        }

        let mean = self.mean();
        let extent = self.std_dev() * scale;
        let current = rgb_to_ycocg(current);
        let min = (mean - extent).min(current);
        let max = (mean + extent).max(current);

        ycocg_to_rgb(rgb_to_ycocg(history).clamp(min, max)).max(Vec3::ZERO)
    }
}

/// Returns variance of luminance, given lighting with its second moment
/// stored in the alpha channel.
pub fn luma_variance(moment: Vec4) -> f32 {
    (moment.w - moment.xyz().luma().powi(2)).max(0.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn clamp() {
        let mut neighborhood = Neighborhood::default();

        for _ in 0..9 {
            neighborhood.add(vec3(0.5, 0.5, 0.5));
        }

        let actual = neighborhood.clamp(Vec3::splat(10.0), Vec3::splat(0.5), 2.0);

        assert_relative_eq!(0.5, actual.x, epsilon = 0.0001);
        assert_relative_eq!(0.5, actual.y, epsilon = 0.0001);
        assert_relative_eq!(0.5, actual.z, epsilon = 0.0001);

        // Current sample extends the box
        let actual = neighborhood.clamp(Vec3::splat(10.0), Vec3::splat(2.0), 2.0);

        assert_relative_eq!(2.0, actual.x, epsilon = 0.0001);

        // History within the box is left intact
        let actual = neighborhood.clamp(Vec3::splat(0.75), Vec3::splat(1.0), 2.0);

        assert_relative_eq!(0.75, actual.x, epsilon = 0.0001);
    }

    #[test]
    fn statistics() {
        let mut neighborhood = Neighborhood::default();

        neighborhood.add(Vec3::splat(1.0));
        neighborhood.add(Vec3::splat(3.0));

        assert_relative_eq!(2.0, neighborhood.mean().x, epsilon = 0.0001);
        assert_relative_eq!(1.0, neighborhood.std_dev().x, epsilon = 0.0001);
        assert_relative_eq!(5.0, neighborhood.second_moment(), epsilon = 0.0001);
    }

    #[test]
    fn variance() {
        assert_relative_eq!(0.0, luma_variance(Vec4::new(1.0, 1.0, 1.0, 1.0)), epsilon = 0.0001);
        assert_relative_eq!(1.0, luma_variance(Vec4::new(1.0, 1.0, 1.0, 2.0)), epsilon = 0.0001);
        assert_eq!(0.0, luma_variance(Vec4::new(1.0, 1.0, 1.0, 0.5)));
    }
}
