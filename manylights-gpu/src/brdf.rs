use core::f32::consts::PI;

use glam::Vec3;
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{F32Ext, GBufferEntry};

/// Which BRDF variant a shading kernel evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadingTier {
    /// Burley diffuse + isotropic GGX specular.
    Simple,

    /// [`Self::Simple`] extended with anisotropy and a clear-coat layer.
    Complex,
}

/// BRDF evaluated for a single light direction.
///
/// Diffuse term is demodulated (i.e. it doesn't include surface's albedo),
/// so that the denoiser can work on smooth signal; albedo gets reapplied
/// during the composition.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct BrdfValue {
    pub diffuse: f32,
    pub specular: Vec3,
}

#[derive(Clone, Copy)]
pub struct Brdf<'a> {
    gbuffer: &'a GBufferEntry,
}

impl<'a> Brdf<'a> {
    pub fn new(gbuffer: &'a GBufferEntry) -> Self {
        Self { gbuffer }
    }

    pub fn eval(self, tier: ShadingTier, l: Vec3, v: Vec3, n: Vec3) -> BrdfValue {
        match tier {
            ShadingTier::Simple => self.eval_simple(l, v, n),
            ShadingTier::Complex => self.eval_complex(l, v, n),
        }
    }

    fn eval_simple(self, l: Vec3, v: Vec3, n: Vec3) -> BrdfValue {
        let dots = Dots::new(l, v, n);
        let roughness = self.gbuffer.clamped_roughness().sqr();

        let d = d_ggx(roughness, dots.n_o_h);
        let vis = v_smith_ggx_correlated(roughness, dots.n_o_v, dots.n_o_l);
        let f = fresnel(self.gbuffer.specular_color(), dots.l_o_h);

        BrdfValue {
            diffuse: self.diffuse(dots),
            specular: d * vis * f,
        }
    }

    fn eval_complex(self, l: Vec3, v: Vec3, n: Vec3) -> BrdfValue {
        let dots = Dots::new(l, v, n);
        let roughness = self.gbuffer.clamped_roughness().sqr();
        let f = fresnel(self.gbuffer.specular_color(), dots.l_o_h);

        let specular = if self.gbuffer.anisotropy == 0.0 {
            d_ggx(roughness, dots.n_o_h)
                * v_smith_ggx_correlated(roughness, dots.n_o_v, dots.n_o_l)
                * f
        } else {
            // G-buffer doesn't carry tangents, so the anisotropy direction is
            // derived from the normal alone
            let (t, b) = n.any_orthonormal_pair();
            let h = (l + v).normalize();
            let anisotropy = self.gbuffer.anisotropy;
            let at = (roughness * (1.0 + anisotropy)).max(0.001);
            let ab = (roughness * (1.0 - anisotropy)).max(0.001);

            let d = d_ggx_anisotropic(dots.n_o_h, t.dot(h), b.dot(h), at, ab);

            let vis = v_smith_ggx_correlated_anisotropic(
                at,
                ab,
                (t.dot(v), b.dot(v), dots.n_o_v),
                (t.dot(l), b.dot(l), dots.n_o_l),
            );

            d * vis * f
        };

        let mut value = BrdfValue {
            diffuse: self.diffuse(dots),
            specular,
        };

        if self.gbuffer.clear_coat > 0.0 {
            let roughness = self.gbuffer.clamped_clear_coat_roughness().sqr();
            let fc = f_schlick(0.04, 1.0, dots.l_o_h) * self.gbuffer.clear_coat;
            let dc = d_ggx(roughness, dots.n_o_h);
            let vc = v_kelemen(dots.l_o_h);

            value.diffuse *= 1.0 - fc;
            value.specular = value.specular * (1.0 - fc) + Vec3::splat(dc * vc * fc);
        }

        value
    }

    /// Returns a rough estimation of how strongly the specular lobe reflects
    /// light coming from `l`, normalized so that a perfectly diffuse response
    /// equals one.
    pub fn specular_lobe(self, l: Vec3, v: Vec3, n: Vec3) -> f32 {
        let dots = Dots::new(l, v, n);
        let roughness = self.gbuffer.clamped_roughness().sqr();

        d_ggx(roughness, dots.n_o_h) * PI
    }

    fn diffuse(self, dots: Dots) -> f32 {
        fd_burley(
            self.gbuffer.clamped_roughness(),
            dots.n_o_v,
            dots.n_o_l,
            dots.l_o_h,
        )
    }
}

#[derive(Clone, Copy)]
struct Dots {
    n_o_l: f32,
    n_o_v: f32,
    n_o_h: f32,
    l_o_h: f32,
}

impl Dots {
    fn new(l: Vec3, v: Vec3, n: Vec3) -> Self {
        let h = (l + v).normalize_or_zero();

        Self {
            n_o_l: n.dot(l).saturate(),
            n_o_v: n.dot(v).max(0.0001),
            n_o_h: n.dot(h).saturate(),
            l_o_h: l.dot(h).saturate(),
        }
    }
}

fn fd_burley(roughness: f32, n_o_v: f32, n_o_l: f32, l_o_h: f32) -> f32 {
    let f90 = 0.5 + 2.0 * roughness * l_o_h * l_o_h;
    let light_scatter = f_schlick(1.0, f90, n_o_l);
    let view_scatter = f_schlick(1.0, f90, n_o_v);

    light_scatter * view_scatter * (1.0 / PI)
}

fn d_ggx(roughness: f32, n_o_h: f32) -> f32 {
    let one_minus_noh_squared = 1.0 - n_o_h * n_o_h;
    let a = n_o_h * roughness;
    let k = roughness / (one_minus_noh_squared + a * a);

    k * k * (1.0 / PI)
}

fn d_ggx_anisotropic(n_o_h: f32, t_o_h: f32, b_o_h: f32, at: f32, ab: f32) -> f32 {
    let a2 = at * ab;
    let v = Vec3::new(ab * t_o_h, at * b_o_h, a2 * n_o_h);
    let w2 = a2 / v.dot(v);

    a2 * w2 * w2 * (1.0 / PI)
}

fn v_smith_ggx_correlated(roughness: f32, n_o_v: f32, n_o_l: f32) -> f32 {
    let a2 = roughness * roughness;
    let lambda_v = n_o_l * ((n_o_v - a2 * n_o_v) * n_o_v + a2).sqrt();
    let lambda_l = n_o_v * ((n_o_l - a2 * n_o_l) * n_o_l + a2).sqrt();

    0.5 / (lambda_v + lambda_l)
}

fn v_smith_ggx_correlated_anisotropic(
    at: f32,
    ab: f32,
    (t_o_v, b_o_v, n_o_v): (f32, f32, f32),
    (t_o_l, b_o_l, n_o_l): (f32, f32, f32),
) -> f32 {
    let lambda_v = n_o_l * Vec3::new(at * t_o_v, ab * b_o_v, n_o_v).length();
    let lambda_l = n_o_v * Vec3::new(at * t_o_l, ab * b_o_l, n_o_l).length();

    (0.5 / (lambda_v + lambda_l)).saturate()
}

fn v_kelemen(l_o_h: f32) -> f32 {
    0.25 / (l_o_h * l_o_h).max(0.0001)
}

fn fresnel(f0: Vec3, l_o_h: f32) -> Vec3 {
    let f90 = f0.dot(Vec3::splat(50.0 * 0.33)).saturate();

    f_schlick_vec(f0, f90, l_o_h)
}

fn f_schlick(f0: f32, f90: f32, v_o_h: f32) -> f32 {
    f0 + (f90 - f0) * (1.0 - v_o_h).max(0.001).powf(5.0)
}

fn f_schlick_vec(f0: Vec3, f90: f32, v_o_h: f32) -> Vec3 {
    f0 + (f90 - f0) * (1.0 - v_o_h).max(0.001).powf(5.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    fn gbuffer() -> GBufferEntry {
        GBufferEntry {
            base_color: vec3(0.8, 0.8, 0.8),
            normal: Vec3::Y,
            roughness: 0.5,
            reflectance: 0.5,
            depth: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn diffuse_is_roughly_lambertian() {
        let gbuffer = gbuffer();
        let l = vec3(0.3, 1.0, 0.0).normalize();
        let v = vec3(-0.3, 1.0, 0.0).normalize();
        let value = Brdf::new(&gbuffer).eval(ShadingTier::Simple, l, v, Vec3::Y);

        assert_relative_eq!(1.0 / PI, value.diffuse, epsilon = 0.05);
        assert!(value.specular.x > 0.0);
    }

    #[test]
    fn tiers_agree_on_simple_surfaces() {
        let gbuffer = gbuffer();
        let l = vec3(0.5, 1.0, 0.2).normalize();
        let v = vec3(-0.2, 1.0, 0.1).normalize();
        let brdf = Brdf::new(&gbuffer);

        let simple = brdf.eval(ShadingTier::Simple, l, v, Vec3::Y);
        let complex = brdf.eval(ShadingTier::Complex, l, v, Vec3::Y);

        assert_relative_eq!(simple.diffuse, complex.diffuse);
        assert_relative_eq!(simple.specular.x, complex.specular.x);
    }

    #[test]
    fn clear_coat() {
        let l = vec3(0.5, 1.0, 0.2).normalize();
        let v = vec3(-0.5, 1.0, -0.2).normalize();

        let base = gbuffer();

        let coated = GBufferEntry {
            clear_coat: 1.0,
            clear_coat_roughness: 0.1,
            ..base
        };

        let base = Brdf::new(&base).eval(ShadingTier::Complex, l, v, Vec3::Y);
        let coated = Brdf::new(&coated).eval(ShadingTier::Complex, l, v, Vec3::Y);

        assert!(coated.diffuse < base.diffuse);
        assert!(coated.specular.x > base.specular.x);
    }

    #[test]
    fn anisotropy() {
        let l = vec3(0.5, 1.0, 0.2).normalize();
        let v = vec3(-0.5, 1.0, -0.2).normalize();

        let gbuffer = GBufferEntry {
            anisotropy: 0.8,
            ..gbuffer()
        };

        let value = Brdf::new(&gbuffer).eval(ShadingTier::Complex, l, v, Vec3::Y);

        assert!(value.specular.is_finite());
        assert!(value.specular.x > 0.0);
    }
}
