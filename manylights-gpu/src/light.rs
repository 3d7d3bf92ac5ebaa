use core::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::{vec2, vec4, Vec2, Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{Brdf, F32Ext, Hit, Normal, ShadingTier, Vec3Ext};

#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Light {
    /// x - position x
    /// y - position y
    /// z - position z
    /// w - radius
    pub d0: Vec4,

    /// x - color r
    /// y - color g
    /// z - color b
    /// w - range
    pub d1: Vec4,

    /// x - (as u32) light type: 0 - point light, 1 - spot light
    /// y - if it's a spot light: direction
    /// z - if it's a spot light: direction
    /// w - if it's a spot light: angle
    pub d2: Vec4,
}

impl Light {
    pub const TYPE_POINT: u32 = 0;
    pub const TYPE_SPOT: u32 = 1;

    /// Creates a point light; `color` is expected to be premultiplied by the
    /// light's intensity.
    pub fn point(center: Vec3, radius: f32, color: Vec3, range: f32) -> Self {
        Self {
            d0: center.extend(radius.max(0.0)),
            d1: color.extend(range),
            d2: vec4(f32::from_bits(Self::TYPE_POINT), 0.0, 0.0, 0.0),
        }
    }

    /// Creates a spot light shining towards `direction`, with `angle` being
    /// the outer cone's half-angle (in radians).
    pub fn spot(
        center: Vec3,
        radius: f32,
        color: Vec3,
        range: f32,
        direction: Vec3,
        angle: f32,
    ) -> Self {
        let Vec2 { x: dir_x, y: dir_y } = Normal::encode(direction.normalize());

        Self {
            d0: center.extend(radius.max(0.0)),
            d1: color.extend(range),
            d2: vec4(f32::from_bits(Self::TYPE_SPOT), dir_x, dir_y, angle),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn radius(&self) -> f32 {
        self.d0.w
    }

    pub fn color(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn range(&self) -> f32 {
        self.d1.w
    }

    pub fn is_point(&self) -> bool {
        self.d2.x.to_bits() == Self::TYPE_POINT
    }

    pub fn spot_direction(&self) -> Vec3 {
        Normal::decode(self.d2.yz())
    }

    pub fn spot_angle(&self) -> f32 {
        self.d2.w
    }

    /// Returns whether this light can contribute anything to given point,
    /// ignoring occlusion and surface orientation.
    pub fn influences(&self, point: Vec3) -> bool {
        self.attenuation(point) > 0.0
    }

    /// Returns the distance- and cone-attenuation of this light at given
    /// point.
    pub fn attenuation(&self, point: Vec3) -> f32 {
        fn distance_attenuation(
            distance_square: f32,
            inverse_range_squared: f32,
        ) -> f32 {
            let factor = distance_square * inverse_range_squared;
            let smooth_factor = (1.0 - factor * factor).saturate();
            let attenuation = smooth_factor * smooth_factor;

            attenuation / distance_square.max(0.0001)
        }

        if self.range() <= 0.0 {
            return 0.0;
        }

        let cone_factor = if self.is_point() {
            1.0
        } else {
            let angle = self
                .spot_direction()
                .angle_between(point - self.center());

            (1.0 - (angle / self.spot_angle()).powf(3.0)).saturate()
        };

        if cone_factor < 0.001 {
            return 0.0;
        }

        cone_factor
            * distance_attenuation(
                (self.center() - point).length_squared(),
                1.0 / self.range().sqr(),
            )
    }

    /// Returns the unnormalized probability of sampling this light for given
    /// hit point.
    ///
    /// The estimate is conservative: it's positive wherever
    /// [`Self::contribution()`] can be positive, so sampling proportionally to
    /// it stays unbiased.
    pub fn importance(&self, hit: &Hit, tier: ShadingTier) -> f32 {
        let attenuation = self.attenuation(hit.point);

        if attenuation <= 0.0 {
            return 0.0;
        }

        let to_light = self.center() - hit.point;
        let distance = to_light.length().max(0.0001);
        let l = to_light / distance;

        // Spherical lights can be partially visible even when their center is
        // below the horizon
        let sin_theta = (self.radius() / distance).min(1.0);
        let n_o_l = (hit.normal().dot(l) + sin_theta).saturate();

        if n_o_l <= 0.0 {
            return 0.0;
        }

        let mut importance = self.color().luma() * attenuation * n_o_l;

        if let ShadingTier::Complex = tier {
            let lobe = Brdf::new(&hit.gbuffer).specular_lobe(
                l,
                hit.view_dir(),
                hit.normal(),
            );

            importance *= 1.0 + lobe.min(4.0) * hit.gbuffer.specular_color().luma();
        }

        importance.sanitize()
    }

    /// Picks a point on this light's surface, as seen from `from`.
    ///
    /// `sample` is expected to be uniformly distributed over `<0.0, 1.0)^2`;
    /// the same sample always yields the same point.
    pub fn sample_point(&self, sample: Vec2, from: Vec3) -> Vec3 {
        let to_light = self.center() - from;
        let light_distance = to_light.length();

        if self.radius() <= 0.0 || light_distance <= self.radius() {
            return self.center();
        }

        let light_dir = to_light / light_distance;
        let light_radius = self.radius() / light_distance;
        let (light_tangent, light_bitangent) = light_dir.any_orthonormal_pair();

        let disk_point = {
            let angle = 2.0 * PI * sample.x;
            let radius = sample.y.sqrt();

            vec2(angle.sin(), angle.cos()) * radius * light_radius
        };

        let dir = light_dir
            + disk_point.x * light_tangent
            + disk_point.y * light_bitangent;

        from + dir.normalize() * light_distance
    }

    /// Returns contribution of this light on given hit point, assuming light
    /// arrives from `light_point`.
    ///
    /// Note that this function doesn't perform visibility check; diffuse part
    /// is demodulated (see: [`crate::BrdfValue`]).
    pub fn contribution(
        &self,
        hit: &Hit,
        light_point: Vec3,
        tier: ShadingTier,
    ) -> LightContribution {
        let attenuation = self.attenuation(hit.point);

        if attenuation <= 0.0 {
            return Default::default();
        }

        let n = hit.normal();
        let v = hit.view_dir();
        let l = (light_point - hit.point).normalize_or_zero();
        let n_o_l = n.dot(l);

        if n_o_l <= 0.0 {
            return Default::default();
        }

        let brdf = Brdf::new(&hit.gbuffer).eval(tier, l, v, n);
        let radiance = self.color() * attenuation * n_o_l;

        LightContribution {
            diffuse: (radiance * brdf.diffuse).sanitize(),
            specular: (radiance * brdf.specular).sanitize(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightId(u32);

impl LightId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct LightContribution {
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightContribution {
    pub fn sum(&self) -> Vec3 {
        self.diffuse + self.specular
    }
}
