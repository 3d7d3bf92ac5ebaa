use crate::{BlueNoise, Hit, LightId, LightSample, LightsView, ShadingTier};

/// Picks lights proportionally to their estimated contribution.
///
/// Lights are laid out on a CDF and the `<0.0, 1.0)` range is split into as
/// many strata as there are samples to draw; each stratum gets one jittered
/// point, so a light with a large share of the total weight is picked several
/// times while dim lights are picked occasionally.
#[derive(Clone, Copy)]
pub struct LightSampler<'a> {
    lights: LightsView<'a>,
    min_weight: f32,
    tier: ShadingTier,
}

impl<'a> LightSampler<'a> {
    pub fn new(lights: LightsView<'a>, min_weight: f32, tier: ShadingTier) -> Self {
        Self {
            lights,
            min_weight,
            tier,
        }
    }

    /// Draws `count` samples for given hit point, calling `emit` for each one
    /// of them (in order, with `nth` going from zero to `count - 1`).
    ///
    /// When there's no light worth sampling, all samples are
    /// [`LightSample::none()`].
    pub fn sample(
        &self,
        hit: &Hit,
        bnoise: &BlueNoise,
        count: u32,
        mut emit: impl FnMut(u32, LightSample),
    ) {
        let mut total = 0.0;

        for light_idx in 0..self.lights.len() {
            let light = self.lights.get(LightId::new(light_idx));

            total += self.weight(light.importance(hit, self.tier));
        }

        if count == 0 || total <= 0.0 || !total.is_finite() {
            for nth in 0..count {
                emit(nth, LightSample::none());
            }

            return;
        }

        let stratum = |nth: u32| {
            (nth as f32 + bnoise.first_sample(nth).x) / (count as f32) * total
        };

        let mut nth = 0;
        let mut target = stratum(nth);
        let mut cdf = 0.0;
        let mut last = None;

        for light_idx in 0..self.lights.len() {
            let light_id = LightId::new(light_idx);
            let light = self.lights.get(light_id);
            let weight = self.weight(light.importance(hit, self.tier));

            if weight <= 0.0 {
                continue;
            }

            cdf += weight;
            last = Some((light_id, weight));

            while nth < count && target < cdf {
                emit(
                    nth,
                    LightSample::new(light_id, total / (count as f32 * weight)),
                );

                nth += 1;
                target = stratum(nth);
            }
        }

        // Strata that fell past the CDF's end due to rounding errors
        if let Some((light_id, weight)) = last {
            while nth < count {
                emit(
                    nth,
                    LightSample::new(light_id, total / (count as f32 * weight)),
                );

                nth += 1;
            }
        }
    }

    fn weight(&self, importance: f32) -> f32 {
        if importance < self.min_weight {
            0.0
        } else {
            importance
        }
    }
}
