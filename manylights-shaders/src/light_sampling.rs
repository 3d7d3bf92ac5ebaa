use manylights_gpu::prelude::*;

/// Resets surfaces and samples of given tiles, so that later passes see
/// nothing to trace or shade; run for empty tiles, and for all tiles when
/// sampling is disabled.
#[spirv(compute(threads(8, 8)))]
pub fn clear(
    #[spirv(workgroup_id)] workgroup_id: UVec3,
    #[spirv(local_invocation_id)] local_id: UVec3,
    #[spirv(push_constant)] params: &TilePassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] frame: &FrameParams,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 2, storage_buffer)] tile_data: &[u32],
    #[spirv(descriptor_set = 0, binding = 3)] surface_map: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4)] light_samples: TexRgba32,
) {
    let ds_size = camera.downsampled_size();
    let tile_data = TileData::new(tile_data, tile_count(ds_size));
    let screen_pos =
        tile_data.pixel(params.tile_type(), workgroup_id, local_id);

    if !camera.contains_downsampled(screen_pos) {
        return;
    }

    let surface_map = SurfaceMap::new(TexRgba::new(surface_map, ds_size));

    let light_samples = LightSamplesView::new(
        TexRgba::new(light_samples, frame.light_samples_size(ds_size)),
        frame.samples_per_pixel_2d(),
    );

    // -------------------------------------------------------------------------

    surface_map.clear(screen_pos);

    for nth in 0..frame.samples_per_pixel() {
        light_samples.set(screen_pos, nth, LightSample::none());
    }
}

#[spirv(compute(threads(8, 8)))]
pub fn sample_simple(
    #[spirv(workgroup_id)] workgroup_id: UVec3,
    #[spirv(local_invocation_id)] local_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] frame: &FrameParams,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4, storage_buffer)] lights: &[Light],
    #[spirv(descriptor_set = 0, binding = 5, storage_buffer)] tile_data: &[u32],
    #[spirv(descriptor_set = 0, binding = 6)] surface_map: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 7)] light_samples: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 8, storage_buffer)]
    debug: &mut [u32],
) {
    sample::<0>(
        workgroup_id,
        local_id,
        frame,
        camera,
        gbuffer_d0,
        gbuffer_d1,
        lights,
        tile_data,
        surface_map,
        light_samples,
        debug,
    );
}

#[spirv(compute(threads(8, 8)))]
pub fn sample_complex(
    #[spirv(workgroup_id)] workgroup_id: UVec3,
    #[spirv(local_invocation_id)] local_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] frame: &FrameParams,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4, storage_buffer)] lights: &[Light],
    #[spirv(descriptor_set = 0, binding = 5, storage_buffer)] tile_data: &[u32],
    #[spirv(descriptor_set = 0, binding = 6)] surface_map: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 7)] light_samples: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 8, storage_buffer)]
    debug: &mut [u32],
) {
    sample::<1>(
        workgroup_id,
        local_id,
        frame,
        camera,
        gbuffer_d0,
        gbuffer_d1,
        lights,
        tile_data,
        surface_map,
        light_samples,
        debug,
    );
}

/// Generates light samples for a single downsampled pixel.
///
/// Each downsampled pixel represents one full-resolution pixel out of the
/// 2x2 block it covers; the pick is recorded in the surface map, so that
/// later passes can reconstruct the very same hit point.
fn sample<const TILE_TYPE: u32>(
    workgroup_id: UVec3,
    local_id: UVec3,
    frame: &FrameParams,
    camera: &Camera,
    gbuffer_d0: TexRgba32,
    gbuffer_d1: TexRgba32,
    lights: &[Light],
    tile_data: &[u32],
    surface_map: TexRgba32,
    light_samples: TexRgba32,
    debug: &mut [u32],
) {
    let tile_type = TileType::new(TILE_TYPE);
    let ds_size = camera.downsampled_size();
    let tile_data = TileData::new(tile_data, tile_count(ds_size));
    let screen_pos = tile_data.pixel(tile_type, workgroup_id, local_id);

    if !camera.contains_downsampled(screen_pos) {
        return;
    }

    let gbuffer = GBufferView::new(
        TexRgba::new(gbuffer_d0, camera.screen_size()),
        TexRgba::new(gbuffer_d1, camera.screen_size()),
    );

    let lights = LightsView::new(lights, frame.lights_count);
    let surface_map = SurfaceMap::new(TexRgba::new(surface_map, ds_size));

    let light_samples = LightSamplesView::new(
        TexRgba::new(light_samples, frame.light_samples_size(ds_size)),
        frame.samples_per_pixel_2d(),
    );

    let mut debug = DebugLog::new(debug);

    // -------------------------------------------------------------------------

    let Some((pick, entry)) = pick_surface(camera, gbuffer, screen_pos) else {
        surface_map.clear(screen_pos);

        for nth in 0..frame.samples_per_pixel() {
            light_samples.set(screen_pos, nth, LightSample::none());
        }

        return;
    };

    let full_res_pos = screen_pos * DOWNSAMPLE_FACTOR + pick;
    let hit = Hit::new(camera.ray(full_res_pos), entry);

    surface_map.set(screen_pos, hit.as_surface(), pick);

    // -------------------------------------------------------------------------

    let bnoise = BlueNoise::new(screen_pos, frame.frame);
    let tier = shading_tier(tile_type);

    let is_debugged =
        frame.is_debug_downsampled_pixel(DebugMode::Sampling, screen_pos);

    LightSampler::new(lights, frame.min_sample_weight, tier).sample(
        &hit,
        &bnoise,
        frame.samples_per_pixel(),
        |nth, sample| {
            light_samples.set(screen_pos, nth, sample);

            if is_debugged
                && sample.is_some()
                && frame.is_debug_light(sample.light_id)
            {
                let light = lights.get(sample.light_id());

                debug.push(DebugRecord::sample(
                    full_res_pos,
                    nth,
                    sample.light_id,
                    sample.weight,
                    hit.point,
                    light.center(),
                    light.color(),
                ));
            }
        },
    );
}

/// Returns which tier of the BRDF pixels of given tile are shaded with.
pub fn shading_tier(tile_type: TileType) -> ShadingTier {
    match tile_type {
        TileType::ComplexShading => ShadingTier::Complex,
        _ => ShadingTier::Simple,
    }
}

/// Finds the first full-resolution pixel with a surface within the 2x2 block
/// covered by given downsampled pixel.
fn pick_surface(
    camera: &Camera,
    gbuffer: GBufferView,
    screen_pos: UVec2,
) -> Option<(UVec2, GBufferEntry)> {
    for idx in 0..4 {
        let pick = uvec2(idx % 2, idx / 2);
        let full_res_pos = screen_pos * DOWNSAMPLE_FACTOR + pick;

        if !camera.contains(full_res_pos.as_ivec2()) {
            continue;
        }

        let entry = gbuffer.get(full_res_pos);

        if entry.is_some() {
            return Some((pick, entry));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    const SIZE: UVec2 = uvec2(4, 4);
    const SPP: UVec2 = uvec2(2, 1);

    struct Fixture {
        camera: Camera,
        d0: Vec<core::cell::Cell<Vec4>>,
        d1: Vec<core::cell::Cell<Vec4>>,
        surfaces: Vec<core::cell::Cell<Vec4>>,
        samples: Vec<core::cell::Cell<Vec4>>,
    }

    impl Fixture {
        fn new() -> Self {
            let camera = camera(SIZE);
            let ds_size = camera.downsampled_size();

            Self {
                camera,
                d0: cells(area(SIZE), Vec4::ZERO),
                d1: cells(area(SIZE), Vec4::ZERO),
                surfaces: cells(area(ds_size), Vec4::ZERO),
                samples: cells(area(ds_size * SPP), Vec4::ZERO),
            }
        }

        fn gbuffer(&self) -> GBufferView {
            GBufferView::new(
                TexRgba::new(&self.d0, SIZE),
                TexRgba::new(&self.d1, SIZE),
            )
        }

        fn surface_map(&self) -> SurfaceMap {
            SurfaceMap::new(self.surface_tex())
        }

        fn surface_tex(&self) -> TexRgba {
            TexRgba::new(&self.surfaces, self.camera.downsampled_size())
        }

        fn samples(&self) -> LightSamplesView {
            LightSamplesView::new(self.samples_tex(), SPP)
        }

        fn samples_tex(&self) -> TexRgba {
            TexRgba::new(&self.samples, self.camera.downsampled_size() * SPP)
        }

        fn run(&self, params: &FrameParams, lights: &[Light], debug: &mut [u32]) {
            let tiles = single_tile(TileType::SimpleShading, uvec2(0, 0));
            let (lights, params) = lights_buffer(lights, *params);

            run_tile(|workgroup_id, local_id| {
                sample_simple(
                    workgroup_id,
                    local_id,
                    &params,
                    &self.camera,
                    &self.d0,
                    &self.d1,
                    &lights,
                    &tiles,
                    &self.surfaces,
                    &self.samples,
                    debug,
                );
            });
        }
    }

    fn surface() -> GBufferEntry {
        GBufferEntry {
            normal: Vec3::Z,
            roughness: 0.5,
            depth: 10.0,
            ..Default::default()
        }
    }

    fn light() -> Light {
        Light::point(vec3(0.0, 0.0, -5.0), 0.0, Vec3::ONE, 100.0)
    }

    #[test]
    fn picks_first_pixel_with_surface() {
        let fixture = Fixture::new();

        fixture.gbuffer().set(uvec2(1, 0), surface());
        fixture.gbuffer().set(uvec2(1, 1), surface());
        fixture.run(&frame_params(SPP), &[light()], &mut debug_log());

        let surfaces = fixture.surface_map();

        assert_eq!(uvec2(1, 0), surfaces.pick(uvec2(0, 0)));
        assert_eq!(uvec2(1, 0), surfaces.full_res_pos(uvec2(0, 0)));
        assert_eq!(10.0, surfaces.get(uvec2(0, 0)).depth);
        assert!(!surfaces.get(uvec2(1, 0)).is_some());

        for nth in 0..2 {
            let sample = fixture.samples().get(uvec2(0, 0), nth);

            assert!(sample.is_some());
            assert_eq!(0, sample.light_id);
            assert_eq!(0.5, sample.weight);
            assert!(!sample.is_traced);

            assert!(!fixture.samples().get(uvec2(1, 0), nth).is_some());
        }
    }

    #[test]
    fn without_lights_all_samples_are_none() {
        let fixture = Fixture::new();

        wall(fixture.gbuffer(), SIZE, 10.0, false);
        fixture.run(&frame_params(SPP), &[], &mut debug_log());

        for y in 0..2 {
            for x in 0..2 {
                assert!(fixture.surface_map().get(uvec2(x, y)).is_some());

                for nth in 0..2 {
                    assert!(!fixture.samples().get(uvec2(x, y), nth).is_some());
                }
            }
        }
    }

    #[test]
    fn clearing() {
        let fixture = Fixture::new();
        let params = frame_params(SPP);

        wall(fixture.gbuffer(), SIZE, 10.0, false);
        fixture.run(&params, &[light()], &mut debug_log());

        assert!(fixture.samples().get(uvec2(1, 1), 1).is_some());

        let tiles = single_tile(TileType::Empty, uvec2(0, 0));

        run_tile(|workgroup_id, local_id| {
            clear(
                workgroup_id,
                local_id,
                &TilePassParams::new(TileType::Empty),
                &params,
                &fixture.camera,
                &tiles,
                &fixture.surfaces,
                &fixture.samples,
            );
        });

        for y in 0..2 {
            for x in 0..2 {
                assert!(!fixture.surface_map().get(uvec2(x, y)).is_some());

                for nth in 0..2 {
                    assert!(!fixture.samples().get(uvec2(x, y), nth).is_some());
                }
            }
        }
    }

    #[test]
    fn debug_prints() {
        let fixture = Fixture::new();
        let mut debug = debug_log();

        let params = FrameParams {
            debug_mode: DebugMode::Sampling.get(),
            debug_pixel_x: 3,
            debug_pixel_y: 2,
            ..frame_params(SPP)
        };

        wall(fixture.gbuffer(), SIZE, 10.0, false);
        fixture.run(&params, &[light()], &mut debug);

        let texts = debug_texts(&debug);

        assert_eq!(2, texts.len(), "{texts:?}");
        assert!(texts[0].starts_with("[2,2] sample #0: light=0"), "{texts:?}");
        assert!(texts[1].starts_with("[2,2] sample #1: light=0"), "{texts:?}");

        let record = DebugLog::get(&debug, 0);

        assert_eq!(light().center(), record.to);
        assert_eq!(light().color(), record.color);
    }

    #[test]
    fn shading_tiers() {
        assert_eq!(ShadingTier::Simple, shading_tier(TileType::SimpleShading));
        assert_eq!(ShadingTier::Complex, shading_tier(TileType::ComplexShading));
    }
}
