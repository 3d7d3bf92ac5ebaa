use manylights_gpu::prelude::*;

use crate::light_sampling::shading_tier;

/// Zeroes lighting of given tiles; run for empty tiles, and for all tiles
/// when sampling is disabled.
#[spirv(compute(threads(8, 8)))]
pub fn clear(
    #[spirv(workgroup_id)] workgroup_id: UVec3,
    #[spirv(local_invocation_id)] local_id: UVec3,
    #[spirv(push_constant)] params: &TilePassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 1, storage_buffer)] tile_data: &[u32],
    #[spirv(descriptor_set = 0, binding = 2)] resolved_diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] resolved_specular: TexRgba32,
) {
    let ds_size = camera.downsampled_size();
    let tile_data = TileData::new(tile_data, tile_count(ds_size));
    let screen_pos =
        tile_data.pixel(params.tile_type(), workgroup_id, local_id);

    if !camera.contains_downsampled(screen_pos) {
        return;
    }

    TexRgba::new(resolved_diffuse, ds_size).write(screen_pos, Vec4::ZERO);
    TexRgba::new(resolved_specular, ds_size).write(screen_pos, Vec4::ZERO);
}

#[spirv(compute(threads(8, 8)))]
pub fn shade_simple(
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
    #[spirv(descriptor_set = 0, binding = 8)] resolved_diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 9)] resolved_specular: TexRgba32,
) {
    shade::<0>(
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
        resolved_diffuse,
        resolved_specular,
    );
}

#[spirv(compute(threads(8, 8)))]
pub fn shade_complex(
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
    #[spirv(descriptor_set = 0, binding = 8)] resolved_diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 9)] resolved_specular: TexRgba32,
) {
    shade::<1>(
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
        resolved_diffuse,
        resolved_specular,
    );
}

/// Resolves light samples of a single downsampled pixel into its diffuse and
/// specular lighting.
///
/// Diffuse lighting is demodulated (i.e. it doesn't include surface's diffuse
/// color), so that it can be denoised without blurring textures; specular
/// lighting is stored as-is.
fn shade<const TILE_TYPE: u32>(
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
    resolved_diffuse: TexRgba32,
    resolved_specular: TexRgba32,
) {
    let tile_type = TileType::new(TILE_TYPE);
    let ds_size = camera.downsampled_size();
    let tile_data = TileData::new(tile_data, tile_count(ds_size));
    let screen_pos = tile_data.pixel(tile_type, workgroup_id, local_id);

    if !camera.contains_downsampled(screen_pos) {
        return;
    }

    let surface_map = SurfaceMap::new(TexRgba::new(surface_map, ds_size));
    let resolved_diffuse = TexRgba::new(resolved_diffuse, ds_size);
    let resolved_specular = TexRgba::new(resolved_specular, ds_size);

    if !surface_map.get(screen_pos).is_some() {
        resolved_diffuse.write(screen_pos, Vec4::ZERO);
        resolved_specular.write(screen_pos, Vec4::ZERO);
        return;
    }

    let gbuffer = GBufferView::new(
        TexRgba::new(gbuffer_d0, camera.screen_size()),
        TexRgba::new(gbuffer_d1, camera.screen_size()),
    );

    let lights = LightsView::new(lights, frame.lights_count);

    let light_samples = LightSamplesView::new(
        TexRgba::new(light_samples, frame.light_samples_size(ds_size)),
        frame.samples_per_pixel_2d(),
    );

    // -------------------------------------------------------------------------

    let full_res_pos = surface_map.full_res_pos(screen_pos);
    let hit = Hit::new(camera.ray(full_res_pos), gbuffer.get(full_res_pos));
    let bnoise = BlueNoise::new(screen_pos, frame.frame);
    let tier = shading_tier(tile_type);

    let mut diffuse = Vec3::ZERO;
    let mut specular = Vec3::ZERO;

    for nth in 0..frame.samples_per_pixel() {
        let sample = light_samples.get(screen_pos, nth);

        if !sample.is_some() || !sample.is_visible {
            continue;
        }

        let light = lights.get(sample.light_id());
        let light_point =
            light.sample_point(bnoise.second_sample(nth), hit.point);

        let contribution = light.contribution(&hit, light_point, tier);

        diffuse += contribution.diffuse * sample.weight;
        specular += contribution.specular * sample.weight;
    }

    // -------------------------------------------------------------------------

    resolved_diffuse.write(screen_pos, diffuse.sanitize().extend(0.0));
    resolved_specular.write(screen_pos, specular.sanitize().extend(0.0));
}
