use manylights_gpu::prelude::*;

/// Prepares a visibility query for a single light sample (one thread per
/// texel of the light-samples texture).
///
/// The ray goes from the sample's hit point towards the very same point on
/// the light that shading is going to use later; it's traced by the scene's
/// tracer, which stores the outcome in the hits buffer.
#[spirv(compute(threads(8, 8)))]
pub fn prepare(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] frame: &FrameParams,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4, storage_buffer)] lights: &[Light],
    #[spirv(descriptor_set = 0, binding = 5)] surface_map: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 6)] light_samples: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 7, storage_buffer)]
    rays: &mut [RayQuery],
) {
    let texel = global_id.xy();
    let ds_size = camera.downsampled_size();
    let samples_size = frame.light_samples_size(ds_size);

    if texel.x >= samples_size.x || texel.y >= samples_size.y {
        return;
    }

    let ray_idx = (texel.y * samples_size.x + texel.x) as usize;
    let surface_map = SurfaceMap::new(TexRgba::new(surface_map, ds_size));

    let light_samples = LightSamplesView::new(
        TexRgba::new(light_samples, samples_size),
        frame.samples_per_pixel_2d(),
    );

    let (screen_pos, nth) = light_samples.locate(texel);

    if !camera.contains_downsampled(screen_pos) {
        rays[ray_idx] = RayQuery::unused();
        return;
    }

    let sample = light_samples.get(screen_pos, nth);

    if !sample.is_some() || !surface_map.get(screen_pos).is_some() {
        rays[ray_idx] = RayQuery::unused();
        return;
    }

    // -------------------------------------------------------------------------

    let gbuffer = GBufferView::new(
        TexRgba::new(gbuffer_d0, camera.screen_size()),
        TexRgba::new(gbuffer_d1, camera.screen_size()),
    );

    let lights = LightsView::new(lights, frame.lights_count);
    let full_res_pos = surface_map.full_res_pos(screen_pos);
    let hit = Hit::new(camera.ray(full_res_pos), gbuffer.get(full_res_pos));
    let light = lights.get(sample.light_id());
    let bnoise = BlueNoise::new(screen_pos, frame.frame);
    let light_point = light.sample_point(bnoise.second_sample(nth), hit.point);

    let to_light = light_point - hit.point;
    let distance = to_light.length();

    rays[ray_idx] = if distance <= EPSILON {
        // Surface touches the light, there's nothing that could occlude it
        RayQuery::new(Ray::new(hit.point, Vec3::ZERO), 0.0)
    } else {
        RayQuery::new(Ray::new(hit.point, to_light / distance), distance)
    };
}

/// Reads outcome of the visibility query back into its light sample.
#[spirv(compute(threads(8, 8)))]
pub fn resolve(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] frame: &FrameParams,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 2)] surface_map: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] light_samples: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4, storage_buffer)] rays: &[RayQuery],
    #[spirv(descriptor_set = 0, binding = 5, storage_buffer)] hits: &[f32],
    #[spirv(descriptor_set = 0, binding = 6, storage_buffer)]
    debug: &mut [u32],
) {
    let texel = global_id.xy();
    let ds_size = camera.downsampled_size();
    let samples_size = frame.light_samples_size(ds_size);

    if texel.x >= samples_size.x || texel.y >= samples_size.y {
        return;
    }

    let ray_idx = (texel.y * samples_size.x + texel.x) as usize;
    let surface_map = SurfaceMap::new(TexRgba::new(surface_map, ds_size));

    let light_samples = LightSamplesView::new(
        TexRgba::new(light_samples, samples_size),
        frame.samples_per_pixel_2d(),
    );

    let (screen_pos, nth) = light_samples.locate(texel);

    if !camera.contains_downsampled(screen_pos) {
        return;
    }

    let mut sample = light_samples.get(screen_pos, nth);

    if !sample.is_some() || !surface_map.get(screen_pos).is_some() {
        return;
    }

    // -------------------------------------------------------------------------

    let query = rays[ray_idx];
    let distance = query.max_distance();

    let result = if query.is_used() {
        TraceResult::deserialize(hits[ray_idx])
    } else {
        TraceResult::Miss
    };

    sample.is_visible = result.is_visible(distance);
    sample.is_traced = true;
    sample.ray_distance = result.distance(distance);

    light_samples.set(screen_pos, nth, sample);

    // -------------------------------------------------------------------------

    if frame.is_debug_downsampled_pixel(DebugMode::Tracing, screen_pos)
        && frame.is_debug_light(sample.light_id)
    {
        let ray = query.ray();

        DebugLog::new(debug).push(DebugRecord::ray(
            surface_map.full_res_pos(screen_pos),
            nth,
            sample.light_id,
            sample.is_visible,
            sample.ray_distance,
            distance,
            ray.origin(),
            ray.at(sample.ray_distance),
        ));
    }
}
