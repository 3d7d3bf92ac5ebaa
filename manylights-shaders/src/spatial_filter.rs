use manylights_gpu::prelude::*;

/// Denoises accumulated lighting and composites it into the scene color.
#[spirv(compute(threads(8, 8)))]
pub fn filter(
    #[spirv(workgroup_id)] workgroup_id: UVec3,
    #[spirv(local_invocation_id)] local_id: UVec3,
    #[spirv(push_constant)] params: &SpatialFilterPassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] frame: &FrameParams,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4, storage_buffer)] tile_data: &[u32],
    #[spirv(descriptor_set = 0, binding = 5)] diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 6)] specular: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 7)] scene_color: TexRgba32,
) {
    main::<true>(
        workgroup_id,
        local_id,
        params,
        frame,
        camera,
        gbuffer_d0,
        gbuffer_d1,
        tile_data,
        diffuse,
        specular,
        scene_color,
    );
}

/// Composites accumulated lighting into the scene color as-is.
#[spirv(compute(threads(8, 8)))]
pub fn pass_through(
    #[spirv(workgroup_id)] workgroup_id: UVec3,
    #[spirv(local_invocation_id)] local_id: UVec3,
    #[spirv(push_constant)] params: &SpatialFilterPassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] frame: &FrameParams,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4, storage_buffer)] tile_data: &[u32],
    #[spirv(descriptor_set = 0, binding = 5)] diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 6)] specular: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 7)] scene_color: TexRgba32,
) {
    main::<false>(
        workgroup_id,
        local_id,
        params,
        frame,
        camera,
        gbuffer_d0,
        gbuffer_d1,
        tile_data,
        diffuse,
        specular,
        scene_color,
    );
}

/// Processes a single full-resolution pixel.
///
/// With `SPATIAL_FILTER` disabled (or with an empty kernel), lighting is
/// composited as-is.
fn main<const SPATIAL_FILTER: bool>(
    workgroup_id: UVec3,
    local_id: UVec3,
    params: &SpatialFilterPassParams,
    frame: &FrameParams,
    camera: &Camera,
    gbuffer_d0: TexRgba32,
    gbuffer_d1: TexRgba32,
    tile_data: &[u32],
    diffuse: TexRgba32,
    specular: TexRgba32,
    scene_color: TexRgba32,
) {
    let size = camera.screen_size();
    let tile_data = TileData::new(tile_data, tile_count(size));
    let screen_pos =
        tile_data.pixel(params.tile_type(), workgroup_id, local_id);

    if !camera.contains(screen_pos.as_ivec2()) {
        return;
    }

    let gbuffer = GBufferView::new(
        TexRgba::new(gbuffer_d0, size),
        TexRgba::new(gbuffer_d1, size),
    );

    let entry = gbuffer.get(screen_pos);

    if !entry.is_some() {
        return;
    }

    let diffuse = TexRgba::new(diffuse, size);
    let specular = TexRgba::new(specular, size);
    let scene_color = TexRgba::new(scene_color, size);

    // -------------------------------------------------------------------------

    let is_enabled = SPATIAL_FILTER
        && params.num_samples > 0
        && params.kernel_radius > 0.0;

    let (filtered_diffuse, filtered_specular) = if is_enabled {
        denoise(
            screen_pos, &entry, params, frame, camera, gbuffer, diffuse,
            specular,
        )
    } else {
        (
            diffuse.read(screen_pos).xyz(),
            specular.read(screen_pos).xyz(),
        )
    };

    // -------------------------------------------------------------------------

    scene_color.write(
        screen_pos,
        composite(
            scene_color.read(screen_pos),
            filtered_diffuse,
            filtered_specular,
            entry.diffuse_color(),
        ),
    );
}

/// Adds lighting on top of the scene color, remodulating diffuse lighting
/// with surface's diffuse color.
pub fn composite(
    scene_color: Vec4,
    diffuse: Vec3,
    specular: Vec3,
    diffuse_color: Vec3,
) -> Vec4 {
    (scene_color.xyz() + diffuse * diffuse_color + specular)
        .extend(scene_color.w)
}

fn denoise(
    screen_pos: UVec2,
    entry: &GBufferEntry,
    params: &SpatialFilterPassParams,
    frame: &FrameParams,
    camera: &Camera,
    gbuffer: GBufferView,
    diffuse: TexRgba,
    specular: TexRgba,
) -> (Vec3, Vec3) {
    let center = camera.world_pos(screen_pos, entry.depth);
    let rotation = BlueNoise::new(screen_pos, frame.frame).first_sample(0).x;
    let rotation = rotation * 2.0 * PI;

    let mut sum_diffuse = diffuse.read(screen_pos).xyz();
    let mut sum_specular = specular.read(screen_pos).xyz();
    let mut sum_weight = 1.0;

    for idx in 0..params.num_samples {
        let angle = (idx as f32) * GOLDEN_ANGLE + rotation;

        let radius = params.kernel_radius
            * ((idx as f32 + 0.5) / (params.num_samples as f32)).sqrt();

        let tap = (screen_pos.as_vec2() + 0.5 + vec2(angle.cos(), angle.sin()) * radius)
            .floor()
            .as_ivec2();

        if !camera.contains(tap) {
            continue;
        }

        let tap = tap.as_uvec2();

        if tap == screen_pos {
            continue;
        }

        let tap_depth = gbuffer.depth(tap);

        if tap_depth <= 0.0 {
            continue;
        }

        let plane_distance = entry
            .normal
            .dot(camera.world_pos(tap, tap_depth) - center)
            .abs()
            / entry.depth;

        let normal_weight = entry.normal.dot(gbuffer.normal(tap)).max(0.0);

        let weight = normal_weight
            * (-plane_distance * params.depth_weight_scale).exp();

        if weight <= 0.0 {
            continue;
        }

        sum_diffuse += diffuse.read(tap).xyz() * weight;
        sum_specular += specular.read(tap).xyz() * weight;
        sum_weight += weight;
    }

    (sum_diffuse / sum_weight, sum_specular / sum_weight)
}
