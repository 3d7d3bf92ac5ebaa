use manylights_gpu::prelude::*;

/// Full-resolution tiles without any lit surface: resets their history.
///
/// Depth is still written, so that once such a tile becomes lit, the
/// accumulation has something to reproject against.
#[spirv(compute(threads(8, 8)))]
pub fn clear(
    #[spirv(workgroup_id)] workgroup_id: UVec3,
    #[spirv(local_invocation_id)] local_id: UVec3,
    #[spirv(push_constant)] params: &TemporalAccumulationPassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 1)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3, storage_buffer)] tile_data: &[u32],
    #[spirv(descriptor_set = 0, binding = 4)] out_diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 5)] out_specular: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 6)] out_frames: TexR32,
    #[spirv(descriptor_set = 0, binding = 7)] out_depth: TexR32,
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

    let output = LightingHistory {
        diffuse: TexRgba::new(out_diffuse, size),
        specular: TexRgba::new(out_specular, size),
        frames: TexR::new(out_frames, size),
        depth: TexR::new(out_depth, size),
    };

    output.diffuse.write(screen_pos, Vec4::ZERO);
    output.specular.write(screen_pos, Vec4::ZERO);
    output.frames.write(screen_pos, 0.0);
    output.depth.write(screen_pos, gbuffer.depth(screen_pos));
}

/// Accumulates lighting of pixels without any history (e.g. right after a
/// camera cut).
#[spirv(compute(threads(8, 8)))]
pub fn cold(
    #[spirv(workgroup_id)] workgroup_id: UVec3,
    #[spirv(local_invocation_id)] local_id: UVec3,
    #[spirv(push_constant)] params: &TemporalAccumulationPassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 1)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3, storage_buffer)] tile_data: &[u32],
    #[spirv(descriptor_set = 0, binding = 4)] upsample_weights: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 5)] resolved_diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 6)] resolved_specular: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 7)] out_diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 8)] out_specular: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 9)] out_frames: TexR32,
    #[spirv(descriptor_set = 0, binding = 10)] out_depth: TexR32,
) {
    let size = camera.screen_size();

    let output = LightingHistory {
        diffuse: TexRgba::new(out_diffuse, size),
        specular: TexRgba::new(out_specular, size),
        frames: TexR::new(out_frames, size),
        depth: TexR::new(out_depth, size),
    };

    accumulate(
        workgroup_id,
        local_id,
        params,
        camera,
        gbuffer_d0,
        gbuffer_d1,
        tile_data,
        upsample_weights,
        resolved_diffuse,
        resolved_specular,
        false,
        output,
        output,
    );
}

/// Accumulates lighting of pixels, blending it with the reprojected history.
#[spirv(compute(threads(8, 8)))]
pub fn warm(
    #[spirv(workgroup_id)] workgroup_id: UVec3,
    #[spirv(local_invocation_id)] local_id: UVec3,
    #[spirv(push_constant)] params: &TemporalAccumulationPassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 1)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3, storage_buffer)] tile_data: &[u32],
    #[spirv(descriptor_set = 0, binding = 4)] upsample_weights: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 5)] resolved_diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 6)] resolved_specular: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 7)] out_diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 8)] out_specular: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 9)] out_frames: TexR32,
    #[spirv(descriptor_set = 0, binding = 10)] out_depth: TexR32,
    #[spirv(descriptor_set = 0, binding = 11)] prev_diffuse: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 12)] prev_specular: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 13)] prev_frames: TexR32,
    #[spirv(descriptor_set = 0, binding = 14)] prev_depth: TexR32,
) {
    let size = camera.screen_size();
    let prev_size = camera.prev_screen_size();

    let output = LightingHistory {
        diffuse: TexRgba::new(out_diffuse, size),
        specular: TexRgba::new(out_specular, size),
        frames: TexR::new(out_frames, size),
        depth: TexR::new(out_depth, size),
    };

    let history = LightingHistory {
        diffuse: TexRgba::new(prev_diffuse, prev_size),
        specular: TexRgba::new(prev_specular, prev_size),
        frames: TexR::new(prev_frames, prev_size),
        depth: TexR::new(prev_depth, prev_size),
    };

    accumulate(
        workgroup_id,
        local_id,
        params,
        camera,
        gbuffer_d0,
        gbuffer_d1,
        tile_data,
        upsample_weights,
        resolved_diffuse,
        resolved_specular,
        true,
        history,
        output,
    );
}

/// Accumulates lighting of a single pixel; `history` is only read when
/// `has_history` is set.
fn accumulate(
    workgroup_id: UVec3,
    local_id: UVec3,
    params: &TemporalAccumulationPassParams,
    camera: &Camera,
    gbuffer_d0: TexRgba32,
    gbuffer_d1: TexRgba32,
    tile_data: &[u32],
    upsample_weights: TexRgba32,
    resolved_diffuse: TexRgba32,
    resolved_specular: TexRgba32,
    has_history: bool,
    history: LightingHistory,
    output: LightingHistory,
) {
    let size = camera.screen_size();
    let ds_size = camera.downsampled_size();
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

    let upsample_weights = TexRgba::new(upsample_weights, size);
    let resolved_diffuse = TexRgba::new(resolved_diffuse, ds_size);
    let resolved_specular = TexRgba::new(resolved_specular, ds_size);

    let depth = gbuffer.depth(screen_pos);

    output.depth.write(screen_pos, depth);

    if depth <= 0.0 {
        output.diffuse.write(screen_pos, Vec4::ZERO);
        output.specular.write(screen_pos, Vec4::ZERO);
        output.frames.write(screen_pos, 0.0);
        return;
    }

    // -------------------------------------------------------------------------

    let upsample = |tex: TexRgba, pos: UVec2| {
        UpsampleWeights::apply(pos, upsample_weights.read(pos), tex).xyz()
    };

    let curr_diffuse = upsample(resolved_diffuse, screen_pos);
    let curr_specular = upsample(resolved_specular, screen_pos);

    let mut diffuse_nbhood = Neighborhood::default();
    let mut specular_nbhood = Neighborhood::default();

    for dy in -1..=1 {
        for dx in -1..=1 {
            let pos = screen_pos.as_ivec2() + ivec2(dx, dy);

            if !camera.contains(pos) {
                continue;
            }

            let pos = pos.as_uvec2();

            if gbuffer.depth(pos) <= 0.0 {
                continue;
            }

            diffuse_nbhood.add(upsample(resolved_diffuse, pos));
            specular_nbhood.add(upsample(resolved_specular, pos));
        }
    }

    // -------------------------------------------------------------------------

    let reprojection = if has_history {
        Reprojection::find(camera, screen_pos, depth, history.depth)
    } else {
        Reprojection::default()
    };

    let (diffuse, specular, frames) =
        if reprojection.is_some() {
            let correction = camera.pre_exposure_correction();

            let correction =
                vec4(correction, correction, correction, correction.sqr());

            let prev_diffuse =
                BilinearFilter::reproject(&reprojection, |pos| {
                    history.diffuse.read(pos)
                }) * correction;

            let prev_specular =
                BilinearFilter::reproject(&reprojection, |pos| {
                    history.specular.read(pos)
                }) * correction;

            let prev_frames = BilinearFilter::reproject(&reprojection, |pos| {
                Vec4::splat(history.frames.read(pos))
            })
            .x;

            let frames = (prev_frames.round() + 1.0)
                .min(params.max_frames_accumulated)
                .max(1.0);

            let alpha = 1.0 / frames;

            let blend = |prev: Vec4, nbhood: &Neighborhood, curr: Vec3| {
                let prev_rgb =
                    nbhood.clamp(prev.xyz(), curr, params.neighborhood_clamp_scale);

                lerp(prev_rgb, curr, alpha)
                    .extend(lerp(prev.w, curr.luma().sqr(), alpha))
            };

            (
                blend(prev_diffuse, &diffuse_nbhood, curr_diffuse),
                blend(prev_specular, &specular_nbhood, curr_specular),
                frames,
            )
        } else {
            // Without history, variance has to be estimated spatially
            let bootstrap = |nbhood: &Neighborhood, curr: Vec3| {
                let moment = if nbhood.is_empty() {
                    curr.luma().sqr()
                } else {
                    nbhood.second_moment()
                };

                curr.extend(moment)
            };

            (
                bootstrap(&diffuse_nbhood, curr_diffuse),
                bootstrap(&specular_nbhood, curr_specular),
                1.0,
            )
        };

    // -------------------------------------------------------------------------

    output.diffuse.write(screen_pos, sanitize(diffuse));
    output.specular.write(screen_pos, sanitize(specular));
    output.frames.write(screen_pos, frames);
}

fn sanitize(val: Vec4) -> Vec4 {
    val.xyz().sanitize().extend(val.w.sanitize())
}
