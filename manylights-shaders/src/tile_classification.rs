use manylights_gpu::prelude::*;

/// Classifies a single tile (one thread per tile) and appends it to the list
/// of its category.
///
/// When classifying the downsampled grid, each tile covers
/// `TILE_SIZE * DOWNSAMPLE_FACTOR` full-resolution pixels, so a downsampled
/// tile is non-empty whenever any of the full-resolution tiles it covers is.
#[spirv(compute(threads(8, 8)))]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(push_constant)] params: &TileClassificationPassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] frame: &FrameParams,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4, storage_buffer)] lights: &[Light],
    #[spirv(descriptor_set = 0, binding = 5, storage_buffer)]
    tile_allocator: &mut [u32],
    #[spirv(descriptor_set = 0, binding = 6, storage_buffer)]
    tile_data: &mut [u32],
) {
    let tile = global_id.xy();

    let (grid_size, tile_size) = if params.is_downsampled() {
        (
            tile_grid_size(camera.downsampled_size()),
            TILE_SIZE * DOWNSAMPLE_FACTOR,
        )
    } else {
        (tile_grid_size(camera.screen_size()), TILE_SIZE)
    };

    if tile.x >= grid_size.x || tile.y >= grid_size.y {
        return;
    }

    let gbuffer = GBufferView::new(
        TexRgba::new(gbuffer_d0, camera.screen_size()),
        TexRgba::new(gbuffer_d1, camera.screen_size()),
    );

    let lights = LightsView::new(lights, frame.lights_count);
    let mut tile_allocator = TileAllocator::new(tile_allocator);
    let mut tile_data =
        TileDataMut::new(tile_data, grid_size.x * grid_size.y);

    // -------------------------------------------------------------------------

    let min = tile * tile_size;
    let max = (min + tile_size).min(camera.screen_size());

    let mut has_surface = false;
    let mut is_lit = false;
    let mut is_complex = false;

    for y in min.y..max.y {
        for x in min.x..max.x {
            let screen_pos = uvec2(x, y);
            let entry = gbuffer.get(screen_pos);

            if !entry.is_some() {
                continue;
            }

            has_surface = true;
            is_complex |= entry.is_complex();

            if !is_lit {
                is_lit = is_lit_by_any(
                    lights,
                    camera.world_pos(screen_pos, entry.depth),
                );
            }
        }
    }

    // -------------------------------------------------------------------------

    let tile_type = TileType::classify(has_surface, is_lit, is_complex);
    let idx = tile_allocator.allocate(tile_type);

    tile_data.set(tile_type, idx, tile);
}

fn is_lit_by_any(lights: LightsView, point: Vec3) -> bool {
    for light_idx in 0..lights.len() {
        if lights.get(LightId::new(light_idx)).influences(point) {
            return true;
        }
    }

    false
}
