use manylights_gpu::prelude::*;

/// Turns tile counters into arguments of the indirect dispatches (one thread
/// per tile type).
#[spirv(compute(threads(8)))]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, storage_buffer)]
    tile_allocator: &mut [u32],
    #[spirv(descriptor_set = 0, binding = 1, storage_buffer)]
    downsampled_tile_allocator: &mut [u32],
    #[spirv(descriptor_set = 0, binding = 2, storage_buffer)] args: &mut [u32],
    #[spirv(descriptor_set = 0, binding = 3, storage_buffer)]
    downsampled_args: &mut [u32],
) {
    let id = global_id.x;

    if id as usize >= TileType::MAX {
        return;
    }

    let tile_type = TileType::new(id);
    let offset = DispatchIndirectArgs::offset(tile_type);

    DispatchIndirectArgs::from_tile_count(
        TileAllocator::new(tile_allocator).count(tile_type),
    )
    .write(args, offset);

    DispatchIndirectArgs::from_tile_count(
        TileAllocator::new(downsampled_tile_allocator).count(tile_type),
    )
    .write(downsampled_args, offset);
}
