use core::cell::Cell;

use manylights_gpu::prelude::*;

pub fn cells<T>(len: usize, value: T) -> Vec<Cell<T>>
where
    T: Copy,
{
    (0..len).map(|_| Cell::new(value)).collect()
}

pub fn area(size: UVec2) -> usize {
    (size.x * size.y) as usize
}

pub fn frame_params(samples_per_pixel: UVec2) -> FrameParams {
    FrameParams {
        samples_per_pixel_x: samples_per_pixel.x,
        samples_per_pixel_y: samples_per_pixel.y,
        debug_light_id: FrameParams::NO_DEBUG_LIGHT,
        debug_pixel_x: FrameParams::NO_DEBUG_PIXEL,
        debug_pixel_y: FrameParams::NO_DEBUG_PIXEL,
        ..Default::default()
    }
}

/// Returns contents of the lights buffer together with frame parameters
/// pointing at them; the buffer is never empty, same as on the GPU.
pub fn lights_buffer(
    lights: &[Light],
    frame: FrameParams,
) -> (Vec<Light>, FrameParams) {
    let frame = FrameParams {
        lights_count: lights.len() as u32,
        ..frame
    };

    let mut lights = lights.to_vec();

    if lights.is_empty() {
        lights.push(Light::default());
    }

    (lights, frame)
}

/// Returns tile lists (with stride of one) containing just given tile.
pub fn single_tile(tile_type: TileType, tile: UVec2) -> Vec<u32> {
    let mut items = vec![0; TileType::MAX];

    TileDataMut::new(&mut items, 1).set(tile_type, 0, tile);

    items
}

/// Runs a tile kernel over all threads of a single workgroup.
pub fn run_tile(mut kernel: impl FnMut(UVec3, UVec3)) {
    for y in 0..TILE_SIZE {
        for x in 0..TILE_SIZE {
            kernel(UVec3::ZERO, uvec3(x, y, 0));
        }
    }
}

/// Camera at origin, looking towards -Z.
pub fn camera(size: UVec2) -> Camera {
    let projection = Mat4::perspective_rh(
        45.0f32.to_radians(),
        size.x as f32 / size.y as f32,
        0.1,
        100.0,
    );

    let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
    let projection_view = projection * view;

    Camera {
        projection_view,
        ndc_to_world: projection_view.inverse(),
        prev_projection_view: projection_view,
        origin: vec4(0.0, 0.0, 0.0, 1.0),
        prev_origin: vec4(0.0, 0.0, 0.0, 1.0),
        screen: size.as_vec2().extend(size.x as f32).extend(size.y as f32),
    }
}

/// Fills the G-buffer with a wall facing the camera, `depth` units away.
pub fn wall(gbuffer: GBufferView, size: UVec2, depth: f32, complex: bool) {
    for y in 0..size.y {
        for x in 0..size.x {
            gbuffer.set(
                uvec2(x, y),
                GBufferEntry {
                    base_color: Vec3::splat(0.5),
                    normal: Vec3::Z,
                    roughness: 0.5,
                    reflectance: 0.5,
                    clear_coat: if complex { 1.0 } else { 0.0 },
                    depth,
                    ..Default::default()
                },
            );
        }
    }
}

/// Fills the G-buffer with a plane perpendicular to the camera's forward
/// axis, `distance` units away.
pub fn plane(gbuffer: GBufferView, size: UVec2, distance: f32) {
    let camera = camera(size);

    wall(gbuffer, size, 0.0, false);

    for y in 0..size.y {
        for x in 0..size.x {
            let pos = uvec2(x, y);
            let mut entry = gbuffer.get(pos);

            entry.depth = distance / camera.ray(pos).dir().dot(Vec3::NEG_Z);
            gbuffer.set(pos, entry);
        }
    }
}

pub fn debug_log() -> Vec<u32> {
    vec![0; DebugLog::SIZE]
}

/// Returns debug records as they'd get printed on the screen.
pub fn debug_texts(words: &[u32]) -> Vec<String> {
    (0..DebugLog::len(words))
        .map(|idx| {
            let record = DebugLog::get(words, idx);

            format!(
                "[{},{}] {}",
                record.screen_pos.x, record.screen_pos.y, record
            )
        })
        .collect()
}
