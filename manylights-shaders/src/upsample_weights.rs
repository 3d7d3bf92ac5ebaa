use manylights_gpu::prelude::*;

/// Computes weights used to bring the downsampled lighting back to full
/// resolution (see: [`UpsampleWeights`]).
#[spirv(compute(threads(8, 8)))]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 1)] gbuffer_d0: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_d1: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] surface_map: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4)] upsample_weights: TexRgba32,
) {
    let screen_pos = global_id.xy();

    if !camera.contains(screen_pos.as_ivec2()) {
        return;
    }

    let gbuffer = GBufferView::new(
        TexRgba::new(gbuffer_d0, camera.screen_size()),
        TexRgba::new(gbuffer_d1, camera.screen_size()),
    );

    let surface_map =
        SurfaceMap::new(TexRgba::new(surface_map, camera.downsampled_size()));

    let upsample_weights =
        TexRgba::new(upsample_weights, camera.screen_size());

    let surface = Surface {
        normal: gbuffer.normal(screen_pos),
        depth: gbuffer.depth(screen_pos),
    };

    upsample_weights.write(
        screen_pos,
        UpsampleWeights::compute(
            screen_pos,
            surface,
            surface_map,
        ),
    );
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::test_utils::*;

    #[test]
    fn smoke() {
        let size = uvec2(4, 4);
        let camera = camera(size);
        let ds_size = camera.downsampled_size();

        let d0 = cells(area(size), Vec4::ZERO);
        let d1 = cells(area(size), Vec4::ZERO);
        let gbuffer = GBufferView::new(TexRgba::new(&d0, size), TexRgba::new(&d1, size));
        let surfaces = cells(area(ds_size), Vec4::ZERO);
        let weights = cells(area(size), Vec4::splat(-1.0));

        wall(gbuffer, size, 10.0, false);

        // Leave one pixel without surface
        gbuffer.set(uvec2(3, 3), GBufferEntry::default());

        let surface_map = SurfaceMap::new(TexRgba::new(&surfaces, ds_size));

        for y in 0..ds_size.y {
            for x in 0..ds_size.x {
                surface_map.set(
                    uvec2(x, y),
                    Surface {
                        normal: Vec3::Z,
                        depth: 10.0,
                    },
                    UVec2::ZERO,
                );
            }
        }

        for y in 0..size.y {
            for x in 0..size.x {
                main(uvec3(x, y, 0), &camera, &d0, &d1, &surfaces, &weights);
            }
        }

        let weights = TexRgba::new(&weights, size);

        for y in 0..size.y {
            for x in 0..size.x {
                let actual = weights.read(uvec2(x, y));

                if (x, y) == (3, 3) {
                    assert_eq!(Vec4::ZERO, actual);
                } else {
                    assert_relative_eq!(1.0, actual.dot(Vec4::ONE), epsilon = 0.0001);
                }
            }
        }
    }
}
