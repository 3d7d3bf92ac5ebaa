use bytemuck::{Pod, Zeroable};
use glam::{vec2, IVec2, Mat4, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{Ray, DOWNSAMPLE_FACTOR, EPSILON};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Camera {
    pub projection_view: Mat4,
    pub ndc_to_world: Mat4,

    /// Projection-view matrix of the frame that produced the temporal
    /// history; equal to `projection_view` when there's no history.
    pub prev_projection_view: Mat4,

    /// x, y, z - camera's origin
    /// w - pre-exposure
    pub origin: Vec4,

    /// x, y, z - history camera's origin
    /// w - history pre-exposure
    pub prev_origin: Vec4,

    /// x, y - viewport size
    /// z, w - history viewport size
    pub screen: Vec4,
}

impl Camera {
    pub fn screen_size(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    pub fn prev_screen_size(&self) -> UVec2 {
        self.screen.zw().as_uvec2()
    }

    /// Returns size of the downsampled grid, rounded up so that each
    /// full-resolution pixel has its downsampled counterpart.
    pub fn downsampled_size(&self) -> UVec2 {
        (self.screen_size() + DOWNSAMPLE_FACTOR - 1) / DOWNSAMPLE_FACTOR
    }

    /// Returns whether given point lays inside the screen.
    pub fn contains(&self, pos: IVec2) -> bool {
        let screen_size = self.screen_size().as_ivec2();

        pos.x >= 0
            && pos.y >= 0
            && pos.x < screen_size.x
            && pos.y < screen_size.y
    }

    /// Returns whether given point lays inside the downsampled grid.
    pub fn contains_downsampled(&self, pos: UVec2) -> bool {
        let size = self.downsampled_size();

        pos.x < size.x && pos.y < size.y
    }

    /// Casts a ray from camera's origin through the center of given pixel.
    pub fn ray(&self, screen_pos: UVec2) -> Ray {
        self.ray_at(screen_pos.as_vec2() + 0.5)
    }

    /// Casts a ray from camera's origin through given (continuous) screen
    /// coordinates.
    pub fn ray_at(&self, screen_pos: Vec2) -> Ray {
        let ndc = screen_pos * 2.0 / self.screen.xy() - Vec2::ONE;
        let ndc = vec2(ndc.x, -ndc.y);
        let target = self.ndc_to_world.project_point3(ndc.extend(0.5));
        let origin = self.origin.xyz();

        Ray::new(origin, (target - origin).normalize())
    }

    /// Reconstructs world-space position of given pixel, with depth being the
    /// distance from camera's origin.
    pub fn world_pos(&self, screen_pos: UVec2, depth: f32) -> Vec3 {
        self.ray(screen_pos).at(depth)
    }

    /// Given a point in world-coordinates, returns where it was located on the
    /// history's screen (in continuous screen coordinates, where the pixel
    /// `(x, y)` spans `<x, x + 1)`).
    ///
    /// Returns `None` for points behind the history camera.
    pub fn world_to_prev_screen(&self, pos: Vec3) -> Option<Vec2> {
        let clip = self.prev_projection_view * pos.extend(1.0);

        if clip.w <= EPSILON {
            return None;
        }

        let ndc = clip.xy() / clip.w;
        let ndc = vec2(ndc.x, -ndc.y);

        Some((0.5 * ndc + 0.5) * self.screen.zw())
    }

    /// Returns the depth given point would have from history camera's point of
    /// view.
    pub fn prev_depth(&self, pos: Vec3) -> f32 {
        pos.distance(self.prev_origin.xyz())
    }

    /// Returns the factor history's lighting has to be multiplied by to match
    /// current frame's exposure.
    pub fn pre_exposure_correction(&self) -> f32 {
        if self.prev_origin.w > 0.0 {
            self.origin.w / self.prev_origin.w
        } else {
            1.0
        }
    }
}
