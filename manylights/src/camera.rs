use glam::{Mat4, UVec2, Vec3};

use crate::gpu;

/// Describes the point of view from which the scene is rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub viewport_size: UVec2,

    /// Camera-to-world transform.
    pub transform: Mat4,

    pub projection: Mat4,

    /// Exposure the renderer multiplies scene's lighting by; history gets
    /// rescaled when it changes between frames.
    pub pre_exposure: f32,
}

impl Camera {
    pub fn origin(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    pub fn projection_view(&self) -> Mat4 {
        self.projection * self.transform.inverse()
    }

    /// Returns whether the camera changed in a way that requires reallocating
    /// its buffers.
    pub(crate) fn is_invalidated_by(&self, other: &Self) -> bool {
        self.viewport_size != other.viewport_size
    }

    pub(crate) fn describe(&self) -> String {
        format!(
            "size={}x{}, origin={}",
            self.viewport_size.x,
            self.viewport_size.y,
            self.origin()
        )
    }

    /// Converts the camera into its kernel-side representation, using `prev`
    /// as the point of view from which the temporal history was rendered.
    pub(crate) fn serialize(&self, prev: Option<&Self>) -> gpu::Camera {
        let projection_view = self.projection_view();
        let prev = prev.unwrap_or(self);

        gpu::Camera {
            projection_view,
            ndc_to_world: projection_view.inverse(),
            prev_projection_view: prev.projection_view(),
            origin: self.origin().extend(self.pre_exposure),
            prev_origin: prev.origin().extend(prev.pre_exposure),
            screen: self
                .viewport_size
                .as_vec2()
                .extend(prev.viewport_size.x as f32)
                .extend(prev.viewport_size.y as f32),
        }
    }
}
