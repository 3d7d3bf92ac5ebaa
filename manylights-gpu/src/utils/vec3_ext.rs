use glam::{vec3, Vec3};

use crate::F32Ext;

pub trait Vec3Ext
where
    Self: Sized,
{
    /// Returns luminance of this color-vector.
    fn luma(self) -> f32;

    /// Replaces negative and non-finite components with zero.
    fn sanitize(self) -> Self;
}

impl Vec3Ext for Vec3 {
    fn luma(self) -> f32 {
        self.dot(vec3(0.2126, 0.7152, 0.0722))
    }

    fn sanitize(self) -> Self {
        vec3(self.x.sanitize(), self.y.sanitize(), self.z.sanitize())
    }
}
