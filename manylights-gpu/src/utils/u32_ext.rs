use glam::Vec4;

/// Packing of four unit-range values into a single word, one byte each;
/// used to squeeze material parameters into the G-buffer.
pub trait U32Ext
where
    Self: Sized,
{
    fn from_unorm4(values: Vec4) -> Self;
    fn to_unorm4(self) -> Vec4;
}

impl U32Ext for u32 {
    fn from_unorm4(values: Vec4) -> Self {
        let values = (values.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();

        (values.x as u32)
            | ((values.y as u32) << 8)
            | ((values.z as u32) << 16)
            | ((values.w as u32) << 24)
    }

    fn to_unorm4(self) -> Vec4 {
        Vec4::new(
            (self & 0xff) as f32,
            ((self >> 8) & 0xff) as f32,
            ((self >> 16) & 0xff) as f32,
            (self >> 24) as f32,
        ) / 255.0
    }
}
