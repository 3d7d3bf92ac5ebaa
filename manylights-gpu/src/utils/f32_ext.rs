pub trait F32Ext
where
    Self: Sized,
{
    fn sqr(self) -> Self;
    fn saturate(self) -> Self;

    /// Returns this value, or zero if it's negative or not finite.
    fn sanitize(self) -> Self;
}

impl F32Ext for f32 {
    fn sqr(self) -> Self {
        self * self
    }

    fn saturate(self) -> Self {
        self.clamp(0.0, 1.0)
    }

    fn sanitize(self) -> Self {
        if self.is_finite() {
            self.max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize() {
        assert_eq!(1.5, 1.5f32.sanitize());
        assert_eq!(0.0, (-1.5f32).sanitize());
        assert_eq!(0.0, f32::NAN.sanitize());
        assert_eq!(0.0, f32::INFINITY.sanitize());
    }
}
