#![forbid(unsafe_code)]

//! Geometric primitives.

/// Observed size of an element, in CSS pixels.
///
/// Produced by the host's element-size observer and pushed into consumers
/// (for example the carousel) whenever the element resizes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A size with no area.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Whether the size has a usable (strictly positive, finite) width.
    ///
    /// Observers report `0 × 0` before the element is laid out, so consumers
    /// treat such sizes as "not measured yet".
    #[inline]
    pub fn has_width(&self) -> bool {
        self.width.is_finite() && self.width > 0.0
    }

    /// `percent` percent of the width.
    #[inline]
    pub fn percent_of_width(&self, percent: f64) -> f64 {
        self.width * percent / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_has_no_width() {
        assert!(!Size::ZERO.has_width());
        assert!(!Size::new(-5.0, 10.0).has_width());
        assert!(!Size::new(f64::NAN, 10.0).has_width());
    }

    #[test]
    fn percent_of_width() {
        let s = Size::new(800.0, 400.0);
        assert!(s.has_width());
        assert_eq!(s.percent_of_width(30.0), 240.0);
        assert_eq!(s.percent_of_width(0.0), 0.0);
    }
}
