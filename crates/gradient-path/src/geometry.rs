//! Core geometry types for gradient-path.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = lets you print with `{:?}`
//! - `Clone` + `Copy` = small stack values that duplicate implicitly
//! - `PartialEq` = can compare with `==`
//!
//! Every type here is `Copy`: samples are produced once and never mutated,
//! so handing out copies is the same as handing out references.

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A point on the path at a given normalized progress.
///
/// `progress` is `index / total_samples`, so it runs from `0.0` at the start
/// of the path to `1.0` at the end and strictly increases in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub progress: f64,
}

/// A sample tagged with the index of the segment it was flattened out of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatSample {
    pub x: f64,
    pub y: f64,
    pub progress: f64,
    /// Index of the owning segment
    pub id: usize,
}

/// Anything with a position in the plane.
///
/// Lets the outliner accept raw points, samples and flattened samples alike.
pub trait Position {
    fn position(&self) -> Point;
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Round both coordinates to `precision` fractional digits.
    ///
    /// `None` keeps full floating-point precision.
    #[inline]
    pub fn rounded(self, precision: Option<u32>) -> Point {
        match precision {
            Some(digits) => Point::new(round_to(self.x, digits), round_to(self.y, digits)),
            None => self,
        }
    }
}

impl Sample {
    #[inline]
    pub fn new(x: f64, y: f64, progress: f64) -> Self {
        Self { x, y, progress }
    }

    /// Tag this sample with its owning segment.
    #[inline]
    pub fn with_id(self, id: usize) -> FlatSample {
        FlatSample {
            x: self.x,
            y: self.y,
            progress: self.progress,
            id,
        }
    }
}

impl Position for Point {
    #[inline]
    fn position(&self) -> Point {
        *self
    }
}

impl Position for Sample {
    #[inline]
    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Position for FlatSample {
    #[inline]
    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Round `value` to `digits` fractional digits, half away from zero.
///
/// Once `value * 10^digits` no longer has a fractional part (or overflows),
/// rounding cannot change anything and `value` comes back as is.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let Ok(exponent) = i32::try_from(digits) else {
        return normalize_zero(value);
    };
    let factor = 10f64.powi(exponent);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= EXACT_INTEGER_LIMIT {
        return normalize_zero(value);
    }
    normalize_zero(scaled.round() / factor)
}

/// Above 2^52 every f64 is already a whole number.
const EXACT_INTEGER_LIMIT: f64 = 4_503_599_627_370_496.0;

// Normalize -0.0 so serialized output never shows "-0"
#[inline]
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0); // 3-4-5 triangle
    }

    #[test]
    fn point_lerp_midpoint() {
        let mid = Point::new(0.0, 0.0).lerp(Point::new(10.0, -4.0), 0.5);
        assert_eq!(mid, Point::new(5.0, -2.0));
    }

    #[test]
    fn round_to_two_digits() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.235001, 2), 1.24);
        assert_eq!(round_to(-7.5, 0), -8.0);
    }

    #[test]
    fn round_to_zero_digits_gives_integers() {
        let p = Point::new(3.4999, 8.51).rounded(Some(0));
        assert_eq!(p, Point::new(3.0, 9.0));
        assert_eq!(p.x.fract(), 0.0);
    }

    #[test]
    fn round_normalizes_negative_zero() {
        let r = round_to(-0.0001, 2);
        assert!(r.is_sign_positive(), "expected +0.0, got {r:?}");
    }

    #[test]
    fn rounded_none_keeps_precision() {
        let p = Point::new(1.0 / 3.0, 2.0 / 3.0);
        assert_eq!(p.rounded(None), p);
    }

    #[test]
    fn sample_with_id() {
        let flat = Sample::new(1.0, 2.0, 0.5).with_id(3);
        assert_eq!(flat, FlatSample { x: 1.0, y: 2.0, progress: 0.5, id: 3 });
        assert_eq!(flat.position(), Point::new(1.0, 2.0));
    }

    #[test]
    fn round_to_huge_precision_keeps_value() {
        // 10^400 overflows f64; the digits asked for exceed what f64 holds anyway
        assert_eq!(round_to(20.0, 400), 20.0);
        assert_eq!(round_to(1.0 / 3.0, 400), 1.0 / 3.0);
        assert_eq!(round_to(-7.25, u32::MAX), -7.25);
        assert_eq!(round_to(12345.678, 20), 12345.678);
        assert!(round_to(-0.0, 400).is_sign_positive());

        let p = Point::new(0.1, -1e300).rounded(Some(400));
        assert_eq!(p, Point::new(0.1, -1e300));
    }

    #[test]
    fn round_to_large_precision_on_small_values() {
        assert_eq!(round_to(0.000_123_456, 6), 0.000_123);
        assert_eq!(round_to(0.123_456_789, 17), 0.123_456_789);
    }
}
