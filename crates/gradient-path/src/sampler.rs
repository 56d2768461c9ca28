//! Path sampling - walk a path's arc length and emit ordered samples.
//!
//! The sampler never looks at the path itself. It only asks a
//! [`PathGeometry`] for the total arc length and for the point at a given
//! distance along it, so anything that can answer those two questions can
//! be sampled (an SVG path, a plain polyline, an analytic curve).

use log::debug;

use crate::error::GradientError;
use crate::geometry::{Point, Sample};

/// Default number of fractional digits kept in sampled coordinates.
pub const DEFAULT_PRECISION: u32 = 2;

/// Arc-length queries over a vector path.
///
/// ## Rust Lesson #12: Traits
///
/// A trait is an interface: any type that implements these two methods can
/// be handed to [`sample_path`]. Generic functions over `G: PathGeometry`
/// are monomorphized, so there is no dynamic dispatch cost.
pub trait PathGeometry {
    /// Total arc length of the path.
    fn total_length(&self) -> Result<f64, GradientError>;

    /// Point at `distance` along the path, `distance` in `[0, total_length()]`.
    fn point_at_distance(&self, distance: f64) -> Result<Point, GradientError>;
}

/// Samples per segment once the boundary sample shared with the next
/// segment is accounted for.
///
/// Segments are later closed with the first sample of the following group,
/// so a request for `n > 1` samples only needs `n - 1` of its own.
#[inline]
pub fn effective_samples_per_segment(samples_per_segment: usize) -> usize {
    if samples_per_segment > 1 {
        samples_per_segment - 1
    } else {
        samples_per_segment
    }
}

/// Total number of sample intervals along the path.
///
/// Fails with [`GradientError::DegenerateSampling`] rather than letting a
/// zero reach the progress division.
pub fn total_samples(segments: usize, effective_per_segment: usize) -> Result<usize, GradientError> {
    match segments.checked_mul(effective_per_segment) {
        Some(0) => Err(GradientError::DegenerateSampling {
            segments,
            samples_per_segment: effective_per_segment,
        }),
        Some(total) => Ok(total),
        None => Err(GradientError::InvalidConfiguration(format!(
            "{} segments x {} samples overflows",
            segments, effective_per_segment
        ))),
    }
}

/// Sample a path into `segments * effective + 1` evenly spaced points.
///
/// `precision` rounds both coordinates to that many fractional digits;
/// `None` keeps full precision. Progress values are never rounded.
///
/// # Errors
///
/// - [`GradientError::InvalidConfiguration`] if `segments` or
///   `samples_per_segment` is zero (checked before touching the geometry)
/// - [`GradientError::GeometryUnavailable`] propagated from the geometry,
///   or if it reports a negative or non-finite length
pub fn sample_path<G: PathGeometry + ?Sized>(
    geometry: &G,
    segments: usize,
    samples_per_segment: usize,
    precision: Option<u32>,
) -> Result<Vec<Sample>, GradientError> {
    if segments < 1 {
        return Err(GradientError::InvalidConfiguration(
            "segments must be at least 1".into(),
        ));
    }
    if samples_per_segment < 1 {
        return Err(GradientError::InvalidConfiguration(
            "samples per segment must be at least 1".into(),
        ));
    }

    let effective = effective_samples_per_segment(samples_per_segment);
    let total = total_samples(segments, effective)?;

    let path_length = geometry.total_length()?;
    if !path_length.is_finite() || path_length < 0.0 {
        return Err(GradientError::GeometryUnavailable(format!(
            "path reported length {}",
            path_length
        )));
    }

    debug!(
        "sampling {} segments x {} samples ({} total) over length {:.3}",
        segments, effective, total, path_length
    );

    // Inclusive range: `total` intervals need `total + 1` samples
    (0..=total)
        .map(|k| -> Result<Sample, GradientError> {
            let progress = k as f64 / total as f64;
            let point = geometry
                .point_at_distance(progress * path_length)?
                .rounded(precision);
            Ok(Sample::new(point.x, point.y, progress))
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Straight line from `from` to `to`, parameterized by arc length.
    pub(crate) struct StraightLine {
        pub from: Point,
        pub to: Point,
    }

    impl PathGeometry for StraightLine {
        fn total_length(&self) -> Result<f64, GradientError> {
            Ok(self.from.distance(self.to))
        }

        fn point_at_distance(&self, distance: f64) -> Result<Point, GradientError> {
            let length = self.from.distance(self.to);
            let t = if length > 0.0 { distance / length } else { 0.0 };
            Ok(self.from.lerp(self.to, t))
        }
    }

    /// Geometry that cannot answer any query.
    struct Unavailable;

    impl PathGeometry for Unavailable {
        fn total_length(&self) -> Result<f64, GradientError> {
            Err(GradientError::GeometryUnavailable("detached".into()))
        }

        fn point_at_distance(&self, _distance: f64) -> Result<Point, GradientError> {
            Err(GradientError::GeometryUnavailable("detached".into()))
        }
    }

    /// Counts how often the geometry was asked for anything.
    struct Counting(std::cell::Cell<usize>);

    impl PathGeometry for Counting {
        fn total_length(&self) -> Result<f64, GradientError> {
            self.0.set(self.0.get() + 1);
            Ok(1.0)
        }

        fn point_at_distance(&self, distance: f64) -> Result<Point, GradientError> {
            self.0.set(self.0.get() + 1);
            Ok(Point::new(distance, 0.0))
        }
    }

    pub(crate) fn horizontal(length: f64) -> StraightLine {
        StraightLine {
            from: Point::new(0.0, 0.0),
            to: Point::new(length, 0.0),
        }
    }

    #[test]
    fn effective_samples_drops_shared_boundary() {
        assert_eq!(effective_samples_per_segment(3), 2);
        assert_eq!(effective_samples_per_segment(2), 1);
        assert_eq!(effective_samples_per_segment(1), 1);
    }

    #[test]
    fn total_samples_zero_is_degenerate() {
        assert!(matches!(
            total_samples(0, 4),
            Err(GradientError::DegenerateSampling { .. })
        ));
        assert!(matches!(
            total_samples(3, 0),
            Err(GradientError::DegenerateSampling { .. })
        ));
        assert_eq!(total_samples(4, 2).unwrap(), 8);
    }

    #[test]
    fn four_segments_three_samples() {
        let samples = sample_path(&horizontal(80.0), 4, 3, Some(2)).unwrap();

        assert_eq!(samples.len(), 9);
        let progress: Vec<f64> = samples.iter().map(|s| s.progress).collect();
        assert_eq!(
            progress,
            vec![0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0]
        );
    }

    #[test]
    fn straight_line_single_segment() {
        let samples = sample_path(&horizontal(20.0), 1, 3, None).unwrap();

        assert_eq!(
            samples,
            vec![
                Sample::new(0.0, 0.0, 0.0),
                Sample::new(10.0, 0.0, 0.5),
                Sample::new(20.0, 0.0, 1.0),
            ]
        );
    }

    #[test]
    fn progress_strictly_increasing() {
        let samples = sample_path(&horizontal(7.0), 5, 4, None).unwrap();
        assert!(samples.windows(2).all(|w| w[0].progress < w[1].progress));
        assert_eq!(samples.first().unwrap().progress, 0.0);
        assert_eq!(samples.last().unwrap().progress, 1.0);
    }

    #[test]
    fn precision_zero_gives_integers() {
        let line = StraightLine {
            from: Point::new(0.3, 0.7),
            to: Point::new(33.3, 17.9),
        };
        let samples = sample_path(&line, 3, 4, Some(0)).unwrap();
        for s in &samples {
            assert_eq!(s.x.fract(), 0.0, "x = {}", s.x);
            assert_eq!(s.y.fract(), 0.0, "y = {}", s.y);
        }
    }

    #[test]
    fn no_precision_keeps_full_values() {
        let samples = sample_path(&horizontal(1.0), 1, 4, None).unwrap();
        // 1/3 is not representable with 2 digits
        assert_abs_diff_eq!(samples[1].x, 1.0 / 3.0, epsilon = 1e-15);
        assert_ne!(samples[1].x, 0.33);

        let rounded = sample_path(&horizontal(1.0), 1, 4, Some(DEFAULT_PRECISION)).unwrap();
        assert_eq!(rounded[1].x, 0.33);
    }

    #[test]
    fn precision_beyond_f64_keeps_full_values() {
        let samples = sample_path(&horizontal(20.0), 1, 3, Some(400)).unwrap();
        assert_eq!(
            samples,
            vec![
                Sample::new(0.0, 0.0, 0.0),
                Sample::new(10.0, 0.0, 0.5),
                Sample::new(20.0, 0.0, 1.0),
            ]
        );

        let thirds = sample_path(&horizontal(1.0), 1, 4, Some(u32::MAX)).unwrap();
        assert_eq!(thirds[1].x, 1.0 / 3.0);
    }

    #[test]
    fn zero_segments_rejected_before_sampling() {
        let geometry = Counting(std::cell::Cell::new(0));
        let result = sample_path(&geometry, 0, 3, Some(2));

        assert!(matches!(result, Err(GradientError::InvalidConfiguration(_))));
        assert_eq!(geometry.0.get(), 0, "geometry must not be queried");
    }

    #[test]
    fn zero_samples_per_segment_rejected() {
        let result = sample_path(&horizontal(10.0), 2, 0, None);
        assert!(matches!(result, Err(GradientError::InvalidConfiguration(_))));
    }

    #[test]
    fn geometry_errors_propagate() {
        let result = sample_path(&Unavailable, 2, 2, None);
        assert!(matches!(result, Err(GradientError::GeometryUnavailable(_))));
    }

    #[test]
    fn zero_length_path_repeats_start_point() {
        let samples = sample_path(&horizontal(0.0), 2, 2, None).unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.x == 0.0 && s.y == 0.0));
    }
}
