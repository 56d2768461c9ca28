//! Stroke outlining - expand a polyline segment into a closed band polygon.
//!
//! ## Algorithm
//!
//! 1. For every edge `(p0, p1)` take its direction `atan2(dy, dx)`
//! 2. Offset the edge's end point by `width / 2` on both sides, along the
//!    edge's perpendicular (the first edge also offsets its start point)
//! 3. That yields one interleaved `(A, B)` pair per sample
//! 4. Close the ring: rail A forward, then rail B backward
//!
//! Only a raw perpendicular offset is computed. Corners get no miter or
//! bevel, so sharp concave turns can make the band overlap itself.

use crate::error::GradientError;
use crate::geometry::{Point, Position};

/// The two points `radius` away from `anchor`, perpendicular to `angle`.
///
/// The first point is `anchor + radius * (sin, -cos)`, the second
/// `anchor + radius * (-sin, cos)`.
pub fn perpendicular_pair(
    angle: f64,
    radius: f64,
    anchor: Point,
    precision: Option<u32>,
) -> [Point; 2] {
    let (sin, cos) = angle.sin_cos();
    [
        Point::new(anchor.x + sin * radius, anchor.y - cos * radius).rounded(precision),
        Point::new(anchor.x - sin * radius, anchor.y + cos * radius).rounded(precision),
    ]
}

/// Interleaved offset pairs, one `(A, B)` pair per sample in order.
///
/// The result is `[p0A, p0B, p1A, p1B, ...]`, which is *not* a valid ring
/// yet; see [`close_ribbon`].
pub fn rail_pairs<P: Position>(segment: &[P], width: f64, precision: Option<u32>) -> Vec<Point> {
    let radius = width / 2.0;
    let mut pairs = Vec::with_capacity(segment.len() * 2);

    for (i, edge) in segment.windows(2).enumerate() {
        let p0 = edge[0].position();
        let p1 = edge[1].position();
        let angle = (p1.y - p0.y).atan2(p1.x - p0.x);

        // Only the first edge seeds the start of the ribbon
        if i == 0 {
            pairs.extend(perpendicular_pair(angle, radius, p0, precision));
        }
        pairs.extend(perpendicular_pair(angle, radius, p1, precision));
    }

    pairs
}

/// Turn interleaved rail pairs into a closed ring.
///
/// Even positions (rail A) in order, followed by odd positions (rail B)
/// reversed. For eight pairs the ring visits `0, 2, 4, 6, 7, 5, 3, 1`.
pub fn close_ribbon(pairs: &[Point]) -> Vec<Point> {
    let rail_a = pairs.iter().step_by(2);
    let rail_b = pairs.iter().skip(1).step_by(2).rev();
    rail_a.chain(rail_b).copied().collect()
}

/// Closed band polygon of `width` straddling the segment's polyline.
///
/// The result has `2 * segment.len()` points. `precision` rounds every
/// emitted coordinate the same way the sampler does.
///
/// # Errors
///
/// - [`GradientError::DegenerateSegment`] for fewer than 2 samples
/// - [`GradientError::InvalidConfiguration`] for a negative or non-finite width
pub fn outline_stroke<P: Position>(
    segment: &[P],
    width: f64,
    precision: Option<u32>,
) -> Result<Vec<Point>, GradientError> {
    if segment.len() < 2 {
        return Err(GradientError::DegenerateSegment { len: segment.len() });
    }
    if !width.is_finite() || width < 0.0 {
        return Err(GradientError::InvalidConfiguration(format!(
            "outline width must be a non-negative number, got {}",
            width
        )));
    }

    Ok(close_ribbon(&rail_pairs(segment, width, precision)))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Sample;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Shoelace area of a closed ring, positive for counter-clockwise.
    fn signed_area(ring: &[Point]) -> f64 {
        let doubled: f64 = ring
            .iter()
            .zip(ring.iter().cycle().skip(1))
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        doubled / 2.0
    }

    #[test]
    fn straight_three_point_ribbon() {
        let segment = pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let outline = outline_stroke(&segment, 4.0, None).unwrap();

        // Rail A sits at -cos(0) * r, rail B at +cos(0) * r
        assert_eq!(
            outline,
            pts(&[
                (0.0, -2.0),
                (10.0, -2.0),
                (20.0, -2.0),
                (20.0, 2.0),
                (10.0, 2.0),
                (0.0, 2.0),
            ])
        );
    }

    #[test]
    fn single_edge_gives_four_points() {
        let segment = pts(&[(0.0, 0.0), (0.0, 10.0)]);
        let outline = outline_stroke(&segment, 2.0, Some(2)).unwrap();

        assert_eq!(
            outline,
            pts(&[(1.0, 0.0), (1.0, 10.0), (-1.0, 10.0), (-1.0, 0.0)])
        );
    }

    #[test]
    fn outline_length_is_twice_segment_length() {
        let segment = pts(&[(0.0, 0.0), (3.0, 4.0), (7.0, 1.0), (12.0, 6.0), (15.0, 2.0)]);
        for width in [0.0, 0.5, 3.0, 40.0] {
            let outline = outline_stroke(&segment, width, Some(2)).unwrap();
            assert_eq!(outline.len(), 2 * segment.len(), "width {}", width);
        }
    }

    #[test]
    fn zero_width_collapses_onto_polyline() {
        let segment = vec![
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(3.5, 4.25, 0.25),
            Sample::new(8.0, 1.0, 0.5),
            Sample::new(9.0, 9.0, 0.75),
        ];
        let outline = outline_stroke(&segment, 0.0, None).unwrap();
        let (rail_a, rail_b) = outline.split_at(segment.len());

        let coords: Vec<Point> = segment.iter().map(|s| s.position()).collect();
        let mut reversed = coords.clone();
        reversed.reverse();

        assert_eq!(rail_a, coords.as_slice());
        assert_eq!(rail_b, reversed.as_slice());
    }

    #[test]
    fn corner_uses_incoming_edge_angle() {
        // L-shaped run: the corner sample is offset along the first edge
        let segment = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let outline = outline_stroke(&segment, 2.0, Some(2)).unwrap();

        assert_eq!(
            outline,
            pts(&[
                (0.0, -1.0),
                (10.0, -1.0),
                (11.0, 10.0),
                (9.0, 10.0),
                (10.0, 1.0),
                (0.0, 1.0),
            ])
        );
    }

    #[test]
    fn straight_ribbon_area_is_width_times_length() {
        let segment = pts(&[(0.0, 0.0), (5.0, 0.0), (20.0, 0.0)]);
        let outline = outline_stroke(&segment, 4.0, None).unwrap();
        let area = signed_area(&outline).abs();
        assert!((area - 80.0).abs() < 1e-9, "expected 80, got {}", area);
    }

    #[test]
    fn precision_zero_rounds_offsets() {
        let segment = pts(&[(0.0, 0.0), (7.0, 3.0), (11.0, 13.0)]);
        let outline = outline_stroke(&segment, 3.0, Some(0)).unwrap();
        assert!(outline.iter().all(|p| p.x.fract() == 0.0 && p.y.fract() == 0.0));
    }

    #[test]
    fn close_ribbon_reorders_rails() {
        let pairs: Vec<Point> = (0..8).map(|i| Point::new(i as f64, 0.0)).collect();
        let ring = close_ribbon(&pairs);
        let order: Vec<f64> = ring.iter().map(|p| p.x).collect();
        assert_eq!(order, vec![0.0, 2.0, 4.0, 6.0, 7.0, 5.0, 3.0, 1.0]);
    }

    #[test]
    fn rail_pairs_interleave_sides() {
        let segment = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        let pairs = rail_pairs(&segment, 2.0, None);
        assert_eq!(pairs, pts(&[(0.0, -1.0), (0.0, 1.0), (10.0, -1.0), (10.0, 1.0)]));
    }

    #[test]
    fn short_segments_are_degenerate() {
        let one = pts(&[(1.0, 1.0)]);
        assert!(matches!(
            outline_stroke(&one, 2.0, None),
            Err(GradientError::DegenerateSegment { len: 1 })
        ));
        assert!(matches!(
            outline_stroke::<Point>(&[], 2.0, None),
            Err(GradientError::DegenerateSegment { len: 0 })
        ));
    }

    #[test]
    fn negative_width_rejected() {
        let segment = pts(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(
            outline_stroke(&segment, -1.0, None),
            Err(GradientError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            outline_stroke(&segment, f64::NAN, None),
            Err(GradientError::InvalidConfiguration(_))
        ));
    }
}
