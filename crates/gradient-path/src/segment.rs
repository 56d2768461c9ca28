//! Segmentation - group samples into overlapping segments.
//!
//! Adjacent segments share their boundary sample: the last sample of
//! segment `i` is the first sample of segment `i + 1`, which keeps the
//! rendered pieces visually continuous.
//!
//! ## Rust Lesson #9: Slices instead of shared pointers
//!
//! Rather than two segments pointing at the same sample object, the
//! [`SegmentSet`] owns one flat `Vec<Sample>` and each segment is just an
//! index range into it. A [`Segment`] borrows `&[Sample]` from that vector,
//! so the shared boundary is literally the same memory.

use std::ops::RangeInclusive;

use log::debug;

use crate::error::GradientError;
use crate::geometry::{FlatSample, Point, Sample};
use crate::outline::outline_stroke;
use crate::sampler::{PathGeometry, effective_samples_per_segment, sample_path};

/// All samples of a path, grouped into overlapping segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSet {
    samples: Vec<Sample>,
    ranges: Vec<RangeInclusive<usize>>,
}

/// A borrowed view of one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    /// Position of this segment in the set (0-based)
    pub index: usize,
    /// The segment's samples, boundary samples included
    pub samples: &'a [Sample],
}

/// Split a flat sample sequence into `segments` overlapping segments.
///
/// Segment `s` covers `samples[s * eff ..= s * eff + eff]`.
///
/// # Errors
///
/// [`GradientError::InvalidConfiguration`] if `samples` does not hold
/// exactly `segments * effective_per_segment + 1` entries.
pub fn segment_samples(
    samples: Vec<Sample>,
    segments: usize,
    effective_per_segment: usize,
) -> Result<SegmentSet, GradientError> {
    let expected = segments
        .checked_mul(effective_per_segment)
        .and_then(|n| n.checked_add(1));
    if segments == 0 || effective_per_segment == 0 || expected != Some(samples.len()) {
        return Err(GradientError::InvalidConfiguration(format!(
            "{} samples cannot form {} segments of {} samples",
            samples.len(),
            segments,
            effective_per_segment + 1
        )));
    }

    let ranges = (0..segments)
        .map(|s| {
            let current_start = s * effective_per_segment;
            let next_start = current_start + effective_per_segment;
            current_start..=next_start
        })
        .collect();

    debug!(
        "grouped {} samples into {} segments",
        samples.len(),
        segments
    );

    Ok(SegmentSet { samples, ranges })
}

/// Sample `geometry` and group the result into segments in one step.
pub fn gradient_data<G: PathGeometry + ?Sized>(
    geometry: &G,
    segments: usize,
    samples_per_segment: usize,
    precision: Option<u32>,
) -> Result<SegmentSet, GradientError> {
    let samples = sample_path(geometry, segments, samples_per_segment, precision)?;
    segment_samples(
        samples,
        segments,
        effective_samples_per_segment(samples_per_segment),
    )
}

/// Re-linearize segments, tagging every sample with its segment index.
///
/// Boundary samples appear once under each owning segment.
pub fn flatten<'a, I>(segments: I) -> Vec<FlatSample>
where
    I: IntoIterator<Item = Segment<'a>>,
{
    segments
        .into_iter()
        .flat_map(|segment| {
            segment
                .samples
                .iter()
                .map(move |sample| sample.with_id(segment.index))
        })
        .collect()
}

impl SegmentSet {
    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The underlying flat sample sequence.
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Segment at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Segment<'_>> {
        self.ranges.get(index).map(|range| Segment {
            index,
            samples: &self.samples[range.clone()],
        })
    }

    /// Iterate segments in path order.
    pub fn iter(&self) -> impl Iterator<Item = Segment<'_>> + '_ {
        self.ranges
            .iter()
            .enumerate()
            .map(|(index, range)| Segment {
                index,
                samples: &self.samples[range.clone()],
            })
    }

    /// Flatten every segment, see [`flatten`].
    pub fn flatten(&self) -> Vec<FlatSample> {
        flatten(self.iter())
    }

    /// Outline every segment with the same width, in segment order.
    pub fn outlines(
        &self,
        width: f64,
        precision: Option<u32>,
    ) -> Result<Vec<Vec<Point>>, GradientError> {
        self.iter()
            .map(|segment| segment.outline(width, precision))
            .collect()
    }
}

impl<'a> Segment<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&'a Sample> {
        self.samples.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&'a Sample> {
        self.samples.last()
    }

    /// Progress of the middle sample, used to style the whole segment.
    pub fn mid_progress(&self) -> Option<f64> {
        self.samples.get(self.samples.len() / 2).map(|s| s.progress)
    }

    /// Sample coordinates without progress.
    pub fn points(&self) -> Vec<Point> {
        self.samples.iter().map(|s| Point::new(s.x, s.y)).collect()
    }

    /// Closed band polygon of `width` around this segment.
    pub fn outline(&self, width: f64, precision: Option<u32>) -> Result<Vec<Point>, GradientError> {
        outline_stroke(self.samples, width, precision)
    }
}

// ============================================================================
// TESTS
// ============================================================================
