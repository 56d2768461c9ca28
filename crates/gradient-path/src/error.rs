//! Error types.
//!
//! ## Rust Lesson #20: Error Handling
//!
//! Rust uses `Result<T, E>` instead of exceptions. `thiserror` derives the
//! `Display` and `std::error::Error` boilerplate from the `#[error]` strings,
//! and `#[from]` lets `?` convert an `SvgError` into a `GradientError`.

use thiserror::Error;

/// Errors reported by the sampling, segmentation and outlining entry points.
///
/// Every operation is pure, so a failure recurs identically on retry and
/// nothing here is worth retrying.
#[derive(Debug, Error)]
pub enum GradientError {
    /// Segment count, samples per segment, width or precision out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("degenerate sampling: {segments} segment(s) x {samples_per_segment} sample(s) gives zero samples")]
    DegenerateSampling {
        segments: usize,
        samples_per_segment: usize,
    },

    #[error("cannot outline a segment of {len} sample(s), at least 2 are required")]
    DegenerateSegment { len: usize },

    /// The path geometry could not report its length or a point.
    #[error("path geometry unavailable: {0}")]
    GeometryUnavailable(String),

    #[error(transparent)]
    Svg(#[from] SvgError),
}

/// Errors raised while reading or rewriting SVG documents.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("no path found in SVG")]
    NoPath,

    #[error("no path with id \"{0}\" found in SVG")]
    PathNotFound(String),

    /// The rendered path has no element of its own to replace.
    #[error("source path is not a shape element of the document (is it drawn through <use>?)")]
    DetachedSource,

    #[error("document has no shape element #{0}")]
    ShapeNotFound(usize),

    #[error("XML error: {0}")]
    Xml(String),
}
