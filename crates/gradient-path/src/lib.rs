//! # gradient-path
//!
//! Turn a vector path into overlapping, progress-tagged polyline segments
//! and expand segments into stroke outlines, so a gradient can be painted
//! along the path one piece at a time.
//!
//! The pipeline runs strictly one way:
//!
//! ```text
//! PathGeometry -> sample_path -> segment_samples -> { outline_stroke | flatten }
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level

pub mod error;
pub mod geometry;
pub mod outline;
pub mod sampler;
pub mod segment;
pub mod svg;

// Re-export common types at crate root for convenience.
pub use error::{GradientError, SvgError};
pub use geometry::{FlatSample, Point, Position, Sample};
pub use outline::{close_ribbon, outline_stroke, perpendicular_pair, rail_pairs};
pub use sampler::{DEFAULT_PRECISION, PathGeometry, effective_samples_per_segment, sample_path};
pub use segment::{Segment, SegmentSet, flatten, gradient_data, segment_samples};
pub use svg::{PolylinePath, SourcePath, load_path_from_svg, load_source_from_svg, splice_gradient};
