//! CLI command implementations.
//!
//! This module contains the implementations for the CLI subcommands:
//! - `render` - Replace a path in an SVG with a segmented gradient
//! - `data` - Print sampled segments, flat samples or outlines as JSON
//! - `example` - Print an example gradient file

pub mod common;
pub mod config;
pub mod data;
pub mod markup;
pub mod render;
pub mod style;

pub use config::cmd_example;
pub use data::cmd_data;
pub use render::cmd_render;
