//! Gradient configuration files.
//!
//! A gradient file is YAML describing how to cut the source path and which
//! elements to draw from the pieces:
//!
//! ```yaml
//! segments: 12
//! samples: 10
//! elements:
//!   - type: path
//!     width: 10
//!     fill: ["#ff0000", "#0000ff"]
//! ```
//!
//! Numbers are read as signed values so that a negative count or precision
//! is reported as an invalid configuration instead of a YAML type error.

use std::fs;
use std::path::Path;

use colorsys::Rgb;
use serde::{Deserialize, Serialize};

use gradient_path::{DEFAULT_PRECISION, GradientError};

use super::common::{flag_value, parse_flag};
use super::style::{Element, ElementKind, Paint};

/// A gradient file as written by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientConfig {
    /// Number of segments the path is cut into
    #[serde(default = "default_segments")]
    pub segments: i64,

    /// Samples per segment, boundary sample included
    #[serde(default = "default_samples")]
    pub samples: i64,

    /// Fractional digits kept in coordinates (`null` keeps everything)
    #[serde(default = "default_precision")]
    pub precision: Option<i64>,

    /// Id of the source path element (default: first path)
    #[serde(default)]
    pub source: Option<String>,

    /// Elements drawn from the segments, in paint order
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
}

/// One element entry of a gradient file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementConfig {
    #[serde(rename = "type")]
    pub kind: ElementKind,

    /// Outline width for paths, diameter for circles
    #[serde(default)]
    pub width: Option<f64>,

    #[serde(default)]
    pub fill: Option<PaintConfig>,

    #[serde(default)]
    pub stroke: Option<PaintConfig>,

    #[serde(default)]
    pub stroke_width: Option<f64>,
}

/// A colour, or a list of colours spread evenly along the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaintConfig {
    Solid(String),
    Stops(Vec<String>),
}

/// A configuration that passed validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub segments: usize,
    pub samples: usize,
    pub precision: Option<u32>,
    pub source: Option<String>,
    pub elements: Vec<Element>,
}

fn default_segments() -> i64 {
    10
}

fn default_samples() -> i64 {
    5
}

fn default_precision() -> Option<i64> {
    Some(DEFAULT_PRECISION as i64)
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            samples: default_samples(),
            precision: default_precision(),
            source: None,
            elements: Vec::new(),
        }
    }
}

impl GradientConfig {
    /// Load a gradient file from YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read gradient file: {}", e))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("Failed to parse gradient YAML: {}", e))
    }

    /// Check ranges and resolve colours.
    pub fn validate(&self) -> Result<Settings, GradientError> {
        let segments = positive(self.segments, "segments")?;
        let samples = positive(self.samples, "samples")?;

        let precision = match self.precision {
            Some(p) if p < 0 => {
                return Err(invalid(format!("precision must be >= 0, got {}", p)));
            }
            Some(p) => Some(
                u32::try_from(p).map_err(|_| invalid(format!("precision {} is too large", p)))?,
            ),
            None => None,
        };

        let elements = self
            .elements
            .iter()
            .enumerate()
            .map(|(i, e)| e.validate(i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Settings {
            segments,
            samples,
            precision,
            source: self.source.clone(),
            elements,
        })
    }
}

impl ElementConfig {
    fn validate(&self, index: usize) -> Result<Element, GradientError> {
        let width = non_negative(self.width, "width", index)?;
        let stroke_width = non_negative(self.stroke_width, "stroke_width", index)?;

        if self.kind == ElementKind::Circle && width.is_none() {
            return Err(invalid(format!(
                "element {}: circles need a width",
                index
            )));
        }

        Ok(Element {
            kind: self.kind,
            width,
            fill: self.fill.as_ref().map(PaintConfig::resolve).transpose()?,
            stroke: self.stroke.as_ref().map(PaintConfig::resolve).transpose()?,
            stroke_width,
        })
    }
}

impl PaintConfig {
    /// Parse a comma-separated command-line colour list.
    pub fn from_arg(value: &str) -> Self {
        let stops: Vec<String> = value.split(',').map(|s| s.trim().to_string()).collect();
        if stops.len() == 1 {
            PaintConfig::Solid(stops.into_iter().next().unwrap_or_default())
        } else {
            PaintConfig::Stops(stops)
        }
    }

    fn resolve(&self) -> Result<Paint, GradientError> {
        match self {
            // Single colours pass through, so names like "none" still work
            PaintConfig::Solid(color) => Ok(Paint::Solid(color.clone())),
            PaintConfig::Stops(stops) if stops.is_empty() => {
                Err(invalid("colour list is empty".into()))
            }
            PaintConfig::Stops(stops) => stops
                .iter()
                .map(|s| {
                    Rgb::from_hex_str(s)
                        .map_err(|_| invalid(format!("gradient stop {:?} is not a hex colour", s)))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Paint::Stops),
        }
    }
}

/// Sampling flags shared by the `render` and `data` commands.
///
/// Flags win over values from a `--config` file.
#[derive(Debug, Default)]
pub struct SamplingArgs {
    pub config: Option<String>,
    pub segments: Option<i64>,
    pub samples: Option<i64>,
    pub precision: Option<Option<i64>>,
    pub source: Option<String>,
}

impl SamplingArgs {
    /// Consume the flag at `args[*i]` if it is a sampling flag.
    ///
    /// Returns `Ok(false)` for flags this struct does not know.
    pub fn take_flag(&mut self, args: &[String], i: &mut usize) -> Result<bool, String> {
        match args[*i].as_str() {
            "-c" | "--config" => self.config = Some(flag_value(args, i)?.to_string()),
            "-s" | "--segments" => self.segments = Some(parse_flag(args, i)?),
            "-n" | "--samples" => self.samples = Some(parse_flag(args, i)?),
            "-p" | "--precision" => self.precision = Some(Some(parse_flag(args, i)?)),
            "--no-round" => self.precision = Some(None),
            "--id" => self.source = Some(flag_value(args, i)?.to_string()),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Load the config file (if any) and apply the flags on top.
    pub fn resolve(&self) -> Result<GradientConfig, String> {
        let mut config = match &self.config {
            Some(path) => GradientConfig::load(path)?,
            None => GradientConfig::default(),
        };

        if let Some(segments) = self.segments {
            config.segments = segments;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if let Some(source) = &self.source {
            config.source = Some(source.clone());
        }
        Ok(config)
    }
}

fn invalid(message: String) -> GradientError {
    GradientError::InvalidConfiguration(message)
}

fn positive(value: i64, name: &str) -> Result<usize, GradientError> {
    if value < 1 {
        return Err(invalid(format!("{} must be >= 1, got {}", name, value)));
    }
    usize::try_from(value).map_err(|_| invalid(format!("{} {} is too large", name, value)))
}

fn non_negative(value: Option<f64>, name: &str, index: usize) -> Result<Option<f64>, GradientError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(invalid(format!(
            "element {}: {} must be a non-negative number, got {}",
            index, name, v
        ))),
        other => Ok(other),
    }
}

/// Execute the example command.
pub fn cmd_example() {
    println!(
        r##"# Example gradient-path file
segments: 12     # pieces the path is cut into
samples: 10      # points per piece, shared end point included
precision: 2     # fractional digits kept (null = no rounding)
source: swoop    # id of the path to replace (default: first path)

elements:
  # Filled ribbons, one per segment
  - type: path
    width: 10
    fill: ["#ff6b6b", "#feca57", "#48dbfb"]

  # A thin stroke along each segment
  - type: path
    stroke: "#222222"
    stroke_width: 0.5

  # A dot on every sample
  - type: circle
    width: 3
    fill: ["#222222", "#ffffff"]
"##
    );
}

// ============================================================================
// TESTS
// ============================================================================
