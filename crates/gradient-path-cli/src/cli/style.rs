//! Element styling - colours evaluated at a point's progress along the path.

use colorsys::Rgb;
use serde::{Deserialize, Serialize};

/// What to draw for each piece of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// One `<path>` per segment: a stroked polyline, or a filled outline
    /// when the element has a width
    Path,
    /// One `<circle>` per flattened sample
    Circle,
}

/// A validated element.
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ElementKind,
    pub width: Option<f64>,
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub stroke_width: Option<f64>,
}

/// A paint that may change along the path.
#[derive(Debug, Clone)]
pub enum Paint {
    /// Used verbatim at every progress
    Solid(String),
    /// Colours spread evenly from progress 0 to 1, blended in RGB
    Stops(Vec<Rgb>),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Path => "path",
            ElementKind::Circle => "circle",
        }
    }
}

impl Paint {
    /// Colour at `progress` (clamped to `[0, 1]`).
    pub fn color_at(&self, progress: f64) -> String {
        match self {
            Paint::Solid(color) => color.clone(),
            Paint::Stops(stops) => match stops.as_slice() {
                [] => "none".to_string(),
                [only] => only.to_hex_string(),
                _ => {
                    let scaled = progress.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
                    let index = (scaled.floor() as usize).min(stops.len() - 2);
                    blend(&stops[index], &stops[index + 1], scaled - index as f64).to_hex_string()
                }
            },
        }
    }
}

fn blend(from: &Rgb, to: &Rgb, t: f64) -> Rgb {
    let mix = |a: f64, b: f64| a + (b - a) * t;
    Rgb::new(
        mix(from.get_red(), to.get_red()),
        mix(from.get_green(), to.get_green()),
        mix(from.get_blue(), to.get_blue()),
        None,
    )
}

impl Element {
    /// Attributes shared by every primitive of this element, at `progress`.
    pub fn style_attrs(&self, progress: f64) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::with_capacity(3);

        match (&self.fill, self.kind) {
            (Some(fill), _) => attrs.push(("fill", fill.color_at(progress))),
            // A stroked polyline must not pick up the default black fill
            (None, ElementKind::Path) => attrs.push(("fill", "none".to_string())),
            (None, ElementKind::Circle) => {}
        }
        if let Some(stroke) = &self.stroke {
            attrs.push(("stroke", stroke.color_at(progress)));
        }
        if let Some(width) = self.stroke_width {
            attrs.push(("stroke-width", width.to_string()));
        }

        attrs
    }
}
