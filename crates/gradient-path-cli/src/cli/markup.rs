//! SVG markup for segmented gradients, and PNG rasterization.

use std::path::Path;

use quick_xml::escape::escape;
use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

use gradient_path::{GradientError, Point, Position, SegmentSet};

use super::style::{Element, ElementKind};

/// Build the `<g class="gradient-path">` group for all elements.
///
/// Paths get one `<path class="path-segment">` per segment, styled at the
/// segment's middle sample; circles get one `<circle class="circle-sample">`
/// per flattened sample.
pub fn render_group(
    set: &SegmentSet,
    elements: &[Element],
    precision: Option<u32>,
) -> Result<String, GradientError> {
    let mut svg = String::from("<g class=\"gradient-path\">\n");

    for element in elements {
        svg.push_str(&format!("  <g class=\"element-{}\">\n", element.kind.name()));

        match element.kind {
            ElementKind::Path => {
                for segment in set.iter() {
                    let d = match element.width {
                        // A width means filling, so the segment is outlined first
                        Some(width) => path_data(&segment.outline(width, precision)?, true),
                        None => path_data(&segment.points(), false),
                    };
                    let progress = segment.mid_progress().unwrap_or(0.0);

                    svg.push_str(&format!("    <path class=\"path-segment\" d=\"{}\"", d));
                    push_attrs(&mut svg, element, progress);
                    svg.push_str("/>\n");
                }
            }
            ElementKind::Circle => {
                let radius = element.width.unwrap_or(0.0) / 2.0;
                for sample in set.flatten() {
                    svg.push_str(&format!(
                        "    <circle class=\"circle-sample\" cx=\"{}\" cy=\"{}\" r=\"{}\"",
                        sample.x, sample.y, radius
                    ));
                    push_attrs(&mut svg, element, sample.progress);
                    svg.push_str("/>\n");
                }
            }
        }

        svg.push_str("  </g>\n");
    }

    svg.push_str("</g>\n");
    Ok(svg)
}

fn push_attrs(svg: &mut String, element: &Element, progress: f64) {
    for (name, value) in element.style_attrs(progress) {
        svg.push_str(&format!(" {}=\"{}\"", name, escape(value.as_str())));
    }
}

/// Serialize points as path data: `M x y L x y ...`, closed with `Z`.
pub fn path_data<P: Position>(points: &[P], closed: bool) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let Point { x, y } = p.position();
        let command = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            d.push(' ');
        }
        d.push_str(&format!("{}{} {}", command, x, y));
    }
    if closed && !points.is_empty() {
        d.push_str(" Z");
    }
    d
}

/// Render an SVG document to a PNG file.
pub fn rasterize_png(svg: &str, output: &Path, scale: f32) -> Result<(), Box<dyn std::error::Error>> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options)?;

    let size = tree.size().to_int_size().scale_by(scale).ok_or("Invalid PNG scale")?;
    let mut pixmap = Pixmap::new(size.width(), size.height()).ok_or("Failed to create pixmap")?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    pixmap.save_png(output)?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
