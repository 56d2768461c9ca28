//! SVG input - turn SVG path data into measurable geometry.
//!
//! Uses usvg for complete SVG resolution (CSS, transforms, basic shapes)
//! and svgtypes for bare `d=""` strings, then flattens everything into a
//! [`PolylinePath`] that answers arc-length queries.
//!
//! ## Curve Flattening
//!
//! SVG paths contain Bézier curves (cubic and quadratic). We use lyon_geom
//! to approximate them with line segments; arc length is then the sum of
//! segment lengths. The tolerance is tighter than what a plotter needs
//! because every sample position depends on the accumulated length.

use log::debug;
use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::{GradientError, SvgError};
use crate::geometry::Point;
use crate::sampler::PathGeometry;

/// Tolerance for curve flattening, in user units.
const CURVE_TOLERANCE: f64 = 0.01;

/// Elements usvg turns into paths.
const SHAPE_ELEMENTS: &[&[u8]] = &[
    b"path", b"line", b"polyline", b"polygon", b"rect", b"circle", b"ellipse",
];

/// Prefix for ids given to anonymous shapes while locating the source.
const GENERATED_ID_PREFIX: &str = "gradient-path-shape-";

/// Containers whose children are never rendered in place.
const NON_RENDERED_CONTAINERS: &[&[u8]] = &[
    b"defs", b"clipPath", b"mask", b"pattern", b"symbol", b"marker",
];

/// A flattened path: straight edges with cumulative arc length.
///
/// Subpaths are joined without the move-to jump, so a path made of two
/// disjoint strokes measures the sum of both strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylinePath {
    edges: Vec<Edge>,
    start: Option<Point>,
    length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    from: Point,
    to: Point,
    /// Arc length at `from`
    offset: f64,
    length: f64,
}

impl PolylinePath {
    /// A single open polyline through `points`.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self::from_subpaths(vec![points])
    }

    /// Several polylines measured back to back.
    pub fn from_subpaths(subpaths: Vec<Vec<Point>>) -> Self {
        let start = subpaths.iter().find_map(|s| s.first().copied());
        let mut edges = Vec::new();
        let mut length = 0.0;

        for subpath in &subpaths {
            for pair in subpath.windows(2) {
                let edge_length = pair[0].distance(pair[1]);
                edges.push(Edge {
                    from: pair[0],
                    to: pair[1],
                    offset: length,
                    length: edge_length,
                });
                length += edge_length;
            }
        }

        Self { edges, start, length }
    }

    /// Parse an SVG `d` attribute.
    ///
    /// Relative commands, shorthand curves and arcs are normalized by
    /// svgtypes before flattening.
    pub fn from_path_data(data: &str) -> Result<Self, SvgError> {
        let mut builder = PolylineBuilder::default();

        for segment in svgtypes::SimplifyingPathParser::from(data) {
            let segment = segment.map_err(|e| SvgError::Parse(e.to_string()))?;
            match segment {
                svgtypes::SimplePathSegment::MoveTo { x, y } => builder.move_to(Point::new(x, y)),
                svgtypes::SimplePathSegment::LineTo { x, y } => builder.line_to(Point::new(x, y)),
                svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                    builder.quad_to(Point::new(x1, y1), Point::new(x, y))
                }
                svgtypes::SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => builder.cubic_to(
                    Point::new(x1, y1),
                    Point::new(x2, y2),
                    Point::new(x, y),
                ),
                svgtypes::SimplePathSegment::ClosePath => builder.close(),
            }
        }

        builder.finish().ok_or(SvgError::NoPath)
    }

    /// Number of straight edges after flattening.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl PathGeometry for PolylinePath {
    fn total_length(&self) -> Result<f64, GradientError> {
        match self.start {
            Some(_) => Ok(self.length),
            None => Err(GradientError::GeometryUnavailable("path has no points".into())),
        }
    }

    fn point_at_distance(&self, distance: f64) -> Result<Point, GradientError> {
        if !distance.is_finite() {
            return Err(GradientError::GeometryUnavailable(format!(
                "cannot locate a point at distance {}",
                distance
            )));
        }

        let Some(last) = self.edges.len().checked_sub(1) else {
            // Zero edges: every distance maps onto the lone point, if any
            return self
                .start
                .ok_or_else(|| GradientError::GeometryUnavailable("path has no points".into()));
        };

        let distance = distance.clamp(0.0, self.length);
        let index = self
            .edges
            .partition_point(|e| e.offset + e.length < distance)
            .min(last);
        let edge = &self.edges[index];

        let t = if edge.length > 0.0 {
            ((distance - edge.offset) / edge.length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Ok(edge.from.lerp(edge.to, t))
    }
}

/// Accumulates flattened subpaths while walking path commands.
#[derive(Default)]
struct PolylineBuilder {
    subpaths: Vec<Vec<Point>>,
    current: Vec<Point>,
}

impl PolylineBuilder {
    fn move_to(&mut self, p: Point) {
        self.end_subpath();
        self.current.push(p);
    }

    fn line_to(&mut self, p: Point) {
        if self.current.is_empty() {
            // Drawing without a move-to starts at the origin, as browsers do
            self.current.push(Point::new(0.0, 0.0));
        }
        self.current.push(p);
    }

    fn quad_to(&mut self, ctrl: Point, to: Point) {
        let Some(&from) = self.current.last() else {
            self.line_to(to);
            return;
        };
        let curve = QuadraticBezierSegment {
            from: point(from.x, from.y),
            ctrl: point(ctrl.x, ctrl.y),
            to: point(to.x, to.y),
        };

        // Callback receives LineSegment, we take the endpoint of each segment
        curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
            self.current.push(Point::new(segment.to.x, segment.to.y));
        });
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let Some(&from) = self.current.last() else {
            self.line_to(to);
            return;
        };
        let curve = CubicBezierSegment {
            from: point(from.x, from.y),
            ctrl1: point(ctrl1.x, ctrl1.y),
            ctrl2: point(ctrl2.x, ctrl2.y),
            to: point(to.x, to.y),
        };

        curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
            self.current.push(Point::new(segment.to.x, segment.to.y));
        });
    }

    /// Close the current subpath; drawing continues from its first point.
    fn close(&mut self) {
        let (Some(&first), Some(&last)) = (self.current.first(), self.current.last()) else {
            return;
        };
        if first != last {
            self.current.push(first);
        }
        self.end_subpath();
        self.current.push(first);
    }

    fn end_subpath(&mut self) {
        if !self.current.is_empty() {
            self.subpaths.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Option<PolylinePath> {
        self.end_subpath();
        let start = self.subpaths.first()?.first().copied()?;

        // Lone points (a bare move-to, the restart after a close) add no edges
        self.subpaths.retain(|s| s.len() > 1);
        if self.subpaths.is_empty() {
            return Some(PolylinePath::from_points(vec![start]));
        }
        Some(PolylinePath::from_subpaths(self.subpaths))
    }
}

/// A path picked out of a document, along with where it sits in the markup.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePath {
    pub geometry: PolylinePath,
    /// Document-order index of the source among all shape elements, as
    /// taken by [`splice_gradient`]. `None` when the rendered path has no
    /// element of its own, e.g. one instantiated by `<use>` from `<defs>`.
    pub element: Option<usize>,
}

impl SourcePath {
    /// The element to remove when splicing.
    pub fn element(&self) -> Result<usize, SvgError> {
        self.element.ok_or(SvgError::DetachedSource)
    }
}

/// Load one path from a full SVG document.
///
/// With `id`, the path carrying that id is used; otherwise the first path in
/// document order. Basic shapes count as paths. The element's absolute
/// transform is applied, so coordinates are in root user space.
pub fn load_path_from_svg(svg_content: &str, id: Option<&str>) -> Result<PolylinePath, SvgError> {
    Ok(load_source_from_svg(svg_content, id)?.geometry)
}

/// Like [`load_path_from_svg`], also reporting which element was chosen.
///
/// The choice is made on the rendered tree, so hidden, invalid or
/// zero-sized shapes that usvg drops are never picked.
pub fn load_source_from_svg(svg_content: &str, id: Option<&str>) -> Result<SourcePath, SvgError> {
    // usvg only reports ids, so every shape gets one before parsing
    let (tagged, shape_ids) =
        tag_shapes(svg_content).map_err(|e| SvgError::Parse(e.to_string()))?;

    let options = usvg::Options::default();
    let tree =
        usvg::Tree::from_str(&tagged, &options).map_err(|e| SvgError::Parse(e.to_string()))?;

    let path = find_path(tree.root(), id).ok_or_else(|| match id {
        Some(id) => SvgError::PathNotFound(id.to_string()),
        None => SvgError::NoPath,
    })?;

    let geometry = usvg_path_to_polyline(path).ok_or(SvgError::NoPath)?;
    let element = shape_ids
        .iter()
        .position(|shape| shape.as_deref() == Some(path.id()));
    debug!(
        "loaded path {:?} (element {:?}): {} edges, length {:.3}",
        path.id(),
        element,
        geometry.edge_count(),
        geometry.length
    );
    Ok(SourcePath { geometry, element })
}

/// Depth-first search for a path, optionally matching an id.
fn find_path<'a>(group: &'a usvg::Group, id: Option<&str>) -> Option<&'a usvg::Path> {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => {
                if let Some(path) = find_path(group, id) {
                    return Some(path);
                }
            }
            usvg::Node::Path(path) => {
                if id.is_none_or(|id| path.id() == id) {
                    return Some(&**path);
                }
            }
            // Ignore text, images, etc.
            _ => {}
        }
    }
    None
}

fn usvg_path_to_polyline(path: &usvg::Path) -> Option<PolylinePath> {
    let ts = path.abs_transform();
    let map = |p: usvg::tiny_skia_path::Point| {
        Point::new(
            (ts.sx * p.x + ts.kx * p.y + ts.tx) as f64,
            (ts.ky * p.x + ts.sy * p.y + ts.ty) as f64,
        )
    };

    let mut builder = PolylineBuilder::default();
    for segment in path.data().segments() {
        match segment {
            usvg::tiny_skia_path::PathSegment::MoveTo(p) => builder.move_to(map(p)),
            usvg::tiny_skia_path::PathSegment::LineTo(p) => builder.line_to(map(p)),
            usvg::tiny_skia_path::PathSegment::QuadTo(ctrl, p) => builder.quad_to(map(ctrl), map(p)),
            usvg::tiny_skia_path::PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                builder.cubic_to(map(ctrl1), map(ctrl2), map(p))
            }
            usvg::tiny_skia_path::PathSegment::Close => builder.close(),
        }
    }
    builder.finish()
}

/// Rewrite `svg_content`, removing the source element and appending `markup`
/// as the last child of the root `<svg>`.
///
/// `source` is the document-order index of the element among all shape
/// elements, as found by [`load_source_from_svg`]. Everything else is
/// streamed through untouched.
pub fn splice_gradient(svg_content: &str, source: usize, markup: &str) -> Result<String, SvgError> {
    let mut reader = Reader::from_str(svg_content);
    let mut writer = Writer::new(Vec::new());

    let mut depth = 0usize;
    let mut skip_depth = 0usize;
    let mut shapes_seen = 0usize;
    let mut removed = false;
    let mut inserted = false;

    loop {
        match read_event(&mut reader)? {
            Event::Start(e) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                    continue;
                }
                if !removed && is_shape(&e) {
                    shapes_seen += 1;
                    if shapes_seen - 1 == source {
                        removed = true;
                        skip_depth = 1;
                        continue;
                    }
                }
                depth += 1;
                write_event(&mut writer, Event::Start(e))?;
            }
            Event::Empty(e) => {
                if skip_depth > 0 {
                    continue;
                }
                if !removed && is_shape(&e) {
                    shapes_seen += 1;
                    if shapes_seen - 1 == source {
                        removed = true;
                        continue;
                    }
                }
                write_event(&mut writer, Event::Empty(e))?;
            }
            Event::End(e) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                if depth == 1 && e.local_name().as_ref() == b"svg" {
                    write_event(&mut writer, Event::Text(BytesText::from_escaped(markup)))?;
                    inserted = true;
                }
                depth = depth.saturating_sub(1);
                write_event(&mut writer, Event::End(e))?;
            }
            Event::Eof => break,
            other => {
                if skip_depth == 0 {
                    write_event(&mut writer, other)?;
                }
            }
        }
    }

    if !removed {
        return Err(SvgError::ShapeNotFound(source));
    }
    if !inserted {
        return Err(SvgError::Xml("document has no closing </svg>".into()));
    }

    String::from_utf8(writer.into_inner()).map_err(|e| SvgError::Xml(e.to_string()))
}

/// Give every shape element without an id a generated one.
///
/// Returns the rewritten document and, per shape in document order, the id
/// usvg will report for it. Shapes inside `<defs>` and other non-rendered
/// containers map to `None`: they only render through references.
fn tag_shapes(svg_content: &str) -> Result<(String, Vec<Option<String>>), SvgError> {
    let mut reader = Reader::from_str(svg_content);
    let mut writer = Writer::new(Vec::new());
    let mut shape_ids = Vec::new();
    let mut hidden_depth = 0usize;

    loop {
        match read_event(&mut reader)? {
            Event::Start(e) => {
                let hidden = hidden_depth > 0;
                if hidden || NON_RENDERED_CONTAINERS.contains(&e.local_name().as_ref()) {
                    hidden_depth += 1;
                }
                let e = tag_shape(e, hidden, &mut shape_ids)?;
                write_event(&mut writer, Event::Start(e))?;
            }
            Event::Empty(e) => {
                let e = tag_shape(e, hidden_depth > 0, &mut shape_ids)?;
                write_event(&mut writer, Event::Empty(e))?;
            }
            Event::End(e) => {
                hidden_depth = hidden_depth.saturating_sub(1);
                write_event(&mut writer, Event::End(e))?;
            }
            Event::Eof => break,
            other => write_event(&mut writer, other)?,
        }
    }

    let tagged = String::from_utf8(writer.into_inner()).map_err(|e| SvgError::Xml(e.to_string()))?;
    Ok((tagged, shape_ids))
}

fn tag_shape<'a>(
    element: BytesStart<'a>,
    hidden: bool,
    shape_ids: &mut Vec<Option<String>>,
) -> Result<BytesStart<'a>, SvgError> {
    if !is_shape(&element) {
        return Ok(element);
    }

    let (element, id) = match element_id(&element)? {
        Some(id) => (element, id),
        None => {
            let id = format!("{}{}", GENERATED_ID_PREFIX, shape_ids.len());
            let mut tagged = element;
            tagged.push_attribute(("id", id.as_str()));
            (tagged, id)
        }
    };
    shape_ids.push((!hidden).then_some(id));
    Ok(element)
}

fn element_id(element: &BytesStart) -> Result<Option<String>, SvgError> {
    let attr = element
        .try_get_attribute("id")
        .map_err(|e| SvgError::Xml(e.to_string()))?;
    match attr {
        Some(attr) => attr
            .unescape_value()
            .map(|value| Some(value.into_owned()))
            .map_err(|e| SvgError::Xml(e.to_string())),
        None => Ok(None),
    }
}

fn is_shape(element: &BytesStart) -> bool {
    SHAPE_ELEMENTS.contains(&element.local_name().as_ref())
}

fn read_event<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>, SvgError> {
    match reader.read_event() {
        Ok(event) => Ok(event),
        Err(e) => Err(SvgError::Xml(format!(
            "at position {}: {}",
            reader.error_position(),
            e
        ))),
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event) -> Result<(), SvgError> {
    writer
        .write_event(event)
        .map_err(|e| SvgError::Xml(e.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================
