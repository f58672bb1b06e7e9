//! Document elements and their payloads.
//!
//! The payload is a tagged union: arrow-like variants (`Arrow`, `Line`) share `LinearData`
//! through the `linear()` capability accessors, and `Shape` is the bindable box target. Decoding
//! is lenient throughout: malformed payload fields degrade to documented defaults instead of
//! failing the document load. The only hard error at this layer is asking a non-linear payload
//! for its linear data through `expect_linear`, which is a caller wiring bug, not a data
//! condition.

use crate::binding::{Binding, ElementId, RawBinding};
use crate::geom::{Point, Rect, point};
use crate::space::Space;
use crate::style::{ArrowheadStyle, ShaftKind, StrokeStyle};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_STROKE_COLOR: &str = "#1e1e1e";

/// A user-pinned orthogonal run of an elbow shaft. `index` is the index of the segment's first
/// point in the points list; `start`/`end` are local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixedSegment {
    pub index: usize,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearData {
    /// Control points normalized to `[0,1]` within the owning element's rect; always ≥ 2.
    pub points: Vec<Point>,
    pub kind: ShaftKind,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub stroke_color: String,
    pub start_arrowhead: ArrowheadStyle,
    pub end_arrowhead: ArrowheadStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_binding: Option<Binding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_binding: Option<Binding>,
    /// Elbow-only: user-pinned orthogonal runs preserved across re-routing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_segments: Option<Vec<FixedSegment>>,
    /// Elbow-only: the start endpoint sits exactly on the target boundary instead of being
    /// routed with a stand-off gap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_is_exact: Option<bool>,
    /// Elbow-only: same as `start_is_exact` for the end endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_is_exact: Option<bool>,
}

impl Default for LinearData {
    fn default() -> Self {
        Self {
            points: default_points(),
            kind: ShaftKind::Straight,
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_style: StrokeStyle::Solid,
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            start_arrowhead: ArrowheadStyle::None,
            end_arrowhead: ArrowheadStyle::Triangle,
            start_binding: None,
            end_binding: None,
            fixed_segments: None,
            start_is_exact: None,
            end_is_exact: None,
        }
    }
}

/// Canonical fallback when fewer than two control points decode.
pub fn default_points() -> Vec<Point> {
    vec![point(0.0, 0.0), point(1.0, 1.0)]
}

impl LinearData {
    pub fn with_kind(kind: ShaftKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn binding(&self, end: LineEnd) -> Option<&Binding> {
        match end {
            LineEnd::Start => self.start_binding.as_ref(),
            LineEnd::End => self.end_binding.as_ref(),
        }
    }

    pub fn is_exact(&self, end: LineEnd) -> bool {
        match end {
            LineEnd::Start => self.start_is_exact.unwrap_or(false),
            LineEnd::End => self.end_is_exact.unwrap_or(false),
        }
    }

    pub fn arrowhead(&self, end: LineEnd) -> ArrowheadStyle {
        match end {
            LineEnd::Start => self.start_arrowhead,
            LineEnd::End => self.end_arrowhead,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    Start,
    End,
}

impl LineEnd {
    pub fn opposite(self) -> LineEnd {
        match self {
            LineEnd::Start => LineEnd::End,
            LineEnd::End => LineEnd::Start,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawLinear {
    points: Option<Vec<Point>>,
    kind: Option<String>,
    stroke_width: Option<f64>,
    stroke_style: Option<String>,
    stroke_color: Option<String>,
    start_arrowhead: Option<String>,
    end_arrowhead: Option<String>,
    start_binding: Option<RawBinding>,
    end_binding: Option<RawBinding>,
    fixed_segments: Option<Vec<FixedSegment>>,
    start_is_exact: Option<bool>,
    end_is_exact: Option<bool>,
}

impl RawLinear {
    fn normalize(self) -> LinearData {
        let defaults = LinearData::default();
        let mut points: Vec<Point> = self
            .points
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.sanitized().clamp01())
            .collect();
        if points.len() < 2 {
            points = default_points();
        }
        let stroke_width = match self.stroke_width {
            Some(w) if w.is_finite() && w > 0.0 => w,
            _ => defaults.stroke_width,
        };
        LinearData {
            points,
            kind: self
                .kind
                .as_deref()
                .and_then(ShaftKind::from_name)
                .unwrap_or(defaults.kind),
            stroke_width,
            stroke_style: self
                .stroke_style
                .as_deref()
                .and_then(StrokeStyle::from_name)
                .unwrap_or(defaults.stroke_style),
            stroke_color: self.stroke_color.unwrap_or(defaults.stroke_color),
            start_arrowhead: self
                .start_arrowhead
                .as_deref()
                .and_then(ArrowheadStyle::from_name)
                .unwrap_or(defaults.start_arrowhead),
            end_arrowhead: self
                .end_arrowhead
                .as_deref()
                .and_then(ArrowheadStyle::from_name)
                .unwrap_or(defaults.end_arrowhead),
            start_binding: self.start_binding.and_then(RawBinding::normalize),
            end_binding: self.end_binding.and_then(RawBinding::normalize),
            fixed_segments: self.fixed_segments.filter(|segs| !segs.is_empty()),
            start_is_exact: self.start_is_exact,
            end_is_exact: self.end_is_exact,
        }
    }
}

impl<'de> Deserialize<'de> for LinearData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(RawLinear::deserialize(deserializer)?.normalize())
    }
}

/// Bindable box target. The orbit gap for arrows bound to this element scales from its stroke
/// width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeData {
    pub stroke_width: f64,
}

impl Default for ShapeData {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementData {
    Arrow(LinearData),
    Line(LinearData),
    Shape(ShapeData),
}

impl ElementData {
    pub fn linear(&self) -> Option<&LinearData> {
        match self {
            ElementData::Arrow(data) | ElementData::Line(data) => Some(data),
            ElementData::Shape(_) => None,
        }
    }

    pub fn linear_mut(&mut self) -> Option<&mut LinearData> {
        match self {
            ElementData::Arrow(data) | ElementData::Line(data) => Some(data),
            ElementData::Shape(_) => None,
        }
    }

    pub fn is_arrow_like(&self) -> bool {
        self.linear().is_some()
    }

    /// Arrow variants render a head at both configured ends; plain lines only at the end the
    /// user styled. Everything else treats both variants identically through `linear()`.
    pub fn is_arrow(&self) -> bool {
        matches!(self, ElementData::Arrow(_))
    }

    pub fn is_bindable(&self) -> bool {
        matches!(self, ElementData::Shape(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(default = "zero_rect")]
    pub rect: Rect,
    /// Radians, about the rect center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Cheap mutation counter bumped by the owning store; derived-geometry caches key on it.
    #[serde(default)]
    pub revision: u64,
    pub data: ElementData,
}

fn zero_rect() -> Rect {
    Rect::new(0.0, 0.0, 0.0, 0.0)
}

fn default_opacity() -> f64 {
    1.0
}

impl Element {
    pub fn new(id: impl Into<ElementId>, rect: Rect, data: ElementData) -> Self {
        Self {
            id: id.into(),
            rect,
            rotation: 0.0,
            opacity: 1.0,
            revision: 0,
            data,
        }
    }

    pub fn space(&self) -> Space {
        Space::for_rect(&self.rect, self.rotation)
    }

    pub fn linear(&self) -> Option<&LinearData> {
        self.data.linear()
    }

    pub fn linear_mut(&mut self) -> Option<&mut LinearData> {
        self.data.linear_mut()
    }

    /// Contract accessor for call sites that are only ever handed arrow-like elements (the
    /// renderer, the hit tester's shaft path). A non-linear payload here is a wiring bug in the
    /// caller and fails fast.
    pub fn expect_linear(&self) -> &LinearData {
        match self.data.linear() {
            Some(data) => data,
            None => panic!("element `{}` is not arrow-like", self.id),
        }
    }

    pub fn is_bindable(&self) -> bool {
        self.data.is_bindable()
    }

    /// Stroke width of the payload, whichever variant carries it.
    pub fn stroke_width(&self) -> f64 {
        match &self.data {
            ElementData::Arrow(data) | ElementData::Line(data) => data.stroke_width,
            ElementData::Shape(data) => data.stroke_width,
        }
    }

    /// World-space axis-aligned bounding box of the (possibly rotated) rect.
    pub fn world_aabb(&self) -> Rect {
        if self.rotation == 0.0 {
            return self.rect;
        }
        let space = self.space();
        let corners = [
            point(self.rect.min_x, self.rect.min_y),
            point(self.rect.max_x, self.rect.min_y),
            point(self.rect.max_x, self.rect.max_y),
            point(self.rect.min_x, self.rect.max_y),
        ];
        Rect::from_points(corners.into_iter().map(|c| space.to_world(c)))
            .unwrap_or(self.rect)
    }
}

/// The owning document view this engine consumes: elements in z-order (insertion order) plus a
/// monotonic version counter for incremental index maintenance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub elements: IndexMap<ElementId, Element>,
    pub elements_version: u64,
}

impl Document {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn insert(&mut self, element: Element) {
        self.elements.insert(element.id.clone(), element);
        self.elements_version += 1;
    }

    /// Z-order of an element: insertion index, higher is on top.
    pub fn z_index(&self, id: &str) -> Option<usize> {
        self.elements.get_index_of(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ArrowheadStyle;

    #[test]
    fn linear_decode_falls_back_to_defaults() {
        let data: LinearData = serde_json::from_str(
            r#"{"points":[{"x":0.2,"y":0.2}],"kind":"zigzag","endArrowhead":"harpoon"}"#,
        )
        .unwrap();
        assert_eq!(data.points, default_points());
        assert_eq!(data.kind, ShaftKind::Straight);
        assert_eq!(data.end_arrowhead, ArrowheadStyle::Triangle);
        assert_eq!(data.start_arrowhead, ArrowheadStyle::None);
        assert_eq!(data.stroke_width, DEFAULT_STROKE_WIDTH);
    }

    #[test]
    fn linear_decode_clamps_points() {
        let data: LinearData = serde_json::from_str(
            r#"{"points":[{"x":-0.5,"y":0.25},{"x":2.0,"y":0.75}],"kind":"curved"}"#,
        )
        .unwrap();
        assert_eq!(data.points, vec![point(0.0, 0.25), point(1.0, 0.75)]);
        assert_eq!(data.kind, ShaftKind::Curved);
    }

    #[test]
    #[should_panic(expected = "not arrow-like")]
    fn expect_linear_panics_on_shape() {
        let el = Element::new(
            "box",
            Rect::new(0.0, 0.0, 10.0, 10.0),
            ElementData::Shape(ShapeData::default()),
        );
        let _ = el.expect_linear();
    }

    #[test]
    fn world_aabb_of_rotated_rect_covers_corners() {
        let mut el = Element::new(
            "box",
            Rect::new(0.0, 0.0, 10.0, 0.0),
            ElementData::Shape(ShapeData::default()),
        );
        el.rotation = std::f64::consts::FRAC_PI_2;
        let aabb = el.world_aabb();
        assert!((aabb.width() - 0.0).abs() < 1e-9);
        assert!((aabb.height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn document_round_trips_geometry() {
        let mut doc = Document::default();
        let mut data = LinearData::with_kind(ShaftKind::Curved);
        data.points = vec![point(0.0, 0.0), point(0.5, 0.25), point(1.0, 1.0)];
        doc.insert(Element::new(
            "a1",
            Rect::new(10.0, 20.0, 110.0, 70.0),
            ElementData::Arrow(data),
        ));
        let json = doc.to_json().unwrap();
        let back = Document::from_json(&json).unwrap();
        assert_eq!(back.elements, doc.elements);
    }
}
