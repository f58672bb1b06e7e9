//! Arrow hit testing over cached flattened geometry.
//!
//! The tester converts the query point into the element's local frame, early-rejects against an
//! inflated bounding box, then runs closed-form point-to-segment tests against the drawn shaft
//! and each rendered arrowhead. Derived per-element geometry is cached keyed by
//! `(rect, rotation, revision)` behind a small most-recently-used ring plus a bounded map, so
//! repeated hits on the same elements are allocation-free.

use crate::arrowhead::{
    HeadShape, arrowhead_shape, direction_sample_offset, head_extent, shaft_inset,
};
use crate::config::EngineConfig;
use crate::shaft::{
    ShaftGeometry, flatten_shaft, resolve_world_points, shaft_bounds, shaft_geometry, trim_path,
};
use remora_core::binding::ElementId;
use remora_core::element::{Element, LineEnd};
use remora_core::geom::{Point, Rect, point_segment_distance};
use remora_core::style::ArrowheadStyle;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::trace;

const RING_CAPACITY: usize = 8;
const MAP_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    rect: Rect,
    rotation: f64,
    revision: u64,
}

impl CacheKey {
    fn of(element: &Element) -> Self {
        Self {
            rect: element.rect,
            rotation: element.rotation,
            revision: element.revision,
        }
    }
}

#[derive(Debug, Clone)]
struct ElementGeometry {
    key: CacheKey,
    /// Drawn shaft in the local frame, flattened and shortened by arrowhead insets.
    shaft: Vec<Point>,
    heads: Vec<HeadShape>,
    /// Geometry bounds pre-inflated by stroke half-width + arrowhead extent; the query adds its
    /// own tolerance.
    bounds: Rect,
    half_stroke: f64,
}

#[derive(Debug, Default)]
pub struct HitTester {
    config: EngineConfig,
    /// Most-recently-used element ids, front first.
    ring: VecDeque<ElementId>,
    map: FxHashMap<ElementId, ElementGeometry>,
}

impl HitTester {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ring: VecDeque::with_capacity(RING_CAPACITY),
            map: FxHashMap::default(),
        }
    }

    /// Does `world_point` hit the arrow-like `element` within `tolerance`?
    pub fn hit_test(&mut self, element: &Element, world_point: Point, tolerance: f64) -> bool {
        let local = element.space().from_world(world_point);
        let geometry = self.geometry(element);

        if !geometry.bounds.inflate(tolerance).contains(local) {
            return false;
        }

        let band = tolerance + geometry.half_stroke;
        for leg in geometry.shaft.windows(2) {
            if point_segment_distance(local, leg[0], leg[1]) <= band {
                return true;
            }
        }
        geometry.heads.iter().any(|head| hit_head(head, local, band))
    }

    /// Drawn shaft polyline in the local frame (shortened by arrowhead insets). Exposed so
    /// callers can observe geometry refresh through outputs rather than cache internals.
    pub fn drawn_shaft(&mut self, element: &Element) -> &[Point] {
        &self.geometry(element).shaft
    }

    /// Rendered arrowhead shapes in the local frame.
    pub fn heads(&mut self, element: &Element) -> &[HeadShape] {
        &self.geometry(element).heads
    }

    fn geometry(&mut self, element: &Element) -> &ElementGeometry {
        let key = CacheKey::of(element);
        let fresh = self
            .map
            .get(&element.id)
            .is_some_and(|cached| cached.key == key);

        if fresh {
            self.promote(&element.id);
        } else {
            trace!(element = %element.id, "hit geometry cache miss");
            let built = build_geometry(element, key, &self.config);
            self.map.insert(element.id.clone(), built);
            self.promote(&element.id);
            if self.map.len() > MAP_CAPACITY {
                let ring = &self.ring;
                self.map.retain(|id, _| ring.contains(id));
            }
        }
        &self.map[&element.id]
    }

    fn promote(&mut self, id: &ElementId) {
        if self.ring.front().is_some_and(|f| f == id) {
            return;
        }
        if let Some(pos) = self.ring.iter().position(|r| r == id) {
            self.ring.remove(pos);
        }
        self.ring.push_front(id.clone());
        self.ring.truncate(RING_CAPACITY);
    }
}

fn build_geometry(element: &Element, key: CacheKey, config: &EngineConfig) -> ElementGeometry {
    let data = element.expect_linear();
    // Local frame: the rect without its rotation applied.
    let local_points = resolve_world_points(&element.rect, 0.0, &data.points);
    let geometry = shaft_geometry(data.kind, &local_points, config);
    let flat = flatten_shaft(
        &geometry,
        config.flatness_tolerance,
        config.max_flatten_points,
    );

    let start_style = data.arrowhead(LineEnd::Start);
    let end_style = data.arrowhead(LineEnd::End);
    let shaft = trim_path(
        &flat,
        shaft_inset(start_style, data.stroke_width),
        shaft_inset(end_style, data.stroke_width),
    );

    let mut heads = Vec::new();
    for (style, at_end) in [(start_style, false), (end_style, true)] {
        if style == ArrowheadStyle::None {
            continue;
        }
        let tip = if at_end {
            flat[flat.len() - 1]
        } else {
            flat[0]
        };
        let offset = direction_sample_offset(style, data.stroke_width);
        if let Some(dir) = crate::shaft::direction_at_end(&flat, at_end, offset) {
            if let Some(shape) = arrowhead_shape(tip, dir, style, data.stroke_width) {
                heads.push(shape);
            }
        }
    }

    let extent = head_extent(start_style, data.stroke_width)
        .max(head_extent(end_style, data.stroke_width));
    let half_stroke = data.stroke_width / 2.0;
    let bounds = shaft_bounds(&geometry).inflate(half_stroke + extent);

    ElementGeometry {
        key,
        shaft,
        heads,
        bounds,
        half_stroke,
    }
}

fn hit_head(head: &HeadShape, p: Point, band: f64) -> bool {
    match head {
        HeadShape::Strokes(segments) => segments
            .iter()
            .any(|[a, b]| point_segment_distance(p, *a, *b) <= band),
        HeadShape::Polygon(points) => {
            if polygon_contains(points, p) {
                return true;
            }
            (0..points.len()).any(|i| {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                point_segment_distance(p, a, b) <= band
            })
        }
        HeadShape::Disc { center, radius } => (p.distance_to(*center) - radius).abs() <= band,
    }
}

fn polygon_contains(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use remora_core::geom::point;

    #[test]
    fn polygon_contains_centroid() {
        let tri = vec![point(0.0, 0.0), point(10.0, 0.0), point(5.0, 10.0)];
        assert!(polygon_contains(&tri, point(5.0, 3.0)));
        assert!(!polygon_contains(&tri, point(-1.0, 3.0)));
    }

    #[test]
    fn disc_hit_is_an_annular_band() {
        let head = HeadShape::Disc {
            center: point(0.0, 0.0),
            radius: 10.0,
        };
        assert!(hit_head(&head, point(10.5, 0.0), 1.0));
        assert!(hit_head(&head, point(9.5, 0.0), 1.0));
        assert!(!hit_head(&head, point(0.0, 0.0), 1.0));
    }
}
