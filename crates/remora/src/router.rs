//! Obstacle-aware routing for orbit-bound elbow endpoints.
//!
//! A bound elbow endpoint must approach its target perpendicular to the anchored edge, and the
//! route must not cut through the target rectangle (the world AABB of the possibly-rotated
//! target). The router only edits the terminal region of the path, so interior runs (including
//! user-pinned fixed segments) survive untouched.

use crate::bind::orbit_gap;
use crate::config::EngineConfig;
use crate::elbow::{Axis, segment_axis};
use remora_core::binding::Binding;
use remora_core::element::{Element, LineEnd};
use remora_core::geom::{Point, Rect, point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Axis of a segment approaching this edge perpendicularly.
    pub fn approach_axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Horizontal,
            Edge::Top | Edge::Bottom => Axis::Vertical,
        }
    }

    pub fn outward(self) -> Point {
        match self {
            Edge::Top => point(0.0, -1.0),
            Edge::Right => point(1.0, 0.0),
            Edge::Bottom => point(0.0, 1.0),
            Edge::Left => point(-1.0, 0.0),
        }
    }
}

/// Edge of the target nearest the normalized anchor. Corner anchors (two sides equally near)
/// tie-break on the approaching segment's dominant axis.
pub fn bound_edge(anchor: Point, approach: Point) -> Edge {
    let a = anchor.clamp01();
    let to_left = a.x;
    let to_right = 1.0 - a.x;
    let to_top = a.y;
    let to_bottom = 1.0 - a.y;
    let horizontal_min = to_left.min(to_right);
    let vertical_min = to_top.min(to_bottom);

    let pick_horizontal = if horizontal_min == vertical_min {
        approach.x.abs() >= approach.y.abs()
    } else {
        horizontal_min < vertical_min
    };

    if pick_horizontal {
        if to_left <= to_right { Edge::Left } else { Edge::Right }
    } else if to_top <= to_bottom {
        Edge::Top
    } else {
        Edge::Bottom
    }
}

/// Route produced by the router: points plus parallel auto-inserted flags (`true` for points the
/// router synthesized, `false` for user-placed ones).
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    pub points: Vec<Point>,
    pub auto: Vec<bool>,
}

impl RoutedPath {
    fn reversed(mut self) -> Self {
        self.points.reverse();
        self.auto.reverse();
        self
    }
}

/// Does an axis-aligned segment pass through the rect's open interior?
fn segment_crosses_interior(a: Point, b: Point, rect: &Rect) -> bool {
    let (min_x, max_x) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
    let (min_y, max_y) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
    min_x < rect.max_x && max_x > rect.min_x && min_y < rect.max_y && max_y > rect.min_y
}

/// Re-route the terminal region of an orthogonal path so it approaches the bound edge
/// perpendicularly, detouring around the target rectangle when needed.
pub fn route_elbow_end(
    points: &[Point],
    end: LineEnd,
    target: &Element,
    binding: &Binding,
    exact: bool,
    config: &EngineConfig,
) -> RoutedPath {
    if points.len() < 2 {
        return RoutedPath {
            points: points.to_vec(),
            auto: vec![false; points.len()],
        };
    }
    match end {
        LineEnd::End => route_end(points, target, binding, exact, config),
        LineEnd::Start => {
            let mut rev: Vec<Point> = points.to_vec();
            rev.reverse();
            route_end(&rev, target, binding, exact, config).reversed()
        }
    }
}

fn route_end(
    points: &[Point],
    target: &Element,
    binding: &Binding,
    exact: bool,
    config: &EngineConfig,
) -> RoutedPath {
    let aabb = target.world_aabb();
    let endpoint = points[points.len() - 1];
    let prev = points[points.len() - 2];
    let edge = bound_edge(binding.anchor, endpoint - prev);
    let outward = edge.outward();

    // Terminal segment already perpendicular to the bound edge, arriving from outside.
    if segment_axis(prev, endpoint) == Some(edge.approach_axis())
        && (prev - endpoint).dot(outward) > 0.0
    {
        return RoutedPath {
            points: points.to_vec(),
            auto: vec![false; points.len()],
        };
    }

    let standoff = orbit_gap(target, exact, config) + config.snap_distance;
    let approach = endpoint + outward * standoff;

    // Walk backward past points strictly inside the target rect.
    let mut retained_idx = points.len() - 2;
    while retained_idx > 0 && aabb.contains_strict(points[retained_idx]) {
        retained_idx -= 1;
    }
    let retained = points[retained_idx];

    let mut out: Vec<Point> = points[..=retained_idx].to_vec();
    let mut auto: Vec<bool> = vec![false; out.len()];

    // Shortest clear orthogonal dogleg to the approach point. Prefer arriving along the edge
    // normal so the final corner does not double back.
    let h_first = point(approach.x, retained.y);
    let v_first = point(retained.x, approach.y);
    let candidates = match edge.approach_axis() {
        Axis::Horizontal => [v_first, h_first],
        Axis::Vertical => [h_first, v_first],
    };
    let clear_corner = candidates.into_iter().find(|corner| {
        !segment_crosses_interior(retained, *corner, &aabb)
            && !segment_crosses_interior(*corner, approach, &aabb)
    });

    match clear_corner {
        Some(corner) => {
            out.push(corner);
            auto.push(true);
        }
        None => {
            // Neither simple dogleg clears the rect: go around it on the side away from the
            // interior run we just dropped.
            let margin = standoff;
            match edge.approach_axis() {
                Axis::Horizontal => {
                    let above = aabb.min_y - margin;
                    let below = aabb.max_y + margin;
                    let rail_y = if (retained.y - above).abs() <= (retained.y - below).abs() {
                        above
                    } else {
                        below
                    };
                    out.push(point(retained.x, rail_y));
                    out.push(point(approach.x, rail_y));
                }
                Axis::Vertical => {
                    let left = aabb.min_x - margin;
                    let right = aabb.max_x + margin;
                    let rail_x = if (retained.x - left).abs() <= (retained.x - right).abs() {
                        left
                    } else {
                        right
                    };
                    out.push(point(rail_x, retained.y));
                    out.push(point(rail_x, approach.y));
                }
            }
            auto.push(true);
            auto.push(true);
        }
    }

    out.push(approach);
    auto.push(true);
    out.push(endpoint);
    auto.push(false);

    cleanup_route(out, auto, config)
}

/// Merge near-duplicate points and drop redundant collinear interior points, keeping the
/// auto-inserted flags in step.
fn cleanup_route(points: Vec<Point>, auto: Vec<bool>, config: &EngineConfig) -> RoutedPath {
    debug_assert_eq!(points.len(), auto.len());
    let tol = config.duplicate_tolerance;

    let mut merged: Vec<(Point, bool)> = Vec::with_capacity(points.len());
    for (p, is_auto) in points.into_iter().zip(auto) {
        match merged.last_mut() {
            Some((last, last_auto)) if last.distance_to(p) <= tol => {
                // A user-placed point wins over a synthesized duplicate.
                if *last_auto && !is_auto {
                    *last = p;
                    *last_auto = false;
                }
            }
            _ => merged.push((p, is_auto)),
        }
    }

    let mut out: Vec<(Point, bool)> = Vec::with_capacity(merged.len());
    for (i, entry) in merged.iter().enumerate() {
        if i == 0 || i == merged.len() - 1 {
            out.push(*entry);
            continue;
        }
        let prev = out.last().expect("non-empty").0;
        let next = merged[i + 1].0;
        let cur = entry.0;
        let collinear =
            (prev.x == cur.x && cur.x == next.x) || (prev.y == cur.y && cur.y == next.y);
        if !collinear {
            out.push(*entry);
        }
    }

    let (points, auto) = out.into_iter().unzip();
    RoutedPath { points, auto }
}

/// Center the crossbar of a 4-point route at the true midpoint between both anchored endpoints.
/// Applies to the classic case where the crossbar already lies between the endpoints; detour
/// routes are left alone.
pub fn symmetrize_crossbar(points: &mut [Point]) {
    if points.len() != 4 {
        return;
    }
    let (a, b) = (points[0], points[3]);
    if points[1].x == points[2].x {
        let lo = a.x.min(b.x);
        let hi = a.x.max(b.x);
        if points[1].x > lo && points[1].x < hi {
            let mid = (a.x + b.x) / 2.0;
            points[1].x = mid;
            points[2].x = mid;
        }
    } else if points[1].y == points[2].y {
        let lo = a.y.min(b.y);
        let hi = a.y.max(b.y);
        if points[1].y > lo && points[1].y < hi {
            let mid = (a.y + b.y) / 2.0;
            points[1].y = mid;
            points[2].y = mid;
        }
    }
}
