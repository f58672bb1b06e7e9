//! Binding resolution: where a bound endpoint actually lands in world space.
//!
//! `inside` bindings pin the endpoint to the anchor inside the target. `orbit` bindings keep the
//! endpoint on the target boundary (optionally gapped by the target's stroke width) and re-aim
//! it along the ray from the arrow's adjacent control point through the anchor, so the endpoint
//! crosses the boundary where the line naturally would as the target moves.

use crate::config::EngineConfig;
use remora_core::binding::{Binding, BindingMode, ElementId};
use remora_core::element::Element;
use remora_core::geom::{Point, Rect, point};

/// Anchor's absolute position in the target's local frame.
fn anchor_local(rect: &Rect, anchor: Point) -> Point {
    let a = anchor.clamp01();
    point(
        rect.min_x + a.x * rect.width(),
        rect.min_y + a.y * rect.height(),
    )
}

/// Parameter span where the line `origin + t * dir` overlaps the rect (slab test). The span may
/// lie behind the origin; callers filter for `t > 0`.
fn ray_rect_span(origin: Point, dir: Point, rect: &Rect) -> Option<(f64, f64)> {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;

    for (o, d, lo, hi) in [
        (origin.x, dir.x, rect.min_x, rect.max_x),
        (origin.y, dir.y, rect.min_y, rect.max_y),
    ] {
        if d == 0.0 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        t_min = t_min.max(near);
        t_max = t_max.min(far);
        if t_min > t_max {
            return None;
        }
    }

    Some((t_min, t_max))
}

/// First boundary crossing of the ray `origin + t * dir` (t > 0) when the origin is outside the
/// rect, or the exit crossing when it is inside.
fn ray_rect_crossing(origin: Point, dir: Point, rect: &Rect) -> Option<Point> {
    let (t_min, t_max) = ray_rect_span(origin, dir, rect)?;
    let t = if rect.contains(origin) { t_max } else { t_min };
    if !(t.is_finite() && t > 0.0) {
        return None;
    }
    Some(origin + dir * t)
}

/// Of the ray's forward boundary crossings, the one nearest `anchor`. The ray through the
/// anchor pierces the boundary twice; the anchor names which side of the target the endpoint
/// belongs to.
fn nearest_forward_crossing(origin: Point, dir: Point, rect: &Rect, anchor: Point) -> Option<Point> {
    let (t_min, t_max) = ray_rect_span(origin, dir, rect)?;
    let mut best: Option<Point> = None;
    for t in [t_min, t_max] {
        if !(t.is_finite() && t > 0.0) {
            continue;
        }
        let p = origin + dir * t;
        best = match best {
            Some(cur) if cur.distance_to(anchor) <= p.distance_to(anchor) => Some(cur),
            _ => Some(p),
        };
    }
    best
}

/// Gap an orbit endpoint keeps from the target boundary.
pub fn orbit_gap(target: &Element, exact: bool, config: &EngineConfig) -> f64 {
    if exact {
        0.0
    } else {
        config.bind_gap_scale * target.stroke_width()
    }
}

/// Resolve the world point for a bound endpoint.
///
/// `reference` is the arrow's control point adjacent to this endpoint; for orbit bindings it
/// aims the boundary crossing. `exact` suppresses the stand-off gap (the endpoint was placed
/// directly on the boundary).
pub fn resolve_bound_point(
    target: &Element,
    binding: &Binding,
    reference: Point,
    exact: bool,
    config: &EngineConfig,
) -> Point {
    let space = target.space();
    let anchor = anchor_local(&target.rect, binding.anchor);

    match binding.mode {
        BindingMode::Inside => space.to_world(anchor),
        BindingMode::Orbit => {
            let bounds = target.rect.inflate(orbit_gap(target, exact, config));
            let local_ref = space.from_world(reference);
            let crossing = local_ref
                .direction_to(anchor)
                .and_then(|dir| nearest_forward_crossing(local_ref, dir, &bounds, anchor))
                // No directed intersection (reference on top of the anchor, or aiming away):
                // nearest boundary point to the anchor's absolute position.
                .unwrap_or_else(|| bounds.nearest_boundary_point(anchor));
            space.to_world(crossing)
        }
    }
}

/// Normalized anchor for a world-space point on (or near) a target; inverse of the anchor
/// placement used by [`resolve_bound_point`].
pub fn binding_anchor_for_point(target: &Element, world: Point) -> Point {
    let local = target.space().from_world(world);
    let w = target.rect.width();
    let h = target.rect.height();
    point(
        if w == 0.0 {
            0.0
        } else {
            (local.x - target.rect.min_x) / w
        },
        if h == 0.0 {
            0.0
        } else {
            (local.y - target.rect.min_y) / h
        },
    )
    .clamp01()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindingCandidate {
    pub element_id: ElementId,
    pub mode: BindingMode,
    /// Distance score; lower wins. Hysteresis halves the score of the currently-bound target.
    pub score: f64,
}

/// Pick the binding target for a pointer position among `candidates` (iterated bottom-to-top in
/// z-order; on score ties the topmost wins).
///
/// A pointer strictly inside a target classifies as `inside` only when it is deeper than the
/// snap distance from every edge, or when the reference point is also inside; otherwise the
/// near-boundary hit is treated as an orbit snap.
pub fn pick_binding_target<'a>(
    candidates: impl IntoIterator<Item = &'a Element>,
    pointer: Point,
    reference: Point,
    current: Option<&str>,
    config: &EngineConfig,
) -> Option<BindingCandidate> {
    let mut best: Option<BindingCandidate> = None;

    for target in candidates {
        if !target.is_bindable() {
            continue;
        }
        let space = target.space();
        let local_pointer = space.from_world(pointer);
        let local_ref = space.from_world(reference);

        let classified = if target.rect.contains_strict(local_pointer) {
            let depth = target.rect.boundary_distance(local_pointer);
            if depth > config.snap_distance || target.rect.contains(local_ref) {
                Some((BindingMode::Inside, 0.0))
            } else {
                Some((BindingMode::Orbit, depth))
            }
        } else {
            let distance = local_ref
                .direction_to(local_pointer)
                .and_then(|dir| ray_rect_crossing(local_ref, dir, &target.rect))
                .map(|crossing| local_pointer.distance_to(crossing))
                .unwrap_or_else(|| target.rect.boundary_distance(local_pointer));
            (distance <= config.snap_distance).then_some((BindingMode::Orbit, distance))
        };

        let Some((mode, mut score)) = classified else {
            continue;
        };
        if current == Some(target.id.as_str()) {
            score *= 0.5;
        }
        let beats = best.as_ref().is_none_or(|b| score <= b.score);
        if beats {
            best = Some(BindingCandidate {
                element_id: target.id.clone(),
                mode,
                score,
            });
        }
    }

    best
}
