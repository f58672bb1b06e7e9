//! Shaft geometry for the three arrow kinds.
//!
//! Straight shafts are the control polyline; curved shafts run a uniform Catmull-Rom spline
//! (tension 1) through the control points, converted to one cubic Bézier per adjacent pair and
//! clamped at the path ends; elbow shafts are synthesized fully-orthogonal sequences (see
//! `elbow`). Bounds for curved shafts are computed analytically from the cubic derivative roots
//! rather than by sampling, because bounds are persisted and must be deterministic.

use crate::config::EngineConfig;
use crate::elbow;
use remora_core::geom::{Point, Rect, point};
use remora_core::space::Space;
use remora_core::style::ShaftKind;

/// One cubic Bézier leg of a curved shaft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub from: Point,
    pub c1: Point,
    pub c2: Point,
    pub to: Point,
}

/// Drawable shaft description handed to the rendering surface and the hit tester.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaftGeometry {
    Polyline(Vec<Point>),
    Curve(Vec<CubicSegment>),
}

impl ShaftGeometry {
    pub fn start(&self) -> Point {
        match self {
            ShaftGeometry::Polyline(pts) => pts[0],
            ShaftGeometry::Curve(segs) => segs[0].from,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            ShaftGeometry::Polyline(pts) => pts[pts.len() - 1],
            ShaftGeometry::Curve(segs) => segs[segs.len() - 1].to,
        }
    }
}

fn denormalize_local(rect: &Rect, n: Point) -> Point {
    point(
        rect.min_x + n.x * rect.width(),
        rect.min_y + n.y * rect.height(),
    )
}

/// Local point back to a `[0,1]` rect-relative one. Degenerate (zero-size) axes map to 0.
pub fn normalize_local(rect: &Rect, p: Point) -> Point {
    let w = rect.width();
    let h = rect.height();
    point(
        if w == 0.0 { 0.0 } else { (p.x - rect.min_x) / w },
        if h == 0.0 { 0.0 } else { (p.y - rect.min_y) / h },
    )
}

/// Normalized control points to world space, honoring the element's rotation.
pub fn resolve_world_points(rect: &Rect, rotation: f64, normalized: &[Point]) -> Vec<Point> {
    let space = Space::for_rect(rect, rotation);
    normalized
        .iter()
        .map(|n| space.to_world(denormalize_local(rect, *n)))
        .collect()
}

/// World points back to normalized rect-relative ones; inverse of [`resolve_world_points`] for
/// non-degenerate rects.
pub fn normalize_points(rect: &Rect, rotation: f64, world: &[Point]) -> Vec<Point> {
    let space = Space::for_rect(rect, rotation);
    world
        .iter()
        .map(|w| normalize_local(rect, space.from_world(*w)))
        .collect()
}

/// Malformed point lists degrade to a 2-point degenerate path; callers check the resulting
/// shaft length against [`EngineConfig::min_shaft_length`] before committing new geometry.
pub fn sanitize_points(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = points.iter().map(|p| p.sanitized()).collect();
    match out.len() {
        0 => out = vec![Point::ZERO, Point::ZERO],
        1 => out.push(out[0]),
        _ => {}
    }
    out
}

/// Uniform Catmull-Rom through `points` as cubic Bézier segments, neighbors clamped at the path
/// ends. `tension` 1 is the shipped curve; 0 degenerates to straight legs.
pub fn catmull_rom_segments(points: &[Point], tension: f64) -> Vec<CubicSegment> {
    let n = points.len();
    let mut segments = Vec::with_capacity(n.saturating_sub(1));
    let k = tension / 6.0;
    for i in 0..n.saturating_sub(1) {
        let p1 = points[i];
        let p2 = points[i + 1];
        let p0 = if i == 0 { p1 } else { points[i - 1] };
        let p3 = if i + 2 < n { points[i + 2] } else { p2 };
        segments.push(CubicSegment {
            from: p1,
            c1: p1 + (p2 - p0) * k,
            c2: p2 - (p3 - p1) * k,
            to: p2,
        });
    }
    segments
}

/// Build the drawable shaft for `kind` from world-space control points.
pub fn shaft_geometry(kind: ShaftKind, world_points: &[Point], config: &EngineConfig) -> ShaftGeometry {
    let points = sanitize_points(world_points);
    match kind {
        ShaftKind::Straight => ShaftGeometry::Polyline(points),
        ShaftKind::Curved => {
            if points.len() == 2 {
                // Two-point Catmull-Rom is exactly the straight segment.
                ShaftGeometry::Polyline(points)
            } else {
                ShaftGeometry::Curve(catmull_rom_segments(&points, 1.0))
            }
        }
        ShaftKind::Elbow => {
            let expanded = elbow::expand_elbow_points(&points);
            ShaftGeometry::Polyline(elbow::simplify_elbow_points(
                expanded,
                config.collinear_tolerance,
            ))
        }
    }
}

fn cubic_axis_eval(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 3.0 * p0 - 6.0 * p1 + 3.0 * p2;
    let c = -3.0 * p0 + 3.0 * p1;
    ((a * t + b) * t + c) * t + p0
}

pub(crate) fn eval_cubic(seg: &CubicSegment, t: f64) -> Point {
    point(
        cubic_axis_eval(seg.from.x, seg.c1.x, seg.c2.x, seg.to.x, t),
        cubic_axis_eval(seg.from.y, seg.c1.y, seg.c2.y, seg.to.y, t),
    )
}

/// Fold one cubic's exact bounds into `bounds`: derivative roots are a quadratic in `t`, solved
/// per axis; roots inside (0,1) are evaluated along with both endpoints.
fn include_cubic_bounds(bounds: &mut Rect, seg: &CubicSegment) {
    bounds.include(seg.from);
    bounds.include(seg.to);

    fn include_axis_extrema(bounds: &mut Rect, seg: &CubicSegment, is_x: bool) {
        let (p0, p1, p2, p3) = if is_x {
            (seg.from.x, seg.c1.x, seg.c2.x, seg.to.x)
        } else {
            (seg.from.y, seg.c1.y, seg.c2.y, seg.to.y)
        };
        let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
        let b = 3.0 * p0 - 6.0 * p1 + 3.0 * p2;
        let c = -3.0 * p0 + 3.0 * p1;
        // Derivative: 3a t² + 2b t + c.
        let qa = 3.0 * a;
        let qb = 2.0 * b;
        let qc = c;

        const EPS: f64 = 1e-12;
        let mut roots = [f64::NAN; 2];
        let mut root_count = 0usize;
        if qa.abs() <= EPS {
            if qb.abs() > EPS {
                roots[0] = -qc / qb;
                root_count = 1;
            }
        } else {
            let disc = qb * qb - 4.0 * qa * qc;
            if disc >= 0.0 {
                let s = disc.sqrt();
                roots[0] = (-qb + s) / (2.0 * qa);
                roots[1] = (-qb - s) / (2.0 * qa);
                root_count = 2;
            }
        }

        for &t in roots.iter().take(root_count) {
            if t > 0.0 && t < 1.0 {
                bounds.include(eval_cubic(seg, t));
            }
        }
    }

    include_axis_extrema(bounds, seg, true);
    include_axis_extrema(bounds, seg, false);
}

/// Exact world-space bounds of a shaft, including curve overshoot past the control points.
pub fn shaft_bounds(geom: &ShaftGeometry) -> Rect {
    match geom {
        ShaftGeometry::Polyline(pts) => {
            Rect::from_points(pts.iter().copied()).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
        }
        ShaftGeometry::Curve(segs) => {
            let first = segs[0].from;
            let mut bounds = Rect::new(first.x, first.y, first.x, first.y);
            for seg in segs {
                include_cubic_bounds(&mut bounds, seg);
            }
            bounds
        }
    }
}

const MAX_FLATTEN_DEPTH: u32 = 16;

fn chord_flat(seg: &CubicSegment, tolerance: f64) -> bool {
    let chord = seg.to - seg.from;
    let len = chord.length();
    if len <= f64::EPSILON {
        return seg.c1.distance_to(seg.from) <= tolerance
            && seg.c2.distance_to(seg.from) <= tolerance;
    }
    let d1 = chord.cross(seg.c1 - seg.from).abs() / len;
    let d2 = chord.cross(seg.c2 - seg.from).abs() / len;
    d1 <= tolerance && d2 <= tolerance
}

fn split_cubic(seg: &CubicSegment) -> (CubicSegment, CubicSegment) {
    let ab = seg.from.midpoint(seg.c1);
    let bc = seg.c1.midpoint(seg.c2);
    let cd = seg.c2.midpoint(seg.to);
    let abc = ab.midpoint(bc);
    let bcd = bc.midpoint(cd);
    let mid = abc.midpoint(bcd);
    (
        CubicSegment {
            from: seg.from,
            c1: ab,
            c2: abc,
            to: mid,
        },
        CubicSegment {
            from: mid,
            c1: bcd,
            c2: cd,
            to: seg.to,
        },
    )
}

fn flatten_cubic_into(seg: &CubicSegment, tolerance: f64, budget: usize, depth: u32, out: &mut Vec<Point>) {
    if out.len() >= budget || depth >= MAX_FLATTEN_DEPTH || chord_flat(seg, tolerance) {
        out.push(seg.to);
        return;
    }
    let (left, right) = split_cubic(seg);
    flatten_cubic_into(&left, tolerance, budget, depth + 1, out);
    flatten_cubic_into(&right, tolerance, budget, depth + 1, out);
}

/// Flatten a shaft to a polyline for distance tests. Curved shafts subdivide adaptively until
/// the flatness tolerance is met or the point budget is hit; straight/elbow shafts pass through.
pub fn flatten_shaft(geom: &ShaftGeometry, tolerance: f64, max_points: usize) -> Vec<Point> {
    match geom {
        ShaftGeometry::Polyline(pts) => pts.clone(),
        ShaftGeometry::Curve(segs) => {
            let mut out = Vec::with_capacity(max_points.min(64));
            out.push(segs[0].from);
            for seg in segs {
                flatten_cubic_into(seg, tolerance, max_points, 0, &mut out);
            }
            out
        }
    }
}

pub fn path_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| w[0].distance_to(w[1]))
        .sum()
}

/// Shorten a polyline by arc length from each end (arrowhead insets). Trims that consume the
/// whole path collapse to a degenerate pair at the midpoint-by-length.
pub fn trim_path(points: &[Point], start_trim: f64, end_trim: f64) -> Vec<Point> {
    let total = path_length(points);
    if start_trim <= 0.0 && end_trim <= 0.0 {
        return points.to_vec();
    }
    if start_trim + end_trim >= total {
        let mid = point_at_length(points, total / 2.0);
        return vec![mid, mid];
    }

    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    let start_at = start_trim.max(0.0);
    let end_at = total - end_trim.max(0.0);

    let mut walked = 0.0;
    out.push(point_at_length(points, start_at));
    for w in points.windows(2) {
        let seg_len = w[0].distance_to(w[1]);
        let seg_end = walked + seg_len;
        if seg_end > start_at && seg_end < end_at {
            out.push(w[1]);
        }
        walked = seg_end;
    }
    out.push(point_at_length(points, end_at));
    if out.len() < 2 {
        let p = out.first().copied().unwrap_or(Point::ZERO);
        return vec![p, p];
    }
    out
}

/// Point at arc length `d` from the start, clamped to the path.
pub fn point_at_length(points: &[Point], d: f64) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    if d <= 0.0 {
        return points[0];
    }
    let mut walked = 0.0;
    for w in points.windows(2) {
        let seg_len = w[0].distance_to(w[1]);
        if walked + seg_len >= d && seg_len > 0.0 {
            return w[0].lerp(w[1], (d - walked) / seg_len);
        }
        walked += seg_len;
    }
    points[points.len() - 1]
}

/// Unit direction at an end of the path, pointing outward (toward the tip). The direction is
/// sampled `sample_offset` back along the path so a head's orientation follows the curve near
/// its base rather than the exact tip tangent.
pub fn direction_at_end(points: &[Point], at_end: bool, sample_offset: f64) -> Option<Point> {
    let total = path_length(points);
    if total <= f64::EPSILON {
        return None;
    }
    let offset = sample_offset.clamp(f64::MIN_POSITIVE, total);
    let (tip, sample) = if at_end {
        (
            points[points.len() - 1],
            point_at_length(points, total - offset),
        )
    } else {
        (points[0], point_at_length(points, offset))
    };
    sample.direction_to(tip).or_else(|| {
        // Zero-length sample window (e.g. a hairpin); fall back to the terminal segment.
        if at_end {
            points[points.len() - 2].direction_to(points[points.len() - 1])
        } else {
            points[1].direction_to(points[0])
        }
    })
}

fn fmt_num_into(out: &mut String, v: f64) {
    use std::fmt::Write as _;
    if v == v.trunc() && v.abs() < 1e15 {
        let _ = write!(out, "{}", v as i64);
    } else {
        let _ = write!(out, "{v}");
    }
}

fn emit_pair(out: &mut String, cmd: char, p: Point) {
    out.push(cmd);
    fmt_num_into(out, p.x);
    out.push(',');
    fmt_num_into(out, p.y);
}

/// SVG-style path description of a shaft for the external drawing surface.
pub fn shaft_path_d(geom: &ShaftGeometry) -> String {
    let mut out = String::with_capacity(64);
    match geom {
        ShaftGeometry::Polyline(pts) => {
            let Some(first) = pts.first() else {
                return out;
            };
            emit_pair(&mut out, 'M', *first);
            for p in pts.iter().skip(1) {
                emit_pair(&mut out, 'L', *p);
            }
        }
        ShaftGeometry::Curve(segs) => {
            let Some(first) = segs.first() else {
                return out;
            };
            emit_pair(&mut out, 'M', first.from);
            for seg in segs {
                out.push('C');
                fmt_num_into(&mut out, seg.c1.x);
                out.push(',');
                fmt_num_into(&mut out, seg.c1.y);
                out.push(',');
                fmt_num_into(&mut out, seg.c2.x);
                out.push(',');
                fmt_num_into(&mut out, seg.c2.y);
                out.push(',');
                fmt_num_into(&mut out, seg.to.x);
                out.push(',');
                fmt_num_into(&mut out, seg.to.y);
            }
        }
    }
    out
}
