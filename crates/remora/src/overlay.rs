//! Editable control-point handles for arrow-like elements.
//!
//! The overlay derives turning-point handles (one per control point, rotation-aware), midpoint
//! "addable" handles (one per segment), and, when the path closes on itself within the loop
//! threshold, a pair of loop handles replacing the endpoint turning handles.

use crate::config::EngineConfig;
use crate::shaft::resolve_world_points;
use remora_core::element::Element;
use remora_core::geom::Point;

const TURNING_RADIUS_SCALE: f64 = 1.0;
const ADDABLE_RADIUS_SCALE: f64 = 0.8;
const LOOP_INNER_RADIUS_SCALE: f64 = 1.0;
const LOOP_OUTER_RADIUS_SCALE: f64 = 1.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Drags an existing control point.
    Turning,
    /// Inserts a new control point at a segment midpoint.
    Addable,
    /// Inner marker of a closed (looping) path; drags both shared endpoints.
    LoopInner,
    /// Outer marker of a closed path; drags only the endpoint under it.
    LoopOuter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    /// Control-point index for turning/loop handles; segment index for addable ones.
    pub index: usize,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointOverlay {
    pub turning: Vec<Handle>,
    pub addable: Vec<Handle>,
    /// `[inner, outer]` when the first/last world points are within the loop threshold.
    pub loop_handles: Option<[Handle; 2]>,
}

/// Derive the overlay for an arrow-like element. Non-linear payloads produce an empty overlay.
pub fn point_overlay(element: &Element, loop_threshold: f64) -> PointOverlay {
    let Some(data) = element.linear() else {
        return PointOverlay::default();
    };
    let world = resolve_world_points(&element.rect, element.rotation, &data.points);
    if world.len() < 2 {
        return PointOverlay::default();
    }

    let first = world[0];
    let last = world[world.len() - 1];
    let looping = first.distance_to(last) <= loop_threshold;

    let mut turning = Vec::with_capacity(world.len());
    for (i, p) in world.iter().enumerate() {
        if looping && (i == 0 || i == world.len() - 1) {
            continue;
        }
        turning.push(Handle {
            kind: HandleKind::Turning,
            index: i,
            position: *p,
        });
    }

    let addable = world
        .windows(2)
        .enumerate()
        .map(|(i, w)| Handle {
            kind: HandleKind::Addable,
            index: i,
            position: w[0].midpoint(w[1]),
        })
        .collect();

    let loop_handles = looping.then(|| {
        let center = first.midpoint(last);
        [
            Handle {
                kind: HandleKind::LoopInner,
                index: 0,
                position: center,
            },
            Handle {
                kind: HandleKind::LoopOuter,
                index: world.len() - 1,
                position: center,
            },
        ]
    });

    PointOverlay {
        turning,
        addable,
        loop_handles,
    }
}

fn handle_radius(kind: HandleKind, base_tolerance: f64, config: &EngineConfig) -> f64 {
    let scale = match kind {
        HandleKind::Turning => TURNING_RADIUS_SCALE,
        HandleKind::Addable => ADDABLE_RADIUS_SCALE,
        HandleKind::LoopInner => LOOP_INNER_RADIUS_SCALE,
        HandleKind::LoopOuter => LOOP_OUTER_RADIUS_SCALE,
    };
    (base_tolerance * scale).max(config.handle_radius_floor)
}

/// Which handle, if any, a world-space point grabs. Turning handles are checked nearest-first,
/// loop handles inner-before-outer, then addable handles.
pub fn overlay_hit(
    overlay: &PointOverlay,
    point: Point,
    base_tolerance: f64,
    config: &EngineConfig,
) -> Option<Handle> {
    let nearest_within = |handles: &[Handle]| -> Option<Handle> {
        handles
            .iter()
            .map(|h| (h.position.distance_to(point), *h))
            .filter(|(d, h)| *d <= handle_radius(h.kind, base_tolerance, config))
            .min_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, h)| h)
    };

    if let Some(h) = nearest_within(&overlay.turning) {
        return Some(h);
    }
    if let Some([inner, outer]) = overlay.loop_handles {
        for h in [inner, outer] {
            if h.position.distance_to(point) <= handle_radius(h.kind, base_tolerance, config) {
                return Some(h);
            }
        }
    }
    nearest_within(&overlay.addable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remora_core::element::{ElementData, LinearData};
    use remora_core::geom::{Rect, point};
    use remora_core::style::ShaftKind;

    fn arrow(points: Vec<Point>) -> Element {
        let mut data = LinearData::with_kind(ShaftKind::Straight);
        data.points = points;
        Element::new("a", Rect::new(0.0, 0.0, 100.0, 100.0), ElementData::Arrow(data))
    }

    #[test]
    fn open_path_has_turning_and_addable_handles() {
        let el = arrow(vec![point(0.0, 0.0), point(0.5, 0.0), point(1.0, 1.0)]);
        let overlay = point_overlay(&el, 16.0);
        assert_eq!(overlay.turning.len(), 3);
        assert_eq!(overlay.addable.len(), 2);
        assert!(overlay.loop_handles.is_none());
        assert_eq!(overlay.addable[0].position, point(25.0, 0.0));
    }

    #[test]
    fn closing_path_grows_loop_handles() {
        let el = arrow(vec![
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(1.0, 1.0),
            point(0.05, 0.0),
        ]);
        let overlay = point_overlay(&el, 16.0);
        // Endpoint turning handles are replaced by the loop pair.
        assert_eq!(overlay.turning.len(), 2);
        let [inner, outer] = overlay.loop_handles.expect("loop");
        assert_eq!(inner.kind, HandleKind::LoopInner);
        assert_eq!(outer.index, 3);
    }

    #[test]
    fn hit_prefers_nearest_turning_handle() {
        let el = arrow(vec![point(0.0, 0.0), point(0.1, 0.0), point(1.0, 1.0)]);
        let overlay = point_overlay(&el, 1.0);
        let cfg = EngineConfig::default();
        let hit = overlay_hit(&overlay, point(9.0, 0.0), 8.0, &cfg).expect("hit");
        assert_eq!(hit.kind, HandleKind::Turning);
        assert_eq!(hit.index, 1);
    }
}
