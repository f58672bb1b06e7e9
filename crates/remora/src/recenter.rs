//! Rect recentring under rotation.
//!
//! Recomputing a rect naively from moved local points would shift the rotation pivot and drag
//! every other point through world space. Instead: take the moved points to world with the old
//! pivot, find the bounding-box center in the unrotated frame, rotate that center back to get
//! the new pivot, and re-express all world points locally around it. World positions are
//! preserved exactly while the rect tracks the new extent.

use remora_core::geom::{Point, Rect};
use remora_core::space::Space;

/// New `(rect, local_points)` for an element whose local points moved. `rotation` is unchanged
/// by this operation; every input point keeps its exact world position.
pub fn recenter(rect: &Rect, rotation: f64, local_points: &[Point]) -> (Rect, Vec<Point>) {
    if local_points.is_empty() {
        return (*rect, Vec::new());
    }

    let old_space = Space::for_rect(rect, rotation);
    let world: Vec<Point> = local_points.iter().map(|p| old_space.to_world(*p)).collect();

    // The moved points *are* the unrotated frame (to_world ∘ from_world is the identity), so the
    // unrotated bounding-box center comes straight from them.
    let local_center = Rect::from_points(local_points.iter().copied())
        .expect("non-empty")
        .center();
    let new_pivot = old_space.to_world(local_center);

    let new_space = Space::new(new_pivot, rotation);
    let new_local: Vec<Point> = world.iter().map(|w| new_space.from_world(*w)).collect();
    let new_rect = Rect::from_points(new_local.iter().copied()).expect("non-empty");
    (new_rect, new_local)
}
