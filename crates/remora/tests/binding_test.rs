use remora::bind::{binding_anchor_for_point, pick_binding_target, resolve_bound_point};
use remora::config::EngineConfig;
use remora_core::binding::{Binding, BindingMode};
use remora_core::element::{Element, ElementData, ShapeData};
use remora_core::geom::{Point, Rect, point};

fn shape(id: &str, rect: Rect) -> Element {
    Element::new(id, rect, ElementData::Shape(ShapeData::default()))
}

fn close(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
        "{a:?} != {b:?}"
    );
}

#[test]
fn resolving_an_unchanged_target_twice_is_idempotent() {
    let target = shape("t", Rect::new(40.0, 40.0, 140.0, 90.0));
    let cfg = EngineConfig::default();
    let binding = Binding::orbit("t", point(1.0, 0.5));
    let reference = point(260.0, 65.0);
    let first = resolve_bound_point(&target, &binding, reference, false, &cfg);
    let second = resolve_bound_point(&target, &binding, reference, false, &cfg);
    assert_eq!(first, second);
}

#[test]
fn orbit_aims_along_the_reference_ray() {
    let target = shape("t", Rect::new(0.0, 0.0, 100.0, 100.0));
    let cfg = EngineConfig::default();
    // Anchor at the center: the crossing depends entirely on where the line comes from.
    let binding = Binding::orbit("t", point(0.5, 0.5));
    let from_left = resolve_bound_point(&target, &binding, point(-100.0, 50.0), true, &cfg);
    close(from_left, point(0.0, 50.0));
    let from_above = resolve_bound_point(&target, &binding, point(50.0, -100.0), true, &cfg);
    close(from_above, point(50.0, 0.0));
}

#[test]
fn orbit_falls_back_to_nearest_boundary_point() {
    let target = shape("t", Rect::new(0.0, 0.0, 100.0, 100.0));
    let cfg = EngineConfig::default();
    let binding = Binding::orbit("t", point(0.5, 0.0));
    // Reference sits exactly on the anchor: no directed ray exists.
    let anchor_world = point(50.0, 0.0);
    let p = resolve_bound_point(&target, &binding, anchor_world, true, &cfg);
    close(p, anchor_world);
}

#[test]
fn rotated_target_binds_in_its_own_frame() {
    let mut target = shape("t", Rect::new(0.0, 0.0, 100.0, 50.0));
    target.rotation = std::f64::consts::FRAC_PI_2;
    let cfg = EngineConfig::default();
    let binding = Binding::inside("t", point(0.0, 0.5));
    let p = resolve_bound_point(&target, &binding, Point::ZERO, false, &cfg);
    // Left-edge center, rotated a quarter turn about (50, 25).
    close(p, point(50.0, -25.0));
}

#[test]
fn pointer_near_boundary_picks_orbit_mode() {
    let cfg = EngineConfig::default();
    let target = shape("t", Rect::new(0.0, 0.0, 100.0, 100.0));
    let hit = pick_binding_target(
        [&target],
        point(-4.0, 50.0),
        point(-200.0, 50.0),
        None,
        &cfg,
    )
    .expect("within snap distance");
    assert_eq!(hit.element_id, "t");
    assert_eq!(hit.mode, BindingMode::Orbit);
    assert!(pick_binding_target(
        [&target],
        point(-30.0, 50.0),
        point(-200.0, 50.0),
        None,
        &cfg
    )
    .is_none());
}

#[test]
fn deep_interior_pointer_picks_inside_mode() {
    let cfg = EngineConfig::default();
    let target = shape("t", Rect::new(0.0, 0.0, 100.0, 100.0));
    let hit = pick_binding_target(
        [&target],
        point(50.0, 50.0),
        point(-200.0, 50.0),
        None,
        &cfg,
    )
    .expect("deep inside");
    assert_eq!(hit.mode, BindingMode::Inside);

    // Shallow interior point with an outside reference is an orbit snap instead.
    let hit = pick_binding_target(
        [&target],
        point(3.0, 50.0),
        point(-200.0, 50.0),
        None,
        &cfg,
    )
    .expect("shallow inside");
    assert_eq!(hit.mode, BindingMode::Orbit);
}

#[test]
fn hysteresis_keeps_the_currently_bound_target() {
    let cfg = EngineConfig::default();
    // Two targets whose snap zones overlap; the pointer is slightly nearer the new one.
    let old = shape("old", Rect::new(0.0, 0.0, 100.0, 100.0));
    let new = shape("new", Rect::new(112.0, 0.0, 212.0, 100.0));
    let pointer = point(107.0, 50.0);
    let reference = point(107.0, 50.0);

    let unbiased = pick_binding_target([&old, &new], pointer, reference, None, &cfg).unwrap();
    assert_eq!(unbiased.element_id, "new");

    let biased = pick_binding_target([&old, &new], pointer, reference, Some("old"), &cfg).unwrap();
    assert_eq!(biased.element_id, "old");
}

#[test]
fn score_ties_go_to_the_topmost_target() {
    let cfg = EngineConfig::default();
    let below = shape("below", Rect::new(0.0, 0.0, 100.0, 100.0));
    let above = shape("above", Rect::new(0.0, 0.0, 100.0, 100.0));
    let hit = pick_binding_target(
        [&below, &above],
        point(50.0, 50.0),
        point(50.0, 50.0),
        None,
        &cfg,
    )
    .unwrap();
    assert_eq!(hit.element_id, "above");
}

#[test]
fn anchor_for_point_inverts_anchor_placement() {
    let target = shape("t", Rect::new(10.0, 20.0, 110.0, 70.0));
    let anchor = binding_anchor_for_point(&target, point(35.0, 45.0));
    close(anchor, point(0.25, 0.5));
}
