use remora::config::EngineConfig;
use remora::overlay::{HandleKind, overlay_hit, point_overlay};
use remora_core::element::{Element, ElementData, LinearData};
use remora_core::geom::{Point, Rect, point};
use remora_core::style::ShaftKind;

fn arrow(points: Vec<Point>) -> Element {
    let mut data = LinearData::with_kind(ShaftKind::Straight);
    data.points = points;
    Element::new("a", Rect::new(0.0, 0.0, 100.0, 50.0), ElementData::Arrow(data))
}

#[test]
fn turning_handles_are_rotation_aware() {
    let mut el = arrow(vec![point(0.0, 0.0), point(1.0, 1.0)]);
    el.rotation = std::f64::consts::FRAC_PI_2;
    let overlay = point_overlay(&el, 16.0);
    // Local (0,0) lands at world (75,-25) after a quarter turn about (50,25).
    let p = overlay.turning[0].position;
    assert!((p.x - 75.0).abs() < 1e-9 && (p.y + 25.0).abs() < 1e-9);
}

#[test]
fn addable_handles_sit_at_segment_midpoints() {
    let el = arrow(vec![point(0.0, 0.0), point(0.5, 1.0), point(1.0, 0.0)]);
    let overlay = point_overlay(&el, 16.0);
    assert_eq!(overlay.addable.len(), 2);
    assert_eq!(overlay.addable[0].position, point(25.0, 25.0));
    assert_eq!(overlay.addable[1].position, point(75.0, 25.0));
}

#[test]
fn loop_handles_hit_inner_before_outer() {
    let el = arrow(vec![
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 0.1),
    ]);
    let cfg = EngineConfig::default();
    let overlay = point_overlay(&el, 16.0);
    let [inner, _outer] = overlay.loop_handles.expect("loop");

    // Dead center, both radii match: inner wins.
    let hit = overlay_hit(&overlay, inner.position, 8.0, &cfg).expect("hit");
    assert_eq!(hit.kind, HandleKind::LoopInner);

    // Between the inner and outer radii only the outer ring responds.
    let off = point(inner.position.x + 11.0, inner.position.y);
    let hit = overlay_hit(&overlay, off, 8.0, &cfg).expect("hit");
    assert_eq!(hit.kind, HandleKind::LoopOuter);
}

#[test]
fn handle_radii_have_a_visual_floor() {
    let el = arrow(vec![point(0.0, 0.0), point(1.0, 1.0)]);
    let cfg = EngineConfig::default();
    let overlay = point_overlay(&el, 16.0);
    // A tiny base tolerance still leaves handles grabbable at the floor radius.
    let hit = overlay_hit(&overlay, point(4.0, 2.0), 0.5, &cfg);
    assert!(hit.is_some());
}

#[test]
fn shapes_have_no_overlay() {
    use remora_core::element::ShapeData;
    let el = Element::new(
        "s",
        Rect::new(0.0, 0.0, 10.0, 10.0),
        ElementData::Shape(ShapeData::default()),
    );
    let overlay = point_overlay(&el, 16.0);
    assert!(overlay.turning.is_empty());
    assert!(overlay.addable.is_empty());
    assert!(overlay.loop_handles.is_none());
}
