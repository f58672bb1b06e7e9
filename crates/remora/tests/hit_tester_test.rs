use remora::config::EngineConfig;
use remora::hit::HitTester;
use remora_core::element::{Element, ElementData, LinearData};
use remora_core::geom::{Point, Rect, point};
use remora_core::style::{ArrowheadStyle, ShaftKind};

fn arrow(id: &str, rect: Rect, points: Vec<Point>, kind: ShaftKind) -> Element {
    let mut data = LinearData::with_kind(kind);
    data.points = points;
    data.start_arrowhead = ArrowheadStyle::None;
    data.end_arrowhead = ArrowheadStyle::None;
    Element::new(id, rect, ElementData::Arrow(data))
}

#[test]
fn shaft_hits_within_stroke_and_tolerance() {
    let mut tester = HitTester::new(EngineConfig::default());
    let el = arrow(
        "a",
        Rect::new(0.0, 0.0, 100.0, 50.0),
        vec![point(0.0, 0.0), point(1.0, 1.0)],
        ShaftKind::Straight,
    );
    assert!(tester.hit_test(&el, point(50.0, 25.0), 1.0));
    assert!(tester.hit_test(&el, point(50.0, 22.0), 3.0));
    assert!(!tester.hit_test(&el, point(50.0, 10.0), 1.0));
    assert!(!tester.hit_test(&el, point(200.0, 200.0), 1.0));
}

#[test]
fn rotated_elements_hit_in_world_space() {
    let mut tester = HitTester::new(EngineConfig::default());
    let mut el = arrow(
        "a",
        Rect::new(0.0, 0.0, 100.0, 50.0),
        vec![point(0.0, 0.0), point(1.0, 1.0)],
        ShaftKind::Straight,
    );
    el.rotation = std::f64::consts::FRAC_PI_2;
    // Local (0,0) lands at world (75,-25) after a quarter turn about (50,25).
    assert!(tester.hit_test(&el, point(75.0, -25.0), 2.0));
    // The unrotated start position no longer hits.
    assert!(!tester.hit_test(&el, point(0.0, 0.0), 2.0));
}

#[test]
fn closed_head_hits_where_the_trimmed_shaft_does_not() {
    let mut tester = HitTester::new(EngineConfig::default());
    let mut el = arrow(
        "a",
        Rect::new(0.0, 0.0, 100.0, 50.0),
        vec![point(0.0, 0.5), point(1.0, 0.5)],
        ShaftKind::Straight,
    );
    {
        let data = el.linear_mut().unwrap();
        data.stroke_width = 4.0;
        data.end_arrowhead = ArrowheadStyle::Triangle;
    }

    // Inset is 28: the drawn shaft ends at x=72, but the head covers the gap up to the tip.
    assert!(tester.hit_test(&el, point(80.0, 25.0), 2.0));
    assert!(tester.hit_test(&el, point(50.0, 25.0), 2.0));
    assert!(!tester.hit_test(&el, point(90.0, 35.0), 2.0));
}

#[test]
fn curved_shafts_hit_through_flattened_points() {
    let mut tester = HitTester::new(EngineConfig::default());
    let el = arrow(
        "a",
        Rect::new(0.0, 0.0, 100.0, 50.0),
        vec![point(0.0, 1.0), point(0.5, 0.0), point(1.0, 1.0)],
        ShaftKind::Curved,
    );
    // The spline interpolates the middle control point.
    assert!(tester.hit_test(&el, point(50.0, 0.0), 2.0));
    // Points well off the curve miss.
    assert!(!tester.hit_test(&el, point(50.0, 40.0), 2.0));
}

#[test]
fn mutating_the_rect_refreshes_cached_geometry() {
    let mut tester = HitTester::new(EngineConfig::default());
    let mut el = arrow(
        "a",
        Rect::new(0.0, 0.0, 100.0, 50.0),
        vec![point(0.0, 0.5), point(1.0, 0.5)],
        ShaftKind::Straight,
    );
    let before = tester.drawn_shaft(&el).to_vec();
    assert_eq!(*before.last().unwrap(), point(100.0, 25.0));

    el.rect = Rect::new(0.0, 0.0, 200.0, 50.0);
    let after = tester.drawn_shaft(&el).to_vec();
    assert_eq!(*after.last().unwrap(), point(200.0, 25.0));
    assert_ne!(before, after);

    // And hits reflect the new geometry without any explicit cache call.
    assert!(tester.hit_test(&el, point(150.0, 25.0), 1.0));
}

#[test]
fn repeated_hits_reuse_cached_geometry_across_many_elements() {
    let mut tester = HitTester::new(EngineConfig::default());
    let elements: Vec<Element> = (0..32)
        .map(|i| {
            arrow(
                &format!("a{i}"),
                Rect::new(0.0, i as f64 * 10.0, 100.0, i as f64 * 10.0 + 50.0),
                vec![point(0.0, 0.0), point(1.0, 1.0)],
                ShaftKind::Straight,
            )
        })
        .collect();
    // Interleaved queries churn the MRU ring past its capacity; results stay correct.
    for _round in 0..3 {
        for el in &elements {
            let start = point(el.rect.min_x, el.rect.min_y);
            assert!(tester.hit_test(el, start, 1.0));
        }
    }
}
