//! Arrowhead metrics and shape synthesis.
//!
//! Heads scale with the shaft's stroke width: length is `stroke_width * 4 + 12`, width is 0.6×
//! that. Closed styles define the shaft inset (the retraction keeping the shaft from showing
//! through the head) as their own along-path extent; open styles draw on top of the shaft and
//! inset nothing.

use remora_core::geom::Point;
use remora_core::style::ArrowheadStyle;

pub fn head_length(stroke_width: f64) -> f64 {
    stroke_width * 4.0 + 12.0
}

pub fn head_width(stroke_width: f64) -> f64 {
    head_length(stroke_width) * 0.6
}

/// Distance the shaft is shortened behind a head so it never visually penetrates a closed
/// shape. Triangle-family heads span the full head length; square and circle only their side /
/// diameter.
pub fn shaft_inset(style: ArrowheadStyle, stroke_width: f64) -> f64 {
    match style {
        ArrowheadStyle::Triangle | ArrowheadStyle::InvertedTriangle | ArrowheadStyle::Diamond => {
            head_length(stroke_width)
        }
        ArrowheadStyle::Square | ArrowheadStyle::Circle => head_width(stroke_width),
        ArrowheadStyle::None | ArrowheadStyle::Chevron | ArrowheadStyle::Bar => 0.0,
    }
}

/// How far back along the path the head's orientation is sampled, so the head follows the curve
/// near its base rather than the exact tip tangent.
pub fn direction_sample_offset(style: ArrowheadStyle, stroke_width: f64) -> f64 {
    match style {
        ArrowheadStyle::None => 0.0,
        _ => head_length(stroke_width),
    }
}

/// Furthest the head reaches from the tip in any direction; used to inflate hit-test bounds.
pub fn head_extent(style: ArrowheadStyle, stroke_width: f64) -> f64 {
    match style {
        ArrowheadStyle::None => 0.0,
        _ => head_length(stroke_width),
    }
}

/// Exact vector shape of a rendered head.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadShape {
    /// Open strokes drawn on top of the shaft (chevron, bar).
    Strokes(Vec<[Point; 2]>),
    /// Closed filled polygon (triangle, inverted triangle, square, diamond).
    Polygon(Vec<Point>),
    /// Filled disc.
    Disc { center: Point, radius: f64 },
}

/// Synthesize the head at `tip` pointing along the unit direction `dir`.
pub fn arrowhead_shape(
    tip: Point,
    dir: Point,
    style: ArrowheadStyle,
    stroke_width: f64,
) -> Option<HeadShape> {
    let length = head_length(stroke_width);
    let half_width = head_width(stroke_width) / 2.0;
    let back = tip - dir * length;
    let perp = dir.perp();

    match style {
        ArrowheadStyle::None => None,
        ArrowheadStyle::Chevron => Some(HeadShape::Strokes(vec![
            [tip, back + perp * half_width],
            [tip, back - perp * half_width],
        ])),
        ArrowheadStyle::Bar => Some(HeadShape::Strokes(vec![[
            tip + perp * half_width,
            tip - perp * half_width,
        ]])),
        ArrowheadStyle::Triangle => Some(HeadShape::Polygon(vec![
            tip,
            back + perp * half_width,
            back - perp * half_width,
        ])),
        ArrowheadStyle::InvertedTriangle => Some(HeadShape::Polygon(vec![
            tip + perp * half_width,
            tip - perp * half_width,
            back,
        ])),
        ArrowheadStyle::Diamond => {
            let mid = tip - dir * (length / 2.0);
            Some(HeadShape::Polygon(vec![
                tip,
                mid + perp * half_width,
                back,
                mid - perp * half_width,
            ]))
        }
        ArrowheadStyle::Square => {
            // A true square of side `head_width`, aligned to the direction, far edge at the tip.
            let side = half_width * 2.0;
            let near = tip - dir * side;
            Some(HeadShape::Polygon(vec![
                tip + perp * half_width,
                tip - perp * half_width,
                near - perp * half_width,
                near + perp * half_width,
            ]))
        }
        ArrowheadStyle::Circle => {
            let radius = half_width;
            Some(HeadShape::Disc {
                center: tip - dir * radius,
                radius,
            })
        }
    }
}
