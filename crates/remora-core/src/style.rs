//! Stroke and arrowhead style enums.
//!
//! Persisted by name string. Decoding is lenient: unknown names fall back to the owning field's
//! configured default (see `element.rs`), so a document written by a newer build still loads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShaftKind {
    #[default]
    Straight,
    Curved,
    Elbow,
}

impl ShaftKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "straight" => Some(Self::Straight),
            "curved" => Some(Self::Curved),
            "elbow" => Some(Self::Elbow),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Curved => "curved",
            Self::Elbow => "elbow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "dotted" => Some(Self::Dotted),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrowheadStyle {
    #[default]
    None,
    Chevron,
    Bar,
    Triangle,
    InvertedTriangle,
    Square,
    Circle,
    Diamond,
}

impl ArrowheadStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "chevron" => Some(Self::Chevron),
            "bar" => Some(Self::Bar),
            "triangle" => Some(Self::Triangle),
            "invertedTriangle" => Some(Self::InvertedTriangle),
            "square" => Some(Self::Square),
            "circle" => Some(Self::Circle),
            "diamond" => Some(Self::Diamond),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Chevron => "chevron",
            Self::Bar => "bar",
            Self::Triangle => "triangle",
            Self::InvertedTriangle => "invertedTriangle",
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
        }
    }

    /// Closed heads occlude the shaft tip; the shaft is retracted behind them. Open heads are
    /// stroked on top of the shaft and need no retraction.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            Self::Triangle | Self::InvertedTriangle | Self::Square | Self::Circle | Self::Diamond
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for style in [
            ArrowheadStyle::None,
            ArrowheadStyle::Chevron,
            ArrowheadStyle::Bar,
            ArrowheadStyle::Triangle,
            ArrowheadStyle::InvertedTriangle,
            ArrowheadStyle::Square,
            ArrowheadStyle::Circle,
            ArrowheadStyle::Diamond,
        ] {
            assert_eq!(ArrowheadStyle::from_name(style.name()), Some(style));
        }
        assert_eq!(ShaftKind::from_name("elbow"), Some(ShaftKind::Elbow));
        assert_eq!(ShaftKind::from_name("zigzag"), None);
    }

    #[test]
    fn closed_heads_are_the_filled_ones() {
        assert!(ArrowheadStyle::Triangle.is_closed());
        assert!(ArrowheadStyle::Circle.is_closed());
        assert!(!ArrowheadStyle::Chevron.is_closed());
        assert!(!ArrowheadStyle::Bar.is_closed());
        assert!(!ArrowheadStyle::None.is_closed());
    }
}
