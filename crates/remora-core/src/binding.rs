//! Endpoint bindings.
//!
//! A binding anchors one end of an arrow-like element to a target element. The anchor is a
//! normalized point in the target's local rect; `inside` pins the endpoint to the anchor while
//! `orbit` keeps it on the target boundary (optionally gapped) and re-aims toward the line's
//! prior direction as the target changes.

use crate::geom::Point;
use serde::{Deserialize, Serialize};

pub type ElementId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingMode {
    Inside,
    #[default]
    Orbit,
}

impl BindingMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "inside" => Some(Self::Inside),
            "orbit" => Some(Self::Orbit),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::Orbit => "orbit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub element_id: ElementId,
    /// Normalized anchor in the target's local rect; always within `[0,1]²`.
    pub anchor: Point,
    pub mode: BindingMode,
}

impl Binding {
    pub fn new(element_id: impl Into<ElementId>, anchor: Point, mode: BindingMode) -> Self {
        Self {
            element_id: element_id.into(),
            anchor: anchor.sanitized().clamp01(),
            mode,
        }
    }

    pub fn orbit(element_id: impl Into<ElementId>, anchor: Point) -> Self {
        Self::new(element_id, anchor, BindingMode::Orbit)
    }

    pub fn inside(element_id: impl Into<ElementId>, anchor: Point) -> Self {
        Self::new(element_id, anchor, BindingMode::Inside)
    }
}

/// Lenient decode mirror: a binding without a target id is meaningless and decodes to `None`;
/// everything else falls back to defaults (anchor = rect center, mode = orbit).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawBinding {
    pub element_id: Option<ElementId>,
    pub anchor: Option<Point>,
    pub mode: Option<String>,
}

impl RawBinding {
    pub(crate) fn normalize(self) -> Option<Binding> {
        let element_id = self.element_id.filter(|id| !id.is_empty())?;
        let anchor = self.anchor.unwrap_or(Point { x: 0.5, y: 0.5 });
        let mode = self
            .mode
            .as_deref()
            .and_then(BindingMode::from_name)
            .unwrap_or_default();
        Some(Binding::new(element_id, anchor, mode))
    }
}

impl<'de> Deserialize<'de> for Binding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;
        let raw = RawBinding::deserialize(deserializer)?;
        raw.normalize()
            .ok_or_else(|| D::Error::custom("binding is missing elementId"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;

    #[test]
    fn anchor_is_clamped_on_construction() {
        let b = Binding::orbit("a", point(1.5, -0.25));
        assert_eq!(b.anchor, point(1.0, 0.0));
    }

    #[test]
    fn unknown_mode_decodes_to_orbit() {
        let b: Binding =
            serde_json::from_str(r#"{"elementId":"t","anchor":{"x":0.5,"y":0.5},"mode":"glue"}"#)
                .unwrap();
        assert_eq!(b.mode, BindingMode::Orbit);
    }

    #[test]
    fn missing_element_id_is_an_error() {
        let res: Result<Binding, _> = serde_json::from_str(r#"{"anchor":{"x":0.5,"y":0.5}}"#);
        assert!(res.is_err());
    }
}
