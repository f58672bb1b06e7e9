//! Engine tunables.
//!
//! Every cap and tolerance the engine consults lives here so tests (and embedders) can construct
//! an engine with explicit numbers instead of reaching for process globals. Defaults mirror the
//! shipped behavior; the struct decodes from JSON with per-field fallbacks so a partial config
//! overrides only what it names.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// World-space distance within which a pointer snaps a new binding onto a target boundary.
    pub snap_distance: f64,
    /// Orbit gap = `bind_gap_scale * target stroke width` (zero for exact endpoints).
    pub bind_gap_scale: f64,
    /// Fixed-point passes when both ends of a 2-end bound arrow settle against each other.
    pub max_bind_passes: usize,
    /// Point budget for adaptive flattening of curved shafts.
    pub max_flatten_points: usize,
    /// Flatness tolerance for curve subdivision, in world units.
    pub flatness_tolerance: f64,
    /// Near-aligned elbow segments within this tolerance snap to exact alignment.
    pub collinear_tolerance: f64,
    /// Elbow route points closer than this merge into one.
    pub duplicate_tolerance: f64,
    /// First/last world points within this distance grow loop handles instead of turning points.
    pub loop_threshold: f64,
    /// Shafts shorter than this are rejected by callers before committing new geometry.
    pub min_shaft_length: f64,
    /// Visual-size floor for overlay handle hit radii.
    pub handle_radius_floor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_distance: 8.0,
            bind_gap_scale: 1.0,
            max_bind_passes: 4,
            max_flatten_points: 120,
            flatness_tolerance: 0.25,
            collinear_tolerance: 1.0,
            duplicate_tolerance: 1e-3,
            loop_threshold: 16.0,
            min_shaft_length: 4.0,
            handle_radius_floor: 6.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"snapDistance": 12.0}"#).unwrap();
        assert_eq!(cfg.snap_distance, 12.0);
        assert_eq!(cfg.max_bind_passes, EngineConfig::default().max_bind_passes);
    }
}
