#![forbid(unsafe_code)]

//! Arrow geometry and binding engine.
//!
//! This crate owns everything that keeps arrows consistent as a document changes: resolving
//! bound endpoints against live target geometry, incrementally maintaining the binding index,
//! routing elbow shafts around their targets, and producing drawable / hit-testable geometry
//! for straight, curved, and elbow arrows.
//!
//! All computation is synchronous and single-threaded. The caches here ([`BindingResolver`]'s
//! index, [`HitTester`]'s geometry cache) are explicit, injectable components: derived state
//! keyed by element identity and a cheap revision signal, reconstructible from the document at
//! any time.

pub mod arrowhead;
pub mod bind;
pub mod config;
pub mod elbow;
pub mod hit;
pub mod overlay;
pub mod recenter;
pub mod resolver;
pub mod router;
pub mod shaft;

pub use arrowhead::HeadShape;
pub use bind::{BindingCandidate, pick_binding_target, resolve_bound_point};
pub use config::EngineConfig;
pub use hit::HitTester;
pub use overlay::{Handle, HandleKind, PointOverlay, overlay_hit, point_overlay};
pub use recenter::recenter;
pub use resolver::BindingResolver;
pub use router::RoutedPath;
pub use shaft::{ShaftGeometry, normalize_points, resolve_world_points, shaft_bounds, shaft_path_d};
