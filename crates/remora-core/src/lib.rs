#![forbid(unsafe_code)]

//! Document model and geometry primitives for the remora arrow engine.
//!
//! Design goals:
//! - plain `{x, y}` geometry with exact equality, so persisted documents round-trip bit-for-bit
//! - lenient decoding: malformed payload fields degrade to documented defaults, never errors
//! - derived state (binding index, hit/visual caches) lives in `remora`, never here

pub mod binding;
pub mod element;
pub mod error;
pub mod geom;
pub mod space;
pub mod style;

pub use binding::{Binding, BindingMode, ElementId};
pub use element::{
    DEFAULT_STROKE_WIDTH, Document, Element, ElementData, FixedSegment, LineEnd, LinearData,
    ShapeData, default_points,
};
pub use error::{Error, Result};
pub use geom::{Point, Rect, point, point_segment_distance};
pub use space::Space;
pub use style::{ArrowheadStyle, ShaftKind, StrokeStyle};
