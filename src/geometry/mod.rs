//! Outline geometry
//!
//! Shapes are defined inside a bounding rectangle in screen space (y grows
//! downward). Everything here is a pure function of (shape, rect, count).

pub mod outline;
pub mod rect;
pub mod shape;

pub use outline::Outline;
pub use rect::Rect;
pub use shape::ShapeKind;
