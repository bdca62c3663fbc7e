//! Unfold Core
//!
//! Shared primitives for the Unfold scroll animation layer:
//!
//! - **Element handles**: opaque keys a host mints for its renderable regions
//! - **Geometry**: document-space points, sizes, rects and CSS-style margins
//! - **Transforms**: the translate values emitted to the rendering layer
//!
//! Nothing here knows about time or scrolling. The controllers in
//! `unfold_motion` build on these types.

pub mod geometry;
pub mod handle;
pub mod transform;

pub use geometry::{Insets, MarginParseError, Point, Rect, Size};
pub use handle::ElementId;
pub use transform::Transform;
