//! Unfold Animation Primitives
//!
//! Pure numeric building blocks for the scroll animation layer.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//!   and rest thresholds, advanced explicitly per frame
//! - **Easing**: CSS timing functions including arbitrary `cubic-bezier`
//! - **Transitions**: Delayed, fixed-duration tweens sampled by elapsed time
//!
//! Nothing in this crate owns a clock. Callers pass frame deltas or elapsed
//! time in, which keeps every animation deterministic under test.

pub mod easing;
pub mod spring;
pub mod transition;

pub use easing::Easing;
pub use spring::{Spring, SpringConfig};
pub use transition::{Transition, REVEAL_DURATION};
