//! Error types for unfold_motion
//!
//! These never reach the page. `MotionContext` turns every one of them
//! into a log line and a degraded presentation.

use thiserror::Error;
use unfold_core::ElementId;

/// Errors raised inside the motion controllers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// The element handle was absent at observation time
    #[error("no element handle to observe")]
    MissingElement,

    /// The element is not tracked (never observed, or already unmounted)
    #[error("element {0:?} is not tracked")]
    UnknownElement(ElementId),

    /// The parallax binding has been released
    #[error("parallax binding is not registered")]
    UnknownBinding,

    /// The context was torn down with the page
    #[error("motion context has been torn down")]
    TornDown,
}

/// Result type for unfold_motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
