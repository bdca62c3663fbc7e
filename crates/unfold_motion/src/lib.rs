//! Unfold Scroll Motion
//!
//! Scroll-driven presentation for long landing pages.
//!
//! # Features
//!
//! - **Reveals**: elements fade and slide into place the first time 15% of
//!   them enters the viewport, once, with a per-element delay
//! - **Page progress**: document scroll mapped to [0, 1] and smoothed by a
//!   spring for a progress indicator
//! - **Parallax**: an image layer offset by -10%..10% of its height as the
//!   element transits the viewport, tracking scroll directly
//! - **Injectable hosts**: intersection and scroll notifications arrive
//!   through `VisibilitySource` and `ScrollSource`, so every controller
//!   runs without a renderer
//!
//! All of it is single-threaded and event-driven. `MotionContext` owns
//! the per-page state and is the only thing a host needs to drive.

pub mod context;
pub mod error;
pub mod headless;
pub mod manual;
pub mod parallax;
pub mod progress;
pub mod reveal;
pub mod source;

pub use context::{
    MotionConfig, MotionContext, MotionFrame, ParallaxFrame, ParallaxId, PumpReport, RevealFrame,
};
pub use error::{MotionError, Result};
pub use headless::{HeadlessHost, HeadlessScroll, HeadlessVisibility};
pub use manual::{ManualScroll, ManualVisibility};
pub use parallax::{ParallaxBinding, PARALLAX_RANGE};
pub use progress::{normalize, ScrollProgressMapper, ScrollSample, ScrollSpan};
pub use reveal::{
    Direction, RevealController, RevealEntry, RevealPhase, RevealStyle, REVEAL_OFFSET,
};
pub use source::{
    IntersectionEntry, ObserverOptions, ScrollMetrics, ScrollSource, VisibilitySource,
    REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD,
};
