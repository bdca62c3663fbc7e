//! Unfold CLI
//!
//! Lays out the landing page for a viewport and replays scripted scrolls
//! through the motion layer on a headless host.

pub mod config;
pub mod content;
pub mod page;
pub mod replay;

pub use config::{UnfoldConfig, CONFIG_FILE};
pub use page::{Block, LandingPage, PageLayout, Section};
pub use replay::{FrameRecord, Replay, ReplayOptions, ReplayReport};
