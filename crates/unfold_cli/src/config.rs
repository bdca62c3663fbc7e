//! Unfold configuration file handling
//!
//! `unfold.toml` describes the replay: viewport size, how the scroll is
//! scripted, and the tuning of the progress spring and reveal observer.
//! Every field has a default, so an empty or missing file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use unfold_animation::SpringConfig;
use unfold_core::{Insets, Size};
use unfold_motion::{MotionConfig, ObserverOptions, REVEAL_THRESHOLD};

pub const CONFIG_FILE: &str = "unfold.toml";

/// Replay configuration (unfold.toml)
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct UnfoldConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub progress_spring: SpringSettings,
    #[serde(default)]
    pub observer: ObserverSettings,
}

/// Browser window size in CSS pixels
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1440.0
}

fn default_height() -> f32 {
    900.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Scripted scroll
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Frames per second
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Scroll speed in px/s
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: f32,
    /// Pause at the bottom of the page before scrolling back
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
    /// Scroll back to the top after the hold
    #[serde(default = "default_true")]
    pub scroll_back: bool,
    /// Report every Nth frame
    #[serde(default = "default_sample_every")]
    pub sample_every: u32,
}

fn default_fps() -> u32 {
    60
}

fn default_scroll_speed() -> f32 {
    1200.0
}

fn default_hold_ms() -> u64 {
    1500
}

fn default_true() -> bool {
    true
}

fn default_sample_every() -> u32 {
    6
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            scroll_speed: default_scroll_speed(),
            hold_ms: default_hold_ms(),
            scroll_back: true,
            sample_every: default_sample_every(),
        }
    }
}

/// Progress indicator spring
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpringSettings {
    #[serde(default = "default_stiffness")]
    pub stiffness: f32,
    #[serde(default = "default_damping")]
    pub damping: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default = "default_rest_delta")]
    pub rest_delta: f32,
    #[serde(default = "default_rest_speed")]
    pub rest_speed: f32,
}

fn default_stiffness() -> f32 {
    100.0
}

fn default_damping() -> f32 {
    30.0
}

fn default_mass() -> f32 {
    1.0
}

fn default_rest_delta() -> f32 {
    0.001
}

fn default_rest_speed() -> f32 {
    0.01
}

impl Default for SpringSettings {
    fn default() -> Self {
        Self {
            stiffness: default_stiffness(),
            damping: default_damping(),
            mass: default_mass(),
            rest_delta: default_rest_delta(),
            rest_speed: default_rest_speed(),
        }
    }
}

impl SpringSettings {
    /// Reject values the integrator cannot settle with
    fn validate(&self) -> Result<()> {
        if !(self.mass > 0.0 && self.mass.is_finite()) {
            anyhow::bail!("progress_spring.mass must be positive, got {}", self.mass);
        }
        if !(self.stiffness > 0.0 && self.stiffness.is_finite()) {
            anyhow::bail!(
                "progress_spring.stiffness must be positive, got {}",
                self.stiffness
            );
        }
        if !(self.damping >= 0.0 && self.damping.is_finite()) {
            anyhow::bail!(
                "progress_spring.damping must not be negative, got {}",
                self.damping
            );
        }
        for (name, value) in [
            ("rest_delta", self.rest_delta),
            ("rest_speed", self.rest_speed),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                anyhow::bail!("progress_spring.{} must be positive, got {}", name, value);
            }
        }
        Ok(())
    }

    pub fn to_spring(&self) -> SpringConfig {
        SpringConfig::new(self.stiffness, self.damping, self.mass)
            .with_rest(self.rest_delta, self.rest_speed)
    }
}

/// Reveal trigger
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObserverSettings {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// CSS margin shorthand applied to the viewport
    #[serde(default = "default_root_margin")]
    pub root_margin: String,
}

fn default_threshold() -> f32 {
    REVEAL_THRESHOLD
}

fn default_root_margin() -> String {
    "0px 0px -50px 0px".to_string()
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            root_margin: default_root_margin(),
        }
    }
}

impl ObserverSettings {
    pub fn to_options(&self) -> Result<ObserverOptions> {
        let root_margin = Insets::parse_margin(&self.root_margin)
            .with_context(|| format!("Invalid observer.root_margin '{}'", self.root_margin))?;
        Ok(ObserverOptions {
            threshold: self.threshold,
            root_margin,
        })
    }
}

impl UnfoldConfig {
    /// Load `path`, or the defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: UnfoldConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            anyhow::bail!(
                "viewport must be positive, got {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }
        if self.simulation.fps == 0 {
            anyhow::bail!("simulation.fps must be at least 1");
        }
        if !(self.simulation.scroll_speed > 0.0) {
            anyhow::bail!("simulation.scroll_speed must be positive");
        }
        if !(0.0..=1.0).contains(&self.observer.threshold) {
            anyhow::bail!(
                "observer.threshold must be within 0..=1, got {}",
                self.observer.threshold
            );
        }
        self.observer.to_options()?;
        self.progress_spring.validate()?;
        Ok(())
    }

    pub fn motion_config(&self) -> Result<MotionConfig> {
        Ok(MotionConfig {
            observer: self.observer.to_options()?,
            progress_spring: self.progress_spring.to_spring(),
        })
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
