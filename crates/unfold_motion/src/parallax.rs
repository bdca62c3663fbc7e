//! Parallax bindings
//!
//! A binding maps an element's own enter-to-exit scroll progress linearly
//! onto a vertical offset, expressed as a percentage of the element's
//! height. The offset moves the image layer only; the element's layout
//! box stays put. There is no smoothing: the offset tracks scroll 1:1.

use unfold_core::{ElementId, Rect, Transform};

use crate::progress::ScrollSpan;
use crate::source::ScrollMetrics;

/// Default output range, in percent of the element's height
pub const PARALLAX_RANGE: (f32, f32) = (-10.0, 10.0);

/// Linear scroll-to-offset mapping for one element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxBinding {
    pub target: ElementId,
    /// Document-space box of the bound element
    pub bounds: Rect,
    pub input_range: (f32, f32),
    /// Offset range in percent of the element's height
    pub output_range: (f32, f32),
}

impl ParallaxBinding {
    pub fn new(target: ElementId, bounds: Rect) -> Self {
        Self {
            target,
            bounds,
            input_range: (0.0, 1.0),
            output_range: PARALLAX_RANGE,
        }
    }

    pub fn with_output_range(mut self, low: f32, high: f32) -> Self {
        self.output_range = (low, high);
        self
    }

    /// The element's enter-to-exit progress
    pub fn local_progress(&self, metrics: &ScrollMetrics) -> f32 {
        ScrollSpan::Element(self.bounds)
            .sample(metrics)
            .normalized_progress
    }

    /// Offset in percent for a local progress value, clamped to the output range
    pub fn offset_percent(&self, progress: f32) -> f32 {
        let (in_lo, in_hi) = self.input_range;
        let (out_lo, out_hi) = self.output_range;

        if !progress.is_finite() || in_hi == in_lo {
            return out_lo;
        }

        let t = ((progress - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
        out_lo + (out_hi - out_lo) * t
    }

    /// Offset in px for the element's current height
    pub fn translate_y(&self, progress: f32) -> f32 {
        self.offset_percent(progress) / 100.0 * self.bounds.height()
    }

    /// Layer transform for the given scroll position
    pub fn transform(&self, metrics: &ScrollMetrics) -> Transform {
        Transform::translate_y(self.translate_y(self.local_progress(metrics)))
    }
}
