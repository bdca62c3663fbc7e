//! Scroll progress
//!
//! Maps a scroll offset onto a normalized [0, 1] position within a span.
//! The page-wide span runs from the top of the document to the largest
//! reachable offset. An element span runs from the moment the element's
//! top meets the viewport's bottom edge until its bottom meets the
//! viewport's top edge.
//!
//! `ScrollProgressMapper` feeds the page progress through a spring so the
//! progress indicator eases after the scroll position instead of jumping.

use serde::{Deserialize, Serialize};
use unfold_animation::{Spring, SpringConfig};
use unfold_core::Rect;

use crate::source::ScrollMetrics;

/// Position within a scroll span, derived fresh for every scroll event
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollSample {
    pub raw_offset: f32,
    pub normalized_progress: f32,
}

/// The range of scroll offsets a progress value is measured over
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollSpan {
    /// Whole document: offset 0 to the maximum scroll
    Document,
    /// An element's transit through the viewport, in document coordinates
    Element(Rect),
}

impl ScrollSpan {
    /// Scroll offsets where this span starts and ends
    pub fn bounds(&self, metrics: &ScrollMetrics) -> (f32, f32) {
        match self {
            ScrollSpan::Document => (0.0, metrics.max_scroll()),
            ScrollSpan::Element(rect) => (rect.y() - metrics.viewport.height, rect.bottom()),
        }
    }

    pub fn sample(&self, metrics: &ScrollMetrics) -> ScrollSample {
        let (start, end) = self.bounds(metrics);
        ScrollSample {
            raw_offset: metrics.scroll_y,
            normalized_progress: normalize(metrics.scroll_y, start, end),
        }
    }
}

/// Fraction of the way from `start` to `end`, clamped to [0, 1]
///
/// An empty span is already complete and reports 1.
pub fn normalize(value: f32, start: f32, end: f32) -> f32 {
    let length = end - start;
    if !value.is_finite() {
        return 0.0;
    }
    if length <= 0.0 {
        return 1.0;
    }
    ((value - start) / length).clamp(0.0, 1.0)
}

/// Page progress with spring smoothing
pub struct ScrollProgressMapper {
    spring: Spring,
    latest: Option<ScrollSample>,
}

impl Default for ScrollProgressMapper {
    fn default() -> Self {
        Self::new(SpringConfig::progress_bar())
    }
}

impl ScrollProgressMapper {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            spring: Spring::new(config, 0.0),
            latest: None,
        }
    }

    /// Document progress for `metrics`, without touching the spring
    pub fn sample(&self, metrics: &ScrollMetrics) -> ScrollSample {
        ScrollSpan::Document.sample(metrics)
    }

    /// Record a scroll or resize event and retarget the spring
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> ScrollSample {
        let sample = self.sample(metrics);
        self.spring.set_target(sample.normalized_progress);
        self.latest = Some(sample);
        sample
    }

    /// Advance the smoothing spring by one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32) -> f32 {
        let target = self.target();
        self.spring.advance(dt, target)
    }

    /// Unsmoothed progress of the last scroll event
    pub fn target(&self) -> f32 {
        self.latest.map(|s| s.normalized_progress).unwrap_or(0.0)
    }

    pub fn latest(&self) -> Option<ScrollSample> {
        self.latest
    }

    /// Smoothed progress
    pub fn smoothed(&self) -> f32 {
        self.spring.value()
    }

    /// Horizontal scale of the progress indicator
    pub fn scale_x(&self) -> f32 {
        self.smoothed().clamp(0.0, 1.0)
    }

    pub fn is_settled(&self) -> bool {
        self.spring.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfold_core::Size;

    fn page(scroll_y: f32) -> ScrollMetrics {
        ScrollMetrics::new(scroll_y, Size::new(1280.0, 800.0), 4800.0)
    }

    fn settle(mapper: &mut ScrollProgressMapper) {
        for _ in 0..600 {
            mapper.tick(1.0 / 60.0);
        }
    }

    #[test]
    fn test_document_sample() {
        assert_eq!(ScrollSpan::Document.sample(&page(0.0)).normalized_progress, 0.0);
        assert_eq!(ScrollSpan::Document.sample(&page(2000.0)).normalized_progress, 0.5);
        assert_eq!(ScrollSpan::Document.sample(&page(4000.0)).normalized_progress, 1.0);
        // Overscroll clamps
        assert_eq!(ScrollSpan::Document.sample(&page(4400.0)).normalized_progress, 1.0);
        assert_eq!(ScrollSpan::Document.sample(&page(-60.0)).normalized_progress, 0.0);
    }

    #[test]
    fn test_non_scrollable_document_is_complete() {
        let short = ScrollMetrics::new(0.0, Size::new(1280.0, 800.0), 700.0);
        assert_eq!(ScrollSpan::Document.sample(&short).normalized_progress, 1.0);
    }

    #[test]
    fn test_element_span_runs_enter_to_exit() {
        let rect = Rect::new(0.0, 2000.0, 600.0, 400.0);
        let span = ScrollSpan::Element(rect);

        // Element top meets viewport bottom
        assert_eq!(span.sample(&page(1200.0)).normalized_progress, 0.0);
        // Element bottom meets viewport top
        assert_eq!(span.sample(&page(2400.0)).normalized_progress, 1.0);
        assert_eq!(span.sample(&page(1800.0)).normalized_progress, 0.5);
    }

    #[test]
    fn test_mapper_settles_at_extremes() {
        let mut mapper = ScrollProgressMapper::default();

        mapper.on_scroll(&page(4000.0));
        settle(&mut mapper);
        assert!((mapper.smoothed() - 1.0).abs() <= 0.001);
        assert!(mapper.is_settled());

        mapper.on_scroll(&page(0.0));
        settle(&mut mapper);
        assert!(mapper.smoothed().abs() <= 0.001);
    }

    #[test]
    fn test_mapper_lags_behind_jump() {
        let mut mapper = ScrollProgressMapper::default();
        let sample = mapper.on_scroll(&page(2000.0));

        assert_eq!(sample.raw_offset, 2000.0);
        assert_eq!(mapper.target(), 0.5);

        let first = mapper.tick(1.0 / 60.0);
        assert!(first > 0.0 && first < 0.5);
        assert!(mapper.scale_x() < 0.5);
    }

    #[test]
    fn test_mapper_without_events_stays_at_zero() {
        let mut mapper = ScrollProgressMapper::default();
        assert_eq!(mapper.tick(1.0 / 60.0), 0.0);
        assert!(mapper.latest().is_none());
    }

    #[test]
    fn test_sample_leaves_spring_alone() {
        let mapper = ScrollProgressMapper::default();
        let sample = mapper.sample(&page(4000.0));

        assert_eq!(sample.normalized_progress, 1.0);
        assert_eq!(mapper.target(), 0.0);
        assert!(mapper.is_settled());
    }
}
