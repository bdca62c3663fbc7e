//! Motion context
//!
//! The page-lifetime owner of the scroll listener, the intersection
//! registry, every reveal entry and every parallax binding. Create one
//! when the page mounts, drive it from the host's event loop, and tear it
//! down (or drop it) when the page unmounts.
//!
//! ```ignore
//! let host = HeadlessHost::new(Size::new(1280.0, 800.0));
//! let mut motion = MotionContext::init(host.visibility(), host.scroll());
//!
//! let hero = host.insert(Rect::new(0.0, 1200.0, 600.0, 400.0));
//! motion.observe_reveal(RevealEntry::new(hero).direction(Direction::Left).delay_ms(100));
//!
//! // Each event-loop turn:
//! motion.pump();
//! motion.tick(Duration::from_millis(16));
//! let frame = motion.frame();
//! ```
//!
//! Every public operation absorbs its own failures. Problems are logged
//! and show up as degraded presentation (shown reveals, zero parallax),
//! never as errors for the page to handle.

use std::time::Duration;

use serde::Serialize;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use unfold_animation::SpringConfig;
use unfold_core::{ElementId, Rect, Transform};

use crate::error::{MotionError, Result};
use crate::parallax::ParallaxBinding;
use crate::progress::ScrollProgressMapper;
use crate::reveal::{RevealController, RevealEntry, RevealPhase, RevealStyle};
use crate::source::{ObserverOptions, ScrollMetrics, ScrollSource, VisibilitySource};

new_key_type! {
    /// Handle to a registered parallax binding
    pub struct ParallaxId;
}

/// Tunables for a `MotionContext`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    pub observer: ObserverOptions,
    pub progress_spring: SpringConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            observer: ObserverOptions::default(),
            progress_spring: SpringConfig::progress_bar(),
        }
    }
}

/// Presentation values for one rendered frame
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MotionFrame {
    /// Horizontal scale of the page progress indicator
    pub progress_scale_x: f32,
    /// Unsmoothed page progress
    pub progress_target: f32,
    pub reveals: Vec<RevealFrame>,
    pub parallax: Vec<ParallaxFrame>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RevealFrame {
    #[serde(skip)]
    pub element: ElementId,
    pub phase: RevealPhase,
    pub style: RevealStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParallaxFrame {
    #[serde(skip)]
    pub id: ParallaxId,
    #[serde(skip)]
    pub element: ElementId,
    pub offset_percent: f32,
    pub transform: Transform,
}

/// What one `pump` call consumed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PumpReport {
    /// Elements revealed by this pump, in notification order
    pub revealed: SmallVec<[ElementId; 8]>,
    /// Latest scroll metrics, if a scroll or resize arrived
    pub scrolled: Option<ScrollMetrics>,
}

/// Page-lifetime owner of the scroll animation state
pub struct MotionContext<V: VisibilitySource, S: ScrollSource> {
    visibility: V,
    scroll: S,
    reveals: RevealController,
    progress: ScrollProgressMapper,
    parallax: SlotMap<ParallaxId, ParallaxBinding>,
    metrics: Option<ScrollMetrics>,
    torn_down: bool,
}

impl<V: VisibilitySource, S: ScrollSource> MotionContext<V, S> {
    /// Set up the context for a freshly mounted page
    pub fn init(visibility: V, scroll: S) -> Self {
        Self::with_config(visibility, scroll, MotionConfig::default())
    }

    pub fn with_config(visibility: V, scroll: S, config: MotionConfig) -> Self {
        if !visibility.is_supported() {
            tracing::warn!(
                "MotionContext: host has no intersection support; reveals show immediately"
            );
        }
        if !scroll.is_supported() {
            tracing::warn!("MotionContext: host has no scroll support; parallax stays at rest");
        }

        let mut context = Self {
            visibility,
            scroll,
            reveals: RevealController::new(config.observer),
            progress: ScrollProgressMapper::new(config.progress_spring),
            parallax: SlotMap::with_key(),
            metrics: None,
            torn_down: false,
        };

        // Start from the host's current position rather than waiting for a scroll
        if let Some(metrics) = context.scroll.current() {
            context.apply_scroll(metrics);
        }

        tracing::debug!("MotionContext: initialized");
        context
    }

    fn ensure_live(&self) -> Result<()> {
        if self.torn_down {
            Err(MotionError::TornDown)
        } else {
            Ok(())
        }
    }

    fn apply_scroll(&mut self, metrics: ScrollMetrics) {
        self.metrics = Some(metrics);
        let sample = self.progress.on_scroll(&metrics);
        tracing::trace!(
            "MotionContext: scroll {:.1} -> progress {:.4}",
            sample.raw_offset,
            sample.normalized_progress
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reveals
    // ─────────────────────────────────────────────────────────────────────

    /// Start tracking a revealable element
    ///
    /// Returns `None` (and does nothing) for an absent handle or after
    /// teardown.
    pub fn observe_reveal(&mut self, entry: RevealEntry) -> Option<ElementId> {
        let result = self
            .ensure_live()
            .and_then(|_| self.reveals.observe(entry, &mut self.visibility));
        absorb("observe_reveal", result)
    }

    /// Forget an element: cancels its observation and drops its parallax bindings
    pub fn unmount(&mut self, element: ElementId) {
        if self.torn_down {
            return;
        }

        let bound: SmallVec<[ParallaxId; 2]> = self
            .parallax
            .iter()
            .filter(|(_, binding)| binding.target == element)
            .map(|(id, _)| id)
            .collect();
        for id in bound {
            self.parallax.remove(id);
        }

        if let Err(err) = self.reveals.unmount(element, &mut self.visibility) {
            // Elements with parallax only never had a reveal entry
            tracing::trace!("MotionContext::unmount: {}", err);
        }
    }

    pub fn reveal_phase(&self, element: ElementId) -> RevealPhase {
        self.reveals.phase(element)
    }

    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.reveals.is_visible(element)
    }

    pub fn reveal_style(&self, element: ElementId) -> Option<RevealStyle> {
        self.reveals.presentation(element)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Parallax
    // ─────────────────────────────────────────────────────────────────────

    /// Bind the default -10%..10% parallax to an element box
    pub fn bind_parallax(
        &mut self,
        element: Option<ElementId>,
        bounds: Rect,
    ) -> Option<ParallaxId> {
        let element = element?;
        self.add_parallax(ParallaxBinding::new(element, bounds))
    }

    /// Register a fully configured binding
    pub fn add_parallax(&mut self, binding: ParallaxBinding) -> Option<ParallaxId> {
        let result = self.ensure_live().map(|_| self.parallax.insert(binding));
        absorb("add_parallax", result)
    }

    /// Update a binding after its element moved or resized
    pub fn set_parallax_bounds(&mut self, id: ParallaxId, bounds: Rect) {
        let result = self
            .parallax
            .get_mut(id)
            .map(|binding| binding.bounds = bounds)
            .ok_or(MotionError::UnknownBinding);
        absorb("set_parallax_bounds", result);
    }

    pub fn unbind_parallax(&mut self, id: ParallaxId) {
        self.parallax.remove(id);
    }

    /// Transform for one binding at the latest scroll position
    pub fn parallax_transform(&self, id: ParallaxId) -> Transform {
        match (self.parallax.get(id), self.metrics) {
            (Some(binding), Some(metrics)) => binding.transform(&metrics),
            _ => Transform::IDENTITY,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Event loop
    // ─────────────────────────────────────────────────────────────────────

    /// Drain pending scroll and intersection notifications
    pub fn pump(&mut self) -> PumpReport {
        let mut report = PumpReport::default();
        if self.torn_down {
            return report;
        }

        if let Some(metrics) = self.scroll.drain() {
            self.apply_scroll(metrics);
            report.scrolled = Some(metrics);
        }

        for entry in self.visibility.drain() {
            match self.reveals.handle_intersection(&entry, &mut self.visibility) {
                Ok(true) => report.revealed.push(entry.element),
                Ok(false) => {}
                Err(err) => {
                    tracing::trace!("MotionContext::pump: dropping notification: {}", err)
                }
            }
        }

        report
    }

    /// Advance animation time by one frame
    pub fn tick(&mut self, dt: Duration) {
        if self.torn_down {
            return;
        }
        self.reveals.tick(dt);
        self.progress.tick(dt.as_secs_f32());
    }

    /// Whether another frame would change anything
    pub fn is_animating(&self) -> bool {
        !self.torn_down && (self.reveals.is_animating() || !self.progress.is_settled())
    }

    /// Presentation values for the current frame
    pub fn frame(&self) -> MotionFrame {
        let reveals = self
            .reveals
            .presentations()
            .map(|(element, style)| RevealFrame {
                element,
                phase: self.reveals.phase(element),
                style,
            })
            .collect();

        let parallax = self
            .parallax
            .iter()
            .map(|(id, binding)| {
                let (offset_percent, transform) = match self.metrics {
                    Some(metrics) => {
                        let progress = binding.local_progress(&metrics);
                        (binding.offset_percent(progress), binding.transform(&metrics))
                    }
                    None => (0.0, Transform::IDENTITY),
                };
                ParallaxFrame {
                    id,
                    element: binding.target,
                    offset_percent,
                    transform,
                }
            })
            .collect();

        MotionFrame {
            progress_scale_x: self.progress.scale_x(),
            progress_target: self.progress.target(),
            reveals,
            parallax,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn metrics(&self) -> Option<ScrollMetrics> {
        self.metrics
    }

    pub fn progress(&self) -> &ScrollProgressMapper {
        &self.progress
    }

    pub fn reveals(&self) -> &RevealController {
        &self.reveals
    }

    pub fn visibility(&self) -> &V {
        &self.visibility
    }

    pub fn visibility_mut(&mut self) -> &mut V {
        &mut self.visibility
    }

    pub fn scroll_source(&self) -> &S {
        &self.scroll
    }

    pub fn scroll_source_mut(&mut self) -> &mut S {
        &mut self.scroll
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Cancel every observation and binding; later calls are no-ops
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.reveals.clear(&mut self.visibility);
        self.parallax.clear();
        self.metrics = None;
        self.torn_down = true;
        tracing::debug!("MotionContext: torn down");
    }
}

impl<V: VisibilitySource, S: ScrollSource> Drop for MotionContext<V, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn absorb<T>(operation: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(MotionError::MissingElement) => {
            tracing::debug!("MotionContext::{}: no element handle, skipping", operation);
            None
        }
        Err(err) => {
            tracing::debug!("MotionContext::{}: {}", operation, err);
            None
        }
    }
}
