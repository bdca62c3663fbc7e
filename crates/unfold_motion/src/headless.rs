//! Headless geometry host
//!
//! A host without a renderer: it owns document-space element rects, a
//! viewport and a scroll offset, and derives intersection and scroll
//! notifications from them. Intersection delivery follows the browser
//! observer rules: one notification right after `observe`, then one each
//! time an element crosses its threshold or stops/starts intersecting.
//!
//! The host and the two source handles share state, so the host can keep
//! scrolling while a `MotionContext` owns the sources.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use slotmap::SlotMap;
use unfold_core::{ElementId, Rect, Size};

use crate::source::{
    IntersectionEntry, ObserverOptions, ScrollMetrics, ScrollSource, VisibilitySource,
};

/// Which side of the threshold an observed element was last reported on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Band {
    Outside,
    Below,
    AtOrAbove,
}

#[derive(Clone, Copy, Debug)]
struct Observation {
    options: ObserverOptions,
    band: Band,
}

struct HostState {
    elements: SlotMap<ElementId, Rect>,
    viewport: Size,
    scroll_y: f32,
    document_height: Option<f32>,
    observed: IndexMap<ElementId, Observation, FxBuildHasher>,
    queued: Vec<IntersectionEntry>,
    pending_scroll: Option<ScrollMetrics>,
}

impl HostState {
    fn document_height(&self) -> f32 {
        let content = self
            .elements
            .values()
            .map(|r| r.bottom())
            .fold(0.0_f32, f32::max);
        self.document_height
            .unwrap_or(content)
            .max(self.viewport.height)
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.scroll_y, self.viewport, self.document_height())
    }

    fn measure(&self, element: ElementId, options: &ObserverOptions) -> Option<IntersectionEntry> {
        let rect = self.elements.get(element)?;
        Some(IntersectionEntry::measure(
            element,
            *rect,
            self.metrics().viewport_rect(),
            options.root_margin,
        ))
    }

    fn band(entry: &IntersectionEntry, threshold: f32) -> Band {
        if !entry.is_intersecting {
            Band::Outside
        } else if entry.intersection_ratio >= threshold {
            Band::AtOrAbove
        } else {
            Band::Below
        }
    }

    /// Queue notifications for observed elements whose band changed
    fn recompute(&mut self) {
        let mut changed = Vec::new();
        for (element, observation) in &self.observed {
            if let Some(entry) = self.measure(*element, &observation.options) {
                let band = Self::band(&entry, observation.options.threshold);
                if band != observation.band {
                    changed.push((entry, band));
                }
            }
        }

        for (entry, band) in changed {
            if let Some(observation) = self.observed.get_mut(&entry.element) {
                observation.band = band;
            }
            self.queued.push(entry);
        }
    }

    fn on_geometry_change(&mut self) {
        let max = (self.document_height() - self.viewport.height).max(0.0);
        self.scroll_y = self.scroll_y.clamp(0.0, max);
        self.pending_scroll = Some(self.metrics());
        self.recompute();
    }
}

/// Renderer-less host with scrollable geometry
#[derive(Clone)]
pub struct HeadlessHost {
    state: Rc<RefCell<HostState>>,
}

impl HeadlessHost {
    pub fn new(viewport: Size) -> Self {
        Self {
            state: Rc::new(RefCell::new(HostState {
                elements: SlotMap::with_key(),
                viewport,
                scroll_y: 0.0,
                document_height: None,
                observed: IndexMap::with_hasher(FxBuildHasher),
                queued: Vec::new(),
                pending_scroll: None,
            })),
        }
    }

    /// Add an element at `rect` (document coordinates)
    pub fn insert(&self, rect: Rect) -> ElementId {
        let mut state = self.state.borrow_mut();
        let id = state.elements.insert(rect);
        state.on_geometry_change();
        id
    }

    /// Remove an element; it silently stops being observed
    pub fn remove(&self, element: ElementId) -> Option<Rect> {
        let mut state = self.state.borrow_mut();
        state.observed.shift_remove(&element);
        let rect = state.elements.remove(element);
        if rect.is_some() {
            state.on_geometry_change();
        }
        rect
    }

    pub fn rect(&self, element: ElementId) -> Option<Rect> {
        self.state.borrow().elements.get(element).copied()
    }

    pub fn set_rect(&self, element: ElementId, rect: Rect) {
        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.elements.get_mut(element) {
            *slot = rect;
            state.on_geometry_change();
        }
    }

    /// Fix the document height instead of deriving it from the elements
    pub fn set_document_height(&self, height: f32) {
        let mut state = self.state.borrow_mut();
        state.document_height = Some(height);
        state.on_geometry_change();
    }

    pub fn resize(&self, viewport: Size) {
        let mut state = self.state.borrow_mut();
        state.viewport = viewport;
        state.on_geometry_change();
    }

    /// Scroll to `y`, clamped to the scrollable range
    pub fn scroll_to(&self, y: f32) {
        let mut state = self.state.borrow_mut();
        if y.is_finite() {
            state.scroll_y = y;
        }
        state.on_geometry_change();
    }

    pub fn scroll_by(&self, dy: f32) {
        let y = self.state.borrow().scroll_y + dy;
        self.scroll_to(y);
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.state.borrow().metrics()
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.state.borrow().observed.contains_key(&element)
    }

    pub fn visibility(&self) -> HeadlessVisibility {
        HeadlessVisibility {
            state: Rc::clone(&self.state),
        }
    }

    pub fn scroll(&self) -> HeadlessScroll {
        HeadlessScroll {
            state: Rc::clone(&self.state),
        }
    }
}

/// Intersection source backed by a `HeadlessHost`
pub struct HeadlessVisibility {
    state: Rc<RefCell<HostState>>,
}

impl VisibilitySource for HeadlessVisibility {
    fn observe(&mut self, element: ElementId, options: &ObserverOptions) {
        let mut state = self.state.borrow_mut();
        if state.observed.contains_key(&element) {
            return;
        }

        // Observers always report the initial state once
        let Some(entry) = state.measure(element, options) else {
            tracing::trace!("HeadlessVisibility: {:?} is not in the document", element);
            return;
        };
        let band = HostState::band(&entry, options.threshold);
        state.observed.insert(
            element,
            Observation {
                options: *options,
                band,
            },
        );
        state.queued.push(entry);
    }

    fn unobserve(&mut self, element: ElementId) {
        let mut state = self.state.borrow_mut();
        state.observed.shift_remove(&element);
        state.queued.retain(|entry| entry.element != element);
    }

    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        state.observed.clear();
        state.queued.clear();
    }

    fn drain(&mut self) -> Vec<IntersectionEntry> {
        std::mem::take(&mut self.state.borrow_mut().queued)
    }
}

/// Scroll source backed by a `HeadlessHost`
pub struct HeadlessScroll {
    state: Rc<RefCell<HostState>>,
}

impl ScrollSource for HeadlessScroll {
    fn drain(&mut self) -> Option<ScrollMetrics> {
        self.state.borrow_mut().pending_scroll.take()
    }

    fn current(&self) -> Option<ScrollMetrics> {
        Some(self.state.borrow().metrics())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HeadlessHost {
        let host = HeadlessHost::new(Size::new(1280.0, 800.0));
        host.set_document_height(4000.0);
        host
    }

    #[test]
    fn test_observe_reports_initial_state() {
        let host = host();
        let above_fold = host.insert(Rect::new(0.0, 100.0, 400.0, 200.0));
        let below_fold = host.insert(Rect::new(0.0, 2000.0, 400.0, 200.0));
        let mut visibility = host.visibility();

        visibility.observe(above_fold, &ObserverOptions::default());
        visibility.observe(below_fold, &ObserverOptions::default());

        let entries = visibility.drain();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].meets(0.15));
        assert!(!entries[1].is_intersecting);
        assert!(visibility.drain().is_empty());
    }

    #[test]
    fn test_scroll_reports_threshold_crossings_only() {
        let host = host();
        let el = host.insert(Rect::new(0.0, 1000.0, 400.0, 200.0));
        let mut visibility = host.visibility();
        visibility.observe(el, &ObserverOptions::default());
        visibility.drain();

        // Trigger region bottom = scroll + 750; still short of the element
        host.scroll_to(200.0);
        assert!(visibility.drain().is_empty());

        // 20px of 200 inside: intersecting, below threshold
        host.scroll_to(270.0);
        let below = visibility.drain();
        assert_eq!(below.len(), 1);
        assert!(below[0].is_intersecting && !below[0].meets(0.15));

        // 40px of 200 inside: crosses 0.15
        host.scroll_to(290.0);
        let crossed = visibility.drain();
        assert_eq!(crossed.len(), 1);
        assert!(crossed[0].meets(0.15));

        // Further in, same band: no notification
        host.scroll_to(400.0);
        assert!(visibility.drain().is_empty());
    }

    #[test]
    fn test_unobserve_drops_pending_notifications() {
        let host = host();
        let el = host.insert(Rect::new(0.0, 100.0, 400.0, 200.0));
        let mut visibility = host.visibility();
        visibility.observe(el, &ObserverOptions::default());

        visibility.unobserve(el);

        assert!(visibility.drain().is_empty());
        assert!(!host.is_observing(el));
    }

    #[test]
    fn test_scroll_is_clamped_and_coalesced() {
        let host = host();
        let mut scroll = host.scroll();
        scroll.drain();

        host.scroll_to(100.0);
        host.scroll_to(9000.0);

        let metrics = scroll.drain().unwrap();
        assert_eq!(metrics.scroll_y, 3200.0);
        assert!(scroll.drain().is_none());
        assert_eq!(scroll.current().unwrap().scroll_y, 3200.0);
    }

    #[test]
    fn test_document_height_defaults_to_content() {
        let host = HeadlessHost::new(Size::new(1280.0, 800.0));
        assert_eq!(host.metrics().document_height, 800.0);

        host.insert(Rect::new(0.0, 2500.0, 100.0, 500.0));
        assert_eq!(host.metrics().document_height, 3000.0);
    }
}
