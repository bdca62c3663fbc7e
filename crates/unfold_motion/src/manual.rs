//! Scripted event sources
//!
//! Sources whose events are pushed by hand. They deliver exactly what was
//! queued, including notifications for elements that are no longer
//! observed, which is how late host callbacks are simulated.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use unfold_core::ElementId;

use crate::source::{
    IntersectionEntry, ObserverOptions, ScrollMetrics, ScrollSource, VisibilitySource,
};

/// Visibility source driven by `push`
#[derive(Debug)]
pub struct ManualVisibility {
    supported: bool,
    observed: IndexSet<ElementId, FxBuildHasher>,
    queued: Vec<IntersectionEntry>,
    observe_calls: usize,
    disconnected: bool,
}

impl Default for ManualVisibility {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualVisibility {
    pub fn new() -> Self {
        Self {
            supported: true,
            observed: IndexSet::with_hasher(FxBuildHasher),
            queued: Vec::new(),
            observe_calls: 0,
            disconnected: false,
        }
    }

    /// A host without intersection support
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Queue a notification for the next drain
    pub fn push(&mut self, entry: IntersectionEntry) {
        self.queued.push(entry);
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed.contains(&element)
    }

    pub fn observed(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.observed.iter().copied()
    }

    pub fn observe_calls(&self) -> usize {
        self.observe_calls
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl VisibilitySource for ManualVisibility {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn observe(&mut self, element: ElementId, _options: &ObserverOptions) {
        self.observe_calls += 1;
        self.disconnected = false;
        self.observed.insert(element);
    }

    fn unobserve(&mut self, element: ElementId) {
        self.observed.shift_remove(&element);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
        self.disconnected = true;
    }

    fn drain(&mut self) -> Vec<IntersectionEntry> {
        std::mem::take(&mut self.queued)
    }
}

/// Scroll source driven by `push`
#[derive(Debug, Default)]
pub struct ManualScroll {
    unsupported: bool,
    current: Option<ScrollMetrics>,
    pending: Option<ScrollMetrics>,
}

impl ManualScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host without scroll reporting
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    /// Record a scroll or resize event
    pub fn push(&mut self, metrics: ScrollMetrics) {
        self.current = Some(metrics);
        self.pending = Some(metrics);
    }
}

impl ScrollSource for ManualScroll {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn drain(&mut self) -> Option<ScrollMetrics> {
        if self.unsupported {
            return None;
        }
        self.pending.take()
    }

    fn current(&self) -> Option<ScrollMetrics> {
        if self.unsupported {
            return None;
        }
        self.current
    }
}
