//! Host event sources
//!
//! The controllers never talk to a rendering host directly. A host
//! implements `VisibilitySource` (viewport intersection notifications) and
//! `ScrollSource` (scroll/resize notifications); `MotionContext` drains
//! both once per event-loop turn. Tests feed synthetic events through
//! the scripted sources in `manual`.

use serde::{Deserialize, Serialize};
use unfold_core::{ElementId, Insets, Rect, Size};

/// Reveals fire once 15% of the element is inside the trigger region.
pub const REVEAL_THRESHOLD: f32 = 0.15;

/// The trigger region is the viewport with 50px taken off the bottom.
pub const REVEAL_ROOT_MARGIN: Insets = Insets::new(0.0, 0.0, -50.0, 0.0);

// ─────────────────────────────────────────────────────────────────────────────
// Visibility
// ─────────────────────────────────────────────────────────────────────────────

/// How an element's intersection with the viewport is measured
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// Minimum intersection ratio that counts as "in view"
    pub threshold: f32,
    /// Adjustment applied to the viewport before intersecting
    pub root_margin: Insets,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: REVEAL_THRESHOLD,
            root_margin: REVEAL_ROOT_MARGIN,
        }
    }
}

/// One intersection notification for an observed element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub element: ElementId,
    /// Fraction of the element's area inside the trigger region
    pub intersection_ratio: f32,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Measure `target` against `viewport` shrunk or grown by `root_margin`
    ///
    /// A zero-area target that touches the region counts as fully visible.
    pub fn measure(element: ElementId, target: Rect, viewport: Rect, root_margin: Insets) -> Self {
        let root = viewport.expand(root_margin);

        match target.intersection(&root) {
            Some(hit) => {
                let area = target.area();
                let ratio = if area > 0.0 {
                    (hit.area() / area).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                Self {
                    element,
                    intersection_ratio: ratio,
                    is_intersecting: true,
                }
            }
            None => Self {
                element,
                intersection_ratio: 0.0,
                is_intersecting: false,
            },
        }
    }

    /// Whether this entry meets `threshold`
    pub fn meets(&self, threshold: f32) -> bool {
        self.is_intersecting && self.intersection_ratio >= threshold
    }
}

/// Host-side intersection observation registry
pub trait VisibilitySource {
    /// Whether the host can report intersections at all
    fn is_supported(&self) -> bool {
        true
    }

    /// Start reporting intersections for `element`
    fn observe(&mut self, element: ElementId, options: &ObserverOptions);

    /// Stop reporting intersections for `element`
    fn unobserve(&mut self, element: ElementId);

    /// Stop reporting for every element
    fn disconnect(&mut self);

    /// Take the notifications queued since the last drain
    fn drain(&mut self) -> Vec<IntersectionEntry>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll
// ─────────────────────────────────────────────────────────────────────────────

/// Document scroll position and extents at one instant
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_y: f32,
    pub viewport: Size,
    pub document_height: f32,
}

impl ScrollMetrics {
    pub fn new(scroll_y: f32, viewport: Size, document_height: f32) -> Self {
        Self {
            scroll_y,
            viewport,
            document_height,
        }
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    /// The viewport in document coordinates
    pub fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.viewport.width, self.viewport.height)
    }
}

/// Host-side document scroll listener
pub trait ScrollSource {
    /// Whether the host can report scroll positions at all
    fn is_supported(&self) -> bool {
        true
    }

    /// Latest metrics if a scroll or resize happened since the last drain
    ///
    /// Several events between drains coalesce into the most recent one.
    fn drain(&mut self) -> Option<ScrollMetrics>;

    /// Current metrics regardless of pending events
    fn current(&self) -> Option<ScrollMetrics>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn element() -> ElementId {
        let mut map: SlotMap<ElementId, ()> = SlotMap::with_key();
        map.insert(())
    }

    #[test]
    fn test_default_options_match_reveal_trigger() {
        let options = ObserverOptions::default();
        assert_eq!(options.threshold, 0.15);
        assert_eq!(options.root_margin.bottom, -50.0);
    }

    #[test]
    fn test_measure_accounts_for_bottom_margin() {
        let id = element();
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        // 100px tall element whose top is 40px above the viewport bottom
        let target = Rect::new(0.0, 760.0, 200.0, 100.0);

        let plain = IntersectionEntry::measure(id, target, viewport, Insets::ZERO);
        assert!((plain.intersection_ratio - 0.4).abs() < 1e-6);

        let shrunk = IntersectionEntry::measure(id, target, viewport, REVEAL_ROOT_MARGIN);
        assert!(!shrunk.is_intersecting);
        assert_eq!(shrunk.intersection_ratio, 0.0);
    }

    #[test]
    fn test_meets_threshold_boundary() {
        let id = element();
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        // Exactly 15px of a 100px element inside the 750px trigger region
        let target = Rect::new(0.0, 735.0, 100.0, 100.0);

        let entry = IntersectionEntry::measure(id, target, viewport, REVEAL_ROOT_MARGIN);
        assert!(entry.meets(REVEAL_THRESHOLD));

        let lower =
            IntersectionEntry::measure(id, target.offset(0.0, 1.0), viewport, REVEAL_ROOT_MARGIN);
        assert!(lower.is_intersecting);
        assert!(!lower.meets(REVEAL_THRESHOLD));
    }

    #[test]
    fn test_zero_area_target_touching_region_is_fully_visible() {
        let id = element();
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let point = Rect::new(0.0, 10.0, 0.0, 0.0);
        let entry = IntersectionEntry::measure(id, point, viewport, Insets::ZERO);
        assert_eq!(entry.intersection_ratio, 1.0);
    }

    #[test]
    fn test_max_scroll_never_negative() {
        let short = ScrollMetrics::new(0.0, Size::new(1280.0, 800.0), 600.0);
        assert_eq!(short.max_scroll(), 0.0);

        let long = ScrollMetrics::new(0.0, Size::new(1280.0, 800.0), 3000.0);
        assert_eq!(long.max_scroll(), 2200.0);
    }
}
