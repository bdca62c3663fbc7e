//! One-shot viewport reveals
//!
//! An element starts hidden (transparent and nudged off its resting spot)
//! and fades into place the first time enough of it scrolls into view.
//! Each tracked element moves through
//!
//! ```text
//! Unobserved ──observe──▶ Observing ──ratio ≥ threshold──▶ Revealed
//! ```
//!
//! `Revealed` is terminal: scrolling the element back out never hides it
//! again. Unmounting drops the entry and cancels its observation, so a
//! late notification for a removed element does nothing.

use std::time::Duration;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use unfold_animation::Transition;
use unfold_core::{ElementId, Transform};

use crate::error::{MotionError, Result};
use crate::source::{IntersectionEntry, ObserverOptions, VisibilitySource};

/// Distance in px a hidden element sits away from its resting position.
pub const REVEAL_OFFSET: f32 = 30.0;

// ============================================================================
// Entries
// ============================================================================

/// Side an element enters from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Rises from below
    #[default]
    Up,
    /// Slides in from the left
    Left,
    /// Slides in from the right
    Right,
    /// Fades in place
    None,
}

impl Direction {
    /// Transform applied while the element is hidden
    pub fn hidden_offset(self) -> Transform {
        match self {
            Direction::Up => Transform::translate_y(REVEAL_OFFSET),
            Direction::Left => Transform::translate_x(-REVEAL_OFFSET),
            Direction::Right => Transform::translate_x(REVEAL_OFFSET),
            Direction::None => Transform::IDENTITY,
        }
    }
}

/// Registration request for a revealable element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealEntry {
    /// Host handle; `None` when the element has not rendered
    pub element: Option<ElementId>,
    pub direction: Direction,
    /// Extra wait between the trigger and the start of the transition
    pub delay_ms: u32,
    pub visible: bool,
}

impl RevealEntry {
    pub fn new(element: impl Into<Option<ElementId>>) -> Self {
        Self {
            element: element.into(),
            direction: Direction::Up,
            delay_ms: 0,
            visible: false,
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Register as already revealed (no observation, no transition)
    pub fn visible(mut self) -> Self {
        self.visible = true;
        self
    }
}

/// Lifecycle of a tracked element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealPhase {
    Unobserved,
    Observing,
    Revealed,
}

/// Opacity and transform for an element's rendering layer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealStyle {
    pub opacity: f32,
    pub transform: Transform,
}

impl RevealStyle {
    pub fn hidden(direction: Direction) -> Self {
        Self {
            opacity: 0.0,
            transform: direction.hidden_offset(),
        }
    }

    pub fn shown() -> Self {
        Self {
            opacity: 1.0,
            transform: Transform::IDENTITY,
        }
    }

    /// Blend towards `other` by eased progress `t`
    pub fn lerp(&self, other: &RevealStyle, t: f32) -> RevealStyle {
        RevealStyle {
            opacity: self.opacity + (other.opacity - self.opacity) * t,
            transform: self.transform.lerp(&other.transform, t),
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Clone, Copy, Debug)]
struct RevealSlot {
    direction: Direction,
    transition: Transition,
    phase: RevealPhase,
    /// Controller time at the trigger; `None` when shown without a transition
    revealed_at: Option<Duration>,
}

impl RevealSlot {
    fn style_at(&self, now: Duration) -> RevealStyle {
        let hidden = RevealStyle::hidden(self.direction);
        match (self.phase, self.revealed_at) {
            (RevealPhase::Revealed, Some(at)) => {
                let t = self.transition.progress(now.saturating_sub(at));
                hidden.lerp(&RevealStyle::shown(), t)
            }
            (RevealPhase::Revealed, None) => RevealStyle::shown(),
            _ => hidden,
        }
    }

    fn is_animating(&self, now: Duration) -> bool {
        match (self.phase, self.revealed_at) {
            (RevealPhase::Revealed, Some(at)) => {
                !self.transition.is_finished(now.saturating_sub(at))
            }
            _ => false,
        }
    }
}

/// Per-element one-shot visibility tracker
pub struct RevealController {
    slots: IndexMap<ElementId, RevealSlot, FxBuildHasher>,
    options: ObserverOptions,
    /// Time accumulated through `tick`
    now: Duration,
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new(ObserverOptions::default())
    }
}

impl RevealController {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            slots: IndexMap::with_hasher(FxBuildHasher),
            options,
            now: Duration::ZERO,
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Controller clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Start tracking `entry`
    ///
    /// Observing an element that is already tracked changes nothing. When
    /// the host cannot report intersections the element is shown at once,
    /// so content never stays hidden.
    pub fn observe<V>(&mut self, entry: RevealEntry, source: &mut V) -> Result<ElementId>
    where
        V: VisibilitySource + ?Sized,
    {
        let element = entry.element.ok_or(MotionError::MissingElement)?;

        if self.slots.contains_key(&element) {
            tracing::trace!("RevealController: {:?} already tracked", element);
            return Ok(element);
        }

        let mut slot = RevealSlot {
            direction: entry.direction,
            transition: Transition::reveal(entry.delay_ms),
            phase: RevealPhase::Unobserved,
            revealed_at: None,
        };

        if entry.visible {
            slot.phase = RevealPhase::Revealed;
        } else if !source.is_supported() {
            tracing::debug!(
                "RevealController: intersections unsupported, showing {:?} immediately",
                element
            );
            slot.phase = RevealPhase::Revealed;
        } else {
            source.observe(element, &self.options);
            slot.phase = RevealPhase::Observing;
        }

        self.slots.insert(element, slot);
        Ok(element)
    }

    /// Apply an intersection notification
    ///
    /// Returns `true` when this entry revealed its element. Observation of
    /// that element is cancelled in the same call.
    pub fn handle_intersection<V>(
        &mut self,
        entry: &IntersectionEntry,
        source: &mut V,
    ) -> Result<bool>
    where
        V: VisibilitySource + ?Sized,
    {
        let slot = self
            .slots
            .get_mut(&entry.element)
            .ok_or(MotionError::UnknownElement(entry.element))?;

        if slot.phase != RevealPhase::Observing || !entry.meets(self.options.threshold) {
            return Ok(false);
        }

        slot.phase = RevealPhase::Revealed;
        slot.revealed_at = Some(self.now);
        source.unobserve(entry.element);

        tracing::debug!(
            "RevealController: revealed {:?} at ratio {:.3} (direction {:?}, delay {:?})",
            entry.element,
            entry.intersection_ratio,
            slot.direction,
            slot.transition.delay
        );
        Ok(true)
    }

    /// Stop tracking `element`, cancelling any pending observation
    pub fn unmount<V>(&mut self, element: ElementId, source: &mut V) -> Result<()>
    where
        V: VisibilitySource + ?Sized,
    {
        let slot = self
            .slots
            .shift_remove(&element)
            .ok_or(MotionError::UnknownElement(element))?;

        if slot.phase == RevealPhase::Observing {
            source.unobserve(element);
        }
        tracing::trace!("RevealController: unmounted {:?} in {:?}", element, slot.phase);
        Ok(())
    }

    /// Advance the controller clock
    pub fn tick(&mut self, dt: Duration) {
        self.now += dt;
    }

    pub fn phase(&self, element: ElementId) -> RevealPhase {
        self.slots
            .get(&element)
            .map(|slot| slot.phase)
            .unwrap_or(RevealPhase::Unobserved)
    }

    pub fn is_visible(&self, element: ElementId) -> bool {
        self.phase(element) == RevealPhase::Revealed
    }

    /// Resting style for the element's current phase
    pub fn style(&self, element: ElementId) -> Option<RevealStyle> {
        self.slots.get(&element).map(|slot| match slot.phase {
            RevealPhase::Revealed => RevealStyle::shown(),
            _ => RevealStyle::hidden(slot.direction),
        })
    }

    /// Style at the controller clock, including an in-flight transition
    pub fn presentation(&self, element: ElementId) -> Option<RevealStyle> {
        self.slots.get(&element).map(|slot| slot.style_at(self.now))
    }

    /// Presentation of every tracked element in registration order
    pub fn presentations(&self) -> impl Iterator<Item = (ElementId, RevealStyle)> + '_ {
        self.slots
            .iter()
            .map(|(element, slot)| (*element, slot.style_at(self.now)))
    }

    /// Whether any reveal transition is still running
    pub fn is_animating(&self) -> bool {
        self.slots.values().any(|slot| slot.is_animating(self.now))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every entry and disconnect the source
    pub fn clear<V>(&mut self, source: &mut V)
    where
        V: VisibilitySource + ?Sized,
    {
        self.slots.clear();
        source.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manual::ManualVisibility;
    use slotmap::SlotMap;

    fn elements(n: usize) -> Vec<ElementId> {
        let mut map: SlotMap<ElementId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn entry(element: ElementId, ratio: f32) -> IntersectionEntry {
        IntersectionEntry {
            element,
            intersection_ratio: ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_observe_registers_with_source() {
        let ids = elements(1);
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();

        controller.observe(RevealEntry::new(ids[0]), &mut source).unwrap();

        assert!(source.is_observing(ids[0]));
        assert_eq!(controller.phase(ids[0]), RevealPhase::Observing);
        assert_eq!(
            controller.presentation(ids[0]),
            Some(RevealStyle::hidden(Direction::Up))
        );
    }

    #[test]
    fn test_observe_twice_is_idempotent() {
        let ids = elements(1);
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();

        let first = RevealEntry::new(ids[0]).direction(Direction::Left);
        controller.observe(first, &mut source).unwrap();
        controller
            .observe(RevealEntry::new(ids[0]).direction(Direction::Right), &mut source)
            .unwrap();

        assert_eq!(controller.len(), 1);
        assert_eq!(source.observe_calls(), 1);
        assert_eq!(
            controller.style(ids[0]),
            Some(RevealStyle::hidden(Direction::Left))
        );

        assert!(controller
            .handle_intersection(&entry(ids[0], 0.5), &mut source)
            .unwrap());
        assert!(!controller
            .handle_intersection(&entry(ids[0], 0.9), &mut source)
            .unwrap());
    }

    #[test]
    fn test_missing_element_is_rejected() {
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();

        assert_eq!(
            controller.observe(RevealEntry::new(None), &mut source),
            Err(MotionError::MissingElement)
        );
        assert!(controller.is_empty());
        assert_eq!(source.observe_calls(), 0);
    }

    #[test]
    fn test_below_threshold_never_reveals() {
        let ids = elements(1);
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();
        controller.observe(RevealEntry::new(ids[0]), &mut source).unwrap();

        for ratio in [0.0, 0.01, 0.1, 0.149] {
            let fired = controller
                .handle_intersection(&entry(ids[0], ratio), &mut source)
                .unwrap();
            assert!(!fired, "ratio {ratio} revealed");
        }
        assert!(!controller.is_visible(ids[0]));
        assert!(source.is_observing(ids[0]));
    }

    #[test]
    fn test_threshold_reveals_and_unobserves() {
        let ids = elements(1);
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();
        controller.observe(RevealEntry::new(ids[0]), &mut source).unwrap();

        let fired = controller
            .handle_intersection(&entry(ids[0], 0.15), &mut source)
            .unwrap();

        assert!(fired);
        assert!(controller.is_visible(ids[0]));
        assert!(!source.is_observing(ids[0]));
    }

    #[test]
    fn test_reveal_is_monotonic() {
        let ids = elements(1);
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();
        controller.observe(RevealEntry::new(ids[0]), &mut source).unwrap();
        controller
            .handle_intersection(&entry(ids[0], 1.0), &mut source)
            .unwrap();

        // Scrolling away afterwards must not hide it again
        for ratio in [0.0, 0.05, 0.0, 1.0, 0.0] {
            controller
                .handle_intersection(&entry(ids[0], ratio), &mut source)
                .unwrap();
            controller.tick(ms(250));
            assert!(controller.is_visible(ids[0]));
        }
        assert_eq!(controller.presentation(ids[0]), Some(RevealStyle::shown()));
    }

    #[test]
    fn test_unmount_before_trigger_cancels_observation() {
        let ids = elements(1);
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();
        controller.observe(RevealEntry::new(ids[0]), &mut source).unwrap();

        controller.unmount(ids[0], &mut source).unwrap();
        assert!(!source.is_observing(ids[0]));

        // A late notification for the removed element changes nothing
        assert_eq!(
            controller.handle_intersection(&entry(ids[0], 1.0), &mut source),
            Err(MotionError::UnknownElement(ids[0]))
        );
        assert_eq!(controller.phase(ids[0]), RevealPhase::Unobserved);
        assert!(controller.presentation(ids[0]).is_none());
    }

    #[test]
    fn test_hidden_offsets_per_direction() {
        assert_eq!(Direction::Up.hidden_offset(), Transform::translate_y(30.0));
        assert_eq!(Direction::Left.hidden_offset(), Transform::translate_x(-30.0));
        assert_eq!(Direction::Right.hidden_offset(), Transform::translate_x(30.0));
        assert!(Direction::None.hidden_offset().is_identity());
    }

    #[test]
    fn test_transition_waits_for_delay_then_runs_one_second() {
        let ids = elements(1);
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();
        let request = RevealEntry::new(ids[0])
            .direction(Direction::Left)
            .delay_ms(100);
        controller.observe(request, &mut source).unwrap();
        controller
            .handle_intersection(&entry(ids[0], 0.4), &mut source)
            .unwrap();

        // Target state flips immediately
        assert_eq!(controller.style(ids[0]), Some(RevealStyle::shown()));

        controller.tick(ms(100));
        let held = controller.presentation(ids[0]).unwrap();
        assert_eq!(held, RevealStyle::hidden(Direction::Left));
        assert!(controller.is_animating());

        controller.tick(ms(500));
        let mid = controller.presentation(ids[0]).unwrap();
        assert!(mid.opacity > 0.5 && mid.opacity < 1.0);
        assert!(mid.transform.translate_x < 0.0 && mid.transform.translate_x > -15.0);
        assert_eq!(mid.transform.translate_y, 0.0);

        controller.tick(ms(500));
        assert_eq!(controller.presentation(ids[0]), Some(RevealStyle::shown()));
        assert!(!controller.is_animating());
    }

    #[test]
    fn test_unsupported_source_fails_open() {
        let ids = elements(1);
        let mut source = ManualVisibility::unsupported();
        let mut controller = RevealController::default();

        controller.observe(RevealEntry::new(ids[0]), &mut source).unwrap();

        assert!(controller.is_visible(ids[0]));
        assert_eq!(source.observe_calls(), 0);
        assert_eq!(controller.presentation(ids[0]), Some(RevealStyle::shown()));
    }

    #[test]
    fn test_entries_reveal_independently() {
        let ids = elements(3);
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();
        for (i, id) in ids.iter().enumerate() {
            let request = RevealEntry::new(*id).delay_ms(i as u32 * 100);
            controller.observe(request, &mut source).unwrap();
        }

        controller
            .handle_intersection(&entry(ids[2], 0.3), &mut source)
            .unwrap();
        controller
            .handle_intersection(&entry(ids[0], 0.3), &mut source)
            .unwrap();

        assert!(controller.is_visible(ids[0]));
        assert!(!controller.is_visible(ids[1]));
        assert!(controller.is_visible(ids[2]));

        let order: Vec<_> = controller.presentations().map(|(id, _)| id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_clear_disconnects_source() {
        let ids = elements(2);
        let mut source = ManualVisibility::new();
        let mut controller = RevealController::default();
        for id in &ids {
            controller.observe(RevealEntry::new(*id), &mut source).unwrap();
        }

        controller.clear(&mut source);

        assert!(controller.is_empty());
        assert!(source.is_disconnected());
        assert!(!source.is_observing(ids[0]));
    }
}
