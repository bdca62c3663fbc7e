//! Timed transitions
//!
//! A `Transition` is a CSS-style tween: it waits for `delay`, then runs
//! for `duration` along an easing curve. It holds no clock; callers
//! sample it with the time elapsed since the transition was started.

use std::time::Duration;

use crate::easing::Easing;

/// Reveal transitions run for one second.
pub const REVEAL_DURATION: Duration = Duration::from_millis(1000);

/// Delayed, fixed-duration tween
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Transition {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing,
        }
    }

    /// The entrance transition used for scroll reveals: 1000ms ease-out
    pub fn reveal(delay_ms: u32) -> Self {
        Self::new(REVEAL_DURATION, Easing::EaseOut)
            .with_delay(Duration::from_millis(u64::from(delay_ms)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Total time from start until the transition completes
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }

    /// Linear progress in [0, 1] at `elapsed` since start
    pub fn linear_progress(&self, elapsed: Duration) -> f32 {
        if elapsed <= self.delay {
            return 0.0;
        }
        let running = elapsed - self.delay;
        if self.duration.is_zero() || running >= self.duration {
            return 1.0;
        }
        running.as_secs_f32() / self.duration.as_secs_f32()
    }

    /// Eased progress in [0, 1] at `elapsed` since start
    pub fn progress(&self, elapsed: Duration) -> f32 {
        self.easing.apply(self.linear_progress(elapsed))
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.total()
    }
}
