//! Spring physics animation
//!
//! RK4-integrated spring physics for smooth, natural animations.
//! Supports preset configurations and custom spring parameters.
//!
//! A spring is plain numeric state (value, velocity, target). It is
//! advanced explicitly with a frame delta, so two springs fed the same
//! sequence of deltas always produce the same values.

/// Largest integration step. Longer frame deltas are split into sub-steps.
const MAX_STEP: f32 = 1.0 / 120.0;

/// Upper bound on sub-steps per call, so a stalled frame cannot spin.
const MAX_SUBSTEPS: u32 = 64;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from target below which the spring may come to rest
    pub rest_delta: f32,
    /// Speed below which the spring may come to rest
    pub rest_speed: f32,
}

impl SpringConfig {
    /// Create a new spring configuration with pixel-scale rest thresholds
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            // Within 0.5px and under 5px/s is imperceptible
            rest_delta: 0.5,
            rest_speed: 5.0,
        }
    }

    /// Override the rest thresholds
    ///
    /// Values animated on a unit scale (opacity, progress) need much finer
    /// thresholds than pixel offsets.
    pub fn with_rest(mut self, rest_delta: f32, rest_speed: f32) -> Self {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// A very stiff spring with minimal oscillation (good for quick responses)
    pub fn snappy() -> Self {
        Self::new(600.0, 40.0, 1.0)
    }

    /// A slow spring with no overshoot
    pub fn molasses() -> Self {
        Self::new(100.0, 20.0, 1.0)
    }

    /// The page scroll indicator spring
    ///
    /// Stiffness 100 with damping 30 settles without overshoot; it rests
    /// once within 0.001 of the target progress.
    pub fn progress_bar() -> Self {
        Self::new(100.0, 30.0, 1.0).with_rest(0.001, 0.01)
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is critically damped (no oscillation, fastest settling)
    pub fn is_critically_damped(&self) -> bool {
        (self.damping - self.critical_damping()).abs() < 0.01
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        } else {
            tracing::trace!("Spring: ignoring non-finite target {}", target);
        }
    }

    /// Jump to `value` and stop all motion
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Check if the spring has settled (within rest_delta of target and slower than rest_speed)
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.config.rest_delta
            && self.velocity.abs() < self.config.rest_speed
    }

    /// Retarget, advance by `dt` seconds and return the new value
    pub fn advance(&mut self, dt: f32, target: f32) -> f32 {
        self.set_target(target);

        if !dt.is_finite() || dt <= 0.0 {
            return self.value;
        }

        let substeps = ((dt / MAX_STEP).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let h = dt / substeps as f32;
        for _ in 0..substeps {
            self.step(h);
        }

        self.value
    }

    /// Step the spring simulation using RK4 integration
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        // RK4 integration for accurate spring physics
        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_settles_to_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(100.0);

        // Simulate for 2 seconds at 60fps
        for _ in 0..120 {
            spring.step(1.0 / 60.0);
        }

        assert!(spring.is_settled());
        assert!((spring.value() - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_spring_inherits_velocity() {
        let mut spring = Spring::new(SpringConfig::wobbly(), 0.0);
        spring.set_target(100.0);

        // Let it get some velocity
        for _ in 0..10 {
            spring.step(1.0 / 60.0);
        }

        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        // Change target mid-flight - velocity should continue
        spring.set_target(50.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_spring_presets() {
        assert!(SpringConfig::wobbly().is_underdamped());
        assert!(SpringConfig::gentle().is_underdamped());
        assert!(SpringConfig::stiff().is_underdamped());
        assert!(SpringConfig::molasses().is_critically_damped());
        assert!(SpringConfig::progress_bar().is_overdamped());
    }

    #[test]
    fn test_progress_bar_settles_within_rest_delta() {
        let mut spring = Spring::new(SpringConfig::progress_bar(), 0.0);

        // 5 seconds at 60fps
        for _ in 0..300 {
            spring.advance(1.0 / 60.0, 1.0);
        }

        assert!(spring.is_settled());
        assert!((spring.value() - 1.0).abs() <= 0.001);
    }

    #[test]
    fn test_progress_bar_lags_then_never_overshoots() {
        let mut spring = Spring::new(SpringConfig::progress_bar(), 0.0);

        let first = spring.advance(1.0 / 60.0, 1.0);
        assert!(first > 0.0 && first < 0.1, "first frame jumped to {first}");

        for _ in 0..600 {
            let value = spring.advance(1.0 / 60.0, 1.0);
            assert!(value <= 1.0 + 1e-4, "overshot to {value}");
        }
    }

    #[test]
    fn test_advance_splits_long_frames() {
        let mut fine = Spring::new(SpringConfig::progress_bar(), 0.0);
        let mut coarse = fine;

        for _ in 0..12 {
            fine.advance(1.0 / 120.0, 1.0);
        }
        coarse.advance(0.1, 1.0);

        assert!((fine.value() - coarse.value()).abs() < 1e-4);
    }

    #[test]
    fn test_advance_ignores_bad_input() {
        let mut spring = Spring::new(SpringConfig::progress_bar(), 0.25);

        assert_eq!(spring.advance(f32::NAN, 1.0), 0.25);
        assert_eq!(spring.advance(0.0, 1.0), 0.25);
        assert_eq!(spring.target(), 1.0);

        spring.advance(1.0 / 60.0, f32::INFINITY);
        assert_eq!(spring.target(), 1.0);
    }

    #[test]
    fn test_spring_rk4_stability() {
        // Large frame deltas are sub-stepped and must stay bounded
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);

        for _ in 0..100 {
            spring.advance(0.1, 1000.0);
            assert!(spring.value() < 2000.0);
            assert!(spring.value() > -500.0);
        }
    }

    #[test]
    fn test_spring_different_mass() {
        // Test with heavier mass - should still settle, just slower
        let config = SpringConfig::new(400.0, 25.0, 2.0);
        let mut spring = Spring::new(config, 0.0);
        spring.set_target(100.0);

        for _ in 0..240 {
            spring.step(1.0 / 60.0);
        }

        assert!(spring.value().is_finite());
        assert!(spring.is_settled());
    }

    #[test]
    fn test_snap_to_stops_motion() {
        let mut spring = Spring::new(SpringConfig::wobbly(), 0.0);
        spring.advance(1.0 / 60.0, 100.0);
        spring.snap_to(42.0);

        assert_eq!(spring.value(), 42.0);
        assert_eq!(spring.velocity(), 0.0);
        assert!(spring.is_settled());
    }
}
