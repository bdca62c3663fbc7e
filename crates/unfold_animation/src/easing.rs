//! Easing curves
//!
//! CSS timing functions. The named curves use the same control points as
//! the utility-CSS `ease-in`, `ease-out` and `ease-in-out` classes, so a
//! transition authored against a stylesheet looks the same here.

/// Timing function mapping linear progress to eased progress
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    /// `cubic-bezier(0.4, 0, 1, 1)`
    EaseIn,
    /// `cubic-bezier(0, 0, 0.2, 1)`
    #[default]
    EaseOut,
    /// `cubic-bezier(0.4, 0, 0.2, 1)`
    EaseInOut,
    /// Arbitrary `cubic-bezier(x1, y1, x2, y2)`; x1 and x2 are clamped to [0, 1]
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        // Endpoints are exact for every curve
        if t == 0.0 || t == 1.0 {
            return t;
        }

        match *self {
            Easing::Linear => t,
            Easing::EaseIn => CubicBezier::new(0.4, 0.0, 1.0, 1.0).solve(t),
            Easing::EaseOut => CubicBezier::new(0.0, 0.0, 0.2, 1.0).solve(t),
            Easing::EaseInOut => CubicBezier::new(0.4, 0.0, 0.2, 1.0).solve(t),
            Easing::CubicBezier(x1, y1, x2, y2) => CubicBezier::new(x1, y1, x2, y2).solve(t),
        }
    }
}

/// Polynomial coefficients of a unit cubic bezier from (0,0) to (1,1)
struct CubicBezier {
    ax: f32,
    bx: f32,
    cx: f32,
    ay: f32,
    by: f32,
    cy: f32,
}

impl CubicBezier {
    const EPSILON: f32 = 1e-6;
    const NEWTON_ITERATIONS: usize = 8;
    const BISECTION_ITERATIONS: usize = 32;

    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        // x must stay monotonic for the curve to be a function of time
        let x1 = x1.clamp(0.0, 1.0);
        let x2 = x2.clamp(0.0, 1.0);

        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;

        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    fn sample_x(&self, s: f32) -> f32 {
        ((self.ax * s + self.bx) * s + self.cx) * s
    }

    fn sample_y(&self, s: f32) -> f32 {
        ((self.ay * s + self.by) * s + self.cy) * s
    }

    fn sample_dx(&self, s: f32) -> f32 {
        (3.0 * self.ax * s + 2.0 * self.bx) * s + self.cx
    }

    /// Find the curve parameter whose x equals `x`
    fn solve_curve_x(&self, x: f32) -> f32 {
        let mut s = x;
        for _ in 0..Self::NEWTON_ITERATIONS {
            let err = self.sample_x(s) - x;
            if err.abs() < Self::EPSILON {
                return s;
            }
            let dx = self.sample_dx(s);
            if dx.abs() < Self::EPSILON {
                break;
            }
            s -= err / dx;
        }

        // Newton stalled on a flat section; fall back to bisection
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = x;
        for _ in 0..Self::BISECTION_ITERATIONS {
            let sx = self.sample_x(s);
            if (sx - x).abs() < Self::EPSILON {
                break;
            }
            if sx < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }

    fn solve(&self, x: f32) -> f32 {
        self.sample_y(self.solve_curve_x(x))
    }
}
