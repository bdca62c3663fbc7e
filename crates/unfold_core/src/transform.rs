//! Presentation transforms
//!
//! Transforms apply to an element's rendering layer only. They never
//! move its layout box, so document flow is unaffected.

use serde::{Deserialize, Serialize};

/// 2D translation in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub const fn translate(x: f32, y: f32) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
        }
    }

    pub const fn translate_x(x: f32) -> Self {
        Self::translate(x, 0.0)
    }

    pub const fn translate_y(y: f32) -> Self {
        Self::translate(0.0, y)
    }

    pub fn is_identity(&self) -> bool {
        self.translate_x == 0.0 && self.translate_y == 0.0
    }

    /// Linear blend between two transforms
    pub fn lerp(&self, other: &Transform, t: f32) -> Transform {
        Transform {
            translate_x: self.translate_x + (other.translate_x - self.translate_x) * t,
            translate_y: self.translate_y + (other.translate_y - self.translate_y) * t,
        }
    }
}
