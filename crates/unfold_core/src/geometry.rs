//! Document-space geometry
//!
//! All coordinates are CSS pixels with y growing downward. Element rects
//! are expressed in document space; the viewport is a rect whose origin
//! is the current scroll offset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Points and sizes
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Rect of this size placed at `origin`
    pub const fn at(self, origin: Point) -> Rect {
        Rect { origin, size: self }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rect
// ─────────────────────────────────────────────────────────────────────────────

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn area(&self) -> f32 {
        self.size.width.max(0.0) * self.size.height.max(0.0)
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }

    /// Grow (positive insets) or shrink (negative insets) each edge
    ///
    /// Sizes never go below zero; a rect shrunk past itself collapses
    /// onto its top-left corner.
    pub fn expand(&self, insets: Insets) -> Self {
        let x = self.origin.x - insets.left;
        let y = self.origin.y - insets.top;
        Rect {
            origin: Point::new(x, y),
            size: Size::new(
                (self.size.width + insets.left + insets.right).max(0.0),
                (self.size.height + insets.top + insets.bottom).max(0.0),
            ),
        }
    }

    /// Overlapping region of two rects
    ///
    /// Edges are inclusive: rects that only touch produce a zero-area
    /// intersection rather than `None`. Returns `None` when they are apart.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x().max(other.x());
        let top = self.y().max(other.y());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }

        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Insets
// ─────────────────────────────────────────────────────────────────────────────

/// Per-edge margin with CSS `rootMargin` sign rules
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// A margin string that is not 1-4 pixel lengths
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarginParseError {
    #[error("margin must have 1 to 4 components, got {0}")]
    ComponentCount(usize),

    #[error("invalid margin component '{0}' (expected a px length)")]
    Component(String),
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Parse a CSS margin shorthand such as `"0px 0px -50px 0px"`
    ///
    /// One value applies to all edges, two are vertical/horizontal, three
    /// are top/horizontal/bottom, four go clockwise from the top. Unitless
    /// zero is accepted, like in CSS.
    pub fn parse_margin(input: &str) -> Result<Self, MarginParseError> {
        let values = input
            .split_whitespace()
            .map(parse_px)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [v, h] => Ok(Self::new(*v, *h, *v, *h)),
            [t, h, b] => Ok(Self::new(*t, *h, *b, *h)),
            [t, r, b, l] => Ok(Self::new(*t, *r, *b, *l)),
            other => Err(MarginParseError::ComponentCount(other.len())),
        }
    }
}

fn parse_px(component: &str) -> Result<f32, MarginParseError> {
    let number = match component.strip_suffix("px") {
        Some(number) => number,
        None if component == "0" => component,
        None => return Err(MarginParseError::Component(component.to_string())),
    };

    number
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MarginParseError::Component(component.to_string()))
}
