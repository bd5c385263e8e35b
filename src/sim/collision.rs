//! Collision detection for axis-aligned boxes
//!
//! Every entity in the arena is treated as a box anchored at its top-left
//! corner, in canvas pixels with y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Center point of the box
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Anything with a collision box
pub trait Bounds {
    fn bounds(&self) -> Rect;

    fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Strict overlap test; boxes that only share an edge do not collide
pub fn check_collision(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Overlap test between two entities
pub fn overlaps(a: &impl Bounds, b: &impl Bounds) -> bool {
    check_collision(&a.bounds(), &b.bounds())
}
