//! Axis-aligned rectangles in world space.
//!
//! [`Rect`] is the collision shape shared by tiles, physics bodies, leaf
//! spawner areas and decoration hit-boxes in the editor. Coordinates are in
//! pixels with `y` growing downwards.

use glam::Vec2;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle from a top-left position and a size.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Move the rectangle so its right edge sits at `right`.
    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    /// Move the rectangle so its left edge sits at `left`.
    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    /// Move the rectangle so its bottom edge sits at `bottom`.
    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Move the rectangle so its top edge sits at `top`.
    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    /// Strict AABB overlap test. Rectangles that only share an edge do not
    /// overlap, so a body resting on a tile is not considered colliding.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point containment, inclusive on the top/left edges and exclusive on
    /// the bottom/right edges.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}
