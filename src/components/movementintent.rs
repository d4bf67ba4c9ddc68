//! Per-frame movement intent.
//!
//! Input handling (or AI) writes the displacement an entity wants to make
//! this frame into [`MovementIntent`]. The tile physics system adds the
//! body's own velocity on top and resolves the result against the map.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Desired displacement in pixels for the current frame.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementIntent(pub Vec2);

impl MovementIntent {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Horizontal walk intent from left/right button state, scaled by `speed`.
    pub fn from_buttons(left: bool, right: bool, speed: f32) -> Self {
        let dir = right as i32 - left as i32;
        Self(Vec2::new(dir as f32 * speed, 0.0))
    }
}
