//! Tile-colliding kinematic body.
//!
//! [`PhysicsBody`] is the physics-relevant part of a platformer entity: an
//! axis-aligned box with a velocity. The resolver in
//! [`crate::systems::physics`] moves it against the solid tiles of the
//! [`Tilemap`](crate::resources::tilemap::Tilemap) and records which sides
//! were blocked during the last step in [`CollisionFlags`].

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::geometry::Rect;

/// Sides blocked by a solid tile during the most recent physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    /// Blocked to the left or the right.
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    /// Blocked above or below.
    pub fn vertical(&self) -> bool {
        self.up || self.down
    }

    pub fn any(&self) -> bool {
        self.horizontal() || self.vertical()
    }
}

/// Axis-aligned body moved by the tile collision resolver.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    /// Top-left corner in world pixels.
    pub pos: Vec2,
    /// Width and height in pixels.
    pub size: Vec2,
    /// Velocity added to the intended movement every step.
    pub velocity: Vec2,
    /// Reset at the start of every step.
    pub collisions: CollisionFlags,
}

impl PhysicsBody {
    /// Create a body at rest.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: CollisionFlags::default(),
        }
    }

    /// Builder-style initial velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// World-space hit-box.
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Standing on a solid tile after the last step.
    pub fn on_ground(&self) -> bool {
        self.collisions.down
    }
}
