//! Projectiles fired by enemies.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Horizontal speed of a fresh projectile, pixels per frame.
pub const PROJECTILE_SPEED: f32 = 1.5;
/// Frames a projectile flies before it is dropped.
pub const PROJECTILE_MAX_AGE: u32 = 360;

/// A point travelling horizontally. It has no body; it is tested as a point
/// against solid tiles and the player.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Signed horizontal speed.
    pub speed: f32,
    /// Frames alive.
    pub age: u32,
}

impl Projectile {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self { pos, speed, age: 0 }
    }

    /// Fired from `origin` to the left or right.
    pub fn fired(origin: Vec2, left: bool) -> Self {
        let speed = if left { -PROJECTILE_SPEED } else { PROJECTILE_SPEED };
        Self::new(origin, speed)
    }

    /// Move one frame.
    pub fn advance(&mut self) {
        self.pos.x += self.speed;
        self.age = self.age.saturating_add(1);
    }

    pub fn expired(&self) -> bool {
        self.age > PROJECTILE_MAX_AGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fired_projectile_travels_and_expires() {
        let mut shot = Projectile::fired(Vec2::new(10.0, 4.0), true);
        shot.advance();
        shot.advance();
        assert_eq!(shot.pos, Vec2::new(7.0, 4.0));
        assert_eq!(shot.age, 2);
        assert!(!shot.expired());

        shot.age = PROJECTILE_MAX_AGE;
        assert!(!shot.expired());
        shot.advance();
        assert!(shot.expired());
    }
}
