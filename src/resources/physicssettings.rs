//! Physics tuning shared by every body.

use bevy_ecs::prelude::Resource;

use crate::resources::gameconfig::GameConfig;

/// Per-frame gravity and falling speed cap used by the tile resolver.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    /// Added to `velocity.y` every step.
    pub gravity: f32,
    /// Upper bound for `velocity.y`.
    pub terminal_velocity: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            terminal_velocity: 5.0,
        }
    }
}

impl PhysicsSettings {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            gravity: config.gravity,
            terminal_velocity: config.terminal_velocity,
        }
    }
}
