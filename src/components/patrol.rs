//! Enemy patrol state.

use bevy_ecs::prelude::Component;

/// Horizontal walking speed while patrolling.
pub const PATROL_SPEED: f32 = 0.5;
/// Shortest and longest walk, in frames.
pub const WALK_FRAMES: (u32, u32) = (30, 120);
/// Chance per idle frame to start a new walk.
pub const WALK_CHANCE: f32 = 0.01;

/// Walks back and forth on a platform, turning at ledges and walls.
///
/// `walking` counts the frames left in the current walk. An idle enemy
/// (`walking == 0`) starts walking again at random.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Patrol {
    pub walking: u32,
}

impl Patrol {
    pub fn walking(frames: u32) -> Self {
        Self { walking: frames }
    }

    pub fn is_walking(&self) -> bool {
        self.walking > 0
    }
}
