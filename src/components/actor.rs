//! Platformer actor state: who the entity is and what it is doing.
//!
//! [`Actor`] carries the per-entity gameplay counters that sit on top of a
//! [`PhysicsBody`]: frames spent airborne, remaining jumps, wall-slide state,
//! facing, the dash countdown and whether the player has died. The
//! [`actor_state_system`](crate::systems::actor::actor_state_system) updates
//! it after the physics step and picks the matching animation.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::physicsbody::PhysicsBody;

/// Jumps granted every time the actor lands.
pub const MAX_JUMPS: u32 = 2;
/// Airborne frames after which the actor counts as jumping/falling.
pub const AIR_TIME_THRESHOLD: u32 = 4;
/// Airborne frames after which the player has fallen out of the level.
pub const FALL_DEATH_AIR_TIME: u32 = 120;
/// Length of a dash in frames. The first 10 are the fast phase.
pub const DASH_FRAMES: i32 = 60;
/// Dash counter magnitude above which the player moves at dash speed.
pub const DASH_FAST_PHASE: i32 = 50;
/// Horizontal speed during the fast phase of a dash.
pub const DASH_SPEED: f32 = 8.0;

/// Entity category spawned from map markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    Enemy,
}

impl ActorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActorKind::Player => "player",
            ActorKind::Enemy => "enemy",
        }
    }

    /// Collision box size in pixels.
    pub fn body_size(self) -> Vec2 {
        Vec2::new(8.0, 15.0)
    }
}

/// Animation-driving action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActorAction {
    #[default]
    Idle,
    Run,
    Jump,
    WallSlide,
}

impl ActorAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ActorAction::Idle => "idle",
            ActorAction::Run => "run",
            ActorAction::Jump => "jump",
            ActorAction::WallSlide => "wall_slide",
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub kind: ActorKind,
    pub action: ActorAction,
    /// Frames since the actor last stood on ground.
    pub air_time: u32,
    pub jumps: u32,
    pub wall_slide: bool,
    /// Facing left.
    pub flip: bool,
    /// Horizontal movement intent of the previous frame.
    pub last_movement: f32,
    /// Dash countdown, signed by direction (positive is right).
    pub dashing: i32,
    /// Player fell out of the level or was shot.
    pub dead: bool,
}

impl Actor {
    pub fn new(kind: ActorKind) -> Self {
        Self {
            kind,
            action: ActorAction::Idle,
            air_time: 0,
            jumps: MAX_JUMPS,
            wall_slide: false,
            flip: false,
            last_movement: 0.0,
            dashing: 0,
            dead: false,
        }
    }

    /// Start a dash in the facing direction. Ignored while already dashing.
    pub fn dash(&mut self) -> bool {
        if self.dashing != 0 {
            return false;
        }
        self.dashing = if self.flip { -DASH_FRAMES } else { DASH_FRAMES };
        true
    }

    /// In the damaging part of a dash.
    pub fn dash_strikes(&self) -> bool {
        self.dashing.abs() >= DASH_FAST_PHASE
    }

    /// Animation store key for the current action, e.g. `"player/run"`.
    pub fn animation_key(&self) -> String {
        format!("{}/{}", self.kind.as_str(), self.action.as_str())
    }

    /// Start a jump, or a wall jump while wall sliding towards the wall.
    ///
    /// Returns true only for wall jumps; a regular jump consumes one of the
    /// remaining jumps and returns false.
    pub fn jump(&mut self, body: &mut PhysicsBody) -> bool {
        if self.wall_slide {
            let pushing_left_wall = self.flip && self.last_movement < 0.0;
            let pushing_right_wall = !self.flip && self.last_movement > 0.0;
            if pushing_left_wall || pushing_right_wall {
                body.velocity.x = if pushing_left_wall { 4.5 } else { -4.5 };
                body.velocity.y = -2.0;
                self.air_time = AIR_TIME_THRESHOLD + 1;
                self.jumps = self.jumps.saturating_sub(1);
                return true;
            }
        }
        if self.jumps > 0 {
            body.velocity.y = -3.0;
            self.jumps -= 1;
            self.air_time = AIR_TIME_THRESHOLD + 1;
        }
        false
    }
}
