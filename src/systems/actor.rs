//! Actor state update, run after the tile physics step.
//!
//! Uses the collision flags produced by
//! [`tile_physics_system`](crate::systems::physics::tile_physics_system) to
//! track air time, refill jumps on landing, enter wall slides, apply
//! horizontal drag to the player and choose the action animation.

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::actor::{
    AIR_TIME_THRESHOLD, Actor, ActorAction, ActorKind, DASH_FAST_PHASE, DASH_SPEED,
    FALL_DEATH_AIR_TIME, MAX_JUMPS,
};
use crate::components::animation::Animation;
use crate::components::movementintent::MovementIntent;
use crate::components::physicsbody::PhysicsBody;
use crate::resources::animationstore::AnimationStore;

/// Falling speed cap while sliding down a wall.
const WALL_SLIDE_SPEED: f32 = 0.5;
/// Horizontal velocity lost per frame by the player.
const HORIZONTAL_DRAG: f32 = 0.1;

/// Update one actor from its post-physics body. Returns the chosen action.
pub fn update_actor(actor: &mut Actor, body: &mut PhysicsBody, movement_x: f32) -> ActorAction {
    if movement_x > 0.0 {
        actor.flip = false;
    }
    if movement_x < 0.0 {
        actor.flip = true;
    }
    actor.last_movement = movement_x;

    actor.air_time = actor.air_time.saturating_add(1);
    if actor.kind == ActorKind::Player && actor.air_time > FALL_DEATH_AIR_TIME && !actor.dead {
        actor.dead = true;
        info!("Player fell out of the level");
    }
    if body.collisions.down {
        actor.air_time = 0;
        actor.jumps = MAX_JUMPS;
    }

    actor.action = match actor.kind {
        ActorKind::Player => {
            actor.wall_slide = false;
            if body.collisions.horizontal() && actor.air_time > AIR_TIME_THRESHOLD {
                actor.air_time = AIR_TIME_THRESHOLD + 1;
                actor.wall_slide = true;
                body.velocity.y = body.velocity.y.min(WALL_SLIDE_SPEED);
                actor.flip = !body.collisions.right;
            }

            actor.dashing -= actor.dashing.signum();
            if actor.dashing.abs() > DASH_FAST_PHASE {
                body.velocity.x = actor.dashing.signum() as f32 * DASH_SPEED;
                if actor.dashing.abs() == DASH_FAST_PHASE + 1 {
                    body.velocity.x *= 0.1;
                }
            }

            if body.velocity.x > 0.0 {
                body.velocity.x = (body.velocity.x - HORIZONTAL_DRAG).max(0.0);
            } else {
                body.velocity.x = (body.velocity.x + HORIZONTAL_DRAG).min(0.0);
            }

            if actor.wall_slide {
                ActorAction::WallSlide
            } else if actor.air_time > AIR_TIME_THRESHOLD {
                ActorAction::Jump
            } else if movement_x != 0.0 {
                ActorAction::Run
            } else {
                ActorAction::Idle
            }
        }
        ActorKind::Enemy => {
            if movement_x != 0.0 {
                ActorAction::Run
            } else {
                ActorAction::Idle
            }
        }
    };
    actor.action
}

/// Update every living actor and switch its animation when the action changes.
pub fn actor_state_system(
    mut query: Query<(
        Entity,
        &mut Actor,
        &mut PhysicsBody,
        Option<&MovementIntent>,
        Option<&mut Animation>,
    )>,
    store: Option<Res<AnimationStore>>,
) {
    for (entity, mut actor, mut body, intent, animation) in query.iter_mut() {
        if actor.dead {
            continue;
        }
        let movement_x = intent.map(|i| i.0.x).unwrap_or(0.0);
        let previous = actor.action;
        let action = update_actor(&mut actor, &mut body, movement_x);

        if action != previous {
            debug!("{:?} {} -> {}", entity, previous.as_str(), action.as_str());
        }
        if let (Some(store), Some(mut animation)) = (store.as_ref(), animation) {
            store.switch(&mut animation, &actor.animation_key());
        }
    }
}
