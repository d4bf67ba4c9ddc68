//! Enemy behaviour.
//!
//! [`enemy_patrol_system`] walks each [`Patrol`]ling enemy along its
//! platform. A walking enemy checks the ground just ahead of its feet: with
//! solid ground it keeps going unless it bumped into a wall, without it
//! turns round. When a walk ends the enemy fires at the player if they
//! share a row and the enemy faces them. Idle enemies start a new walk at
//! random.
//!
//! [`dash_strike_system`] removes every enemy touched by a dashing player.

use bevy_ecs::prelude::*;
use fastrand::Rng;
use glam::Vec2;
use log::{debug, info};
use smallvec::SmallVec;

use crate::components::actor::{Actor, ActorKind};
use crate::components::movementintent::MovementIntent;
use crate::components::patrol::{PATROL_SPEED, Patrol, WALK_CHANCE, WALK_FRAMES};
use crate::components::physicsbody::PhysicsBody;
use crate::components::projectile::Projectile;
use crate::geometry::Rect;
use crate::resources::tilemap::Tilemap;

/// Horizontal distance from the body centre to the ground check.
const LOOKAHEAD: f32 = 7.0;
/// Ground check depth below the body's top edge.
const GROUND_CHECK_DEPTH: f32 = 23.0;
/// Shots leave this far in front of the body centre.
const MUZZLE_OFFSET: f32 = 7.0;
/// The player must be closer than this vertically to be shot at.
const SHOT_RANGE_Y: f32 = 16.0;

/// Advance a patrol by one frame.
///
/// Returns the horizontal movement for this frame and whether the walk has
/// just finished.
pub fn patrol_step(
    actor: &mut Actor,
    patrol: &mut Patrol,
    body: &PhysicsBody,
    tilemap: &Tilemap,
) -> (f32, bool) {
    if !patrol.is_walking() {
        return (0.0, false);
    }

    let ahead = if actor.flip { -LOOKAHEAD } else { LOOKAHEAD };
    let ground = Vec2::new(body.rect().center().x + ahead, body.pos.y + GROUND_CHECK_DEPTH);
    let mut movement_x = 0.0;
    if tilemap.solid_at(ground).is_some() {
        if body.collisions.horizontal() {
            actor.flip = !actor.flip;
        } else {
            movement_x = if actor.flip { -PATROL_SPEED } else { PATROL_SPEED };
        }
    } else {
        actor.flip = !actor.flip;
    }

    patrol.walking -= 1;
    (movement_x, !patrol.is_walking())
}

/// Shot fired at `target` (the player's position), if the enemy faces it
/// from the same row.
pub fn aim(actor: &Actor, body: &PhysicsBody, target: Vec2) -> Option<Projectile> {
    if (target.y - body.pos.y).abs() >= SHOT_RANGE_Y {
        return None;
    }
    let center = body.rect().center();
    let dx = target.x - body.pos.x;
    if actor.flip && dx < 0.0 {
        Some(Projectile::fired(Vec2::new(center.x - MUZZLE_OFFSET, center.y), true))
    } else if !actor.flip && dx > 0.0 {
        Some(Projectile::fired(Vec2::new(center.x + MUZZLE_OFFSET, center.y), false))
    } else {
        None
    }
}

/// Drive every patrolling enemy's [`MovementIntent`] and fire its shots.
///
/// # Ordering
///
/// Runs **before** `tile_physics_system`; it reads the collision flags left
/// by the previous frame.
pub fn enemy_patrol_system(
    mut enemies: Query<(Entity, &mut Actor, &PhysicsBody, &mut MovementIntent, &mut Patrol)>,
    players: Query<(&Actor, &PhysicsBody), Without<Patrol>>,
    tilemap: Res<Tilemap>,
    mut rng: Local<Rng>,
    mut commands: Commands,
) {
    let target = players
        .iter()
        .find(|(actor, _)| actor.kind == ActorKind::Player)
        .map(|(_, body)| body.pos);

    for (entity, mut actor, body, mut intent, mut patrol) in enemies.iter_mut() {
        if !patrol.is_walking() {
            intent.0 = Vec2::ZERO;
            if rng.f32() < WALK_CHANCE {
                patrol.walking = rng.u32(WALK_FRAMES.0..=WALK_FRAMES.1);
                debug!("{:?} walks for {} frames", entity, patrol.walking);
            }
            continue;
        }

        let (movement_x, finished) = patrol_step(&mut actor, &mut patrol, body, &tilemap);
        intent.0 = Vec2::new(movement_x, 0.0);
        if !finished {
            continue;
        }
        if let Some(shot) = target.and_then(|pos| aim(&actor, body, pos)) {
            debug!("{:?} fires from {:?}", entity, shot.pos);
            commands.spawn(shot);
        }
    }
}

/// Despawn enemies overlapping a player in the fast phase of a dash.
pub fn dash_strike_system(actors: Query<(Entity, &Actor, &PhysicsBody)>, mut commands: Commands) {
    let strikes: SmallVec<[Rect; 1]> = actors
        .iter()
        .filter(|(_, actor, _)| {
            actor.kind == ActorKind::Player && !actor.dead && actor.dash_strikes()
        })
        .map(|(_, _, body)| body.rect())
        .collect();
    if strikes.is_empty() {
        return;
    }

    for (entity, actor, body) in actors.iter() {
        let rect = body.rect();
        if actor.kind == ActorKind::Enemy && strikes.iter().any(|s| s.overlaps(&rect)) {
            info!("{:?} cut down by a dash", entity);
            commands.entity(entity).try_despawn();
        }
    }
}
