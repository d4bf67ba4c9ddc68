//! Projectile flight.
//!
//! Every frame each [`Projectile`] moves by its speed. It is dropped when it
//! enters a solid tile or grows too old. A projectile that reaches a living
//! player kills them unless they are in the fast phase of a dash.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::actor::{Actor, ActorKind};
use crate::components::physicsbody::PhysicsBody;
use crate::components::projectile::Projectile;
use crate::resources::tilemap::Tilemap;

/// Move `shot` one frame. Returns `false` once it should be removed.
pub fn step_projectile(shot: &mut Projectile, tilemap: &Tilemap) -> bool {
    shot.advance();
    tilemap.solid_at(shot.pos).is_none() && !shot.expired()
}

pub fn projectile_system(
    mut projectiles: Query<(Entity, &mut Projectile)>,
    mut actors: Query<(Entity, &mut Actor, &PhysicsBody)>,
    tilemap: Res<Tilemap>,
    mut commands: Commands,
) {
    for (entity, mut shot) in projectiles.iter_mut() {
        if !step_projectile(&mut shot, &tilemap) {
            commands.entity(entity).try_despawn();
            continue;
        }

        let hit = actors.iter_mut().find(|(_, actor, body)| {
            actor.kind == ActorKind::Player
                && !actor.dead
                && !actor.dash_strikes()
                && body.rect().contains_point(shot.pos)
        });
        if let Some((player, mut actor, _)) = hit {
            actor.dead = true;
            info!("{:?} shot down at {:?}", player, shot.pos);
            commands.entity(entity).try_despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tilemap::{GridPos, TileKind};
    use glam::Vec2;

    #[test]
    fn projectile_stops_inside_solid_tile() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(1, 0), TileKind::Stone, 0);
        let mut shot = Projectile::fired(Vec2::new(10.0, 8.0), false);
        for _ in 0..3 {
            assert!(step_projectile(&mut shot, &map));
        }
        assert!(!step_projectile(&mut shot, &map));
        assert_eq!(shot.pos.x, 16.0);
    }

    #[test]
    fn decorations_do_not_stop_projectiles() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(1, 0), TileKind::Decor, 0);
        let mut shot = Projectile::fired(Vec2::new(10.0, 8.0), false);
        for _ in 0..20 {
            assert!(step_projectile(&mut shot, &map));
        }
    }

    #[test]
    fn old_projectile_is_removed_in_open_air() {
        let map = Tilemap::new(16);
        let mut shot = Projectile::fired(Vec2::ZERO, true);
        let flights = std::iter::from_fn(|| step_projectile(&mut shot, &map).then_some(()));
        assert_eq!(flights.count(), 360);
    }
}
