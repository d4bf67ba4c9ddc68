//! Axis-separated tile collision.
//!
//! [`resolve`] moves a [`PhysicsBody`] by its intended movement plus its own
//! velocity, one axis at a time: the X displacement is applied and corrected
//! against nearby solid tiles, then the Y displacement is applied from the
//! corrected position and corrected in turn. Splitting the axes keeps each
//! correction unambiguous (the side that was hit is the side we moved
//! towards) at the cost of occasional corner clipping.
//!
//! After both passes gravity is integrated into `velocity.y`, capped at the
//! terminal velocity, and any vertical contact zeroes vertical momentum.
//!
//! [`tile_physics_system`] runs the resolver for every body in the ECS world
//! against the [`Tilemap`] resource.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::trace;

use crate::components::actor::Actor;
use crate::components::movementintent::MovementIntent;
use crate::components::physicsbody::{CollisionFlags, PhysicsBody};
use crate::resources::physicssettings::PhysicsSettings;
use crate::resources::tilemap::Tilemap;
use crate::resources::tilemap::query::SpatialQuery;

/// Step `body` with the default gravity settings.
pub fn resolve<Q: SpatialQuery + ?Sized>(body: &mut PhysicsBody, movement: Vec2, query: &Q) {
    resolve_with(body, movement, query, &PhysicsSettings::default());
}

/// Step `body` by `movement + body.velocity`, colliding with solid tiles.
pub fn resolve_with<Q: SpatialQuery + ?Sized>(
    body: &mut PhysicsBody,
    movement: Vec2,
    query: &Q,
    settings: &PhysicsSettings,
) {
    body.collisions = CollisionFlags::default();
    let frame_movement = movement + body.velocity;

    // X axis
    body.pos.x += frame_movement.x;
    let mut rect = body.rect();
    for obstacle in query.physics_rects_around(body.pos) {
        if rect.overlaps(&obstacle) {
            if frame_movement.x > 0.0 {
                rect.set_right(obstacle.left());
                body.collisions.right = true;
            }
            if frame_movement.x < 0.0 {
                rect.set_left(obstacle.right());
                body.collisions.left = true;
            }
            body.pos.x = rect.x;
        }
    }

    // Y axis, from the corrected X position
    body.pos.y += frame_movement.y;
    let mut rect = body.rect();
    for obstacle in query.physics_rects_around(body.pos) {
        if rect.overlaps(&obstacle) {
            if frame_movement.y > 0.0 {
                rect.set_bottom(obstacle.top());
                body.collisions.down = true;
            }
            if frame_movement.y < 0.0 {
                rect.set_top(obstacle.bottom());
                body.collisions.up = true;
            }
            body.pos.y = rect.y;
        }
    }

    body.velocity.y = (body.velocity.y + settings.gravity).min(settings.terminal_velocity);
    if body.collisions.vertical() {
        body.velocity.y = 0.0;
    }
}

/// Resolve every [`PhysicsBody`] against the level's tiles.
///
/// Entities without a [`MovementIntent`] move by their velocity alone.
/// Dead actors are frozen in place.
pub fn tile_physics_system(
    mut query: Query<(Entity, &mut PhysicsBody, Option<&MovementIntent>, Option<&Actor>)>,
    tilemap: Res<Tilemap>,
    settings: Option<Res<PhysicsSettings>>,
) {
    let settings = settings.map(|s| *s).unwrap_or_default();
    for (entity, mut body, intent, actor) in query.iter_mut() {
        if actor.is_some_and(|a| a.dead) {
            continue;
        }
        let movement = intent.map(|i| i.0).unwrap_or(Vec2::ZERO);
        let was_grounded = body.on_ground();
        resolve_with(&mut body, movement, &*tilemap, &settings);
        if body.on_ground() && !was_grounded {
            trace!("{:?} landed at {:?}", entity, body.pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::resources::tilemap::query::NearbyRects;
    use crate::resources::tilemap::{GridPos, TileKind};

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Fixed obstacle list, independent of the query position.
    struct Obstacles(Vec<Rect>);

    impl SpatialQuery for Obstacles {
        fn physics_rects_around(&self, _world: Vec2) -> NearbyRects {
            self.0.iter().copied().collect()
        }
    }

    fn tile_body(x: f32, y: f32) -> PhysicsBody {
        PhysicsBody::new(Vec2::new(x, y), Vec2::splat(16.0))
    }

    #[test]
    fn moving_right_into_a_wall_stops_flush() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(1, 0), TileKind::Stone, 0);
        let mut body = tile_body(0.0, 0.0).with_velocity(Vec2::new(5.0, 0.0));

        resolve(&mut body, Vec2::ZERO, &map);

        assert_eq!(body.rect().right(), 16.0);
        assert!(body.collisions.right);
        assert!(!body.collisions.left && !body.collisions.vertical());
    }

    #[test]
    fn moving_left_into_a_wall_stops_flush() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(0, 0), TileKind::Grass, 0);
        let mut body = tile_body(18.0, 0.0);

        resolve(&mut body, Vec2::new(-4.0, 0.0), &map);

        assert_eq!(body.pos.x, 16.0);
        assert!(body.collisions.left);
    }

    #[test]
    fn falling_body_lands_and_loses_vertical_speed() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(0, 2), TileKind::Stone, 0);
        let mut body = PhysicsBody::new(Vec2::new(2.0, 14.0), Vec2::new(8.0, 15.0))
            .with_velocity(Vec2::new(0.0, 4.0));

        resolve(&mut body, Vec2::ZERO, &map);

        assert_eq!(body.rect().bottom(), 32.0);
        assert!(body.collisions.down);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn resting_body_keeps_touching_the_ground() {
        let mut map = Tilemap::new(16);
        for x in -1..=2 {
            map.place(GridPos::new(x, 1), TileKind::Grass, 1);
        }
        let mut body = PhysicsBody::new(Vec2::new(4.0, 1.0), Vec2::new(8.0, 15.0));
        for _ in 0..30 {
            resolve(&mut body, Vec2::ZERO, &map);
        }
        assert!(approx_eq(body.pos.y, 1.0));
        assert!(body.on_ground());
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn jumping_into_a_ceiling_sets_up() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(0, 0), TileKind::Stone, 0);
        let mut body = PhysicsBody::new(Vec2::new(2.0, 18.0), Vec2::new(8.0, 15.0))
            .with_velocity(Vec2::new(0.0, -3.0));

        resolve(&mut body, Vec2::ZERO, &map);

        assert_eq!(body.pos.y, 16.0);
        assert!(body.collisions.up);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn decorative_tiles_are_passed_through() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(1, 0), TileKind::Decor, 0);
        map.place(GridPos::new(1, 1), TileKind::Spawners, 0);
        let mut body = tile_body(0.0, 0.0);

        resolve(&mut body, Vec2::new(6.0, 0.0), &map);

        assert_eq!(body.pos, Vec2::new(6.0, 0.0));
        assert!(!body.collisions.any());
        assert!(approx_eq(body.velocity.y, 0.1));
    }

    #[test]
    fn free_fall_converges_to_terminal_velocity() {
        let map = Tilemap::new(16);
        let mut body = tile_body(0.0, 0.0);
        let mut previous = body.velocity.y;
        for _ in 0..200 {
            resolve(&mut body, Vec2::ZERO, &map);
            assert!(body.velocity.y <= 5.0);
            assert!(body.velocity.y >= previous);
            previous = body.velocity.y;
        }
        assert_eq!(body.velocity.y, 5.0);
        resolve(&mut body, Vec2::ZERO, &map);
        assert_eq!(body.velocity.y, 5.0);
    }

    #[test]
    fn intent_and_velocity_are_combined() {
        let map = Tilemap::new(16);
        let mut body = tile_body(0.0, 0.0).with_velocity(Vec2::new(1.5, 0.0));
        resolve(&mut body, Vec2::new(2.0, 0.0), &map);
        assert!(approx_eq(body.pos.x, 3.5));
        assert_eq!(body.velocity.x, 1.5);
    }

    #[test]
    fn flags_reset_every_step() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(1, 0), TileKind::Stone, 0);
        let mut body = tile_body(0.0, 0.0);
        resolve(&mut body, Vec2::new(3.0, 0.0), &map);
        assert!(body.collisions.right);
        resolve(&mut body, Vec2::new(-3.0, 0.0), &map);
        assert!(!body.collisions.right);
    }

    #[test]
    fn wide_wall_clamps_against_every_overlap() {
        let wall = Obstacles(vec![
            Rect::new(20.0, 0.0, 16.0, 16.0),
            Rect::new(20.0, 16.0, 16.0, 16.0),
        ]);
        let mut body = PhysicsBody::new(Vec2::new(0.0, 8.0), Vec2::new(16.0, 16.0));
        resolve(&mut body, Vec2::new(10.0, 0.0), &wall);
        assert_eq!(body.rect().right(), 20.0);
        assert!(body.collisions.right);
        assert!(!body.collisions.vertical());
    }

    #[test]
    fn custom_settings_change_gravity() {
        let map = Tilemap::new(16);
        let settings = PhysicsSettings {
            gravity: 0.5,
            terminal_velocity: 1.0,
        };
        let mut body = tile_body(0.0, 0.0);
        resolve_with(&mut body, Vec2::ZERO, &map, &settings);
        assert_eq!(body.velocity.y, 0.5);
        resolve_with(&mut body, Vec2::ZERO, &map, &settings);
        resolve_with(&mut body, Vec2::ZERO, &map, &settings);
        assert_eq!(body.velocity.y, 1.0);
    }

    #[test]
    fn far_away_body_resolves_against_edge_tiles() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(i32::MAX, 0), TileKind::Stone, 0);
        let mut body = tile_body(1.0e12, 0.0);
        resolve(&mut body, Vec2::new(3.0, 0.0), &map);
        assert!(body.velocity.y > 0.0);
    }
}
