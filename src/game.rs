//! Level setup and the per-frame schedule.
//!
//! A level is a map file `<dir>/<id>.json`. Loading one replaces the
//! [`Tilemap`] resource, pulls the spawn markers out of the map and spawns a
//! player and its enemies as ECS entities with [`PhysicsBody`] components.
//!
//! # Markers
//!
//! - `(spawners, 0)` – player start, removed from the map
//! - `(spawners, 1)` – enemy start, removed from the map
//! - `(large_decor, 2)` – tree; kept, and its canopy becomes a leaf spawner area
//!
//! # Progression
//!
//! The schedule only records what should happen next in
//! [`LevelState::pending`]. [`apply_level_change`] loads that map between
//! frames.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::actor::{Actor, ActorKind};
use crate::components::movementintent::MovementIntent;
use crate::components::patrol::Patrol;
use crate::components::physicsbody::PhysicsBody;
use crate::components::projectile::Projectile;
use crate::geometry::Rect;
use crate::resources::animationstore::AnimationStore;
use crate::resources::levelstate::LevelState;
use crate::resources::tilemap::{TileKind, Tilemap, TilemapError};
use crate::systems::actor::actor_state_system;
use crate::systems::animation::animation_system;
use crate::systems::enemy::{dash_strike_system, enemy_patrol_system};
use crate::systems::level::level_progress_system;
use crate::systems::physics::tile_physics_system;
use crate::systems::projectile::projectile_system;

const PLAYER_SPAWNER: (TileKind, u32) = (TileKind::Spawners, 0);
const ENEMY_SPAWNER: (TileKind, u32) = (TileKind::Spawners, 1);
const TREE: (TileKind, u32) = (TileKind::LargeDecor, 2);

/// Spawn data pulled out of a freshly loaded map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelSpawns {
    /// Player start (top-left, world pixels). The last marker wins.
    pub player: Option<Vec2>,
    pub enemies: Vec<Vec2>,
    /// Tree canopies that emit leaf particles.
    pub leaf_areas: Vec<Rect>,
}

impl LevelSpawns {
    /// Extract markers from `tilemap`. Spawner tiles are removed; trees stay.
    pub fn extract_from(tilemap: &mut Tilemap) -> Self {
        let leaf_areas = tilemap
            .extract(&[TREE], true)
            .into_iter()
            .map(|tree| Rect::new(tree.pos.x + 4.0, tree.pos.y + 4.0, 23.0, 13.0))
            .collect();

        let mut spawns = LevelSpawns {
            leaf_areas,
            ..Default::default()
        };
        for spawner in tilemap.extract(&[PLAYER_SPAWNER, ENEMY_SPAWNER], false) {
            if spawner.id() == PLAYER_SPAWNER {
                spawns.player = Some(spawner.pos);
            } else {
                spawns.enemies.push(spawner.pos);
            }
        }
        spawns
    }
}

/// Path of the map file for level `id`.
pub fn level_map_path(dir: impl AsRef<Path>, id: u32) -> PathBuf {
    dir.as_ref().join(format!("{}.json", id))
}

/// Number of `.json` map files in `dir`.
pub fn count_levels(dir: impl AsRef<Path>) -> io::Result<u32> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            count += 1;
        }
    }
    Ok(count)
}

/// Level to load after `current` is cleared, staying on the last one.
pub fn next_level(current: u32, level_count: u32) -> u32 {
    (current + 1).min(level_count.saturating_sub(1))
}

/// Spawn an actor with its body and, when the store has it, its idle animation.
pub fn spawn_actor(world: &mut World, kind: ActorKind, pos: Vec2) -> Entity {
    let actor = Actor::new(kind);
    let animation = world
        .get_resource::<AnimationStore>()
        .and_then(|store| store.instantiate(&actor.animation_key()));

    let mut entity = world.spawn((
        actor,
        PhysicsBody::new(pos, kind.body_size()),
        MovementIntent::default(),
    ));
    if let Some(animation) = animation {
        entity.insert(animation);
    }
    entity.id()
}

/// Install `tilemap` as the current level and spawn its actors.
///
/// Actors and projectiles from a previous level are despawned first. Enemies
/// start out on an idle [`Patrol`].
pub fn setup_level(world: &mut World, mut tilemap: Tilemap) -> LevelSpawns {
    let previous: Vec<Entity> = world
        .query_filtered::<Entity, Or<(With<Actor>, With<Projectile>)>>()
        .iter(world)
        .collect();
    for entity in previous {
        world.despawn(entity);
    }

    let spawns = LevelSpawns::extract_from(&mut tilemap);
    world.insert_resource(tilemap);

    if let Some(pos) = spawns.player {
        spawn_actor(world, ActorKind::Player, pos);
    }
    for &pos in &spawns.enemies {
        let enemy = spawn_actor(world, ActorKind::Enemy, pos);
        world.entity_mut(enemy).insert(Patrol::default());
    }

    info!(
        "Level ready: player={}, {} enemies, {} leaf areas",
        spawns.player.is_some(),
        spawns.enemies.len(),
        spawns.leaf_areas.len()
    );
    spawns
}

/// Load level `id` from `dir` and set it up. Level files must exist.
pub fn load_level(
    world: &mut World,
    dir: impl AsRef<Path>,
    id: u32,
) -> Result<LevelSpawns, TilemapError> {
    let tilemap = Tilemap::load(level_map_path(dir, id))?;
    Ok(setup_level(world, tilemap))
}

/// Load the map recorded in [`LevelState::pending`], if any.
///
/// Returns the loaded level. On error the pending change is dropped and the
/// current level stays in place.
pub fn apply_level_change(
    world: &mut World,
    dir: impl AsRef<Path>,
) -> Result<Option<u32>, TilemapError> {
    let change = world
        .get_resource_mut::<LevelState>()
        .and_then(|mut state| state.pending.take());
    let Some(change) = change else {
        return Ok(None);
    };

    let id = change.level();
    load_level(world, dir, id)?;
    if let Some(mut state) = world.get_resource_mut::<LevelState>() {
        state.enter(id);
    }
    info!("Entered level {}", id);
    Ok(Some(id))
}

/// Systems run once per frame, in order.
pub fn frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            enemy_patrol_system,
            tile_physics_system,
            actor_state_system,
            dash_strike_system,
            projectile_system,
            level_progress_system,
            animation_system,
        )
            .chain(),
    );
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tilemap::{GridPos, OffgridTile};

    fn level() -> Tilemap {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(2, 3), TileKind::Spawners, 0);
        map.place(GridPos::new(5, 3), TileKind::Spawners, 1);
        map.place(GridPos::new(0, 4), TileKind::Grass, 1);
        map.add_decoration(OffgridTile::new(TileKind::Spawners, 1, Vec2::new(90.0, 20.0)));
        map.add_decoration(OffgridTile::new(TileKind::LargeDecor, 2, Vec2::new(10.0, 30.0)));
        map
    }

    #[test]
    fn extract_pulls_spawners_and_keeps_trees() {
        let mut map = level();
        let spawns = LevelSpawns::extract_from(&mut map);

        assert_eq!(spawns.player, Some(Vec2::new(32.0, 48.0)));
        assert_eq!(spawns.enemies.len(), 2);
        assert_eq!(spawns.enemies[0], Vec2::new(90.0, 20.0));
        assert!(spawns.enemies.contains(&Vec2::new(80.0, 48.0)));
        assert_eq!(spawns.leaf_areas, vec![Rect::new(14.0, 34.0, 23.0, 13.0)]);

        assert_eq!(map.len(), 1);
        assert_eq!(map.decorations().len(), 1);
        assert_eq!(map.decorations()[0].kind, TileKind::LargeDecor);
    }

    #[test]
    fn next_level_clamps_to_last() {
        assert_eq!(next_level(0, 3), 1);
        assert_eq!(next_level(2, 3), 2);
        assert_eq!(next_level(0, 0), 0);
    }

    #[test]
    fn level_paths_use_numeric_names() {
        assert_eq!(level_map_path("data/maps", 2), PathBuf::from("data/maps/2.json"));
    }

    #[test]
    fn count_levels_ignores_other_files() {
        let dir = std::env::temp_dir().join(format!("tilerunner-levels-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        level().save(dir.join("0.json")).unwrap();
        level().save(dir.join("1.json")).unwrap();
        fs::write(dir.join("notes.txt"), "wip").unwrap();
        let count = count_levels(&dir);
        fs::remove_dir_all(&dir).ok();
        assert_eq!(count.unwrap(), 2);
    }

    #[test]
    fn setup_level_replaces_previous_actors() {
        let mut world = World::new();
        setup_level(&mut world, level());
        setup_level(&mut world, level());

        let actors = world.query::<&Actor>().iter(&world).count();
        assert_eq!(actors, 3);
        assert_eq!(world.query::<&Patrol>().iter(&world).count(), 2);
        assert_eq!(world.resource::<Tilemap>().len(), 1);
    }

    #[test]
    fn setup_level_clears_projectiles() {
        let mut world = World::new();
        world.spawn(Projectile::fired(Vec2::ZERO, false));
        setup_level(&mut world, level());
        assert_eq!(world.query::<&Projectile>().iter(&world).count(), 0);
    }

    #[test]
    fn level_change_without_pending_does_nothing() {
        let mut world = World::new();
        world.insert_resource(LevelState::new(0, 1));
        let dir = std::env::temp_dir().join("tilerunner-no-such-levels");
        assert!(matches!(apply_level_change(&mut world, &dir), Ok(None)));
        assert!(matches!(apply_level_change(&mut World::new(), &dir), Ok(None)));
    }
}
