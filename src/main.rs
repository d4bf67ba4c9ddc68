//! Tilerunner main entry point.
//!
//! Headless driver for the tile platformer core:
//! - **configparser** INI settings (`config.ini`)
//! - **bevy_ecs** world and per-frame schedule
//! - **serde_json** map files under the configured map directory
//!
//! # Flow
//!
//! 1. Load the configuration, falling back to defaults
//! 2. Load the level map (a missing file gives an empty map)
//! 3. Optionally autotile and save it back
//! 4. Spawn the level's actors and log the cells visible around the player
//! 5. Step the frame schedule `--frames` times, moving on to the next level
//!    or restarting the current one when the level state asks for it
//! 6. Log where every actor ended up
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --level 0 --frames 120
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};

use tilerunner::components::actor::{Actor, ActorAction, ActorKind};
use tilerunner::components::physicsbody::PhysicsBody;
use tilerunner::game::{
    apply_level_change, count_levels, frame_schedule, level_map_path, setup_level,
};
use tilerunner::resources::animationstore::{AnimationResource, AnimationStore};
use tilerunner::resources::gameconfig::GameConfig;
use tilerunner::resources::levelstate::LevelState;
use tilerunner::resources::physicssettings::PhysicsSettings;
use tilerunner::resources::tilemap::Tilemap;
use tilerunner::systems::render::visible_cells;

/// Tilerunner 2D platformer core
#[derive(Parser)]
#[command(version, about = "Tile map tools and headless platformer simulation")]
struct Cli {
    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Map file to open instead of the configured level.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// Level number to open, overriding the configuration.
    #[arg(long)]
    level: Option<u32>,

    /// Recompute autotile variants before anything else.
    #[arg(long)]
    autotile: bool,

    /// Write the map back to disk. Optionally provide a different path.
    #[arg(long, value_name = "PATH")]
    save: Option<Option<PathBuf>>,

    /// Write the effective configuration (including `--level`) back to the config file.
    #[arg(long)]
    save_config: bool,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 0)]
    frames: u32,
}

fn default_animations() -> AnimationStore {
    let mut store = AnimationStore::new();
    for kind in [ActorKind::Player, ActorKind::Enemy] {
        for (action, frames, duration, looped) in [
            (ActorAction::Idle, 22, 6, true),
            (ActorAction::Run, 8, 4, true),
            (ActorAction::Jump, 1, 5, true),
            (ActorAction::WallSlide, 1, 5, true),
        ] {
            store.insert(
                format!("{}/{}", kind.as_str(), action.as_str()),
                AnimationResource::new(frames, duration, looped),
            );
        }
    }
    store
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("Using default configuration: {}", e);
    }
    if let Some(level) = cli.level {
        config.level = level;
    }
    if cli.save_config {
        if let Err(e) = config.save_to_file() {
            warn!("Cannot save configuration: {}", e);
        }
    }

    let map_path = cli
        .map
        .unwrap_or_else(|| level_map_path(&config.map_dir, config.level));
    let mut tilemap = match Tilemap::load_or_empty(&map_path, config.tile_size) {
        Ok(map) => map,
        Err(e) => {
            error!("Cannot open {:?}: {}", map_path, e);
            std::process::exit(1);
        }
    };

    if cli.autotile {
        let changed = tilemap.autotile();
        info!("Autotile updated {} tiles", changed);
    }

    if let Some(maybe_path) = cli.save {
        let path = maybe_path.unwrap_or_else(|| map_path.clone());
        if let Err(e) = tilemap.save(&path) {
            error!("Cannot save {:?}: {}", path, e);
            std::process::exit(1);
        }
    }

    if cli.frames == 0 {
        return;
    }

    let level_count = count_levels(&config.map_dir).unwrap_or_else(|e| {
        warn!("Cannot list levels in {:?}: {}", config.map_dir, e);
        config.level + 1
    });
    let map_dir = config.map_dir.clone();
    let tile_size = config.tile_size;
    let (view_w, view_h) = config.render_size();

    let mut world = World::new();
    world.insert_resource(PhysicsSettings::from_config(&config));
    world.insert_resource(default_animations());
    world.insert_resource(LevelState::new(config.level, level_count));
    world.insert_resource(config);
    let spawns = setup_level(&mut world, tilemap);

    let focus = spawns.player.map_or(Vec2::ZERO, |pos| pos + ActorKind::Player.body_size() * 0.5);
    let camera = (focus - Vec2::new(view_w as f32, view_h as f32) * 0.5).as_ivec2();
    let (min, max) = visible_cells(tile_size, camera, (view_w, view_h));
    info!("Start view {}x{} covers cells {:?} to {:?}", view_w, view_h, min, max);

    let mut schedule = frame_schedule();
    for _ in 0..cli.frames {
        schedule.run(&mut world);
        if let Err(e) = apply_level_change(&mut world, &map_dir) {
            error!("Cannot change level: {}", e);
            break;
        }
    }

    let mut actors = world.query::<(Entity, &Actor, &PhysicsBody)>();
    for (entity, actor, body) in actors.iter(&world) {
        info!(
            "{:?} {} at ({:.2}, {:.2}) {}",
            entity,
            actor.kind.as_str(),
            body.pos.x,
            body.pos.y,
            actor.action.as_str()
        );
    }
    info!("Simulated {} frames", cli.frames);
}
