//! ECS resources made available to systems.
//!
//! Long-lived data injected into the ECS world: the level's tile map,
//! shared animation definitions, physics constants and the user
//! configuration.
//!
//! Overview
//! - `animationstore` – animation definitions shared by every entity
//! - `gameconfig` – INI-backed user configuration
//! - `levelstate` – death and level-clear counters deciding the next map
//! - `physicssettings` – gravity and terminal velocity used by the resolver
//! - `tilemap` – the level grid, spatial queries, autotiling and persistence
pub mod animationstore;
pub mod gameconfig;
pub mod levelstate;
pub mod physicssettings;
pub mod tilemap;
