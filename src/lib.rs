//! Tilerunner library.
//!
//! Tile-grid level storage, autotiling, JSON maps and an axis-separated
//! platformer collision resolver, built on bevy_ecs. Exposed as a library
//! for the binary, the editor front-end and integration tests.

pub mod components;
pub mod editor;
pub mod game;
pub mod geometry;
pub mod resources;
pub mod systems;
