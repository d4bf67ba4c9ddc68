//! ECS components for entities.
//!
//! Components attached to the moving things in a level: their physical
//! body, what they want to do this frame, their gameplay state and their
//! animation playback.
//!
//! Submodules overview:
//! - [`actor`] – player/enemy gameplay state (air time, jumps, wall slide)
//! - [`animation`] – per-entity animation playback counters
//! - [`movementintent`] – displacement an entity wants to make this frame
//! - [`patrol`] – enemy walk counter
//! - [`physicsbody`] – axis-aligned body with velocity and collision flags
//! - [`projectile`] – enemy shots tested as points

pub mod actor;
pub mod animation;
pub mod movementintent;
pub mod patrol;
pub mod physicsbody;
pub mod projectile;
