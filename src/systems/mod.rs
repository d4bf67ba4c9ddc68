//! Engine systems.
//!
//! ECS systems run once per frame, plus the drawing contract used by the
//! external renderer.
//!
//! Submodules overview
//! - [`actor`] – air time, jumps, wall slides and animation choice per actor
//! - [`animation`] – advance animation counters
//! - [`enemy`] – enemy patrols, their shots and dash strikes
//! - [`level`] – death and level-clear bookkeeping
//! - [`physics`] – axis-separated collision of bodies against solid tiles
//! - [`projectile`] – projectile flight and hits
//! - [`render`] – visible range computation and tile blitting through traits

pub mod actor;
pub mod animation;
pub mod enemy;
pub mod level;
pub mod physics;
pub mod projectile;
pub mod render;
