//! Animation playback system.
//!
//! Advances every [`Animation`](crate::components::animation::Animation)
//! component by one game frame. Which animation an entity plays is decided
//! elsewhere (see [`crate::systems::actor`]); this system only moves the
//! counters.

use bevy_ecs::prelude::*;

use crate::components::animation::Animation;

/// Advance all animations by one frame.
pub fn animation_system(mut query: Query<&mut Animation>) {
    for mut animation in query.iter_mut() {
        animation.update();
    }
}
