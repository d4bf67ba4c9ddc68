//! Level progression system.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::actor::{Actor, ActorKind};
use crate::resources::levelstate::LevelState;

/// Tick [`LevelState`] from the surviving actors.
///
/// Stops ticking once a change is pending; the change is applied outside
/// the schedule.
pub fn level_progress_system(state: Option<ResMut<LevelState>>, actors: Query<&Actor>) {
    let Some(mut state) = state else {
        return;
    };
    if state.pending.is_some() {
        return;
    }

    let player_dead = actors
        .iter()
        .any(|actor| actor.kind == ActorKind::Player && actor.dead);
    let enemies_left = actors
        .iter()
        .filter(|actor| actor.kind == ActorKind::Enemy)
        .count();
    if let Some(change) = state.tick(player_dead, enemies_left) {
        info!("Level {} finished: {:?}", state.level, change);
        state.pending = Some(change);
    }
}
