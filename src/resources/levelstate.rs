//! Level progression: death, reload and moving on to the next map.
//!
//! [`LevelState`] is ticked once per frame by the level system. It only
//! decides; the caller owning the `World` performs the pending
//! [`LevelChange`] with `game::apply_level_change`.

use bevy_ecs::prelude::Resource;

use crate::game::next_level;

/// Length of the fade between levels, in frames.
pub const TRANSITION_FRAMES: i32 = 30;
/// Frames after a death before the fade starts.
const DEATH_FADE_DELAY: u32 = 10;
/// Frames after a death before the level restarts.
const DEATH_RELOAD_DELAY: u32 = 40;

/// Map to load next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    /// The player died; start the same level again.
    Reload(u32),
    /// Every enemy is gone; go on.
    Advance(u32),
}

impl LevelChange {
    pub fn level(self) -> u32 {
        match self {
            LevelChange::Reload(id) | LevelChange::Advance(id) => id,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LevelState {
    pub level: u32,
    pub level_count: u32,
    /// Frames since the player died, 0 while alive.
    pub dead: u32,
    /// Fade counter: negative while fading in, positive while fading out.
    pub transition: i32,
    pub pending: Option<LevelChange>,
}

impl LevelState {
    pub fn new(level: u32, level_count: u32) -> Self {
        Self {
            level,
            level_count,
            dead: 0,
            transition: -TRANSITION_FRAMES,
            pending: None,
        }
    }

    /// Advance the counters by one frame.
    pub fn tick(&mut self, player_dead: bool, enemies_left: usize) -> Option<LevelChange> {
        if enemies_left == 0 {
            self.transition += 1;
            if self.transition > TRANSITION_FRAMES {
                return Some(LevelChange::Advance(next_level(self.level, self.level_count)));
            }
        }
        if self.transition < 0 {
            self.transition += 1;
        }

        if player_dead {
            self.dead = self.dead.saturating_add(1);
            if self.dead >= DEATH_FADE_DELAY {
                self.transition = (self.transition + 1).min(TRANSITION_FRAMES);
            }
            if self.dead > DEATH_RELOAD_DELAY {
                return Some(LevelChange::Reload(self.level));
            }
        }
        None
    }

    /// Reset the counters after `level` has been loaded.
    pub fn enter(&mut self, level: u32) {
        *self = Self::new(level, self.level_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleared_level_advances_after_fade() {
        let mut state = LevelState::new(0, 3);
        for frame in 1..=45 {
            assert_eq!(state.tick(false, 0), None, "frame {}", frame);
        }
        assert_eq!(state.tick(false, 0), Some(LevelChange::Advance(1)));
    }

    #[test]
    fn last_level_advances_onto_itself() {
        let mut state = LevelState::new(2, 3);
        state.transition = TRANSITION_FRAMES;
        assert_eq!(state.tick(false, 0), Some(LevelChange::Advance(2)));
    }

    #[test]
    fn enemies_left_hold_the_level() {
        let mut state = LevelState::new(0, 3);
        for _ in 0..500 {
            assert_eq!(state.tick(false, 2), None);
        }
        assert_eq!(state.transition, 0);
    }

    #[test]
    fn death_reloads_same_level() {
        let mut state = LevelState::new(1, 3);
        for _ in 0..40 {
            assert_eq!(state.tick(true, 1), None);
        }
        assert!(state.transition > 0);
        assert_eq!(state.tick(true, 1), Some(LevelChange::Reload(1)));
    }

    #[test]
    fn enter_resets_counters() {
        let mut state = LevelState::new(0, 3);
        state.dead = 12;
        state.transition = 9;
        state.pending = Some(LevelChange::Reload(0));
        state.enter(1);
        assert_eq!(state, LevelState::new(1, 3));
    }
}
