//! Frame-timing animation state.
//!
//! An [`Animation`] counts game frames and maps the count to an image index.
//! Shared, immutable timing data lives in
//! [`AnimationStore`](crate::resources::animationstore::AnimationStore); every
//! entity owns an independent copy of the counters, so advancing one
//! entity's animation never affects another's.

use bevy_ecs::prelude::Component;

use crate::resources::animationstore::AnimationResource;

/// Per-entity playback state.
#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Animation {
    /// Key of the definition this state was created from.
    pub animation_key: String,
    pub frame_count: u32,
    /// Game frames each image stays on screen.
    pub image_duration: u32,
    pub looped: bool,
    /// Game frames elapsed since the animation started.
    pub frame: u32,
    /// Set once a non-looping animation reaches its last frame.
    pub done: bool,
}

impl Animation {
    /// Fresh playback state for a definition.
    pub fn new(animation_key: impl Into<String>, resource: &AnimationResource) -> Self {
        Self {
            animation_key: animation_key.into(),
            frame_count: resource.frame_count.max(1),
            image_duration: resource.image_duration.max(1),
            looped: resource.looped,
            frame: 0,
            done: false,
        }
    }

    fn total_frames(&self) -> u32 {
        self.image_duration.saturating_mul(self.frame_count)
    }

    /// Advance by one game frame.
    pub fn update(&mut self) {
        let total = self.total_frames();
        if self.looped {
            self.frame = (self.frame + 1) % total;
        } else {
            self.frame = (self.frame + 1).min(total - 1);
            if self.frame >= total - 1 {
                self.done = true;
            }
        }
    }

    /// Index of the image to draw for the current frame.
    pub fn image_index(&self) -> u32 {
        self.frame / self.image_duration
    }
}
