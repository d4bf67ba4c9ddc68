//! Animation definition registry.
//!
//! Definitions are keyed by `"<entity>/<action>"` (for example
//! `"player/run"`). Entities never hold a reference into the store: they get
//! their own [`Animation`] value from [`AnimationStore::instantiate`].

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::components::animation::Animation;

/// Immutable timing data shared by every instance of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationResource {
    /// Number of images in the sequence.
    pub frame_count: u32,
    /// Game frames each image is shown.
    pub image_duration: u32,
    /// Whether playback restarts after the last image.
    pub looped: bool,
}

impl AnimationResource {
    pub fn new(frame_count: u32, image_duration: u32, looped: bool) -> Self {
        Self {
            frame_count,
            image_duration,
            looped,
        }
    }
}

/// Central registry of reusable animation definitions keyed by string IDs.
#[derive(Resource, Debug, Default)]
pub struct AnimationStore {
    pub animations: FxHashMap<String, AnimationResource>,
}

impl AnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, resource: AnimationResource) {
        self.animations.insert(key.into(), resource);
    }

    pub fn get(&self, key: &str) -> Option<&AnimationResource> {
        self.animations.get(key)
    }

    /// New playback state for `key`, starting at frame zero.
    pub fn instantiate(&self, key: &str) -> Option<Animation> {
        self.get(key).map(|res| Animation::new(key, res))
    }

    /// Replace `current` with a fresh instance of `key` unless it is already
    /// playing that animation. Returns whether a switch happened.
    pub fn switch(&self, current: &mut Animation, key: &str) -> bool {
        if current.animation_key == key {
            return false;
        }
        match self.instantiate(key) {
            Some(anim) => {
                *current = anim;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AnimationStore {
        let mut store = AnimationStore::new();
        store.insert("player/idle", AnimationResource::new(4, 6, true));
        store.insert("player/run", AnimationResource::new(8, 4, true));
        store
    }

    #[test]
    fn instances_do_not_share_state() {
        let store = store();
        let mut a = store.instantiate("player/idle").unwrap();
        let b = store.instantiate("player/idle").unwrap();
        a.update();
        a.update();
        assert_eq!(a.frame, 2);
        assert_eq!(b.frame, 0);
    }

    #[test]
    fn switch_restarts_only_on_change() {
        let store = store();
        let mut anim = store.instantiate("player/idle").unwrap();
        anim.update();
        assert!(!store.switch(&mut anim, "player/idle"));
        assert_eq!(anim.frame, 1);
        assert!(store.switch(&mut anim, "player/run"));
        assert_eq!(anim.animation_key, "player/run");
        assert_eq!(anim.frame, 0);
        assert!(!store.switch(&mut anim, "player/missing"));
        assert_eq!(anim.animation_key, "player/run");
    }
}
