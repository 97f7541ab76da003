//! Per-tick input resource.
//!
//! Captures the set of currently held key names (browser-style names such as
//! `"ArrowLeft"` or `" "` for space, matching what behavior configs store)
//! and the pointer state. Edge detection is left to the consumers: behaviors
//! that care about presses remember the previous tick themselves.
use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Pointer position in world space and primary button state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub down: bool,
}

/// Input snapshot for one tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Names of keys held down during this tick.
    pub held: FxHashSet<String>,
    pub pointer: PointerState,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot holding exactly the given keys.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            held: keys.into_iter().map(Into::into).collect(),
            pointer: PointerState::default(),
        }
    }

    pub fn press(&mut self, key: impl Into<String>) {
        self.held.insert(key.into());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    pub fn set_pointer(&mut self, x: f32, y: f32, down: bool) {
        self.pointer = PointerState { x, y, down };
    }

    /// Sampled horizontal axis in `[-1, 1]`: left wins ties, as the
    /// reference loop reads it.
    pub fn horizontal_axis(&self, left_key: &str, right_key: &str) -> f32 {
        if self.is_held(left_key) {
            -1.0
        } else if self.is_held(right_key) {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputstate_default_all_inactive() {
        let input = InputState::default();
        assert!(input.held.is_empty());
        assert!(!input.pointer.down);
        assert!(!input.is_held("ArrowLeft"));
    }

    #[test]
    fn test_press_release() {
        let mut input = InputState::new();
        input.press("ArrowLeft");
        assert!(input.is_held("ArrowLeft"));
        input.release("ArrowLeft");
        assert!(!input.is_held("ArrowLeft"));
    }

    #[test]
    fn test_horizontal_axis() {
        let input = InputState::with_keys(["ArrowRight"]);
        assert_eq!(input.horizontal_axis("ArrowLeft", "ArrowRight"), 1.0);
        let input = InputState::with_keys(["ArrowLeft", "ArrowRight"]);
        assert_eq!(input.horizontal_axis("ArrowLeft", "ArrowRight"), -1.0);
        let input = InputState::new();
        assert_eq!(input.horizontal_axis("ArrowLeft", "ArrowRight"), 0.0);
    }
}
