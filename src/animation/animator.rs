//! Sprite animation playback.
//!
//! [`SpriteAnimator`] owns a sliced [`SpriteSheet`] and a set of named
//! [`AnimationDef`]s and plays one of them at a time.
//!
//! # Timing
//!
//! The frame timer accumulates milliseconds. Each time it crosses the frame
//! duration it advances one frame and subtracts the duration, so the
//! remainder carries into the next frame. A 250 ms tick on a 100 ms
//! animation advances two frames and leaves 50 ms on the timer.
//!
//! # End of sequence
//!
//! Looping animations wrap to frame 0. Non-looping animations hold the last
//! frame and fire their completion callback once.

use log::warn;
use rustc_hash::FxHashMap;

use crate::animation::definition::{AnimationDef, AnimationDefs};
use crate::animation::sheet::{FrameRect, SpriteSheet};

type CompletionCallback = Box<dyn FnOnce()>;

pub struct SpriteAnimator {
    sheet: SpriteSheet,
    animations: AnimationDefs,
    current: String,
    /// Position inside the current animation's `frames` list.
    frame: usize,
    timer_ms: f32,
    finished: bool,
    paused: bool,
    facing_right: bool,
    on_complete: FxHashMap<String, CompletionCallback>,
}

impl SpriteAnimator {
    pub fn new(sheet: SpriteSheet, animations: AnimationDefs, default_animation: &str) -> Self {
        Self {
            sheet,
            animations,
            current: default_animation.to_string(),
            frame: 0,
            timer_ms: 0.0,
            finished: false,
            paused: false,
            facing_right: true,
            on_complete: FxHashMap::default(),
        }
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn current_animation(&self) -> &str {
        &self.current
    }

    pub fn current_definition(&self) -> Option<&AnimationDef> {
        self.animations.get(&self.current)
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    /// Index into the current animation's frame list.
    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn timer_ms(&self) -> f32 {
        self.timer_ms
    }

    /// True once a non-looping animation has reached its end.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn set_direction(&mut self, facing_right: bool) {
        self.facing_right = facing_right;
    }

    /// Update facing from the horizontal movement since the last tick.
    /// A zero delta keeps the last facing.
    pub fn face_by_delta(&mut self, dx: f32) {
        if dx > 0.0 {
            self.facing_right = true;
        } else if dx < 0.0 {
            self.facing_right = false;
        }
    }

    /// Switch to another animation.
    ///
    /// Unknown names are logged and ignored. Asking for the animation that is
    /// already playing changes nothing, so callers may request it every tick.
    pub fn set_animation(&mut self, name: &str) -> bool {
        if !self.animations.contains_key(name) {
            warn!("SpriteAnimator: animation '{}' not found", name);
            return false;
        }
        if self.current != name {
            self.current = name.to_string();
            self.restart();
        }
        true
    }

    /// Rewind the current animation to its first frame.
    pub fn restart(&mut self) {
        self.frame = 0;
        self.timer_ms = 0.0;
        self.finished = false;
    }

    /// Register a one-shot callback fired when the non-looping animation
    /// `name` reaches its end.
    pub fn set_on_complete(&mut self, name: impl Into<String>, callback: impl FnOnce() + 'static) {
        self.on_complete.insert(name.into(), Box::new(callback));
    }

    /// Advance playback by `delta_ms` milliseconds.
    pub fn update(&mut self, delta_ms: f32) {
        if self.paused || self.finished {
            return;
        }
        let Some(anim) = self.animations.get(&self.current) else {
            return;
        };
        let len = anim.frames.len();
        if len == 0 {
            return;
        }
        let duration = anim.frame_duration();
        let looping = anim.looping;

        self.timer_ms += delta_ms;
        while self.timer_ms >= duration {
            self.timer_ms -= duration;
            self.frame += 1;
            if self.frame >= len {
                if looping {
                    self.frame = 0;
                } else {
                    self.frame = len - 1;
                    self.finished = true;
                    self.timer_ms = 0.0;
                    if let Some(callback) = self.on_complete.remove(&self.current) {
                        callback();
                    }
                    break;
                }
            }
        }
    }

    /// Sheet index of the frame on screen.
    pub fn current_sheet_index(&self) -> usize {
        self.animations
            .get(&self.current)
            .and_then(|anim| anim.frames.get(self.frame).copied())
            .unwrap_or(0)
    }

    /// Rectangle of the frame on screen. Out-of-range sheet indices fall
    /// back to frame 0.
    pub fn current_frame(&self) -> Option<FrameRect> {
        self.sheet.frame_or_first(self.current_sheet_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::texturestore::TextureHandle;
    use std::cell::Cell;
    use std::rc::Rc;

    fn sheet() -> SpriteSheet {
        // 4 columns × 2 rows of 16px frames
        SpriteSheet::slice(TextureHandle(7), 64, 32, 16, 16)
    }

    fn animator() -> SpriteAnimator {
        let mut defs = AnimationDefs::new();
        defs.insert("idle".to_string(), AnimationDef::new(vec![0], 200.0, true));
        defs.insert("walk".to_string(), AnimationDef::new(vec![4, 5, 6], 100.0, true));
        defs.insert("die".to_string(), AnimationDef::new(vec![1, 2, 3], 100.0, false));
        defs.insert("broken".to_string(), AnimationDef::new(vec![42], 100.0, true));
        SpriteAnimator::new(sheet(), defs, "walk")
    }

    #[test]
    fn test_carry_over_across_frames() {
        let mut a = animator();
        a.update(250.0);
        assert_eq!(a.frame_index(), 2);
        assert!((a.timer_ms() - 50.0).abs() < 1e-4);
        a.update(50.0);
        // Wrapped back to the first frame.
        assert_eq!(a.frame_index(), 0);
        assert!(a.timer_ms().abs() < 1e-4);
    }

    #[test]
    fn test_small_ticks_accumulate() {
        let mut a = animator();
        for _ in 0..6 {
            a.update(16.0);
        }
        assert_eq!(a.frame_index(), 0);
        a.update(16.0);
        assert_eq!(a.frame_index(), 1);
        assert!((a.timer_ms() - 12.0).abs() < 1e-3);
    }

    #[test]
    fn test_non_looping_holds_last_frame_and_fires_once() {
        let mut a = animator();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        a.set_on_complete("die", move || counter.set(counter.get() + 1));
        assert!(a.set_animation("die"));

        a.update(1000.0);
        assert_eq!(a.frame_index(), 2);
        assert!(a.is_finished());
        assert_eq!(fired.get(), 1);

        a.update(1000.0);
        assert_eq!(a.frame_index(), 2);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_set_animation_same_name_is_noop() {
        let mut a = animator();
        a.update(150.0);
        assert!(a.set_animation("walk"));
        assert_eq!(a.frame_index(), 1);
        assert!((a.timer_ms() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_set_animation_switch_resets() {
        let mut a = animator();
        a.update(150.0);
        assert!(a.set_animation("idle"));
        assert_eq!(a.current_animation(), "idle");
        assert_eq!(a.frame_index(), 0);
        assert_eq!(a.timer_ms(), 0.0);
    }

    #[test]
    fn test_unknown_animation_keeps_current() {
        let mut a = animator();
        a.update(150.0);
        assert!(!a.set_animation("fly"));
        assert_eq!(a.current_animation(), "walk");
        assert_eq!(a.frame_index(), 1);
    }

    #[test]
    fn test_current_frame_maps_through_sheet() {
        let mut a = animator();
        assert_eq!(a.current_frame(), a.sheet().frame(4));
        a.update(100.0);
        assert_eq!(a.current_frame(), a.sheet().frame(5));
    }

    #[test]
    fn test_out_of_range_sheet_index_falls_back_to_zero() {
        let mut a = animator();
        a.set_animation("broken");
        assert_eq!(a.current_frame(), a.sheet().frame(0));
    }

    #[test]
    fn test_paused_does_not_advance() {
        let mut a = animator();
        a.set_paused(true);
        a.update(500.0);
        assert_eq!(a.frame_index(), 0);
        assert_eq!(a.timer_ms(), 0.0);
    }

    #[test]
    fn test_face_by_delta_keeps_last_facing_on_zero() {
        let mut a = animator();
        a.face_by_delta(-2.0);
        assert!(!a.facing_right());
        a.face_by_delta(0.0);
        assert!(!a.facing_right());
        a.face_by_delta(1.0);
        assert!(a.facing_right());
    }
}
