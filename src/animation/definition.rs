//! Animation definitions as authored in the sprite editor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::animation::transitions::Condition;

/// Frame duration used when a definition has no positive speed.
pub const FALLBACK_FRAME_MS: f32 = 100.0;

fn default_speed() -> f32 {
    FALLBACK_FRAME_MS
}

fn default_true() -> bool {
    true
}

/// One named animation: sheet-frame indices played in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDef {
    /// Row-major sheet indices.
    #[serde(default)]
    pub frames: Vec<usize>,
    /// Milliseconds per frame.
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(rename = "loop", default = "default_true")]
    pub looping: bool,
    /// Target state name → condition. Only read by the authoring preview.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub transitions: BTreeMap<String, Condition>,
}

impl AnimationDef {
    pub fn new(frames: Vec<usize>, speed: f32, looping: bool) -> Self {
        Self {
            frames,
            speed,
            looping,
            transitions: BTreeMap::new(),
        }
    }

    pub fn with_transition(mut self, target: impl Into<String>, condition: Condition) -> Self {
        self.transitions.insert(target.into(), condition);
        self
    }

    /// Frame duration in milliseconds, never zero.
    pub fn frame_duration(&self) -> f32 {
        if self.speed > 0.0 {
            self.speed
        } else {
            FALLBACK_FRAME_MS
        }
    }
}

pub type AnimationDefs = BTreeMap<String, AnimationDef>;

/// Report authoring mistakes without rejecting the set.
///
/// `frame_count` is the number of frames on the sheet when it is known.
pub fn validate(defs: &AnimationDefs, frame_count: Option<usize>) -> Vec<String> {
    let mut problems = Vec::new();
    for (name, def) in defs {
        if def.frames.is_empty() {
            problems.push(format!("animation '{}' has no frames", name));
        }
        if let Some(count) = frame_count {
            for &index in &def.frames {
                if index >= count {
                    problems.push(format!(
                        "animation '{}' uses frame {} but the sheet has {} frames",
                        name, index, count
                    ));
                }
            }
        }
        for target in def.transitions.keys() {
            if !defs.contains_key(target) {
                problems.push(format!(
                    "animation '{}' has a transition to undefined state '{}'",
                    name, target
                ));
            }
        }
    }
    problems
}
