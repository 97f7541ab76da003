//! Animation sets as exported by the sprite editor.
//!
//! ```json
//! {
//!   "name": "hero",
//!   "states": { "idle": { "frames": [0], "speed": 200, "loop": true } },
//!   "spriteSheet": { "source": "hero.png", "width": 128, "height": 64,
//!                    "frameWidth": 32, "frameHeight": 32 },
//!   "defaultAnimation": "idle"
//! }
//! ```
//!
//! The animated-sprite behavior only takes a subset of this; see
//! [`AnimationExport::narrow`].

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use smallvec::SmallVec;

use crate::animation::definition::{AnimationDef, AnimationDefs, validate};
use crate::animation::sheet::grid_size;
use crate::animation::transitions::{PhysicalState, TransitionInput, active_transitions};
use crate::behaviors::config::ConfigMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSource {
    #[serde(default)]
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationExport {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub states: AnimationDefs,
    pub sprite_sheet: SheetSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_animation: Option<String>,
}

impl AnimationExport {
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse animation set: {}", e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read animation set '{}': {}", path.display(), e))?;
        let export = Self::from_json_str(&text)?;
        info!(
            "Loaded animation set '{}' with {} states from {}",
            export.name,
            export.states.len(),
            path.display()
        );
        Ok(export)
    }

    /// The declared default state, or the first state by name.
    pub fn default_state(&self) -> Option<&str> {
        match &self.default_animation {
            Some(name) if self.states.contains_key(name) => Some(name.as_str()),
            _ => self.states.keys().next().map(String::as_str),
        }
    }

    pub fn state(&self, name: &str) -> Option<&AnimationDef> {
        self.states.get(name)
    }

    pub fn frame_count(&self) -> usize {
        let sheet = &self.sprite_sheet;
        let (cols, rows) = grid_size(sheet.width, sheet.height, sheet.frame_width, sheet.frame_height);
        (cols * rows) as usize
    }

    /// All transitions out of `state` whose conditions hold. Empty for an
    /// unknown state.
    pub fn active_transitions(
        &self,
        state: &str,
        input: &TransitionInput,
        physical: &PhysicalState,
    ) -> SmallVec<[&str; 4]> {
        self.states
            .get(state)
            .map(|def| active_transitions(&def.transitions, input, physical))
            .unwrap_or_default()
    }

    /// Preview step: the state the machine would move to next, if any.
    pub fn first_transition(
        &self,
        state: &str,
        input: &TransitionInput,
        physical: &PhysicalState,
    ) -> Option<&str> {
        self.active_transitions(state, input, physical).first().copied()
    }

    /// Authoring problems in this set. An empty list means it is clean.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = validate(&self.states, Some(self.frame_count()));
        if let Some(name) = &self.default_animation {
            if !self.states.contains_key(name) {
                problems.push(format!("default animation '{}' is not defined", name));
            }
        }
        problems
    }

    /// Reduce to the config keys the animated-sprite behavior reads.
    pub fn narrow(&self, sheet_asset_id: &str, auto_flip: bool) -> ConfigMap {
        let defs = serde_json::to_value(&self.states).unwrap_or(Value::Object(ConfigMap::new()));
        let default_animation = self.default_state().unwrap_or("idle");
        let narrowed = json!({
            "spriteSheetAssetId": sheet_asset_id,
            "frameWidth": self.sprite_sheet.frame_width,
            "frameHeight": self.sprite_sheet.frame_height,
            "animationDefs": defs,
            "defaultAnimation": default_animation,
            "autoFlip": auto_flip,
        });
        match narrowed {
            Value::Object(map) => map,
            _ => ConfigMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HERO: &str = r#"{
        "name": "hero",
        "states": {
            "idle": { "frames": [0, 1], "speed": 200, "loop": true,
                      "transitions": { "walk": { "minHorizontal": 0.2 },
                                       "jump": { "jumpPressed": true } } },
            "walk": { "frames": [2, 3, 4], "speed": 100, "loop": true,
                      "transitions": { "idle": { "maxHorizontal": 0.1 } } },
            "jump": { "frames": [5], "loop": false,
                      "transitions": { "idle": [{ "isGrounded": true }] } }
        },
        "spriteSheet": { "source": "hero.png", "width": 128, "height": 64,
                         "frameWidth": 32, "frameHeight": 32 },
        "defaultAnimation": "idle"
    }"#;

    fn hero() -> AnimationExport {
        AnimationExport::from_json_str(HERO).unwrap()
    }

    #[test]
    fn test_parse_export() {
        let export = hero();
        assert_eq!(export.name, "hero");
        assert_eq!(export.states.len(), 3);
        assert_eq!(export.frame_count(), 8);
        assert_eq!(export.default_state(), Some("idle"));
        assert!(export.validate().is_empty());
    }

    #[test]
    fn test_active_transitions_preview() {
        let export = hero();
        let input = TransitionInput {
            horizontal: 0.5,
            jump_pressed: true,
        };
        let physical = PhysicalState {
            grounded: true,
            velocity_y: 0.0,
        };
        let active = export.active_transitions("idle", &input, &physical);
        assert_eq!(active.as_slice(), &["jump", "walk"]);
        assert_eq!(export.first_transition("idle", &input, &physical), Some("jump"));
        assert!(export.active_transitions("missing", &input, &physical).is_empty());
    }

    #[test]
    fn test_validate_reports_bad_default_and_frames() {
        let mut export = hero();
        export.default_animation = Some("run".to_string());
        export.states.get_mut("jump").unwrap().frames = vec![9];
        let problems = export.validate();
        assert_eq!(problems.len(), 2);
        assert_eq!(export.default_state(), Some("idle"));
    }

    #[test]
    fn test_narrow_keeps_only_behavior_keys() {
        let config = hero().narrow("asset-7", true);
        let keys: Vec<&str> = config.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 6);
        assert_eq!(config["spriteSheetAssetId"], "asset-7");
        assert_eq!(config["frameWidth"], 32);
        assert_eq!(config["frameHeight"], 32);
        assert_eq!(config["defaultAnimation"], "idle");
        assert_eq!(config["autoFlip"], true);
        assert!(config["animationDefs"]["walk"]["frames"].is_array());
        assert!(!config.contains_key("spriteSheet"));
    }
}
