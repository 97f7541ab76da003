use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// What an object is in the level. Collision handlers use it to decide how
/// to react to the other party.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Player,
    Platform,
    Coin,
    Enemy,
    Goal,
    #[default]
    Prop,
}

impl ObjectKind {
    /// Kinds that are solid unless a level says otherwise.
    pub fn solid_by_default(self) -> bool {
        matches!(self, ObjectKind::Platform)
    }
}

/// Marker for static geometry that blocks movement.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Solid;
