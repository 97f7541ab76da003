use bevy_ecs::prelude::Component;

/// Editor identity of an object.
///
/// Behaviors are keyed by this id and it is the key used in saved level
/// data. Entities without one cannot carry behaviors.
#[derive(Component, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
