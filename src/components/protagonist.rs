use bevy_ecs::prelude::Component;

/// Marker for the player-controlled entity.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Protagonist;

/// Where an entity returns to when the host respawns it.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}
