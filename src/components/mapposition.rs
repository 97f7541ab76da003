use bevy_ecs::prelude::Component;

/// World-space position of an entity (top-left corner of its bounds).
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct MapPosition {
    pub x: f32,
    pub y: f32,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Position at the start of the current tick.
///
/// Written by the host before behaviors run so collision resolution can tell
/// which side an entity approached an obstacle from.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct PreviousPosition {
    pub x: f32,
    pub y: f32,
}

impl From<MapPosition> for PreviousPosition {
    fn from(pos: MapPosition) -> Self {
        Self { x: pos.x, y: pos.y }
    }
}
