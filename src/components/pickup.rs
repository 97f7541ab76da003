use bevy_ecs::prelude::Component;

/// Collectible worth `value` points.
#[derive(Component, Clone, Copy, Debug)]
pub struct Coin {
    pub value: u32,
}

/// Reaching this entity wins the session.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Goal;
