use bevy_ecs::prelude::Resource;

/// Position that follow-type behaviors chase. `None` when there is nothing
/// to follow; followers then stay put.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct FollowTarget(pub Option<(f32, f32)>);
