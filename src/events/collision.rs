//! Contact messages emitted by the collision detector.
//!
//! The detector only finds contacts and names the side that was hit. It does
//! not move anything; resolving the overlap is up to the behaviors on the
//! moving entity, which receive the contact through
//! [`BehaviorManager::notify_collision`](crate::behaviors::manager::BehaviorManager::notify_collision).
use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

use crate::behaviors::behavior::{CollisionData, CollisionOther};

#[derive(Message, Debug, Clone, PartialEq)]
pub struct ContactMessage {
    /// The moving entity.
    pub entity: Entity,
    pub object_id: String,
    pub other: CollisionOther,
    pub data: CollisionData,
}
