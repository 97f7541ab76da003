use bevy_ecs::message::Message;

/// Things that happened to the protagonist this tick.
///
/// Score and outcome are already applied to
/// [`PlaySession`](crate::resources::session::PlaySession) by the emitting
/// system. The driver uses these to reach behavior state the ECS cannot see,
/// such as zeroing velocity after a respawn or applying contact damage.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CoinCollected { object_id: String, value: u32 },
    /// Touched an adversary and was sent back to the spawn point.
    AdversaryContact { protagonist: String, adversary: String },
    /// Fell below the level and was sent back to the spawn point.
    FellOut { protagonist: String },
    GoalReached { protagonist: String },
}
