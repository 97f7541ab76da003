//! Session-level systems: goal, fall-out and the follow target.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::objectid::ObjectId;
use crate::components::pickup::Goal;
use crate::components::protagonist::{Protagonist, SpawnPoint};
use crate::events::session::SessionEvent;
use crate::resources::followtarget::FollowTarget;
use crate::resources::gameconfig::GameConfig;
use crate::resources::session::{Outcome, PlaySession};
use crate::systems::pickup::within_reach;

/// Run condition: true while the session has no outcome yet.
pub fn session_in_play(session: Res<PlaySession>) -> bool {
    !session.is_over()
}

/// Publish the protagonist's position for follow-type behaviors.
pub fn track_protagonist(
    protagonist: Query<&MapPosition, With<Protagonist>>,
    mut target: ResMut<FollowTarget>,
) {
    target.0 = protagonist.single().ok().map(|p| (p.x, p.y));
}

/// Win the session when the protagonist reaches a goal.
pub fn goal_reached(
    protagonist: Query<(&ObjectId, &MapPosition, &BoxCollider), With<Protagonist>>,
    goals: Query<(&MapPosition, &BoxCollider), (With<Goal>, Without<Protagonist>)>,
    config: Res<GameConfig>,
    mut session: ResMut<PlaySession>,
    mut writer: MessageWriter<SessionEvent>,
) {
    let Ok((id, pos, collider)) = protagonist.single() else {
        return;
    };
    let reached = goals
        .iter()
        .any(|(g_pos, g_box)| within_reach(pos, collider, g_pos, g_box, config.grid_size));
    if !reached {
        return;
    }
    info!("'{}' reached the goal with score {}", id.as_str(), session.score);
    session.outcome = Outcome::Won;
    writer.write(SessionEvent::GoalReached {
        protagonist: id.as_str().to_string(),
    });
}

/// Respawn the protagonist once it drops below the bottom of the level.
pub fn fall_out_respawn(
    mut protagonist: Query<(&ObjectId, &mut MapPosition, &SpawnPoint), With<Protagonist>>,
    config: Res<GameConfig>,
    mut session: ResMut<PlaySession>,
    mut writer: MessageWriter<SessionEvent>,
) {
    let Ok((id, mut pos, spawn)) = protagonist.single_mut() else {
        return;
    };
    if pos.y <= config.kill_plane() {
        return;
    }
    info!("'{}' fell out of the level", id.as_str());
    pos.x = spawn.x;
    pos.y = spawn.y;
    session.respawns += 1;
    writer.write(SessionEvent::FellOut {
        protagonist: id.as_str().to_string(),
    });
}
