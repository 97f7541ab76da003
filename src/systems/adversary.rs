//! Host-driven adversaries: back-and-forth walking and protagonist contact.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::adversary::Adversary;
use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::objectid::ObjectId;
use crate::components::protagonist::{Protagonist, SpawnPoint};
use crate::events::session::SessionEvent;
use crate::resources::gameconfig::GameConfig;
use crate::resources::session::PlaySession;
use crate::resources::worldtime::WorldTime;
use crate::systems::pickup::within_reach;

/// Walk each adversary along its lane, turning at either end.
pub fn adversary_movement(mut query: Query<(&mut MapPosition, &mut Adversary)>, time: Res<WorldTime>) {
    for (mut pos, mut adversary) in query.iter_mut() {
        pos.x = adversary.step(pos.x, time.delta);
    }
}

/// Send the protagonist back to its spawn point when an adversary reaches it.
///
/// Only the first adversary in reach counts on a given tick.
pub fn adversary_contact(
    mut protagonist: Query<
        (&ObjectId, &mut MapPosition, &BoxCollider, &SpawnPoint),
        With<Protagonist>,
    >,
    adversaries: Query<(&ObjectId, &MapPosition, &BoxCollider), (With<Adversary>, Without<Protagonist>)>,
    config: Res<GameConfig>,
    mut session: ResMut<PlaySession>,
    mut writer: MessageWriter<SessionEvent>,
) {
    let Ok((id, mut pos, collider, spawn)) = protagonist.single_mut() else {
        return;
    };
    let hit = adversaries
        .iter()
        .find(|(_, a_pos, a_box)| within_reach(&pos, collider, a_pos, a_box, config.grid_size));
    let Some((adversary_id, _, _)) = hit else {
        return;
    };
    info!(
        "'{}' touched adversary '{}', respawning",
        id.as_str(),
        adversary_id.as_str()
    );
    pos.x = spawn.x;
    pos.y = spawn.y;
    session.penalize(config.enemy_penalty);
    session.respawns += 1;
    writer.write(SessionEvent::AdversaryContact {
        protagonist: id.as_str().to_string(),
        adversary: adversary_id.as_str().to_string(),
    });
}
