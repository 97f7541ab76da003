//! Coin collection.
//!
//! Pickups use a looser test than solid contacts: an item is in reach when
//! the centres of both boxes are less than one grid cell apart on each axis.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::objectid::ObjectId;
use crate::components::pickup::Coin;
use crate::components::protagonist::Protagonist;
use crate::events::session::SessionEvent;
use crate::resources::gameconfig::GameConfig;
use crate::resources::session::PlaySession;

/// Centre-distance proximity test used for coins, adversaries and the goal.
pub fn within_reach(
    a: &MapPosition,
    a_box: &BoxCollider,
    b: &MapPosition,
    b_box: &BoxCollider,
    reach: f32,
) -> bool {
    let dx = (a.x + a_box.width / 2.0) - (b.x + b_box.width / 2.0);
    let dy = (a.y + a_box.height / 2.0) - (b.y + b_box.height / 2.0);
    dx.abs() < reach && dy.abs() < reach
}

/// Despawn every coin the protagonist touches and credit its value.
pub fn collect_coins(
    mut commands: Commands,
    protagonist: Query<(&MapPosition, &BoxCollider), With<Protagonist>>,
    coins: Query<(Entity, &ObjectId, &MapPosition, &BoxCollider, &Coin)>,
    config: Res<GameConfig>,
    mut session: ResMut<PlaySession>,
    mut writer: MessageWriter<SessionEvent>,
) {
    let Ok((pos, collider)) = protagonist.single() else {
        return;
    };
    for (entity, id, coin_pos, coin_box, coin) in coins.iter() {
        if !within_reach(pos, collider, coin_pos, coin_box, config.grid_size) {
            continue;
        }
        debug!("Collected coin '{}' worth {}", id.as_str(), coin.value);
        session.score += coin.value;
        session.coins_collected += 1;
        commands.entity(entity).try_despawn();
        writer.write(SessionEvent::CoinCollected {
            object_id: id.as_str().to_string(),
            value: coin.value,
        });
    }
}
