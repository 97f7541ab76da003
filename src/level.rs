//! Level files: what the editor saves and the host loop plays.
//!
//! The shorthand lists (`platforms`, `coins`, `enemies`, `goal`, `player`) are
//! in grid cells and get multiplied by [`GameConfig::grid_size`] on spawn.
//! Entries in `objects` are already in world units. Any entry may carry the
//! behavior records that are rebuilt onto it when the level starts.
//!
//! ```json
//! {
//!   "platforms": [{ "x": 0, "y": 11, "width": 20, "height": 1 }],
//!   "player": { "x": 1, "y": 10 },
//!   "coins": [{ "x": 4, "y": 8 }],
//!   "enemies": [{ "x": 6, "y": 10, "direction": 1, "range": 3, "startX": 6 }],
//!   "goal": { "x": 18, "y": 10 },
//!   "objects": [{ "id": "crate", "type": "prop", "x": 96, "y": 64, "behaviors": [] }]
//! }
//! ```

use std::path::Path;

use bevy_ecs::prelude::*;
use log::{info, warn};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::behaviors::behavior::BehaviorRecord;
use crate::behaviors::config::ConfigMap;
use crate::behaviors::kind::BehaviorKind;
use crate::components::adversary::Adversary;
use crate::components::boxcollider::BoxCollider;
use crate::components::entityflags::EntityFlags;
use crate::components::mapposition::{MapPosition, PreviousPosition};
use crate::components::objectid::ObjectId;
use crate::components::objectkind::{ObjectKind, Solid};
use crate::components::pickup::{Coin, Goal};
use crate::components::protagonist::{Protagonist, SpawnPoint};
use crate::resources::gameconfig::GameConfig;
use crate::resources::texturestore::{TextureHandle, TextureInfo, TextureStore};

pub const PLAYER_ID: &str = "player";
pub const GOAL_ID: &str = "goal";

fn one() -> f32 {
    1.0
}

fn default_range() -> f32 {
    3.0
}

fn is_empty(records: &[BehaviorRecord]) -> bool {
    records.is_empty()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: f32,
    pub y: f32,
    #[serde(default = "one")]
    pub width: f32,
    #[serde(default = "one")]
    pub height: f32,
    #[serde(default, skip_serializing_if = "is_empty")]
    pub behaviors: Vec<BehaviorRecord>,
}

/// A single-cell entry: coin or goal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: f32,
    pub y: f32,
    /// Coin value; the configured coin score when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default, skip_serializing_if = "is_empty")]
    pub behaviors: Vec<BehaviorRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: f32,
    pub y: f32,
    #[serde(default = "one")]
    pub direction: f32,
    /// Lane length in cells, measured right from `start_x`.
    #[serde(default = "default_range")]
    pub range: f32,
    /// Left end of the lane in cells; `x` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_x: Option<f32>,
    #[serde(default, skip_serializing_if = "is_empty")]
    pub behaviors: Vec<BehaviorRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntry {
    pub x: f32,
    pub y: f32,
    /// `None` gives the player a default platform-character behavior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behaviors: Option<Vec<BehaviorRecord>>,
}

/// A free-form object placed in world units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ObjectKind,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Overrides [`ObjectKind::solid_by_default`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solid: Option<bool>,
    #[serde(default, skip_serializing_if = "is_empty")]
    pub behaviors: Vec<BehaviorRecord>,
}

/// Pixel size of a sprite sheet, keyed by asset id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureEntry {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Level {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub platforms: Vec<PlatformEntry>,
    pub coins: Vec<CellEntry>,
    pub enemies: Vec<EnemyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<CellEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerEntry>,
    pub objects: Vec<ObjectEntry>,
    /// Sprite sheets a headless run treats as already loaded.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub textures: Vec<TextureEntry>,
}

/// An entity created from a level entry, with the behaviors to rebuild on it.
#[derive(Debug, Clone)]
pub struct Spawned {
    pub entity: Entity,
    pub object_id: String,
    pub behaviors: Vec<BehaviorRecord>,
}

fn entry_id(id: &Option<String>, prefix: &str, index: usize) -> String {
    id.clone().unwrap_or_else(|| format!("{}_{}", prefix, index))
}

/// Reserve `object_id` for one entity. A repeated id would share the first
/// entity's behavior table, so the later entry is skipped.
fn claim(taken: &mut FxHashSet<String>, object_id: &str) -> bool {
    if taken.insert(object_id.to_string()) {
        return true;
    }
    warn!("Level: duplicate object id '{}'; skipping entry", object_id);
    false
}

/// The behavior list a player gets when the level does not name one.
pub fn default_player_behaviors() -> Vec<BehaviorRecord> {
    vec![BehaviorRecord::new(
        BehaviorKind::Platform.id(),
        ConfigMap::new(),
    )]
}

impl Level {
    pub fn from_json_str(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to parse level: {}", e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read level {:?}: {}", path, e))?;
        let level = Self::from_json_str(&text)?;
        info!(
            "Loaded level {:?}: {} platforms, {} coins, {} enemies, {} objects",
            path,
            level.platforms.len(),
            level.coins.len(),
            level.enemies.len(),
            level.objects.len()
        );
        Ok(level)
    }

    pub fn to_json_string(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize level: {}", e))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)
            .map_err(|e| format!("Failed to write level {:?}: {}", path, e))?;
        info!("Saved level to {:?}", path);
        Ok(())
    }

    /// Object ids in spawn order.
    pub fn object_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        ids.extend(
            self.platforms
                .iter()
                .enumerate()
                .map(|(i, p)| entry_id(&p.id, "platform", i)),
        );
        ids.extend(
            self.coins
                .iter()
                .enumerate()
                .map(|(i, c)| entry_id(&c.id, "coin", i)),
        );
        ids.extend(
            self.enemies
                .iter()
                .enumerate()
                .map(|(i, e)| entry_id(&e.id, "enemy", i)),
        );
        if let Some(goal) = &self.goal {
            ids.push(goal.id.clone().unwrap_or_else(|| GOAL_ID.to_string()));
        }
        if self.player.is_some() {
            ids.push(PLAYER_ID.to_string());
        }
        ids.extend(self.objects.iter().map(|o| o.id.clone()));
        ids
    }

    /// Replace behavior lists using `records_for(object_id)`. Entries for
    /// which it returns `None` keep what they have.
    pub fn write_behaviors(&mut self, records_for: impl Fn(&str) -> Option<Vec<BehaviorRecord>>) {
        for (i, p) in self.platforms.iter_mut().enumerate() {
            if let Some(records) = records_for(&entry_id(&p.id, "platform", i)) {
                p.behaviors = records;
            }
        }
        for (i, c) in self.coins.iter_mut().enumerate() {
            if let Some(records) = records_for(&entry_id(&c.id, "coin", i)) {
                c.behaviors = records;
            }
        }
        for (i, e) in self.enemies.iter_mut().enumerate() {
            if let Some(records) = records_for(&entry_id(&e.id, "enemy", i)) {
                e.behaviors = records;
            }
        }
        if let Some(goal) = &mut self.goal {
            if let Some(records) = records_for(goal.id.as_deref().unwrap_or(GOAL_ID)) {
                goal.behaviors = records;
            }
        }
        if let Some(player) = &mut self.player {
            if let Some(records) = records_for(PLAYER_ID) {
                player.behaviors = Some(records);
            }
        }
        for o in self.objects.iter_mut() {
            if let Some(records) = records_for(&o.id) {
                o.behaviors = records;
            }
        }
    }

    /// Mark every listed sheet as loaded, handing out handles in list order.
    pub fn register_textures(&self, store: &mut TextureStore) {
        for (i, t) in self.textures.iter().enumerate() {
            store.mark_ready(
                t.id.clone(),
                TextureInfo {
                    handle: TextureHandle(i as u32),
                    width: t.width,
                    height: t.height,
                },
            );
        }
    }

    /// Create one entity per entry.
    ///
    /// The player and any non-solid free-form object get a
    /// [`PreviousPosition`] so the collision detector treats them as movers.
    /// Entries whose id is already taken are skipped with a warning.
    pub fn spawn(&self, world: &mut World, config: &GameConfig) -> Vec<Spawned> {
        let gs = config.grid_size;
        let mut spawned = Vec::new();
        let mut taken = FxHashSet::default();

        for (i, p) in self.platforms.iter().enumerate() {
            let object_id = entry_id(&p.id, "platform", i);
            if !claim(&mut taken, &object_id) {
                continue;
            }
            let entity = world
                .spawn((
                    ObjectId::new(object_id.clone()),
                    ObjectKind::Platform,
                    MapPosition::new(p.x * gs, p.y * gs),
                    BoxCollider::new(p.width * gs, p.height * gs),
                    EntityFlags::default(),
                    Solid,
                ))
                .id();
            spawned.push(Spawned {
                entity,
                object_id,
                behaviors: p.behaviors.clone(),
            });
        }

        for (i, c) in self.coins.iter().enumerate() {
            let object_id = entry_id(&c.id, "coin", i);
            if !claim(&mut taken, &object_id) {
                continue;
            }
            let entity = world
                .spawn((
                    ObjectId::new(object_id.clone()),
                    ObjectKind::Coin,
                    MapPosition::new(c.x * gs, c.y * gs),
                    BoxCollider::new(gs, gs),
                    EntityFlags::default(),
                    Coin {
                        value: c.value.unwrap_or(config.coin_score),
                    },
                ))
                .id();
            spawned.push(Spawned {
                entity,
                object_id,
                behaviors: c.behaviors.clone(),
            });
        }

        for (i, e) in self.enemies.iter().enumerate() {
            let object_id = entry_id(&e.id, "enemy", i);
            if !claim(&mut taken, &object_id) {
                continue;
            }
            let start_x = e.start_x.unwrap_or(e.x) * gs;
            let entity = world
                .spawn((
                    ObjectId::new(object_id.clone()),
                    ObjectKind::Enemy,
                    MapPosition::new(e.x * gs, e.y * gs),
                    BoxCollider::new(gs, gs),
                    EntityFlags::default(),
                    Adversary::new(start_x, e.range * gs, e.direction, config.enemy_speed),
                ))
                .id();
            spawned.push(Spawned {
                entity,
                object_id,
                behaviors: e.behaviors.clone(),
            });
        }

        let goal = self
            .goal
            .as_ref()
            .map(|goal| (goal, goal.id.clone().unwrap_or_else(|| GOAL_ID.to_string())))
            .filter(|(_, object_id)| claim(&mut taken, object_id));
        if let Some((goal, object_id)) = goal {
            let entity = world
                .spawn((
                    ObjectId::new(object_id.clone()),
                    ObjectKind::Goal,
                    MapPosition::new(goal.x * gs, goal.y * gs),
                    BoxCollider::new(gs, gs),
                    EntityFlags::default(),
                    Goal,
                ))
                .id();
            spawned.push(Spawned {
                entity,
                object_id,
                behaviors: goal.behaviors.clone(),
            });
        }

        let player = self
            .player
            .as_ref()
            .filter(|_| claim(&mut taken, PLAYER_ID));
        if let Some(player) = player {
            let (x, y) = (player.x * gs, player.y * gs);
            let position = MapPosition::new(x, y);
            let entity = world
                .spawn((
                    ObjectId::new(PLAYER_ID),
                    ObjectKind::Player,
                    position,
                    PreviousPosition::from(position),
                    BoxCollider::new(gs, gs),
                    EntityFlags::default(),
                    Protagonist,
                    SpawnPoint { x, y },
                ))
                .id();
            spawned.push(Spawned {
                entity,
                object_id: PLAYER_ID.to_string(),
                behaviors: player
                    .behaviors
                    .clone()
                    .unwrap_or_else(default_player_behaviors),
            });
        }

        for o in self.objects.iter() {
            if !claim(&mut taken, &o.id) {
                continue;
            }
            let position = MapPosition::new(o.x, o.y);
            let collider = BoxCollider::new(o.width.unwrap_or(gs), o.height.unwrap_or(gs));
            let mut entity = world.spawn((
                ObjectId::new(o.id.clone()),
                o.kind,
                position,
                collider,
                EntityFlags::default(),
            ));
            if o.solid.unwrap_or(o.kind.solid_by_default()) {
                entity.insert(Solid);
            } else {
                entity.insert(PreviousPosition::from(position));
            }
            spawned.push(Spawned {
                entity: entity.id(),
                object_id: o.id.clone(),
                behaviors: o.behaviors.clone(),
            });
        }

        spawned
    }
}
