//! Headless host loop.
//!
//! [`HostSimulation`] owns the ECS world, the behavior manager and the
//! schedules that make up the reference play loop. One call to
//! [`HostSimulation::tick`] runs, in order:
//!
//! 1. clock and input update, previous-position snapshot, follow target
//! 2. every enabled behavior's `update`
//! 3. adversary walking and contact detection; contacts go to the behaviors
//!    on the moving object
//! 4. coins, adversary contact, fall-out and goal checks, then the driver
//!    applies their consequences to behavior state
//!
//! Nothing runs once the session is won or lost.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::behaviors::behavior::{Behavior, BehaviorRecord};
use crate::behaviors::kind::BehaviorKind;
use crate::behaviors::manager::BehaviorManager;
use crate::behaviors::registry::BehaviorRegistry;
use crate::components::mapposition::MapPosition;
use crate::components::objectid::ObjectId;
use crate::events::collision::ContactMessage;
use crate::events::session::SessionEvent;
use crate::level::Level;
use crate::resources::followtarget::FollowTarget;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{InputState, PointerState};
use crate::resources::session::{Outcome, PlaySession};
use crate::resources::spritehandles::{SpriteHandle, SpriteHandles};
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::adversary::{adversary_contact, adversary_movement};
use crate::systems::collision::{collision_detector, snapshot_previous_positions};
use crate::systems::pickup::collect_coins;
use crate::systems::session::{fall_out_respawn, goal_reached, session_in_play, track_protagonist};
use crate::systems::time::update_world_time;

/// Input held over an inclusive range of ticks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSpan {
    pub from: u64,
    pub to: u64,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<PointerState>,
}

/// Scripted input for headless runs: a JSON array of [`InputSpan`]s.
///
/// Overlapping spans add up their keys; the last span with a pointer wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    pub spans: Vec<InputSpan>,
}

impl InputScript {
    pub fn from_json_str(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to parse input script: {}", e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read input script {:?}: {}", path, e))?;
        Self::from_json_str(&text)
    }

    /// Input for 1-based tick number `tick`.
    pub fn input_at(&self, tick: u64) -> InputState {
        let mut input = InputState::new();
        for span in self.spans.iter().filter(|s| s.from <= tick && tick <= s.to) {
            for key in &span.keys {
                input.press(key.clone());
            }
            if let Some(pointer) = span.pointer {
                input.pointer = pointer;
            }
        }
        input
    }
}

/// End-of-run report printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub ticks: u64,
    pub score: u32,
    pub outcome: Outcome,
    pub coins_collected: u32,
    pub respawns: u32,
    pub protagonist: Option<(f32, f32)>,
    pub behaviors: BTreeMap<String, Vec<BehaviorRecord>>,
}

pub struct HostSimulation {
    world: World,
    manager: BehaviorManager,
    level: Level,
    prepare: Schedule,
    physics: Schedule,
    rules: Schedule,
}

impl HostSimulation {
    pub fn new(level: Level, config: GameConfig, registry: Arc<BehaviorRegistry>) -> Self {
        let mut prepare = Schedule::default();
        prepare.add_systems((snapshot_previous_positions, track_protagonist).chain());

        let mut physics = Schedule::default();
        physics.add_systems((adversary_movement, collision_detector).chain());

        let mut rules = Schedule::default();
        rules.add_systems(
            (collect_coins, adversary_contact, fall_out_respawn, goal_reached)
                .chain()
                .run_if(session_in_play),
        );

        let mut world = World::new();
        world.insert_resource(config);
        let mut sim = Self {
            world,
            manager: BehaviorManager::new(registry),
            level,
            prepare,
            physics,
            rules,
        };
        sim.populate();
        sim
    }

    /// Reset resources, spawn the level and rebuild every object's behaviors.
    fn populate(&mut self) {
        let mut textures = TextureStore::new();
        self.level.register_textures(&mut textures);
        self.world.insert_resource(textures);
        self.world.insert_resource(FollowTarget::default());
        self.world.insert_resource(PlaySession::default());
        self.world.insert_resource(WorldTime::default());
        self.world.insert_resource(InputState::default());
        self.world.init_resource::<Messages<ContactMessage>>();
        self.world.init_resource::<Messages<SessionEvent>>();

        let config = self.config().clone();
        let spawned = self.level.spawn(&mut self.world, &config);
        // Headless stand-in for the renderer: every object gets a sprite slot.
        let mut handles = SpriteHandles::default();
        for entry in &spawned {
            handles.insert(entry.entity, SpriteHandle::default());
        }
        self.world.insert_resource(handles);
        for entry in &spawned {
            self.manager
                .rebuild_for_object(&self.world, entry.entity, &entry.behaviors);
        }
        info!(
            "Spawned {} objects carrying {} behaviors",
            spawned.len(),
            self.manager.behavior_count()
        );
    }

    /// Tear everything down and start the level again.
    pub fn restart(&mut self) {
        self.manager.clear();
        self.world.clear_entities();
        self.populate();
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn manager(&self) -> &BehaviorManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut BehaviorManager {
        &mut self.manager
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }

    pub fn session(&self) -> &PlaySession {
        self.world.resource::<PlaySession>()
    }

    /// The live entity carrying `object_id`.
    pub fn entity(&mut self, object_id: &str) -> Option<Entity> {
        let mut query = self.world.query::<(Entity, &ObjectId)>();
        query
            .iter(&self.world)
            .find(|(_, id)| id.as_str() == object_id)
            .map(|(entity, _)| entity)
    }

    pub fn position(&mut self, object_id: &str) -> Option<MapPosition> {
        let entity = self.entity(object_id)?;
        self.world.get::<MapPosition>(entity).copied()
    }

    /// Advance one tick with the given input snapshot.
    pub fn tick(&mut self, input: &InputState) {
        if self.session().is_over() {
            return;
        }
        let dt = self.config().dt;
        update_world_time(&mut self.world, dt);
        self.world.resource_mut::<PlaySession>().ticks += 1;
        self.world.insert_resource(input.clone());
        self.prepare.run(&mut self.world);

        let delta = self.world.resource::<WorldTime>().delta;
        self.manager.update(delta, input, &mut self.world);

        self.physics.run(&mut self.world);
        let contacts: Vec<ContactMessage> = self
            .world
            .resource_mut::<Messages<ContactMessage>>()
            .drain()
            .collect();
        for contact in &contacts {
            self.manager.notify_collision(
                &mut self.world,
                &contact.object_id,
                &contact.other,
                &contact.data,
            );
        }

        self.rules.run(&mut self.world);
        let events: Vec<SessionEvent> = self
            .world
            .resource_mut::<Messages<SessionEvent>>()
            .drain()
            .collect();
        for event in events {
            self.apply_session_event(event);
        }

        self.world.clear_trackers();
    }

    fn apply_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CoinCollected { object_id, value } => {
                debug!("Coin '{}' (+{}) removed", object_id, value);
                self.manager.detach_all(&object_id);
            }
            SessionEvent::AdversaryContact {
                protagonist,
                adversary,
            } => {
                self.stop_motion(&protagonist);
                let damage = self.config().contact_damage;
                let dead = self
                    .manager
                    .get_behavior_mut(&protagonist, BehaviorKind::Health)
                    .and_then(|b| b.as_health_mut())
                    .map(|health| {
                        health.take_damage(damage);
                        health.is_dead()
                    })
                    .unwrap_or(false);
                if dead {
                    info!("'{}' was defeated by '{}'", protagonist, adversary);
                    self.world.resource_mut::<PlaySession>().outcome = Outcome::Lost;
                }
            }
            SessionEvent::FellOut { protagonist } => self.stop_motion(&protagonist),
            SessionEvent::GoalReached { protagonist } => {
                debug!("'{}' finished the level", protagonist);
            }
        }
    }

    /// Zero the motion state of a respawned object.
    fn stop_motion(&mut self, object_id: &str) {
        if let Some(platform) = self
            .manager
            .get_behavior_mut(object_id, BehaviorKind::Platform)
        {
            platform.reset(&mut self.world);
        }
    }

    /// Run up to `ticks` ticks of `script`, stopping early once the session
    /// ends. Returns how many ticks ran.
    pub fn run(&mut self, script: &InputScript, ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < ticks && !self.session().is_over() {
            let input = script.input_at(self.session().ticks + 1);
            self.tick(&input);
            ran += 1;
        }
        ran
    }

    /// The level as it stands now: live objects carry the manager's current
    /// behavior records; removed objects keep their saved list.
    pub fn current_level(&mut self) -> Level {
        let mut query = self.world.query::<&ObjectId>();
        let live: Vec<String> = query
            .iter(&self.world)
            .map(|id| id.as_str().to_string())
            .collect();
        let manager = &self.manager;
        let mut level = self.level.clone();
        level.write_behaviors(|object_id| {
            live.iter()
                .any(|id| id == object_id)
                .then(|| manager.records_for(object_id))
        });
        level
    }

    pub fn save_level(&mut self, path: impl AsRef<Path>) -> Result<(), String> {
        self.current_level().save(path)
    }

    pub fn summary(&mut self) -> RunSummary {
        let protagonist = self
            .position(crate::level::PLAYER_ID)
            .map(|p| (p.x, p.y));
        if protagonist.is_none() {
            warn!("Run summary: level has no player");
        }
        let session = self.session().clone();
        RunSummary {
            ticks: session.ticks,
            score: session.score,
            outcome: session.outcome,
            coins_collected: session.coins_collected,
            respawns: session.respawns,
            protagonist,
            behaviors: self.manager.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_spans_are_inclusive_and_merge() {
        let script = InputScript::from_json_str(
            r#"[
                { "from": 1, "to": 3, "keys": ["ArrowRight"] },
                { "from": 3, "to": 3, "keys": [" "], "pointer": { "x": 5, "y": 6, "down": true } }
            ]"#,
        )
        .expect("script parses");
        assert!(script.input_at(1).is_held("ArrowRight"));
        assert!(!script.input_at(1).is_held(" "));
        let third = script.input_at(3);
        assert!(third.is_held("ArrowRight") && third.is_held(" "));
        assert!(third.pointer.down);
        assert!(script.input_at(4).held.is_empty());
    }

    #[test]
    fn test_tick_counts_and_stops_when_over() {
        let level = Level::from_json_str(r#"{ "player": { "x": 1, "y": 1 } }"#)
            .expect("level parses");
        let mut sim = HostSimulation::new(
            level,
            GameConfig::new(),
            Arc::new(BehaviorRegistry::with_builtin()),
        );
        sim.tick(&InputState::new());
        assert_eq!(sim.session().ticks, 1);
        assert_eq!(sim.world().resource::<WorldTime>().frame_count, 1);

        sim.world_mut().resource_mut::<PlaySession>().outcome = Outcome::Won;
        sim.tick(&InputState::new());
        assert_eq!(sim.session().ticks, 1);
    }

    #[test]
    fn test_restart_rebuilds_everything() {
        let level = Level::from_json_str(
            r#"{ "player": { "x": 1, "y": 1 }, "coins": [{ "x": 1, "y": 1 }] }"#,
        )
        .expect("level parses");
        let mut sim = HostSimulation::new(
            level,
            GameConfig::new(),
            Arc::new(BehaviorRegistry::with_builtin()),
        );
        sim.tick(&InputState::new());
        assert_eq!(sim.session().coins_collected, 1);
        assert!(sim.entity("coin_0").is_none());

        sim.restart();
        assert_eq!(sim.session().ticks, 0);
        assert!(sim.entity("coin_0").is_some());
        assert!(sim.manager().has_behavior("player", BehaviorKind::Platform));
    }
}
