//! Live behavior instances, keyed by object identity.
//!
//! The manager enforces at most one instance per `(object id, kind)` pair and
//! drives the per-tick sweep. Iteration order is stable: objects by id, then
//! kinds in declaration order.
//!
//! Faults are isolated. A behavior whose `update` or `on_collision` returns
//! an error is logged with its object id and kind, and the sweep carries on
//! with everything else.

use std::collections::BTreeMap;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::{error, warn};
use smallvec::SmallVec;

use crate::behaviors::behavior::{
    Behavior, BehaviorRecord, CollisionData, CollisionOther, Owner, Siblings, TickContext,
};
use crate::behaviors::config::ConfigMap;
use crate::behaviors::kind::{BehaviorInstance, BehaviorKind};
use crate::behaviors::registry::BehaviorRegistry;
use crate::components::objectid::ObjectId;
use crate::resources::input::InputState;

/// The behaviors attached to one object.
pub type InstanceTable = BTreeMap<BehaviorKind, BehaviorInstance>;

pub struct BehaviorManager {
    registry: Arc<BehaviorRegistry>,
    instances: BTreeMap<String, InstanceTable>,
}

impl BehaviorManager {
    pub fn new(registry: Arc<BehaviorRegistry>) -> Self {
        Self {
            registry,
            instances: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &Arc<BehaviorRegistry> {
        &self.registry
    }

    /// Attach a behavior of kind `id` to `entity`.
    ///
    /// The entity must carry a non-empty [`ObjectId`]. An existing instance of
    /// the same kind is destroyed before the new one is created. Unknown ids
    /// leave the object untouched.
    pub fn attach(
        &mut self,
        world: &World,
        entity: Entity,
        id: &str,
        config: &ConfigMap,
    ) -> Option<&mut BehaviorInstance> {
        let Some(object_id) = identity(world, entity) else {
            warn!("BehaviorManager::attach: entity {:?} has no object id", entity);
            return None;
        };
        if let Some(kind) = self.registry.get(id).map(|entry| entry.kind) {
            self.detach(&object_id, kind);
        }
        let behavior =
            self.registry
                .create(id, Owner::new(entity, object_id.clone()), world, config)?;
        let kind = behavior.kind();
        let table = self.instances.entry(object_id).or_default();
        table.insert(kind, behavior);
        table.get_mut(&kind)
    }

    /// Destroy and remove one behavior. Empty objects are pruned.
    pub fn detach(&mut self, object_id: &str, kind: BehaviorKind) {
        let Some(table) = self.instances.get_mut(object_id) else {
            return;
        };
        if let Some(mut behavior) = table.remove(&kind) {
            behavior.destroy();
        }
        if table.is_empty() {
            self.instances.remove(object_id);
        }
    }

    pub fn detach_all(&mut self, object_id: &str) {
        if let Some(table) = self.instances.remove(object_id) {
            for mut behavior in table.into_values() {
                behavior.destroy();
            }
        }
    }

    pub fn get_behavior(&self, object_id: &str, kind: BehaviorKind) -> Option<&BehaviorInstance> {
        self.instances.get(object_id)?.get(&kind)
    }

    pub fn get_behavior_mut(
        &mut self,
        object_id: &str,
        kind: BehaviorKind,
    ) -> Option<&mut BehaviorInstance> {
        self.instances.get_mut(object_id)?.get_mut(&kind)
    }

    /// Every behavior on `object_id`, in kind order.
    pub fn get_behaviors(&self, object_id: &str) -> impl Iterator<Item = &BehaviorInstance> + '_ {
        self.instances
            .get(object_id)
            .into_iter()
            .flat_map(|table| table.values())
    }

    pub fn has_behavior(&self, object_id: &str, kind: BehaviorKind) -> bool {
        self.get_behavior(object_id, kind).is_some()
    }

    pub fn object_count(&self) -> usize {
        self.instances.len()
    }

    pub fn behavior_count(&self) -> usize {
        self.instances.values().map(|table| table.len()).sum()
    }

    /// Replace everything on `entity` with the behaviors in `records`.
    /// Records of unknown kinds are skipped with a warning.
    pub fn rebuild_for_object(&mut self, world: &World, entity: Entity, records: &[BehaviorRecord]) {
        let Some(object_id) = identity(world, entity) else {
            warn!(
                "BehaviorManager::rebuild_for_object: entity {:?} has no object id",
                entity
            );
            return;
        };
        self.detach_all(&object_id);
        for record in records {
            if let Some(behavior) = self.attach(world, entity, &record.kind, &record.config) {
                behavior.set_enabled(record.enabled);
            }
        }
    }

    /// Run one tick of every enabled behavior.
    ///
    /// Each behavior is lifted out of its object's table while it runs, so it
    /// can call into its siblings through [`TickContext::siblings`].
    pub fn update(&mut self, dt: f32, input: &InputState, world: &mut World) {
        for (object_id, table) in self.instances.iter_mut() {
            let kinds: SmallVec<[BehaviorKind; 8]> = table.keys().copied().collect();
            for kind in kinds {
                let Some(mut behavior) = table.remove(&kind) else {
                    continue;
                };
                if behavior.enabled() {
                    let mut ctx = TickContext {
                        dt,
                        input,
                        world: &mut *world,
                        siblings: Siblings::new(table),
                    };
                    if let Err(e) = behavior.update(&mut ctx) {
                        error!("Error updating behavior {} on {}: {}", kind, object_id, e);
                    }
                }
                table.insert(kind, behavior);
            }
        }
    }

    /// Deliver a collision to every enabled behavior on `object_id`.
    pub fn notify_collision(
        &mut self,
        world: &mut World,
        object_id: &str,
        other: &CollisionOther,
        data: &CollisionData,
    ) {
        let Some(table) = self.instances.get_mut(object_id) else {
            return;
        };
        for (kind, behavior) in table.iter_mut() {
            if !behavior.enabled() {
                continue;
            }
            if let Err(e) = behavior.on_collision(world, other, data) {
                error!(
                    "Error in collision handler {} on {}: {}",
                    kind, object_id, e
                );
            }
        }
    }

    pub fn reset_all(&mut self, world: &mut World) {
        for table in self.instances.values_mut() {
            for behavior in table.values_mut() {
                behavior.reset(world);
            }
        }
    }

    /// Destroy every behavior on every object.
    pub fn clear(&mut self) {
        for (_, table) in std::mem::take(&mut self.instances) {
            for mut behavior in table.into_values() {
                behavior.destroy();
            }
        }
    }

    pub fn records_for(&self, object_id: &str) -> Vec<BehaviorRecord> {
        self.get_behaviors(object_id)
            .map(|behavior| behavior.to_record())
            .collect()
    }

    /// Records for every object, keyed by object id.
    pub fn to_json(&self) -> BTreeMap<String, Vec<BehaviorRecord>> {
        self.instances
            .keys()
            .map(|object_id| (object_id.clone(), self.records_for(object_id)))
            .collect()
    }
}

fn identity(world: &World, entity: Entity) -> Option<String> {
    world
        .get::<ObjectId>(entity)
        .map(|id| id.as_str().to_string())
        .filter(|id| !id.is_empty())
}
