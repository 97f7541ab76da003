//! The contract every behavior implements, plus the per-tick context and the
//! entity accessors behaviors share.
//!
//! Behaviors never hold references into the world. They keep an [`Owner`]
//! (the entity handle plus the editor identity) and read or write components
//! through the `&mut World` handed to each call. By convention only one
//! movement-family behavior writes an entity's position per tick.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::behaviors::config::ConfigMap;
use crate::behaviors::kind::{BehaviorInstance, BehaviorKind};
use crate::behaviors::manager::InstanceTable;
use crate::behaviors::{animatedsprite::AnimatedSprite, health::Health};
use crate::components::boxcollider::BoxCollider;
use crate::components::entityflags::EntityFlags;
use crate::components::mapposition::MapPosition;
use crate::components::objectkind::ObjectKind;
use crate::resources::input::InputState;

/// The entity a behavior is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub entity: Entity,
    pub object_id: String,
}

impl Owner {
    pub fn new(entity: Entity, object_id: impl Into<String>) -> Self {
        Self {
            entity,
            object_id: object_id.into(),
        }
    }
}

/// State shared by every behavior instance.
#[derive(Debug, Clone)]
pub struct BehaviorBase {
    pub owner: Owner,
    /// Schema defaults merged with the authored overrides.
    pub config: ConfigMap,
    pub enabled: bool,
}

impl BehaviorBase {
    pub fn new(owner: Owner, config: ConfigMap) -> Self {
        Self {
            owner,
            config,
            enabled: true,
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// One behavior as stored in a level file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub config: ConfigMap,
    /// Transient runtime snapshot. Ignored when rebuilding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
}

impl BehaviorRecord {
    pub fn new(kind: impl Into<String>, config: ConfigMap) -> Self {
        Self {
            kind: kind.into(),
            enabled: true,
            config,
            state: None,
        }
    }
}

/// Face of the other object that was touched.
///
/// `Top` means this entity came down onto the other one; `Left` means it ran
/// into the other's left face while moving right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionSide {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionData {
    pub side: CollisionSide,
    /// Penetration depth along the axis of `side`, in pixels.
    pub overlap: f32,
}

/// Snapshot of the other party in a collision.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionOther {
    pub object_id: String,
    pub kind: ObjectKind,
    pub solid: bool,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The other behaviors on the entity being updated.
///
/// The behavior currently running is taken out of the table for the duration
/// of its call, so it can never reach itself through here.
pub struct Siblings<'a> {
    table: Option<&'a mut InstanceTable>,
}

impl<'a> Siblings<'a> {
    pub fn new(table: &'a mut InstanceTable) -> Self {
        Self { table: Some(table) }
    }

    pub fn none() -> Self {
        Self { table: None }
    }

    pub fn get(&self, kind: BehaviorKind) -> Option<&BehaviorInstance> {
        self.table.as_ref()?.get(&kind)
    }

    pub fn get_mut(&mut self, kind: BehaviorKind) -> Option<&mut BehaviorInstance> {
        self.table.as_mut()?.get_mut(&kind)
    }

    pub fn animated_sprite_mut(&mut self) -> Option<&mut AnimatedSprite> {
        self.get_mut(BehaviorKind::AnimatedSprite)?.as_animated_sprite_mut()
    }

    pub fn health_mut(&mut self) -> Option<&mut Health> {
        self.get_mut(BehaviorKind::Health)?.as_health_mut()
    }
}

/// Everything a behavior may touch during one `update` call.
pub struct TickContext<'a> {
    /// Seconds since the previous tick.
    pub dt: f32,
    pub input: &'a InputState,
    pub world: &'a mut World,
    pub siblings: Siblings<'a>,
}

pub trait Behavior {
    fn kind(&self) -> BehaviorKind;

    fn base(&self) -> &BehaviorBase;

    fn base_mut(&mut self) -> &mut BehaviorBase;

    /// Advance one tick. Must return `Ok(())` without side effects when the
    /// resources it needs are not ready yet.
    fn update(&mut self, ctx: &mut TickContext) -> Result<(), String>;

    fn on_collision(
        &mut self,
        _world: &mut World,
        _other: &CollisionOther,
        _data: &CollisionData,
    ) -> Result<(), String> {
        Ok(())
    }

    /// Drop anything borrowed from outside. Safe to call more than once.
    fn destroy(&mut self) {}

    /// Rewind transient state for a play-test restart.
    fn reset(&mut self, _world: &mut World) {}

    /// Transient state to include in the saved record, if any.
    fn state(&self) -> Option<Value> {
        None
    }

    fn owner(&self) -> &Owner {
        &self.base().owner
    }

    fn config(&self) -> &ConfigMap {
        &self.base().config
    }

    fn enabled(&self) -> bool {
        self.base().enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base_mut().enabled = enabled;
    }

    fn to_record(&self) -> BehaviorRecord {
        BehaviorRecord {
            kind: self.kind().id().to_string(),
            enabled: self.enabled(),
            config: self.config().clone(),
            state: self.state(),
        }
    }
}

pub fn position(world: &World, owner: &Owner) -> Result<MapPosition, String> {
    world
        .get::<MapPosition>(owner.entity)
        .copied()
        .ok_or_else(|| format!("object '{}' has no position", owner.object_id))
}

pub fn set_position(world: &mut World, owner: &Owner, x: f32, y: f32) -> Result<(), String> {
    let mut pos = world
        .get_mut::<MapPosition>(owner.entity)
        .ok_or_else(|| format!("object '{}' has no position", owner.object_id))?;
    pos.x = x;
    pos.y = y;
    Ok(())
}

/// Collider size, or the editor's default object size.
pub fn size(world: &World, owner: &Owner) -> (f32, f32) {
    let collider = world
        .get::<BoxCollider>(owner.entity)
        .copied()
        .unwrap_or_default();
    (collider.width, collider.height)
}

pub fn flags_mut<'w>(world: &'w mut World, owner: &Owner) -> Option<Mut<'w, EntityFlags>> {
    world.get_mut::<EntityFlags>(owner.entity)
}
