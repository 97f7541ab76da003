//! Renderer-side sprite handles keyed by entity.
//!
//! The renderer creates one [`SpriteHandle`] per drawable entity and destroys
//! it when the scene unloads. Behaviors may write the frame and mirroring to
//! a handle but never create or remove entries.
use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;

use crate::animation::sheet::FrameRect;
use crate::resources::texturestore::TextureHandle;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteHandle {
    pub texture: Option<TextureHandle>,
    /// Sub-rectangle of the texture to draw.
    pub frame: Option<FrameRect>,
    /// Mirror horizontally when drawing.
    pub flip_x: bool,
}

#[derive(Resource, Debug, Default)]
pub struct SpriteHandles {
    pub map: FxHashMap<Entity, SpriteHandle>,
}

impl SpriteHandles {
    pub fn get(&self, entity: Entity) -> Option<&SpriteHandle> {
        self.map.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut SpriteHandle> {
        self.map.get_mut(&entity)
    }

    pub fn insert(&mut self, entity: Entity, handle: SpriteHandle) {
        self.map.insert(entity, handle);
    }

    pub fn remove(&mut self, entity: Entity) -> Option<SpriteHandle> {
        self.map.remove(&entity)
    }
}
