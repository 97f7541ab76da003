//! Sprite-sheet textures with an explicit load lifecycle.
//!
//! The rendering backend owns the actual GPU textures; the runtime only sees
//! an opaque [`TextureHandle`] plus the sheet's pixel size once loading has
//! finished. Consumers poll [`TextureStore::status`] each tick:
//! - `Pending` (or no entry yet): not ready, try again next tick
//! - `Ready`: handle and size are available
//! - `Failed`: the asset will never load; stop asking
use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

/// Opaque id of a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextureStatus {
    Pending,
    Ready(TextureInfo),
    Failed(String),
}

#[derive(Resource, Debug, Default)]
pub struct TextureStore {
    entries: FxHashMap<String, TextureStatus>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_pending(&mut self, asset_id: impl Into<String>) {
        self.entries.insert(asset_id.into(), TextureStatus::Pending);
    }

    pub fn mark_ready(&mut self, asset_id: impl Into<String>, info: TextureInfo) {
        self.entries.insert(asset_id.into(), TextureStatus::Ready(info));
    }

    pub fn mark_failed(&mut self, asset_id: impl Into<String>, reason: impl Into<String>) {
        self.entries
            .insert(asset_id.into(), TextureStatus::Failed(reason.into()));
    }

    pub fn status(&self, asset_id: &str) -> Option<&TextureStatus> {
        self.entries.get(asset_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
