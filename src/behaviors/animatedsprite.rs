//! Glue between an entity, a [`SpriteAnimator`] and the renderer's sprite
//! handle.
//!
//! The sheet texture is loaded by the renderer, possibly after the behavior
//! is attached, so the animator is built lazily. Each tick the behavior
//! checks where it is:
//!
//! - `Uninitialized`: look the sheet up in the [`TextureStore`]; if it is not
//!   there yet, do nothing this tick and try again next tick.
//! - `Ready`: advance the animator and write the frame to the sprite handle.
//! - `Failed`: the sheet can never load (missing asset id, bad frame size,
//!   or the store reported a failure). Stay idle for good.
//!
//! The sprite handle belongs to the renderer. This behavior writes the
//! frame rectangle and mirroring into it but never creates or removes it.

use bevy_ecs::prelude::World;
use log::warn;
use serde::Deserialize;
use serde_json::json;

use crate::animation::animator::SpriteAnimator;
use crate::animation::definition::{AnimationDef, AnimationDefs, validate};
use crate::animation::sheet::SpriteSheet;
use crate::behaviors::behavior::{Behavior, BehaviorBase, TickContext, flags_mut, position};
use crate::behaviors::config::{ConfigField, typed_config};
use crate::behaviors::kind::BehaviorKind;
use crate::resources::spritehandles::SpriteHandles;
use crate::resources::texturestore::{TextureInfo, TextureStatus, TextureStore};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimatedSpriteConfig {
    pub sprite_sheet_asset_id: Option<String>,
    pub frame_width: u32,
    pub frame_height: u32,
    pub default_animation: String,
    pub animation_defs: AnimationDefs,
    pub auto_flip: bool,
}

impl Default for AnimatedSpriteConfig {
    fn default() -> Self {
        let mut animation_defs = AnimationDefs::new();
        animation_defs.insert("idle".to_string(), AnimationDef::new(vec![0], 200.0, true));
        Self {
            sprite_sheet_asset_id: None,
            frame_width: 32,
            frame_height: 32,
            default_animation: "idle".to_string(),
            animation_defs,
            auto_flip: true,
        }
    }
}

/// Where the lazy initialization stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteStatus {
    Uninitialized,
    Ready,
    Failed,
}

enum Lifecycle {
    Uninitialized,
    Ready(Box<SpriteAnimator>),
    Failed,
}

pub struct AnimatedSprite {
    base: BehaviorBase,
    settings: AnimatedSpriteConfig,
    lifecycle: Lifecycle,
    last_x: Option<f32>,
}

impl AnimatedSprite {
    pub fn config_schema() -> Vec<ConfigField> {
        let d = AnimatedSpriteConfig::default();
        vec![
            ConfigField::asset("spriteSheetAssetId", "Sprite Sheet"),
            ConfigField::integer("frameWidth", "Frame Width (px)", d.frame_width, 4.0, 512.0, 1.0),
            ConfigField::integer("frameHeight", "Frame Height (px)", d.frame_height, 4.0, 512.0, 1.0),
            ConfigField::string("defaultAnimation", "Default Animation", &d.default_animation),
            ConfigField::sprite_editor(
                "animationDefs",
                "Animations",
                json!({ "idle": { "frames": [0], "speed": 200, "loop": true } }),
            ),
            ConfigField::boolean("autoFlip", "Auto-Flip on Move", d.auto_flip),
        ]
    }

    pub fn new(base: BehaviorBase) -> Self {
        let settings = typed_config(BehaviorKind::AnimatedSprite.id(), &base.config);
        Self {
            base,
            settings,
            lifecycle: Lifecycle::Uninitialized,
            last_x: None,
        }
    }

    pub fn status(&self) -> SpriteStatus {
        match self.lifecycle {
            Lifecycle::Uninitialized => SpriteStatus::Uninitialized,
            Lifecycle::Ready(_) => SpriteStatus::Ready,
            Lifecycle::Failed => SpriteStatus::Failed,
        }
    }

    pub fn animator(&self) -> Option<&SpriteAnimator> {
        match &self.lifecycle {
            Lifecycle::Ready(animator) => Some(&**animator),
            _ => None,
        }
    }

    pub fn animator_mut(&mut self) -> Option<&mut SpriteAnimator> {
        match &mut self.lifecycle {
            Lifecycle::Ready(animator) => Some(&mut **animator),
            _ => None,
        }
    }

    /// Switch animation state. Ignored until the sheet has loaded.
    pub fn set_animation(&mut self, name: &str) -> bool {
        self.animator_mut()
            .map(|animator| animator.set_animation(name))
            .unwrap_or(false)
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.settings.animation_defs.contains_key(name)
    }

    /// The playing animation, or the configured default before loading.
    pub fn current_animation(&self) -> &str {
        match &self.lifecycle {
            Lifecycle::Ready(animator) => animator.current_animation(),
            _ => &self.settings.default_animation,
        }
    }

    /// Build the animator once the sheet texture is loaded.
    ///
    /// `Ok(None)` means not loaded yet; `Err` means it never will be.
    fn try_build(&self, world: &World) -> Result<Option<SpriteAnimator>, String> {
        let s = &self.settings;
        let asset_id = s
            .sprite_sheet_asset_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "no sprite sheet asset".to_string())?;
        if s.frame_width == 0 || s.frame_height == 0 {
            return Err("frame size must be positive".to_string());
        }
        let Some(store) = world.get_resource::<TextureStore>() else {
            return Ok(None);
        };
        let info: TextureInfo = match store.status(asset_id) {
            None | Some(TextureStatus::Pending) => return Ok(None),
            Some(TextureStatus::Failed(reason)) => {
                return Err(format!(
                    "sprite sheet '{}' failed to load: {}",
                    asset_id, reason
                ));
            }
            Some(TextureStatus::Ready(info)) => *info,
        };

        let sheet = SpriteSheet::slice(
            info.handle,
            info.width,
            info.height,
            s.frame_width,
            s.frame_height,
        );
        for problem in validate(&s.animation_defs, Some(sheet.frame_count())) {
            warn!("AnimatedSprite on '{}': {}", self.base.owner.object_id, problem);
        }
        Ok(Some(SpriteAnimator::new(
            sheet,
            s.animation_defs.clone(),
            &s.default_animation,
        )))
    }

    fn initialize(&mut self, world: &World) {
        match self.try_build(world) {
            Ok(Some(animator)) => {
                self.last_x = position(world, &self.base.owner).ok().map(|p| p.x);
                self.lifecycle = Lifecycle::Ready(Box::new(animator));
            }
            Ok(None) => {}
            Err(reason) => {
                warn!(
                    "AnimatedSprite on '{}': {}",
                    self.base.owner.object_id, reason
                );
                self.lifecycle = Lifecycle::Failed;
            }
        }
    }
}

impl Behavior for AnimatedSprite {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::AnimatedSprite
    }

    fn base(&self) -> &BehaviorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BehaviorBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), String> {
        if let Lifecycle::Uninitialized = self.lifecycle {
            self.initialize(ctx.world);
        }
        let auto_flip = self.settings.auto_flip;
        let owner = self.base.owner.clone();
        let x = position(ctx.world, &owner).ok().map(|p| p.x);
        let Lifecycle::Ready(animator) = &mut self.lifecycle else {
            return Ok(());
        };

        animator.update(ctx.dt * 1000.0);

        if auto_flip {
            if let (Some(x), Some(last)) = (x, self.last_x) {
                animator.face_by_delta(x - last);
            }
            self.last_x = x;
            if let Some(mut flags) = flags_mut(ctx.world, &owner) {
                flags.facing_right = animator.facing_right();
            }
        }

        if let Some(mut handles) = ctx.world.get_resource_mut::<SpriteHandles>() {
            if let Some(handle) = handles.get_mut(owner.entity) {
                handle.texture = Some(animator.sheet().texture());
                handle.frame = animator.current_frame();
                handle.flip_x = !animator.facing_right();
            }
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.lifecycle = Lifecycle::Uninitialized;
        self.last_x = None;
    }

    fn reset(&mut self, world: &mut World) {
        let default = self.settings.default_animation.clone();
        if let Lifecycle::Ready(animator) = &mut self.lifecycle {
            animator.set_animation(&default);
            animator.restart();
        }
        self.last_x = position(world, &self.base.owner).ok().map(|p| p.x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::behavior::{Owner, Siblings};
    use crate::behaviors::config::{ConfigMap, default_config};
    use crate::components::entityflags::EntityFlags;
    use crate::components::mapposition::MapPosition;
    use crate::resources::input::InputState;
    use crate::resources::spritehandles::SpriteHandle;
    use crate::resources::texturestore::TextureHandle;
    use serde_json::Value;

    fn setup(overrides: Value) -> (World, AnimatedSprite) {
        let mut world = World::new();
        world.insert_resource(TextureStore::new());
        world.insert_resource(SpriteHandles::default());
        let e = world
            .spawn((MapPosition::new(0.0, 0.0), EntityFlags::default()))
            .id();
        world
            .resource_mut::<SpriteHandles>()
            .insert(e, SpriteHandle::default());
        let mut config: ConfigMap = default_config(&AnimatedSprite::config_schema());
        config.insert("spriteSheetAssetId".to_string(), json!("hero"));
        config.insert(
            "animationDefs".to_string(),
            json!({
                "idle": { "frames": [0], "speed": 200 },
                "walk": { "frames": [1, 2, 3], "speed": 100 }
            }),
        );
        if let Value::Object(map) = overrides {
            config.extend(map);
        }
        (world, AnimatedSprite::new(BehaviorBase::new(Owner::new(e, "s"), config)))
    }

    fn tick(world: &mut World, s: &mut AnimatedSprite, dt: f32) {
        let input = InputState::new();
        let mut ctx = TickContext {
            dt,
            input: &input,
            world,
            siblings: Siblings::none(),
        };
        s.update(&mut ctx).unwrap();
    }

    fn ready(world: &mut World) {
        world.resource_mut::<TextureStore>().mark_ready(
            "hero",
            TextureInfo {
                handle: TextureHandle(3),
                width: 128,
                height: 32,
            },
        );
    }

    #[test]
    fn test_waits_for_texture_then_initializes() {
        let (mut world, mut s) = setup(json!({}));
        tick(&mut world, &mut s, 0.016);
        assert_eq!(s.status(), SpriteStatus::Uninitialized);
        world.resource_mut::<TextureStore>().mark_pending("hero");
        tick(&mut world, &mut s, 0.016);
        assert_eq!(s.status(), SpriteStatus::Uninitialized);
        assert!(!s.set_animation("walk"));
        assert_eq!(s.current_animation(), "idle");

        ready(&mut world);
        tick(&mut world, &mut s, 0.016);
        assert_eq!(s.status(), SpriteStatus::Ready);
        let handle = world.resource::<SpriteHandles>().get(s.owner().entity).copied().unwrap();
        assert_eq!(handle.texture, Some(TextureHandle(3)));
        assert_eq!(handle.frame.map(|f| f.x), Some(0));
    }

    #[test]
    fn test_schema_defaults_reach_ready() {
        let mut world = World::new();
        world.insert_resource(TextureStore::new());
        world.insert_resource(SpriteHandles::default());
        let e = world
            .spawn((MapPosition::new(0.0, 0.0), EntityFlags::default()))
            .id();
        world
            .resource_mut::<SpriteHandles>()
            .insert(e, SpriteHandle::default());
        let mut config = default_config(&AnimatedSprite::config_schema());
        config.insert("spriteSheetAssetId".to_string(), json!("hero"));
        let mut s = AnimatedSprite::new(BehaviorBase::new(Owner::new(e, "s"), config));
        assert_eq!(s.settings.frame_width, 32);
        assert_eq!(s.settings.sprite_sheet_asset_id.as_deref(), Some("hero"));

        ready(&mut world);
        tick(&mut world, &mut s, 0.016);
        assert_eq!(s.status(), SpriteStatus::Ready);
        assert_eq!(s.current_animation(), "idle");
        let handle = world.resource::<SpriteHandles>().get(e).copied().unwrap();
        assert_eq!(handle.frame.map(|f| (f.width, f.height)), Some((32, 32)));
    }

    #[test]
    fn test_float_and_bad_frame_sizes_keep_the_rest() {
        let (_, floats) = setup(json!({ "frameWidth": 16.0, "frameHeight": 32.0 }));
        assert_eq!((floats.settings.frame_width, floats.settings.frame_height), (16, 32));

        let (mut world, mut s) = setup(json!({ "frameWidth": -8 }));
        assert_eq!(s.settings.frame_width, 32);
        assert!(s.has_animation("walk"));
        ready(&mut world);
        tick(&mut world, &mut s, 0.016);
        assert_eq!(s.status(), SpriteStatus::Ready);
    }

    #[test]
    fn test_failure_is_terminal() {
        let (mut world, mut s) = setup(json!({}));
        world
            .resource_mut::<TextureStore>()
            .mark_failed("hero", "404");
        tick(&mut world, &mut s, 0.016);
        assert_eq!(s.status(), SpriteStatus::Failed);
        ready(&mut world);
        tick(&mut world, &mut s, 0.016);
        assert_eq!(s.status(), SpriteStatus::Failed);
    }

    #[test]
    fn test_missing_asset_id_fails() {
        let (mut world, mut s) = setup(json!({ "spriteSheetAssetId": null }));
        tick(&mut world, &mut s, 0.016);
        assert_eq!(s.status(), SpriteStatus::Failed);
    }

    #[test]
    fn test_plays_and_mirrors_from_position_delta() {
        let (mut world, mut s) = setup(json!({}));
        ready(&mut world);
        tick(&mut world, &mut s, 0.0);
        assert!(s.set_animation("walk"));
        tick(&mut world, &mut s, 0.1);
        let handle = world.resource::<SpriteHandles>().get(s.owner().entity).copied().unwrap();
        assert_eq!(handle.frame.map(|f| f.x), Some(64));
        assert!(!handle.flip_x);

        world.get_mut::<MapPosition>(s.owner().entity).unwrap().x = -5.0;
        tick(&mut world, &mut s, 0.0);
        assert!(world.resource::<SpriteHandles>().get(s.owner().entity).unwrap().flip_x);
        assert!(!world.get::<EntityFlags>(s.owner().entity).unwrap().facing_right);

        // Standing still keeps the last facing.
        tick(&mut world, &mut s, 0.0);
        assert!(world.resource::<SpriteHandles>().get(s.owner().entity).unwrap().flip_x);
    }

    #[test]
    fn test_destroy_drops_animator_but_not_handle() {
        let (mut world, mut s) = setup(json!({}));
        ready(&mut world);
        tick(&mut world, &mut s, 0.016);
        s.destroy();
        s.destroy();
        assert_eq!(s.status(), SpriteStatus::Uninitialized);
        assert!(world.resource::<SpriteHandles>().get(s.owner().entity).is_some());
    }
}
