//! Eight-direction movement for top-down games.

use std::f32::consts::FRAC_1_SQRT_2;

use bevy_ecs::prelude::World;
use serde::Deserialize;

use crate::behaviors::behavior::{
    Behavior, BehaviorBase, CollisionData, CollisionOther, CollisionSide, TickContext, position,
    set_position,
};
use crate::behaviors::config::{ConfigField, typed_config};
use crate::behaviors::kind::BehaviorKind;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopDownConfig {
    pub speed: f32,
    pub up_key: String,
    pub down_key: String,
    pub left_key: String,
    pub right_key: String,
}

impl Default for TopDownConfig {
    fn default() -> Self {
        Self {
            speed: 200.0,
            up_key: "ArrowUp".to_string(),
            down_key: "ArrowDown".to_string(),
            left_key: "ArrowLeft".to_string(),
            right_key: "ArrowRight".to_string(),
        }
    }
}

pub struct TopDownMovement {
    base: BehaviorBase,
    settings: TopDownConfig,
}

impl TopDownMovement {
    pub fn config_schema() -> Vec<ConfigField> {
        let d = TopDownConfig::default();
        vec![
            ConfigField::number("speed", "Speed", d.speed as f64, 50.0, 600.0, 10.0),
            ConfigField::key("upKey", "Up Key", &d.up_key),
            ConfigField::key("downKey", "Down Key", &d.down_key),
            ConfigField::key("leftKey", "Left Key", &d.left_key),
            ConfigField::key("rightKey", "Right Key", &d.right_key),
        ]
    }

    pub fn new(base: BehaviorBase) -> Self {
        let settings = typed_config(BehaviorKind::TopDown.id(), &base.config);
        Self { base, settings }
    }

    /// Unit-or-zero direction from the held keys. Diagonals are scaled so
    /// their length is 1.
    pub fn direction(&self, held: impl Fn(&str) -> bool) -> (f32, f32) {
        let s = &self.settings;
        let mut dx = 0.0;
        let mut dy = 0.0;
        if held(&s.left_key) {
            dx -= 1.0;
        }
        if held(&s.right_key) {
            dx += 1.0;
        }
        if held(&s.up_key) {
            dy -= 1.0;
        }
        if held(&s.down_key) {
            dy += 1.0;
        }
        if dx != 0.0 && dy != 0.0 {
            dx *= FRAC_1_SQRT_2;
            dy *= FRAC_1_SQRT_2;
        }
        (dx, dy)
    }
}

impl Behavior for TopDownMovement {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::TopDown
    }

    fn base(&self) -> &BehaviorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BehaviorBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), String> {
        let (dx, dy) = self.direction(|key| ctx.input.is_held(key));
        let step = self.settings.speed * ctx.dt;
        let pos = position(ctx.world, &self.base.owner)?;
        set_position(
            ctx.world,
            &self.base.owner,
            pos.x + dx * step,
            pos.y + dy * step,
        )
    }

    fn on_collision(
        &mut self,
        world: &mut World,
        other: &CollisionOther,
        data: &CollisionData,
    ) -> Result<(), String> {
        if !other.solid {
            return Ok(());
        }
        let mut pos = position(world, &self.base.owner)?;
        match data.side {
            CollisionSide::Top => pos.y -= data.overlap,
            CollisionSide::Bottom => pos.y += data.overlap,
            CollisionSide::Left => pos.x -= data.overlap,
            CollisionSide::Right => pos.x += data.overlap,
        }
        set_position(world, &self.base.owner, pos.x, pos.y)
    }
}
