//! Back-and-forth movement around the spawn point.
//!
//! The spawn position captured at attach time is the centre of the patrol.
//! The entity travels `range / 2` either way along one axis, clamps at each
//! end, reverses, and optionally waits there for `pauseAtEnds` ms.

use bevy_ecs::prelude::World;
use log::warn;
use serde::Deserialize;

use crate::behaviors::behavior::{
    Behavior, BehaviorBase, TickContext, flags_mut, position, set_position,
};
use crate::behaviors::config::{ConfigField, typed_config};
use crate::behaviors::kind::BehaviorKind;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatrolConfig {
    pub speed: f32,
    pub range: f32,
    pub vertical: bool,
    pub pause_at_ends: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            speed: 100.0,
            range: 150.0,
            vertical: false,
            pause_at_ends: 0.0,
        }
    }
}

pub struct Patrol {
    base: BehaviorBase,
    settings: PatrolConfig,
    spawn_x: f32,
    spawn_y: f32,
    /// `1.0` towards +x/+y, `-1.0` back.
    direction: f32,
    paused: bool,
    pause_timer: f32,
}

impl Patrol {
    pub fn config_schema() -> Vec<ConfigField> {
        let d = PatrolConfig::default();
        vec![
            ConfigField::number("speed", "Speed", d.speed as f64, 10.0, 400.0, 10.0),
            ConfigField::number("range", "Range (px)", d.range as f64, 32.0, 500.0, 16.0),
            ConfigField::boolean("vertical", "Vertical Patrol", d.vertical),
            ConfigField::number(
                "pauseAtEnds",
                "Pause at Ends (ms)",
                d.pause_at_ends as f64,
                0.0,
                2000.0,
                100.0,
            ),
        ]
    }

    pub fn new(base: BehaviorBase, world: &World) -> Self {
        let settings = typed_config(BehaviorKind::Patrol.id(), &base.config);
        let spawn = match position(world, &base.owner) {
            Ok(pos) => (pos.x, pos.y),
            Err(e) => {
                warn!("Patrol: {}; centring patrol on the origin", e);
                (0.0, 0.0)
            }
        };
        Self {
            base,
            settings,
            spawn_x: spawn.0,
            spawn_y: spawn.1,
            direction: 1.0,
            paused: false,
            pause_timer: 0.0,
        }
    }

    pub fn spawn_position(&self) -> (f32, f32) {
        (self.spawn_x, self.spawn_y)
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Re-centre the patrol on the entity's current position, e.g. after it
    /// was moved in the editor.
    pub fn update_spawn_position(&mut self, world: &World) -> Result<(), String> {
        let pos = position(world, &self.base.owner)?;
        self.spawn_x = pos.x;
        self.spawn_y = pos.y;
        Ok(())
    }

    fn start_pause(&mut self) {
        if self.settings.pause_at_ends > 0.0 {
            self.paused = true;
            self.pause_timer = self.settings.pause_at_ends;
        }
    }
}

impl Behavior for Patrol {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Patrol
    }

    fn base(&self) -> &BehaviorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BehaviorBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), String> {
        if self.paused {
            self.pause_timer -= ctx.dt * 1000.0;
            if self.pause_timer > 0.0 {
                return Ok(());
            }
            self.paused = false;
            self.pause_timer = 0.0;
        }

        let mut pos = position(ctx.world, &self.base.owner)?;
        let half = self.settings.range / 2.0;
        let (coord, centre) = if self.settings.vertical {
            (&mut pos.y, self.spawn_y)
        } else {
            (&mut pos.x, self.spawn_x)
        };
        *coord += self.settings.speed * self.direction * ctx.dt;

        let (min, max) = (centre - half, centre + half);
        let mut turned = false;
        if *coord <= min {
            *coord = min;
            self.direction = 1.0;
            turned = true;
        } else if *coord >= max {
            *coord = max;
            self.direction = -1.0;
            turned = true;
        }
        if turned {
            self.start_pause();
        }

        set_position(ctx.world, &self.base.owner, pos.x, pos.y)?;
        if let Some(mut flags) = flags_mut(ctx.world, &self.base.owner) {
            flags.facing_right = self.direction > 0.0;
        }
        Ok(())
    }

    fn reset(&mut self, world: &mut World) {
        if let Err(e) = set_position(world, &self.base.owner, self.spawn_x, self.spawn_y) {
            warn!("Patrol::reset: {}", e);
        }
        self.direction = 1.0;
        self.paused = false;
        self.pause_timer = 0.0;
    }
}
