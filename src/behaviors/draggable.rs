//! Pointer dragging with optional grid snap on release.

use bevy_ecs::prelude::World;
use serde::Deserialize;

use crate::behaviors::behavior::{
    Behavior, BehaviorBase, TickContext, flags_mut, position, set_position, size,
};
use crate::behaviors::config::{ConfigField, typed_config};
use crate::behaviors::kind::BehaviorKind;
use crate::components::boxcollider::{BoxCollider, DEFAULT_OBJECT_SIZE};
use crate::resources::gameconfig::GameConfig;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraggableConfig {
    pub snap_to_grid: bool,
    pub grid_size: f32,
}

impl Default for DraggableConfig {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_size: 32.0,
        }
    }
}

pub struct Draggable {
    base: BehaviorBase,
    settings: DraggableConfig,
    dragging: bool,
    offset: (f32, f32),
    was_down: bool,
}

impl Draggable {
    pub fn config_schema() -> Vec<ConfigField> {
        let d = DraggableConfig::default();
        vec![
            ConfigField::boolean("snapToGrid", "Snap to Grid", d.snap_to_grid),
            ConfigField::number("gridSize", "Grid Size", d.grid_size as f64, 8.0, 128.0, 8.0),
        ]
    }

    pub fn new(base: BehaviorBase) -> Self {
        let settings = typed_config(BehaviorKind::Draggable.id(), &base.config);
        Self {
            base,
            settings,
            dragging: false,
            offset: (0.0, 0.0),
            was_down: false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Drop the entity where it is, without snapping.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    fn grid(&self, world: &World) -> f32 {
        if self.settings.grid_size > 0.0 {
            return self.settings.grid_size;
        }
        world
            .get_resource::<GameConfig>()
            .map(|c| c.grid_size)
            .filter(|g| *g > 0.0)
            .unwrap_or(DEFAULT_OBJECT_SIZE)
    }
}

fn snap(value: f32, grid: f32) -> f32 {
    (value / grid).round() * grid
}

impl Behavior for Draggable {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Draggable
    }

    fn base(&self) -> &BehaviorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BehaviorBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), String> {
        let pointer = ctx.input.pointer;
        let mut pos = position(ctx.world, &self.base.owner)?;
        let (width, height) = size(ctx.world, &self.base.owner);
        let over = BoxCollider::new(width, height).contains_point(pos.x, pos.y, pointer.x, pointer.y);

        if pointer.down && !self.was_down && over {
            self.dragging = true;
            self.offset = (pointer.x - pos.x, pointer.y - pos.y);
        }

        if !pointer.down && self.was_down && self.dragging {
            self.dragging = false;
            if self.settings.snap_to_grid {
                let grid = self.grid(ctx.world);
                pos.x = snap(pos.x, grid);
                pos.y = snap(pos.y, grid);
            }
        }

        if self.dragging {
            pos.x = pointer.x - self.offset.0;
            pos.y = pointer.y - self.offset.1;
        }
        self.was_down = pointer.down;

        set_position(ctx.world, &self.base.owner, pos.x, pos.y)?;
        if let Some(mut flags) = flags_mut(ctx.world, &self.base.owner) {
            flags.dragging = self.dragging;
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.end_drag();
    }

    fn reset(&mut self, _world: &mut World) {
        self.end_drag();
        self.was_down = false;
    }
}
