//! Chase the follow target with a dead zone.

use bevy_ecs::prelude::World;
use serde::Deserialize;

use crate::behaviors::behavior::{
    Behavior, BehaviorBase, TickContext, flags_mut, position, set_position,
};
use crate::behaviors::config::{ConfigField, typed_config};
use crate::behaviors::kind::BehaviorKind;
use crate::resources::followtarget::FollowTarget;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FollowConfig {
    pub speed: f32,
    /// Dead zone: no movement at or inside this distance.
    pub min_distance: f32,
    pub x_only: bool,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            speed: 80.0,
            min_distance: 32.0,
            x_only: false,
        }
    }
}

pub struct Follower {
    base: BehaviorBase,
    settings: FollowConfig,
    facing: f32,
}

impl Follower {
    pub fn config_schema() -> Vec<ConfigField> {
        let d = FollowConfig::default();
        vec![
            ConfigField::number("speed", "Speed", d.speed as f64, 10.0, 300.0, 10.0),
            ConfigField::number("minDistance", "Min Distance", d.min_distance as f64, 0.0, 200.0, 8.0),
            ConfigField::boolean("xOnly", "X-Only (Stay on Row)", d.x_only),
        ]
    }

    pub fn new(base: BehaviorBase) -> Self {
        let settings = typed_config(BehaviorKind::Follow.id(), &base.config);
        Self {
            base,
            settings,
            facing: 1.0,
        }
    }

    /// `1.0` when last moving right, `-1.0` when last moving left.
    pub fn facing_sign(&self) -> f32 {
        self.facing
    }
}

impl Behavior for Follower {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Follow
    }

    fn base(&self) -> &BehaviorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BehaviorBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), String> {
        let Some(FollowTarget(Some((tx, ty)))) = ctx.world.get_resource::<FollowTarget>().copied()
        else {
            return Ok(());
        };
        let s = &self.settings;
        let mut pos = position(ctx.world, &self.base.owner)?;

        let dx = tx - pos.x;
        let dy = if s.x_only { 0.0 } else { ty - pos.y };
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= s.min_distance || distance == 0.0 {
            return Ok(());
        }

        pos.x += dx / distance * s.speed * ctx.dt;
        pos.y += dy / distance * s.speed * ctx.dt;
        set_position(ctx.world, &self.base.owner, pos.x, pos.y)?;

        if dx != 0.0 {
            self.facing = dx.signum();
        }
        if let Some(mut flags) = flags_mut(ctx.world, &self.base.owner) {
            flags.facing_right = self.facing > 0.0;
        }
        Ok(())
    }

    fn reset(&mut self, _world: &mut World) {
        self.facing = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::behavior::{Owner, Siblings};
    use crate::behaviors::config::default_config;
    use crate::components::entityflags::EntityFlags;
    use crate::components::mapposition::MapPosition;
    use crate::resources::input::InputState;
    use serde_json::json;

    fn setup(target: Option<(f32, f32)>, x_only: bool) -> (World, Follower) {
        let mut world = World::new();
        world.insert_resource(FollowTarget(target));
        let e = world
            .spawn((MapPosition::new(0.0, 0.0), EntityFlags::default()))
            .id();
        let mut config = default_config(&Follower::config_schema());
        config.insert("xOnly".to_string(), json!(x_only));
        (world, Follower::new(BehaviorBase::new(Owner::new(e, "f"), config)))
    }

    fn tick(world: &mut World, f: &mut Follower, dt: f32) -> MapPosition {
        let input = InputState::new();
        let mut ctx = TickContext {
            dt,
            input: &input,
            world,
            siblings: Siblings::none(),
        };
        f.update(&mut ctx).unwrap();
        *world.get::<MapPosition>(f.owner().entity).unwrap()
    }

    #[test]
    fn test_moves_toward_target() {
        let (mut world, mut f) = setup(Some((300.0, 400.0)), false);
        let pos = tick(&mut world, &mut f, 1.0);
        assert!((pos.x - 48.0).abs() < 1e-3);
        assert!((pos.y - 64.0).abs() < 1e-3);
        assert_eq!(f.facing_sign(), 1.0);
    }

    #[test]
    fn test_dead_zone_stops_movement() {
        let (mut world, mut f) = setup(Some((-20.0, 20.0)), false);
        let pos = tick(&mut world, &mut f, 1.0);
        assert_eq!(pos, MapPosition::new(0.0, 0.0));
    }

    #[test]
    fn test_x_only_ignores_vertical_delta() {
        let (mut world, mut f) = setup(Some((-100.0, 500.0)), true);
        let pos = tick(&mut world, &mut f, 0.5);
        assert_eq!(pos, MapPosition::new(-40.0, 0.0));
        assert_eq!(f.facing_sign(), -1.0);
        assert!(!world.get::<EntityFlags>(f.owner().entity).unwrap().facing_right);
    }

    #[test]
    fn test_no_target_is_noop() {
        let (mut world, mut f) = setup(None, false);
        assert_eq!(tick(&mut world, &mut f, 1.0), MapPosition::new(0.0, 0.0));
    }
}
