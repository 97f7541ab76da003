//! Side-scrolling movement with gravity and jumping.

use bevy_ecs::prelude::World;
use serde::Deserialize;

use crate::animation::transitions::PhysicalState;
use crate::behaviors::behavior::{
    Behavior, BehaviorBase, CollisionData, CollisionOther, CollisionSide, TickContext, position,
    set_position, size,
};
use crate::behaviors::config::{ConfigField, typed_config};
use crate::behaviors::kind::BehaviorKind;
use crate::resources::gameconfig::{DEFAULT_FLOOR_Y, DEFAULT_MAX_FALL_SPEED, GameConfig};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformConfig {
    pub speed: f32,
    pub jump_strength: f32,
    pub gravity: f32,
    pub left_key: String,
    pub right_key: String,
    pub jump_key: String,
    /// Pick `jump`/`walk`/`idle` on an animated-sprite sibling.
    pub drive_animation: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            speed: 200.0,
            jump_strength: 400.0,
            gravity: 800.0,
            left_key: "ArrowLeft".to_string(),
            right_key: "ArrowRight".to_string(),
            jump_key: " ".to_string(),
            drive_animation: false,
        }
    }
}

pub struct PlatformCharacter {
    base: BehaviorBase,
    settings: PlatformConfig,
    velocity_x: f32,
    velocity_y: f32,
    grounded: bool,
    /// Jump input was already down last tick.
    jump_held: bool,
}

impl PlatformCharacter {
    pub fn config_schema() -> Vec<ConfigField> {
        let d = PlatformConfig::default();
        vec![
            ConfigField::number("speed", "Speed", d.speed as f64, 50.0, 800.0, 10.0),
            ConfigField::number("jumpStrength", "Jump Strength", d.jump_strength as f64, 100.0, 1000.0, 25.0),
            ConfigField::number("gravity", "Gravity", d.gravity as f64, 100.0, 2000.0, 50.0),
            ConfigField::key("leftKey", "Left Key", &d.left_key),
            ConfigField::key("rightKey", "Right Key", &d.right_key),
            ConfigField::key("jumpKey", "Jump Key", &d.jump_key),
            ConfigField::boolean("driveAnimation", "Drive Animation", d.drive_animation),
        ]
    }

    pub fn new(base: BehaviorBase) -> Self {
        let settings = typed_config(BehaviorKind::Platform.id(), &base.config);
        Self {
            base,
            settings,
            velocity_x: 0.0,
            velocity_y: 0.0,
            grounded: false,
            jump_held: false,
        }
    }

    pub fn velocity_x(&self) -> f32 {
        self.velocity_x
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Place the character on the ground without waiting for a collision.
    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Facts for the transition preview.
    pub fn physical_state(&self) -> PhysicalState {
        PhysicalState {
            grounded: self.grounded,
            velocity_y: self.velocity_y,
        }
    }
}

impl Behavior for PlatformCharacter {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Platform
    }

    fn base(&self) -> &BehaviorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BehaviorBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), String> {
        let owner = &self.base.owner;
        let s = &self.settings;
        let dt = ctx.dt;
        let mut pos = position(ctx.world, owner)?;
        let (_, height) = size(ctx.world, owner);
        let (floor_y, max_fall) = ctx
            .world
            .get_resource::<GameConfig>()
            .map(|c| (c.floor_y, c.max_fall_speed))
            .unwrap_or((DEFAULT_FLOOR_Y, DEFAULT_MAX_FALL_SPEED));

        // Recomputed every tick; right wins when both are held.
        self.velocity_x = 0.0;
        if ctx.input.is_held(&s.left_key) {
            self.velocity_x = -s.speed;
        }
        if ctx.input.is_held(&s.right_key) {
            self.velocity_x = s.speed;
        }

        // Ground contact is re-established each tick by the floor check or a
        // top-side collision.
        let was_grounded = self.grounded;
        self.grounded = false;

        self.velocity_y = (self.velocity_y + s.gravity * dt).min(max_fall);

        let jump_pressed = ctx.input.is_held(&s.jump_key);
        if jump_pressed && was_grounded && !self.jump_held {
            self.velocity_y = -s.jump_strength;
            self.jump_held = true;
        }
        if !jump_pressed {
            self.jump_held = false;
        }

        pos.x += self.velocity_x * dt;
        pos.y += self.velocity_y * dt;

        if pos.y + height >= floor_y {
            pos.y = floor_y - height;
            self.velocity_y = 0.0;
            self.grounded = true;
        }
        set_position(ctx.world, owner, pos.x, pos.y)?;

        if s.drive_animation {
            let on_ground = self.grounded || (was_grounded && self.velocity_y >= 0.0);
            let state = if !on_ground {
                "jump"
            } else if self.velocity_x != 0.0 {
                "walk"
            } else {
                "idle"
            };
            if let Some(sprite) = ctx.siblings.animated_sprite_mut() {
                if sprite.has_animation(state) {
                    sprite.set_animation(state);
                }
            }
        }
        Ok(())
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
        let owner = &self.base.owner;
        let mut pos = position(world, owner)?;
        match data.side {
            CollisionSide::Top => {
                let (_, height) = size(world, owner);
                pos.y = other.y - height;
                self.velocity_y = 0.0;
                self.grounded = true;
            }
            CollisionSide::Bottom => {
                pos.y += data.overlap;
                self.velocity_y = self.velocity_y.max(0.0);
            }
            CollisionSide::Left => {
                pos.x -= data.overlap;
                self.velocity_x = 0.0;
            }
            CollisionSide::Right => {
                pos.x += data.overlap;
                self.velocity_x = 0.0;
            }
        }
        set_position(world, owner, pos.x, pos.y)
    }

    fn reset(&mut self, _world: &mut World) {
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
        self.grounded = false;
        self.jump_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::behavior::{Owner, Siblings};
    use crate::behaviors::config::{ConfigMap, default_config};
    use crate::components::boxcollider::BoxCollider;
    use crate::components::mapposition::MapPosition;
    use crate::components::objectkind::ObjectKind;
    use crate::resources::input::InputState;

    fn setup(y: f32) -> (World, PlatformCharacter) {
        let mut world = World::new();
        world.insert_resource(GameConfig::new());
        let e = world
            .spawn((MapPosition::new(100.0, y), BoxCollider::new(32.0, 32.0)))
            .id();
        let config: ConfigMap = default_config(&PlatformCharacter::config_schema());
        let behavior = PlatformCharacter::new(BehaviorBase::new(Owner::new(e, "hero"), config));
        (world, behavior)
    }

    fn tick(world: &mut World, b: &mut PlatformCharacter, input: &InputState, dt: f32) {
        let mut ctx = TickContext {
            dt,
            input,
            world,
            siblings: Siblings::none(),
        };
        b.update(&mut ctx).unwrap();
    }

    fn pos(world: &World, b: &PlatformCharacter) -> MapPosition {
        *world.get::<MapPosition>(b.owner().entity).unwrap()
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let (mut world, mut b) = setup(0.0);
        let idle = InputState::new();
        for _ in 0..200 {
            tick(&mut world, &mut b, &idle, 0.016);
        }
        assert!(b.is_grounded());
        assert_eq!(b.velocity_y(), 0.0);
        assert_eq!(pos(&world, &b).y, 500.0 - 32.0);
    }

    #[test]
    fn test_fall_speed_is_capped() {
        let (mut world, mut b) = setup(-100_000.0);
        let idle = InputState::new();
        for _ in 0..200 {
            tick(&mut world, &mut b, &idle, 0.016);
        }
        assert_eq!(b.velocity_y(), DEFAULT_MAX_FALL_SPEED);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let (mut world, mut b) = setup(500.0 - 32.0);
        b.set_grounded(true);
        let jump = InputState::with_keys([" "]);
        tick(&mut world, &mut b, &jump, 0.016);
        assert_eq!(b.velocity_y(), -400.0);
        assert!(!b.is_grounded());

        // Hold jump until landing again; no second jump while held.
        for _ in 0..200 {
            tick(&mut world, &mut b, &jump, 0.016);
        }
        assert!(b.is_grounded());
        tick(&mut world, &mut b, &jump, 0.016);
        assert!(b.velocity_y() >= 0.0);

        tick(&mut world, &mut b, &InputState::new(), 0.016);
        tick(&mut world, &mut b, &jump, 0.016);
        assert_eq!(b.velocity_y(), -400.0);
    }

    #[test]
    fn test_horizontal_velocity_not_accumulated() {
        let (mut world, mut b) = setup(0.0);
        let right = InputState::with_keys(["ArrowRight"]);
        tick(&mut world, &mut b, &right, 0.5);
        tick(&mut world, &mut b, &right, 0.5);
        assert_eq!(b.velocity_x(), 200.0);
        assert_eq!(pos(&world, &b).x, 300.0);
        tick(&mut world, &mut b, &InputState::new(), 0.5);
        assert_eq!(b.velocity_x(), 0.0);
    }

    fn ledge(y: f32) -> CollisionOther {
        CollisionOther {
            object_id: "ledge".to_string(),
            kind: ObjectKind::Platform,
            solid: true,
            x: 90.0,
            y,
            width: 64.0,
            height: 32.0,
        }
    }

    #[test]
    fn test_collision_sides() {
        let (mut world, mut b) = setup(0.0);
        tick(&mut world, &mut b, &InputState::new(), 0.1);
        assert!(b.velocity_y() > 0.0);

        let top = CollisionData {
            side: CollisionSide::Top,
            overlap: 3.0,
        };
        b.on_collision(&mut world, &ledge(40.0), &top).unwrap();
        assert!(b.is_grounded());
        assert_eq!(b.velocity_y(), 0.0);
        assert_eq!(pos(&world, &b).y, 8.0);

        let left = CollisionData {
            side: CollisionSide::Left,
            overlap: 4.0,
        };
        let x = pos(&world, &b).x;
        b.on_collision(&mut world, &ledge(40.0), &left).unwrap();
        assert_eq!(pos(&world, &b).x, x - 4.0);
        assert_eq!(b.velocity_x(), 0.0);
    }

    #[test]
    fn test_non_solid_is_ignored() {
        let (mut world, mut b) = setup(0.0);
        let mut coin = ledge(10.0);
        coin.solid = false;
        coin.kind = ObjectKind::Coin;
        let data = CollisionData {
            side: CollisionSide::Top,
            overlap: 1.0,
        };
        b.on_collision(&mut world, &coin, &data).unwrap();
        assert!(!b.is_grounded());
        assert_eq!(pos(&world, &b).y, 0.0);
    }

    #[test]
    fn test_reset_clears_motion() {
        let (mut world, mut b) = setup(0.0);
        tick(&mut world, &mut b, &InputState::with_keys(["ArrowLeft"]), 0.1);
        b.reset(&mut world);
        assert_eq!(b.velocity_x(), 0.0);
        assert_eq!(b.velocity_y(), 0.0);
        assert!(!b.is_grounded());
    }
}
