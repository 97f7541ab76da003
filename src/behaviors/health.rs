//! Hit points with invincibility frames.
//!
//! Taking damage opens an invincibility window of `invincibilityDuration` ms
//! during which further damage is ignored. With `flashOnDamage` the entity
//! blinks while the window is open: `flash_visible` toggles every
//! [`FLASH_INTERVAL_MS`], whatever the window length.

use bevy_ecs::prelude::World;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::behaviors::behavior::{Behavior, BehaviorBase, TickContext, flags_mut};
use crate::behaviors::config::{ConfigField, typed_config};
use crate::behaviors::kind::BehaviorKind;

pub const FLASH_INTERVAL_MS: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthConfig {
    pub max_health: f32,
    pub start_health: f32,
    /// Milliseconds.
    pub invincibility_duration: f32,
    pub flash_on_damage: bool,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            start_health: 100.0,
            invincibility_duration: 1000.0,
            flash_on_damage: true,
        }
    }
}

pub struct Health {
    base: BehaviorBase,
    settings: HealthConfig,
    current: f32,
    invincible: bool,
    invincibility_timer: f32,
    flashing: bool,
    flash_timer: f32,
    flash_visible: bool,
}

impl Health {
    pub fn config_schema() -> Vec<ConfigField> {
        let d = HealthConfig::default();
        vec![
            ConfigField::number("maxHealth", "Max Health", d.max_health as f64, 1.0, 1000.0, 1.0),
            ConfigField::number("startHealth", "Starting Health", d.start_health as f64, 1.0, 1000.0, 1.0),
            ConfigField::number(
                "invincibilityDuration",
                "Invincibility (ms)",
                d.invincibility_duration as f64,
                0.0,
                5000.0,
                100.0,
            ),
            ConfigField::boolean("flashOnDamage", "Flash on Damage", d.flash_on_damage),
        ]
    }

    pub fn new(base: BehaviorBase) -> Self {
        let settings: HealthConfig = typed_config(BehaviorKind::Health.id(), &base.config);
        let current = settings.start_health.min(settings.max_health);
        Self {
            base,
            settings,
            current,
            invincible: false,
            invincibility_timer: 0.0,
            flashing: false,
            flash_timer: 0.0,
            flash_visible: true,
        }
    }

    /// Apply damage. Returns false, changing nothing, when the behavior is
    /// disabled, invincible or already dead.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.base.enabled || self.invincible || self.is_dead() {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        if self.settings.invincibility_duration > 0.0 && !self.is_dead() {
            self.invincible = true;
            self.invincibility_timer = self.settings.invincibility_duration;
            self.flashing = self.settings.flash_on_damage;
            self.flash_timer = 0.0;
        }
        true
    }

    /// Restore health up to the maximum. The dead stay dead.
    pub fn heal(&mut self, amount: f32) {
        if !self.base.enabled || self.is_dead() {
            return;
        }
        self.current = (self.current + amount).min(self.settings.max_health);
    }

    pub fn current_health(&self) -> f32 {
        self.current
    }

    pub fn max_health(&self) -> f32 {
        self.settings.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// `current / max` in `[0, 1]`.
    pub fn health_percent(&self) -> f32 {
        if self.settings.max_health > 0.0 {
            self.current / self.settings.max_health
        } else {
            0.0
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn invincibility_remaining(&self) -> f32 {
        self.invincibility_timer
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    pub fn flash_visible(&self) -> bool {
        self.flash_visible
    }

    fn clear_invincibility(&mut self) {
        self.invincible = false;
        self.invincibility_timer = 0.0;
        self.flashing = false;
        self.flash_timer = 0.0;
        self.flash_visible = true;
    }
}

impl Behavior for Health {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Health
    }

    fn base(&self) -> &BehaviorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BehaviorBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), String> {
        let dt_ms = ctx.dt * 1000.0;
        if self.invincible {
            self.invincibility_timer -= dt_ms;
            if self.invincibility_timer <= 0.0 {
                self.clear_invincibility();
            } else if self.flashing {
                self.flash_timer += dt_ms;
                while self.flash_timer >= FLASH_INTERVAL_MS {
                    self.flash_timer -= FLASH_INTERVAL_MS;
                    self.flash_visible = !self.flash_visible;
                }
            }
        }
        if let Some(mut flags) = flags_mut(ctx.world, &self.base.owner) {
            flags.flashing = self.flashing;
            flags.flash_visible = self.flash_visible;
        }
        Ok(())
    }

    fn reset(&mut self, world: &mut World) {
        self.current = self.settings.start_health.min(self.settings.max_health);
        self.clear_invincibility();
        if let Some(mut flags) = flags_mut(world, &self.base.owner) {
            flags.flashing = false;
            flags.flash_visible = true;
        }
    }

    fn state(&self) -> Option<Value> {
        Some(json!({
            "currentHealth": self.current,
            "invincible": self.invincible,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::behavior::{Owner, Siblings};
    use crate::behaviors::config::{ConfigMap, default_config};
    use crate::components::entityflags::EntityFlags;
    use crate::resources::input::InputState;

    fn setup(overrides: Value) -> (World, Health) {
        let mut world = World::new();
        let e = world.spawn(EntityFlags::default()).id();
        let mut config: ConfigMap = default_config(&Health::config_schema());
        if let Value::Object(map) = overrides {
            config.extend(map);
        }
        (world, Health::new(BehaviorBase::new(Owner::new(e, "h"), config)))
    }

    fn tick(world: &mut World, h: &mut Health, dt: f32) {
        let input = InputState::new();
        let mut ctx = TickContext {
            dt,
            input: &input,
            world,
            siblings: Siblings::none(),
        };
        h.update(&mut ctx).unwrap();
    }

    #[test]
    fn test_damage_opens_invincibility_window() {
        let (_world, mut h) = setup(json!({}));
        assert!(h.take_damage(30.0));
        assert_eq!(h.current_health(), 70.0);
        assert!(h.is_invincible());
        assert_eq!(h.invincibility_remaining(), 1000.0);
        assert!(h.is_flashing());

        assert!(!h.take_damage(30.0));
        assert_eq!(h.current_health(), 70.0);
    }

    #[test]
    fn test_window_expires_and_restores_visibility() {
        let (mut world, mut h) = setup(json!({ "invincibilityDuration": 300 }));
        h.take_damage(10.0);
        tick(&mut world, &mut h, 0.1);
        assert!(!h.flash_visible());
        let flags = *world.get::<EntityFlags>(h.owner().entity).unwrap();
        assert!(flags.flashing);
        assert!(!flags.flash_visible);

        tick(&mut world, &mut h, 0.1);
        assert!(h.flash_visible());
        tick(&mut world, &mut h, 0.15);
        assert!(!h.is_invincible());
        assert!(!h.is_flashing());
        assert!(h.flash_visible());
        assert!(h.take_damage(10.0));
    }

    #[test]
    fn test_no_flash_when_disabled_in_config() {
        let (mut world, mut h) = setup(json!({ "flashOnDamage": false }));
        h.take_damage(10.0);
        tick(&mut world, &mut h, 0.25);
        assert!(h.is_invincible());
        assert!(h.flash_visible());
    }

    #[test]
    fn test_death_floors_at_zero_and_blocks_heal() {
        let (_world, mut h) = setup(json!({}));
        assert!(h.take_damage(250.0));
        assert_eq!(h.current_health(), 0.0);
        assert!(h.is_dead());
        assert!(!h.is_invincible());
        h.heal(50.0);
        assert_eq!(h.current_health(), 0.0);
        assert!(!h.take_damage(1.0));
    }

    #[test]
    fn test_heal_caps_at_max_and_percent() {
        let (_world, mut h) = setup(json!({ "maxHealth": 80, "startHealth": 40, "invincibilityDuration": 0 }));
        assert_eq!(h.health_percent(), 0.5);
        h.take_damage(10.0);
        assert!(!h.is_invincible());
        h.heal(500.0);
        assert_eq!(h.current_health(), 80.0);
        assert_eq!(h.health_percent(), 1.0);
    }

    #[test]
    fn test_start_health_clamped_and_disabled_ignores_damage() {
        let (_world, mut h) = setup(json!({ "maxHealth": 50, "startHealth": 90 }));
        assert_eq!(h.current_health(), 50.0);
        h.set_enabled(false);
        assert!(!h.take_damage(5.0));
        assert_eq!(h.current_health(), 50.0);
    }

    #[test]
    fn test_reset_and_record_state() {
        let (mut world, mut h) = setup(json!({}));
        h.take_damage(40.0);
        let record = h.to_record();
        assert_eq!(record.kind, "health");
        assert_eq!(record.state, Some(json!({ "currentHealth": 60.0, "invincible": true })));
        h.reset(&mut world);
        assert_eq!(h.current_health(), 100.0);
        assert!(!h.is_invincible());
    }
}
