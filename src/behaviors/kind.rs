//! The closed set of behavior kinds.
//!
//! Adding a kind means adding a variant here, one arm in each match below,
//! and the behavior's own module. The compiler points at every place that
//! still needs a case.

use std::ops::{Deref, DerefMut};

use bevy_ecs::prelude::World;
use serde::{Deserialize, Serialize};

use crate::behaviors::animatedsprite::AnimatedSprite;
use crate::behaviors::behavior::{Behavior, BehaviorBase, Owner};
use crate::behaviors::config::{ConfigField, ConfigMap};
use crate::behaviors::draggable::Draggable;
use crate::behaviors::follow::Follower;
use crate::behaviors::health::Health;
use crate::behaviors::patrol::Patrol;
use crate::behaviors::platform::PlatformCharacter;
use crate::behaviors::topdown::TopDownMovement;

/// Picker grouping, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Movement,
    Combat,
    AI,
    Interaction,
    Visual,
}

impl Category {
    pub const ORDER: [Category; 5] = [
        Category::Movement,
        Category::Combat,
        Category::AI,
        Category::Interaction,
        Category::Visual,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BehaviorKind {
    #[serde(rename = "platform")]
    Platform,
    #[serde(rename = "topdown")]
    TopDown,
    #[serde(rename = "health")]
    Health,
    #[serde(rename = "patrol")]
    Patrol,
    #[serde(rename = "follow")]
    Follow,
    #[serde(rename = "draggable")]
    Draggable,
    #[serde(rename = "animatedSprite")]
    AnimatedSprite,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 7] = [
        BehaviorKind::Platform,
        BehaviorKind::TopDown,
        BehaviorKind::Health,
        BehaviorKind::Patrol,
        BehaviorKind::Follow,
        BehaviorKind::Draggable,
        BehaviorKind::AnimatedSprite,
    ];

    /// Identifier used in level files.
    pub fn id(self) -> &'static str {
        match self {
            BehaviorKind::Platform => "platform",
            BehaviorKind::TopDown => "topdown",
            BehaviorKind::Health => "health",
            BehaviorKind::Patrol => "patrol",
            BehaviorKind::Follow => "follow",
            BehaviorKind::Draggable => "draggable",
            BehaviorKind::AnimatedSprite => "animatedSprite",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            BehaviorKind::Platform => "Platform Character",
            BehaviorKind::TopDown => "Top-Down Movement",
            BehaviorKind::Health => "Health",
            BehaviorKind::Patrol => "Patrol",
            BehaviorKind::Follow => "Follow Player",
            BehaviorKind::Draggable => "Draggable",
            BehaviorKind::AnimatedSprite => "Animated Sprite",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BehaviorKind::Platform => "Side-scrolling movement with gravity and jumping",
            BehaviorKind::TopDown => "8-direction movement for top-down games",
            BehaviorKind::Health => "HP, damage, healing, and invincibility frames",
            BehaviorKind::Patrol => "Move back and forth within a range",
            BehaviorKind::Follow => "Chase the player position",
            BehaviorKind::Draggable => "Allow mouse dragging with optional grid snap",
            BehaviorKind::AnimatedSprite => "Plays a sprite sheet animation. Works on any entity.",
        }
    }

    pub fn category(self) -> Category {
        match self {
            BehaviorKind::Platform | BehaviorKind::TopDown => Category::Movement,
            BehaviorKind::Health => Category::Combat,
            BehaviorKind::Patrol | BehaviorKind::Follow => Category::AI,
            BehaviorKind::Draggable => Category::Interaction,
            BehaviorKind::AnimatedSprite => Category::Visual,
        }
    }

    pub fn config_schema(self) -> Vec<ConfigField> {
        match self {
            BehaviorKind::Platform => PlatformCharacter::config_schema(),
            BehaviorKind::TopDown => TopDownMovement::config_schema(),
            BehaviorKind::Health => Health::config_schema(),
            BehaviorKind::Patrol => Patrol::config_schema(),
            BehaviorKind::Follow => Follower::config_schema(),
            BehaviorKind::Draggable => Draggable::config_schema(),
            BehaviorKind::AnimatedSprite => AnimatedSprite::config_schema(),
        }
    }

    /// Build a live instance. `config` must already be merged over the
    /// schema defaults.
    pub fn instantiate(self, owner: Owner, world: &World, config: ConfigMap) -> BehaviorInstance {
        let base = BehaviorBase::new(owner, config);
        match self {
            BehaviorKind::Platform => BehaviorInstance::Platform(PlatformCharacter::new(base)),
            BehaviorKind::TopDown => BehaviorInstance::TopDown(TopDownMovement::new(base)),
            BehaviorKind::Health => BehaviorInstance::Health(Health::new(base)),
            BehaviorKind::Patrol => BehaviorInstance::Patrol(Patrol::new(base, world)),
            BehaviorKind::Follow => BehaviorInstance::Follow(Follower::new(base)),
            BehaviorKind::Draggable => BehaviorInstance::Draggable(Draggable::new(base)),
            BehaviorKind::AnimatedSprite => {
                BehaviorInstance::AnimatedSprite(AnimatedSprite::new(base))
            }
        }
    }
}

impl std::fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A live behavior of any kind.
///
/// Derefs to `dyn Behavior` for the shared contract; the `as_*` accessors
/// reach a kind's own API for sibling calls.
pub enum BehaviorInstance {
    Platform(PlatformCharacter),
    TopDown(TopDownMovement),
    Health(Health),
    Patrol(Patrol),
    Follow(Follower),
    Draggable(Draggable),
    AnimatedSprite(AnimatedSprite),
}

impl Deref for BehaviorInstance {
    type Target = dyn Behavior;

    fn deref(&self) -> &Self::Target {
        match self {
            BehaviorInstance::Platform(b) => b,
            BehaviorInstance::TopDown(b) => b,
            BehaviorInstance::Health(b) => b,
            BehaviorInstance::Patrol(b) => b,
            BehaviorInstance::Follow(b) => b,
            BehaviorInstance::Draggable(b) => b,
            BehaviorInstance::AnimatedSprite(b) => b,
        }
    }
}

impl DerefMut for BehaviorInstance {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            BehaviorInstance::Platform(b) => b,
            BehaviorInstance::TopDown(b) => b,
            BehaviorInstance::Health(b) => b,
            BehaviorInstance::Patrol(b) => b,
            BehaviorInstance::Follow(b) => b,
            BehaviorInstance::Draggable(b) => b,
            BehaviorInstance::AnimatedSprite(b) => b,
        }
    }
}

impl BehaviorInstance {
    pub fn as_platform(&self) -> Option<&PlatformCharacter> {
        match self {
            BehaviorInstance::Platform(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_platform_mut(&mut self) -> Option<&mut PlatformCharacter> {
        match self {
            BehaviorInstance::Platform(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_health(&self) -> Option<&Health> {
        match self {
            BehaviorInstance::Health(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_health_mut(&mut self) -> Option<&mut Health> {
        match self {
            BehaviorInstance::Health(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_patrol(&self) -> Option<&Patrol> {
        match self {
            BehaviorInstance::Patrol(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_patrol_mut(&mut self) -> Option<&mut Patrol> {
        match self {
            BehaviorInstance::Patrol(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_follow(&self) -> Option<&Follower> {
        match self {
            BehaviorInstance::Follow(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_draggable_mut(&mut self) -> Option<&mut Draggable> {
        match self {
            BehaviorInstance::Draggable(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_draggable(&self) -> Option<&Draggable> {
        match self {
            BehaviorInstance::Draggable(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_animated_sprite(&self) -> Option<&AnimatedSprite> {
        match self {
            BehaviorInstance::AnimatedSprite(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_animated_sprite_mut(&mut self) -> Option<&mut AnimatedSprite> {
        match self {
            BehaviorInstance::AnimatedSprite(b) => Some(b),
            _ => None,
        }
    }
}
