//! Pluggable per-entity behaviors.
//!
//! - [`behavior`]: the [`Behavior`](behavior::Behavior) trait, tick context
//!   and collision types
//! - [`config`]: config schemas and default merging
//! - [`kind`]: the closed set of kinds and the instance enum
//! - [`registry`]: the catalog shared by the editor and the runtime
//! - [`manager`]: live instances, the per-tick sweep and save/load records
//!
//! The concrete behaviors live in one module each.

pub mod animatedsprite;
pub mod behavior;
pub mod config;
pub mod draggable;
pub mod follow;
pub mod health;
pub mod kind;
pub mod manager;
pub mod patrol;
pub mod platform;
pub mod registry;
pub mod topdown;
