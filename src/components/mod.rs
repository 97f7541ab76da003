//! ECS components for entities in the simulated scene.
//!
//! Entities live in a [`bevy_ecs::world::World`]; behaviors hold an
//! [`Entity`](bevy_ecs::entity::Entity) handle and read or write these
//! components through the world passed into every hook.
//!
//! Submodules overview:
//! - [`adversary`] – host-driven patrolling hazard used by the reference loop
//! - [`boxcollider`] – axis-aligned rectangular bounds for overlap and pointer tests
//! - [`entityflags`] – free-form visual flags (facing, dragging, flashing) behaviors publish
//! - [`mapposition`] – world-space position and the previous tick's position
//! - [`objectid`] – editor identity used to key behaviors and save data
//! - [`objectkind`] – what an object is (platform, coin, ...) and the `Solid` marker
//! - [`pickup`] – coin and goal markers
//! - [`protagonist`] – marker and spawn point for the player-controlled entity

pub mod adversary;
pub mod boxcollider;
pub mod entityflags;
pub mod mapposition;
pub mod objectid;
pub mod objectkind;
pub mod pickup;
pub mod protagonist;
