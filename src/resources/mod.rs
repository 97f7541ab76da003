//! ECS resources: the simulation-state bag shared by behaviors and systems.
//!
//! Behaviors receive the [`World`](bevy_ecs::world::World) on every hook and
//! read what they need from here. Each submodule documents the semantics and
//! intended usage of its resource(s).
//!
//! Overview
//! - `followtarget` – the position follow-type behaviors chase this tick
//! - `gameconfig` – simulation constants loaded from an INI file
//! - `input` – held key names and pointer state for the current tick
//! - `session` – score and outcome of the running play session
//! - `spritehandles` – renderer-owned sprite handles keyed by entity
//! - `texturestore` – sheet textures with a tri-state load lifecycle
//! - `worldtime` – simulation time and delta
pub mod followtarget;
pub mod gameconfig;
pub mod input;
pub mod session;
pub mod spritehandles;
pub mod texturestore;
pub mod worldtime;
