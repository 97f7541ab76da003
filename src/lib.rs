//! Plutoplay library.
//!
//! Entity-behavior runtime for a 2D game builder: the behavior contract,
//! registry and manager, the built-in behaviors, the sprite animation engine
//! and a headless reference play loop. Exposed as a library for the CLI and
//! for integration tests.

pub mod animation;
pub mod behaviors;
pub mod components;
pub mod events;
pub mod game;
pub mod level;
pub mod resources;
pub mod systems;
