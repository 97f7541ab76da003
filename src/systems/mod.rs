//! Reference host systems.
//!
//! These run the play loop around the behavior runtime. They detect things
//! and report them; behaviors decide what a contact means for their object.
//!
//! Submodules overview
//! - [`adversary`] – walk adversaries and respawn the protagonist on contact
//! - [`collision`] – previous-position snapshot and mover/solid contact detection
//! - [`pickup`] – coin collection and the shared proximity test
//! - [`session`] – goal, fall-out, follow target and the in-play run condition
//! - [`time`] – advance [`crate::resources::worldtime::WorldTime`]

pub mod adversary;
pub mod collision;
pub mod pickup;
pub mod session;
pub mod time;
