//! Messages exchanged between the host systems and the simulation driver.
//!
//! The behavior manager lives outside the ECS world, so systems cannot call
//! into it. They write messages instead, and the driver drains them after
//! the schedule has run and forwards them to the manager.
//!
//! Submodules:
//! - [`collision`] – contacts between a moving object and solid geometry
//! - [`session`] – pickups, hazards and win conditions of the reference loop
pub mod collision;
pub mod session;
