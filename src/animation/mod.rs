//! Sprite-sheet animation engine.
//!
//! - [`sheet`] slices a sheet texture into a row-major list of frame rectangles
//! - [`definition`] declares named, timed frame sequences and validates them
//! - [`animator`] plays one definition at a time with drift-free frame timing
//! - [`transitions`] evaluates the declarative transition grammar used by
//!   the authoring preview
//! - [`export`] reads the authoring tool's exported animation set and narrows
//!   it to animated-sprite behavior config
//!
//! Transitions are evaluated on request only. Nothing in the runtime switches
//! animation state automatically; behaviors call
//! [`SpriteAnimator::set_animation`](animator::SpriteAnimator::set_animation)
//! explicitly.

pub mod animator;
pub mod definition;
pub mod export;
pub mod sheet;
pub mod transitions;
