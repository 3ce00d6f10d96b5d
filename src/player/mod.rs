//! The player-controlled actor.
//!
//! Moves along the ground, shoots upward, dodge-rolls on a double tap, and
//! can be grabbed by a magnet into a lift-then-fall sequence.

pub mod logic;
pub mod types;

pub use types::*;
