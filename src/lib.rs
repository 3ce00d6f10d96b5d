//! Showdown - Boss Encounter Combat Core
//!
//! A player actor and a boss actor, each an explicit state machine,
//! interacting through time-windowed hazards and bullet collisions. The crate
//! decides per tick what state every actor is in and when the encounter ends;
//! drawing it is left to the caller, which reads [`core::EncounterSnapshot`]s.

pub mod boss;
pub mod core;
pub mod hazards;
pub mod input;
pub mod player;
pub mod projectiles;
pub mod simulator;
