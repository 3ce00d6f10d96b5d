//! Shared simulation core: tuning, geometry, events, contracts and the
//! encounter orchestrator.

pub mod combat;
pub mod config;
pub mod constants;
pub mod encounter;
pub mod events;
pub mod geometry;
pub mod stage;

pub use combat::{DamageTarget, GrabTarget};
pub use config::EncounterConfig;
pub use constants::Millis;
pub use encounter::{Encounter, EncounterSnapshot, FlowState, TickOutcome};
pub use events::{CombatEvent, Combatant, DamageEvent, DamageSource};
pub use geometry::Hitbox;
pub use stage::{stage_profile, StageProfile};
