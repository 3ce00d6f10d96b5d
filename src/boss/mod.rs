//! The AI-controlled boss.
//!
//! Hp ratio picks a phase (P1/P2/P3), the stage profile scales its pacing,
//! and the state machine runs spawn-in, patrol, laser and magnet attack
//! cycles, a one-shot enrage and finally the crash sequence that clears the
//! stage.

pub mod logic;
pub mod types;

pub use types::*;
