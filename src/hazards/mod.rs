//! Boss-spawned area hazards.
//!
//! Each hazard walks a fixed Telegraph → Active → Recover → Done timeline
//! derived purely from elapsed time. Only the Active window can affect the
//! player: a laser strike damages at most once, a magnet attempts one grab
//! on the tick it switches on.

pub mod scheduler;
pub mod types;

pub use scheduler::HazardScheduler;
pub use types::*;
