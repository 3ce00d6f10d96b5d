//! Encounter balance simulator for Monte Carlo analysis.
//!
//! Plays many seeded runs through the real [`Encounter`](crate::core::Encounter)
//! with a scripted autopilot to analyze:
//! - Time to clear each stage
//! - Which hazards land hits and how often the magnet grabs
//! - Where runs die as stages scale up
//!
//! Nothing here reimplements game rules, so results track real gameplay.

mod autopilot;
mod config;
mod report;
mod runner;
mod stats;

pub use autopilot::Autopilot;
pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, simulate_single_run};
pub use stats::RunStats;
