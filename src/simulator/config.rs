//! Simulation configuration.

use crate::core::config::EncounterConfig;
use crate::core::constants::Millis;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Simulated time per run before timeout
    pub max_time_ms: Millis,

    /// Nominal frame length
    pub frame_ms: Millis,

    /// Each frame is `frame_ms` plus or minus up to this much
    pub frame_jitter_ms: Millis,

    /// Stage the first encounter starts at
    pub starting_stage: u32,

    /// A run succeeds once this stage is cleared
    pub target_stage: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,

    /// Tuning tables for every encounter
    pub tuning: EncounterConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 200,
            seed: None,
            max_time_ms: 10 * 60 * 1000,
            frame_ms: 16,
            frame_jitter_ms: 0,
            starting_stage: 1,
            target_stage: 3,
            verbosity: 1,
            tuning: EncounterConfig::standard(),
        }
    }
}

impl SimConfig {
    /// Quick config for checking one stage's balance
    pub fn stage_balance_test(stage: u32) -> Self {
        Self {
            num_runs: 50,
            starting_stage: stage,
            target_stage: stage,
            max_time_ms: 3 * 60 * 1000,
            ..Default::default()
        }
    }

    /// Long gauntlet through many stages
    pub fn gauntlet(target_stage: u32) -> Self {
        Self {
            num_runs: 25,
            target_stage,
            max_time_ms: 30 * 60 * 1000,
            ..Default::default()
        }
    }

    /// Uneven frame lengths to shake out timing bugs
    pub fn jittery_frames() -> Self {
        Self {
            num_runs: 100,
            frame_ms: 20,
            frame_jitter_ms: 12,
            ..Default::default()
        }
    }

    /// Frame length for this tick, never zero.
    pub fn frame_delta(&self, roll: Millis) -> Millis {
        if self.frame_jitter_ms == 0 {
            return self.frame_ms.max(1);
        }
        let span = self.frame_jitter_ms * 2;
        (self.frame_ms + roll % (span + 1))
            .saturating_sub(self.frame_jitter_ms)
            .max(1)
    }
}
