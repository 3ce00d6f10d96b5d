//! Main simulation runner driving real encounters.
//!
//! Each run plays [`Encounter`] ticks with the [`Autopilot`] at the controls.
//! Statistics are tracked externally from [`TickOutcome`](crate::core::encounter::TickOutcome)
//! events.

use super::autopilot::Autopilot;
use super::config::SimConfig;
use super::report::SimReport;
use super::stats::{RunStats, StatsTracker};
use crate::core::encounter::Encounter;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + run_idx as u64),
            None => ChaCha8Rng::from_entropy(),
        };

        let run_stats = simulate_single_run(config, &mut rng);

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Stage {}, Cleared {}, Died {}, Time {:.1}s, Hits taken {}",
                run_idx + 1,
                config.num_runs,
                run_stats.final_stage,
                run_stats.stages_cleared,
                run_stats.died,
                run_stats.total_time_ms as f64 / 1000.0,
                run_stats.total_damage_taken()
            );
        }
        all_runs.push(run_stats);
    }

    SimReport::from_runs(all_runs, config.target_stage, config.max_time_ms)
}

/// Play one run until death, the target stage, or the time cap.
pub fn simulate_single_run<R: Rng>(config: &SimConfig, rng: &mut R) -> RunStats {
    let mut encounter = Encounter::new(config.tuning, config.starting_stage, 0);
    let mut autopilot = Autopilot::new(&config.tuning);
    let mut tracker = StatsTracker::new(config.starting_stage);
    let target = config.target_stage.max(encounter.stage().stage_index);
    let mut now = 0;

    loop {
        if tracker.died() {
            return tracker.finish(false, false);
        }
        if tracker.last_cleared() >= target {
            return tracker.finish(true, false);
        }
        if now >= config.max_time_ms {
            return tracker.finish(false, true);
        }

        let roll = if config.frame_jitter_ms > 0 {
            rng.gen()
        } else {
            0
        };
        let delta = config.frame_delta(roll);
        now += delta;

        let input = autopilot.next_input(&encounter.snapshot());
        let outcome = encounter.tick(input, now, delta, rng);
        tracker.process_tick(&outcome, now);
    }
}
