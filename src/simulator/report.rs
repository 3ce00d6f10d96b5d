//! Simulation report generation.

use super::stats::RunStats;
use crate::core::constants::Millis;
use crate::core::events::DamageSource;
use std::collections::HashMap;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub num_runs: u32,
    pub target_stage: u32,
    pub runs_reached_target: u32,
    pub runs_died: u32,
    pub runs_timed_out: u32,
    pub max_time_ms: Millis,

    // Aggregated stats
    pub avg_stages_cleared: f64,
    pub avg_final_stage: f64,
    pub avg_time_ms: f64,
    pub avg_clear_time_ms: f64,

    // Combat
    pub avg_damage_taken: HashMap<DamageSource, f64>,
    pub avg_bullet_hits: f64,
    pub avg_grabs: f64,
    pub avg_rolls: f64,
    pub avg_hazards_spawned: f64,

    // Distribution data
    pub death_stage_distribution: HashMap<u32, u32>,

    // Individual run stats for detailed analysis
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, target_stage: u32, max_time_ms: Millis) -> Self {
        let num_runs = runs.len() as u32;
        let divisor = num_runs.max(1) as f64;
        let avg = |f: &dyn Fn(&RunStats) -> f64| runs.iter().map(f).sum::<f64>() / divisor;

        let runs_reached_target = runs.iter().filter(|r| r.reached_target).count() as u32;
        let runs_died = runs.iter().filter(|r| r.died).count() as u32;
        let runs_timed_out = runs.iter().filter(|r| r.timed_out).count() as u32;

        let avg_stages_cleared = avg(&|r| r.stages_cleared as f64);
        let avg_final_stage = avg(&|r| r.final_stage as f64);
        let avg_time_ms = avg(&|r| r.total_time_ms as f64);

        let clear_times: Vec<Millis> = runs
            .iter()
            .flat_map(|r| r.clear_times_ms.iter().copied())
            .collect();
        let avg_clear_time_ms = if clear_times.is_empty() {
            0.0
        } else {
            clear_times.iter().sum::<Millis>() as f64 / clear_times.len() as f64
        };

        let mut avg_damage_taken = HashMap::new();
        for source in DamageSource::ALL {
            let total: u32 = runs
                .iter()
                .map(|r| r.damage_taken.get(&source).copied().unwrap_or(0))
                .sum();
            if total > 0 {
                avg_damage_taken.insert(source, total as f64 / divisor);
            }
        }

        let mut death_stage_distribution = HashMap::new();
        for run in runs.iter().filter(|r| r.died) {
            *death_stage_distribution.entry(run.final_stage).or_insert(0) += 1;
        }

        Self {
            num_runs,
            target_stage,
            runs_reached_target,
            runs_died,
            runs_timed_out,
            max_time_ms,
            avg_stages_cleared,
            avg_final_stage,
            avg_time_ms,
            avg_clear_time_ms,
            avg_bullet_hits: avg(&|r| r.bullet_hits as f64),
            avg_grabs: avg(&|r| r.grabs as f64),
            avg_rolls: avg(&|r| r.rolls as f64),
            avg_hazards_spawned: avg(&|r| r.hazards_spawned as f64),
            avg_damage_taken,
            death_stage_distribution,
            run_stats: runs,
        }
    }

    pub fn completion_rate(&self) -> f64 {
        if self.num_runs == 0 {
            return 0.0;
        }
        (self.runs_reached_target as f64 / self.num_runs as f64) * 100.0
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("               (Autopilot vs Real Encounters)\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} reached stage {}, {} died, {} timed out\n\n",
            self.num_runs,
            self.runs_reached_target,
            self.target_stage,
            self.runs_died,
            self.runs_timed_out
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Stages Cleared:  {:.2}\n",
            self.avg_stages_cleared
        ));
        report.push_str(&format!(
            "  Avg Final Stage:     {:.2}\n",
            self.avg_final_stage
        ));
        report.push_str(&format!(
            "  Avg Run Time:        {:.1}s\n",
            self.avg_time_ms / 1000.0
        ));
        report.push_str(&format!(
            "  Avg Time per Clear:  {:.1}s\n\n",
            self.avg_clear_time_ms / 1000.0
        ));

        report.push_str("── COMBAT ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Bullet Hits:     {:.1}\n", self.avg_bullet_hits));
        report.push_str(&format!(
            "  Avg Hazards Spawned: {:.1}\n",
            self.avg_hazards_spawned
        ));
        report.push_str(&format!("  Avg Rolls:           {:.1}\n", self.avg_rolls));
        report.push_str(&format!("  Avg Grabs:           {:.2}\n\n", self.avg_grabs));

        report.push_str("── DAMAGE TAKEN (per run) ───────────────────────────────────────\n");
        for source in DamageSource::ALL {
            if let Some(amount) = self.avg_damage_taken.get(&source) {
                report.push_str(&format!("  {:<12} {:>6.2}\n", source.name(), amount));
            }
        }
        report.push('\n');

        if !self.death_stage_distribution.is_empty() {
            report.push_str("── DEATHS BY STAGE ──────────────────────────────────────────────\n");
            let mut stages: Vec<_> = self.death_stage_distribution.iter().collect();
            stages.sort();
            for (stage, count) in stages {
                let pct = (*count as f64 / self.num_runs as f64) * 100.0;
                let bar = "█".repeat((pct / 5.0) as usize);
                report.push_str(&format!("  Stage {:2}: {:>5.1}% {}\n", stage, pct, bar));
            }
            report.push('\n');
        }

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let completion_rate = self.completion_rate();
        let rating = if completion_rate > 90.0 {
            "TOO EASY - Autopilot rarely fails"
        } else if completion_rate > 50.0 {
            "GOOD - Challenging but fair"
        } else if completion_rate > 10.0 {
            "HARD - Most runs fail"
        } else {
            "TOO HARD - Almost nobody gets through"
        };
        report.push_str(&format!("  Completion Rate: {:.1}%\n", completion_rate));
        report.push_str(&format!("  Rating:          {}\n", rating));

        if self.runs_timed_out > self.num_runs / 2 {
            report.push_str(&format!(
                "  ⚠️  Most runs hit the {:.0}s cap - boss hp too high?\n",
                self.max_time_ms as f64 / 1000.0
            ));
        }
        if self.avg_grabs > 0.0 && self.avg_rolls < self.avg_grabs {
            report.push_str("  ⚠️  More grabs than rolls - magnet telegraph too short?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// Implement Serialize for JSON output
impl serde::Serialize for SimReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SimReport", 16)?;
        state.serialize_field("num_runs", &self.num_runs)?;
        state.serialize_field("target_stage", &self.target_stage)?;
        state.serialize_field("runs_reached_target", &self.runs_reached_target)?;
        state.serialize_field("runs_died", &self.runs_died)?;
        state.serialize_field("runs_timed_out", &self.runs_timed_out)?;
        state.serialize_field("max_time_ms", &self.max_time_ms)?;
        state.serialize_field("avg_stages_cleared", &self.avg_stages_cleared)?;
        state.serialize_field("avg_final_stage", &self.avg_final_stage)?;
        state.serialize_field("avg_time_ms", &self.avg_time_ms)?;
        state.serialize_field("avg_clear_time_ms", &self.avg_clear_time_ms)?;
        state.serialize_field("avg_damage_taken", &self.avg_damage_taken)?;
        state.serialize_field("avg_bullet_hits", &self.avg_bullet_hits)?;
        state.serialize_field("avg_grabs", &self.avg_grabs)?;
        state.serialize_field("avg_rolls", &self.avg_rolls)?;
        state.serialize_field("avg_hazards_spawned", &self.avg_hazards_spawned)?;
        state.serialize_field("completion_rate", &self.completion_rate())?;
        state.end()
    }
}
