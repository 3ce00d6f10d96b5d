//! Per-run statistics.

use crate::core::constants::Millis;
use crate::core::encounter::TickOutcome;
use crate::core::events::{CombatEvent, Combatant, DamageSource};
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of one simulated run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub starting_stage: u32,
    /// Stage being played (or just cleared) when the run ended
    pub final_stage: u32,
    pub stages_cleared: u32,
    pub reached_target: bool,
    pub died: bool,
    pub timed_out: bool,
    pub total_time_ms: Millis,
    pub ticks: u64,
    /// Time from stage start to stage clear, per cleared stage
    pub clear_times_ms: Vec<Millis>,
    pub damage_taken: HashMap<DamageSource, u32>,
    pub damage_dealt: u32,
    pub bullet_hits: u32,
    pub grabs: u32,
    pub rolls: u32,
    pub hazards_spawned: u32,
    pub enrages: u32,
}

impl RunStats {
    pub fn total_damage_taken(&self) -> u32 {
        self.damage_taken.values().sum()
    }
}

/// Accumulates [`RunStats`] from tick outcomes.
#[derive(Debug, Clone)]
pub(super) struct StatsTracker {
    stats: RunStats,
    stage_started_at: Millis,
    last_cleared: u32,
}

impl StatsTracker {
    pub(super) fn new(starting_stage: u32) -> Self {
        let stage = starting_stage.max(1);
        Self {
            stats: RunStats {
                starting_stage: stage,
                final_stage: stage,
                ..Default::default()
            },
            stage_started_at: 0,
            last_cleared: 0,
        }
    }

    pub(super) fn process_tick(&mut self, outcome: &TickOutcome, now: Millis) {
        let stats = &mut self.stats;
        stats.ticks += 1;
        stats.total_time_ms = now;
        stats.final_stage = outcome.stage;

        for event in &outcome.events {
            match event {
                CombatEvent::Damage(damage) => match damage.target {
                    Combatant::Player => {
                        *stats.damage_taken.entry(damage.source).or_insert(0) += damage.amount;
                    }
                    Combatant::Boss => {
                        stats.damage_dealt += damage.amount;
                        if damage.source == DamageSource::Bullet {
                            stats.bullet_hits += 1;
                        }
                    }
                },
                CombatEvent::PlayerGrabbed { .. } => stats.grabs += 1,
                CombatEvent::PlayerRolled { .. } => stats.rolls += 1,
                CombatEvent::HazardSpawned { .. } => stats.hazards_spawned += 1,
                CombatEvent::BossEnraged { .. } => stats.enrages += 1,
                CombatEvent::StageCleared { stage } => {
                    stats.stages_cleared += 1;
                    stats
                        .clear_times_ms
                        .push(now.saturating_sub(self.stage_started_at));
                    self.last_cleared = *stage;
                }
                CombatEvent::StageAdvanced { .. } => self.stage_started_at = now,
                CombatEvent::GameOver { .. } => stats.died = true,
                _ => {}
            }
        }
    }

    /// Highest stage cleared so far, 0 if none.
    pub(super) fn last_cleared(&self) -> u32 {
        self.last_cleared
    }

    pub(super) fn died(&self) -> bool {
        self.stats.died
    }

    pub(super) fn finish(mut self, reached_target: bool, timed_out: bool) -> RunStats {
        self.stats.reached_target = reached_target;
        self.stats.timed_out = timed_out;
        self.stats
    }
}
