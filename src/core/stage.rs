//! Stage-based difficulty scaling.
//!
//! Each stage after the first adds a fixed step to every knob; each knob is
//! clamped on its own, so any stage index yields an in-range profile.

use super::config::{EncounterConfig, StageTuning};
use super::constants::{Millis, BOSS_BASE_MAX_HP};
use serde::{Deserialize, Serialize};

/// Difficulty parameters for one stage. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageProfile {
    pub stage_index: u32,
    pub boss_max_hp: u32,
    /// In `[1, max_move_speed_scale]`.
    pub move_speed_scale: f64,
    /// In `[min_attack_interval_scale, 1]`.
    pub attack_interval_scale: f64,
    /// In `[min_telegraph_scale, 1]`.
    pub laser_telegraph_scale: f64,
    /// In `[min_telegraph_scale, 1]`.
    pub magnet_telegraph_scale: f64,
    /// In `[0, max_magnet_bias]`.
    pub magnet_weight_bias: f64,
    pub clear_delay_ms: Millis,
}

impl StageProfile {
    /// Build the profile for `stage_index`. Indices below 1 are treated as 1.
    pub fn for_stage(stage_index: u32, boss_base_max_hp: u32, tuning: &StageTuning) -> Self {
        let stage = stage_index.max(1);
        let step = (stage - 1) as f64;

        Self {
            stage_index: stage,
            boss_max_hp: boss_base_max_hp
                .saturating_add(tuning.hp_per_stage.saturating_mul(stage - 1)),
            move_speed_scale: (1.0 + tuning.move_speed_scale_step * step)
                .clamp(1.0, tuning.max_move_speed_scale.max(1.0)),
            attack_interval_scale: (1.0 + tuning.attack_interval_scale_step * step)
                .clamp(tuning.min_attack_interval_scale.min(1.0), 1.0),
            laser_telegraph_scale: (1.0 + tuning.laser_telegraph_scale_step * step)
                .clamp(tuning.min_telegraph_scale.min(1.0), 1.0),
            magnet_telegraph_scale: (1.0 + tuning.magnet_telegraph_scale_step * step)
                .clamp(tuning.min_telegraph_scale.min(1.0), 1.0),
            magnet_weight_bias: (tuning.magnet_weight_bias_step * step)
                .clamp(0.0, tuning.max_magnet_bias.max(0.0)),
            clear_delay_ms: tuning.clear_delay_ms,
        }
    }

    /// Profile for `stage_index` under an encounter's tuning.
    pub fn from_config(stage_index: u32, config: &EncounterConfig) -> Self {
        Self::for_stage(stage_index, config.boss.base_max_hp, &config.stages)
    }
}

/// Profile for `stage_index` under the default tuning.
pub fn stage_profile(stage_index: u32) -> StageProfile {
    StageProfile::for_stage(stage_index, BOSS_BASE_MAX_HP, &StageTuning::default())
}
