//! Boss actor data structures.

use crate::core::config::{BossConfig, PhaseConfig, PhaseDurations, WorldConfig};
use crate::core::constants::Millis;
use crate::core::events::CombatEvent;
use crate::core::stage::StageProfile;
use serde::{Deserialize, Serialize};

/// Boss finite-state machine. Timed states carry the timestamp at which they
/// end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossState {
    /// Descending from above the screen to hover height.
    SpawnIn,
    Patrol,
    LaserTelegraph { ends_at: Millis },
    LaserFire { ends_at: Millis },
    MagnetTelegraph { ends_at: Millis },
    MagnetLift { ends_at: Millis },
    MagnetDrop { ends_at: Millis },
    Recover { ends_at: Millis },
    Enrage { ends_at: Millis },
    CrashStart { ends_at: Millis },
    /// Falling until `impact_y`.
    CrashFall { impact_y: f64 },
    CrashImpact { ends_at: Millis },
    StageClear,
}

impl BossState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SpawnIn => "SpawnIn",
            Self::Patrol => "Patrol",
            Self::LaserTelegraph { .. } => "LaserTelegraph",
            Self::LaserFire { .. } => "LaserFire",
            Self::MagnetTelegraph { .. } => "MagnetTelegraph",
            Self::MagnetLift { .. } => "MagnetLift",
            Self::MagnetDrop { .. } => "MagnetDrop",
            Self::Recover { .. } => "Recover",
            Self::Enrage { .. } => "Enrage",
            Self::CrashStart { .. } => "CrashStart",
            Self::CrashFall { .. } => "CrashFall",
            Self::CrashImpact { .. } => "CrashImpact",
            Self::StageClear => "StageClear",
        }
    }

    /// True from the moment hp hits zero. The boss neither takes damage nor
    /// attacks again.
    pub fn is_crashing(&self) -> bool {
        matches!(
            self,
            Self::CrashStart { .. }
                | Self::CrashFall { .. }
                | Self::CrashImpact { .. }
                | Self::StageClear
        )
    }

    pub fn is_attacking(&self) -> bool {
        matches!(
            self,
            Self::LaserTelegraph { .. }
                | Self::LaserFire { .. }
                | Self::MagnetTelegraph { .. }
                | Self::MagnetLift { .. }
                | Self::MagnetDrop { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    P1,
    P2,
    P3,
    Death,
}

impl BossPhase {
    /// Phase for `hp` given its ratio to the current stage max.
    pub fn resolve(hp: u32, ratio: f64, config: &BossConfig) -> Self {
        if hp == 0 || ratio <= 0.0 {
            BossPhase::Death
        } else if ratio >= config.p1.min_ratio {
            BossPhase::P1
        } else if ratio >= config.p2.min_ratio {
            BossPhase::P2
        } else {
            BossPhase::P3
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::Death => "Death",
        }
    }
}

/// Phase pacing after stage scaling. Weights always sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTuning {
    pub move_speed: f64,
    pub attack_interval_ms: Millis,
    pub laser_weight: f64,
    pub magnet_weight: f64,
    pub timing_scale: f64,
}

impl PhaseTuning {
    pub fn resolve(
        base: &PhaseConfig,
        stage: &StageProfile,
        min_weight: f64,
        max_weight: f64,
    ) -> Self {
        let (lo, hi) = (min_weight.min(max_weight), max_weight.max(min_weight));
        let magnet = (base.magnet_weight + stage.magnet_weight_bias).clamp(lo, hi);
        let laser = (base.laser_weight - stage.magnet_weight_bias).clamp(lo, hi);
        let (laser_weight, magnet_weight) = normalize_weights(laser, magnet);

        Self {
            move_speed: base.move_speed * stage.move_speed_scale,
            attack_interval_ms: (base.attack_interval_ms as f64 * stage.attack_interval_scale)
                .round()
                .max(0.0) as Millis,
            laser_weight,
            magnet_weight,
            timing_scale: base.timing_scale,
        }
    }
}

/// Scale two non-negative weights to sum to 1. An all-zero pair splits evenly.
pub fn normalize_weights(laser: f64, magnet: f64) -> (f64, f64) {
    let laser = laser.max(0.0);
    let magnet = magnet.max(0.0);
    let total = laser + magnet;
    if total <= 0.0 {
        return (0.5, 0.5);
    }
    (laser / total, magnet / total)
}

/// Hazard windows the attack sub-states mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackTimings {
    pub laser: PhaseDurations,
    pub magnet: PhaseDurations,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossSnapshot {
    pub state: BossState,
    pub hp: u32,
    pub max_hp: u32,
    pub phase: BossPhase,
    pub x: f64,
    pub y: f64,
}

/// The AI-controlled boss.
#[derive(Debug, Clone)]
pub struct Boss {
    pub(super) config: BossConfig,
    pub(super) world: WorldConfig,
    pub(super) attacks: AttackTimings,
    pub(super) stage: StageProfile,
    pub(crate) state: BossState,
    pub(super) state_entered_at: Millis,
    pub(super) phase: BossPhase,
    pub(super) tuning: PhaseTuning,
    /// Horizontal centre.
    pub(super) x: f64,
    /// Vertical centre.
    pub(super) y: f64,
    pub(super) hp: u32,
    pub(super) max_hp: u32,
    pub(super) patrol_direction: i8,
    pub(crate) next_attack_at: Millis,
    pub(super) enrage_triggered: bool,
    pub(super) impact_reported: bool,
    pub(super) events: Vec<CombatEvent>,
}

impl Boss {
    /// Spawn above the screen at `x` with full hp for `stage`.
    pub fn new(
        config: BossConfig,
        world: WorldConfig,
        attacks: AttackTimings,
        stage: StageProfile,
        x: f64,
        now: Millis,
    ) -> Self {
        let max_hp = stage.boss_max_hp.max(1);
        Self {
            config,
            world,
            attacks,
            stage,
            state: BossState::SpawnIn,
            state_entered_at: now,
            phase: BossPhase::P1,
            tuning: PhaseTuning::resolve(&config.p1, &stage, config.min_weight, config.max_weight),
            x: world.clamp_x(x),
            y: config.spawn_start_y,
            hp: max_hp,
            max_hp,
            patrol_direction: 1,
            next_attack_at: now,
            enrage_triggered: false,
            impact_reported: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> BossState {
        self.state
    }

    pub fn state_duration(&self, now: Millis) -> Millis {
        now.saturating_sub(self.state_entered_at)
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn tuning(&self) -> PhaseTuning {
        self.tuning
    }

    pub fn stage(&self) -> &StageProfile {
        &self.stage
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn hp_ratio(&self) -> f64 {
        self.hp as f64 / self.max_hp as f64
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn next_attack_at(&self) -> Millis {
        self.next_attack_at
    }

    pub fn enrage_triggered(&self) -> bool {
        self.enrage_triggered
    }

    pub fn is_crashing(&self) -> bool {
        self.state.is_crashing()
    }

    pub fn is_stage_clear(&self) -> bool {
        self.state == BossState::StageClear
    }

    pub fn snapshot(&self) -> BossSnapshot {
        BossSnapshot {
            state: self.state,
            hp: self.hp,
            max_hp: self.max_hp,
            phase: self.phase,
            x: self.x,
            y: self.y,
        }
    }

    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Cosmetic deformation strength for a given hp ratio, in `[0, 1]`.
pub fn deform_intensity(hp_ratio: f64) -> f64 {
    let base = (1.0 - hp_ratio).clamp(0.0, 1.0);
    let kick = if base >= 0.6 {
        0.25
    } else if base >= 0.3 {
        0.12
    } else {
        0.0
    };
    (base + kick).clamp(0.0, 1.0)
}
