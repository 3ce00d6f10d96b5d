//! Outbound notifications raised by the simulation.
//!
//! Actors buffer these while they update; the encounter drains them once per
//! tick and hands them to the presentation layer in emission order. Nothing in
//! the core ever reads them back.

use super::constants::Millis;
use crate::hazards::HazardKind;
use serde::{Deserialize, Serialize};

/// What dealt (or attempted) an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    Bullet,
    LaserStrike,
    /// The grab itself. Never carries damage.
    Magnet,
    /// Landing after a magnet lift.
    MagnetDrop,
    BossContact,
}

impl DamageSource {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bullet => "Bullet",
            Self::LaserStrike => "LaserStrike",
            Self::Magnet => "Magnet",
            Self::MagnetDrop => "MagnetDrop",
            Self::BossContact => "BossContact",
        }
    }

    pub const ALL: [DamageSource; 5] = [
        Self::Bullet,
        Self::LaserStrike,
        Self::Magnet,
        Self::MagnetDrop,
        Self::BossContact,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Combatant {
    Player,
    Boss,
}

/// Emitted on every accepted damage application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub amount: u32,
    pub source: DamageSource,
    pub target: Combatant,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    // ── Actors ──────────────────────────────────────────────────
    Damage(DamageEvent),
    /// Player hp reached zero. Raised once per life.
    PlayerDied { at: Millis },
    /// A magnet grab was accepted and the lift began.
    PlayerGrabbed { source: DamageSource, at: Millis },
    PlayerRolled { direction: i8, at: Millis },
    BossEnraged { at: Millis },
    BossCrashStarted { at: Millis },
    /// Crash impact sub-state finished. Raised once per encounter.
    BossCrashImpactDone { at: Millis },

    // ── Hazards ─────────────────────────────────────────────────
    HazardSpawned { id: u32, kind: HazardKind, x: f64 },

    // ── Flow ────────────────────────────────────────────────────
    StageCleared { stage: u32 },
    StageAdvanced { stage: u32 },
    GameOver { stage: u32 },
    Retried,
}

impl CombatEvent {
    /// The damage payload, if this is a damage notification.
    pub fn as_damage(&self) -> Option<&DamageEvent> {
        match self {
            Self::Damage(event) => Some(event),
            _ => None,
        }
    }
}
