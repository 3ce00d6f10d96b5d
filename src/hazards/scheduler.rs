//! Owns live hazards and advances them against the player.

use super::types::{
    Hazard, HazardKind, HazardPhase, HazardSnapshot, HazardTimeline, LaserStrike, Magnet,
};
use crate::core::combat::GrabTarget;
use crate::core::config::{LaserConfig, MagnetConfig, WorldConfig};
use crate::core::constants::Millis;
use crate::core::events::CombatEvent;

#[derive(Debug, Clone)]
pub struct HazardScheduler {
    hazards: Vec<Hazard>,
    next_id: u32,
    laser: LaserConfig,
    magnet: MagnetConfig,
    world_height: f64,
    ground_y: f64,
    events: Vec<CombatEvent>,
}

impl HazardScheduler {
    pub fn new(laser: LaserConfig, magnet: MagnetConfig, world: &WorldConfig) -> Self {
        Self {
            hazards: Vec::new(),
            next_id: 1,
            laser,
            magnet,
            world_height: world.height,
            ground_y: world.ground_y(),
            events: Vec::new(),
        }
    }

    /// Start a laser strike at `x`. Returns the new hazard's id.
    pub fn spawn_laser_strike(
        &mut self,
        x: f64,
        now: Millis,
        timing_scale: f64,
        telegraph_scale: f64,
    ) -> u32 {
        let id = self.allocate_id();
        let timeline = HazardTimeline {
            start_time: now,
            durations: self.laser.durations.scaled(timing_scale, telegraph_scale),
        };
        self.push(Hazard::LaserStrike(LaserStrike {
            id,
            x,
            timeline,
            width: self.laser.width,
            world_height: self.world_height,
            damage: self.laser.damage,
            phase: timeline.phase_at(now),
            has_hit: false,
        }));
        id
    }

    /// Start a magnet field at `x`. Returns the new hazard's id.
    pub fn spawn_magnet(
        &mut self,
        x: f64,
        now: Millis,
        timing_scale: f64,
        telegraph_scale: f64,
    ) -> u32 {
        let id = self.allocate_id();
        let timeline = HazardTimeline {
            start_time: now,
            durations: self.magnet.durations.scaled(timing_scale, telegraph_scale),
        };
        // Start from Telegraph so a zero-length telegraph still arms the grab
        // on the first update.
        self.push(Hazard::Magnet(Magnet {
            id,
            x,
            ground_y: self.ground_y,
            timeline,
            width: self.magnet.width,
            field_height: self.magnet.field_height,
            phase: HazardPhase::Telegraph,
            grab_check_pending: false,
        }));
        id
    }

    /// Advance every hazard to `now`, apply live ones to `target`, then drop
    /// the finished ones.
    pub fn update(&mut self, now: Millis, target: &mut impl GrabTarget) {
        for hazard in &mut self.hazards {
            hazard.update(now);
            if !hazard.is_finished() {
                hazard.apply_to_target(target, now);
            }
        }
        let before = self.hazards.len();
        self.hazards.retain(|hazard| !hazard.is_finished());
        let pruned = before - self.hazards.len();
        if pruned > 0 {
            tracing::debug!(pruned, live = self.hazards.len(), "hazards expired");
        }
    }

    /// Remove every hazard. Ids keep counting up.
    pub fn clear(&mut self) {
        self.hazards.clear();
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    pub fn snapshots(&self) -> Vec<HazardSnapshot> {
        self.hazards.iter().map(Hazard::snapshot).collect()
    }

    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn push(&mut self, hazard: Hazard) {
        let (id, kind, x) = (hazard.id(), hazard.kind(), hazard.x());
        tracing::debug!(id, kind = kind.name(), x, "hazard spawned");
        self.events.push(CombatEvent::HazardSpawned { id, kind, x });
        self.hazards.push(hazard);
    }

    /// Live hazards of `kind`.
    pub fn count_of(&self, kind: HazardKind) -> usize {
        self.hazards.iter().filter(|h| h.kind() == kind).count()
    }
}
