//! Hazard variants and their shared phase timeline.

use crate::core::combat::GrabTarget;
use crate::core::config::PhaseDurations;
use crate::core::constants::Millis;
use crate::core::events::DamageSource;
use crate::core::geometry::Hitbox;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    LaserStrike,
    Magnet,
}

impl HazardKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LaserStrike => "LaserStrike",
            Self::Magnet => "Magnet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardPhase {
    Telegraph,
    Active,
    Recover,
    Done,
}

/// When a hazard started and how long each of its windows lasts.
///
/// The phase is a pure function of `now - start_time`; nothing mutates it
/// from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardTimeline {
    pub start_time: Millis,
    pub durations: PhaseDurations,
}

impl HazardTimeline {
    pub fn phase_at(&self, now: Millis) -> HazardPhase {
        let elapsed = now.saturating_sub(self.start_time);
        let active_start = self.durations.telegraph_ms;
        let recover_start = active_start + self.durations.active_ms;
        let end = recover_start + self.durations.recover_ms;

        if elapsed < active_start {
            HazardPhase::Telegraph
        } else if elapsed < recover_start {
            HazardPhase::Active
        } else if elapsed < end {
            HazardPhase::Recover
        } else {
            HazardPhase::Done
        }
    }

    /// Half-open `[start, end)` window during which the hazard is harmful.
    pub fn active_window(&self) -> (Millis, Millis) {
        let start = self.start_time + self.durations.telegraph_ms;
        (start, start + self.durations.active_ms)
    }
}

/// Full-height vertical beam. Damages at most once.
#[derive(Debug, Clone)]
pub struct LaserStrike {
    pub(super) id: u32,
    pub(super) x: f64,
    pub(super) timeline: HazardTimeline,
    pub(super) width: f64,
    pub(super) world_height: f64,
    pub(super) damage: u32,
    pub(super) phase: HazardPhase,
    /// Set only once the target accepted the damage.
    pub(super) has_hit: bool,
}

impl LaserStrike {
    fn hitbox(&self) -> Option<Hitbox> {
        (self.phase == HazardPhase::Active)
            .then(|| Hitbox::new(self.x - self.width / 2.0, 0.0, self.width, self.world_height))
    }

    fn apply_to_target(&mut self, target: &mut impl GrabTarget, now: Millis) {
        if self.has_hit {
            return;
        }
        let Some(hitbox) = self.hitbox() else {
            return;
        };
        if !hitbox.intersects(&target.hitbox()) {
            return;
        }
        if target.apply_damage(self.damage, DamageSource::LaserStrike, now) {
            self.has_hit = true;
        }
    }
}

/// Field above the ground that grabs whoever stands in it when it switches
/// on. One grab attempt per instance.
#[derive(Debug, Clone)]
pub struct Magnet {
    pub(super) id: u32,
    pub(super) x: f64,
    pub(super) ground_y: f64,
    pub(super) timeline: HazardTimeline,
    pub(super) width: f64,
    pub(super) field_height: f64,
    pub(super) phase: HazardPhase,
    /// Armed on the tick the phase turns Active, consumed by the next
    /// target check.
    pub(super) grab_check_pending: bool,
}

impl Magnet {
    fn hitbox(&self) -> Option<Hitbox> {
        (self.phase == HazardPhase::Active).then(|| {
            Hitbox::new(
                self.x - self.width / 2.0,
                self.ground_y - self.field_height,
                self.width,
                self.field_height,
            )
        })
    }

    fn apply_to_target(&mut self, target: &mut impl GrabTarget, now: Millis) {
        if !self.grab_check_pending {
            return;
        }
        let Some(hitbox) = self.hitbox() else {
            return;
        };
        self.grab_check_pending = false;
        if !hitbox.intersects(&target.hitbox()) {
            return;
        }
        target.apply_magnet_grab(DamageSource::Magnet, now);
    }
}

/// A time-boxed area effect spawned by the boss.
#[derive(Debug, Clone)]
pub enum Hazard {
    LaserStrike(LaserStrike),
    Magnet(Magnet),
}

impl Hazard {
    /// Recompute the phase from `now`.
    pub fn update(&mut self, now: Millis) {
        match self {
            Hazard::LaserStrike(laser) => laser.phase = laser.timeline.phase_at(now),
            Hazard::Magnet(magnet) => {
                let next = magnet.timeline.phase_at(now);
                if next == HazardPhase::Active && magnet.phase != HazardPhase::Active {
                    magnet.grab_check_pending = true;
                }
                magnet.phase = next;
            }
        }
    }

    pub fn apply_to_target(&mut self, target: &mut impl GrabTarget, now: Millis) {
        match self {
            Hazard::LaserStrike(laser) => laser.apply_to_target(target, now),
            Hazard::Magnet(magnet) => magnet.apply_to_target(target, now),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase() == HazardPhase::Done
    }

    /// Present only while Active.
    pub fn hitbox(&self) -> Option<Hitbox> {
        match self {
            Hazard::LaserStrike(laser) => laser.hitbox(),
            Hazard::Magnet(magnet) => magnet.hitbox(),
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Hazard::LaserStrike(laser) => laser.id,
            Hazard::Magnet(magnet) => magnet.id,
        }
    }

    pub fn kind(&self) -> HazardKind {
        match self {
            Hazard::LaserStrike(_) => HazardKind::LaserStrike,
            Hazard::Magnet(_) => HazardKind::Magnet,
        }
    }

    pub fn phase(&self) -> HazardPhase {
        match self {
            Hazard::LaserStrike(laser) => laser.phase,
            Hazard::Magnet(magnet) => magnet.phase,
        }
    }

    pub fn x(&self) -> f64 {
        match self {
            Hazard::LaserStrike(laser) => laser.x,
            Hazard::Magnet(magnet) => magnet.x,
        }
    }

    /// Horizontal half-extent of the area the hazard will cover.
    pub fn half_width(&self) -> f64 {
        match self {
            Hazard::LaserStrike(laser) => laser.width / 2.0,
            Hazard::Magnet(magnet) => magnet.width / 2.0,
        }
    }

    pub fn timeline(&self) -> HazardTimeline {
        match self {
            Hazard::LaserStrike(laser) => laser.timeline,
            Hazard::Magnet(magnet) => magnet.timeline,
        }
    }

    pub fn snapshot(&self) -> HazardSnapshot {
        HazardSnapshot {
            id: self.id(),
            kind: self.kind(),
            phase: self.phase(),
            x: self.x(),
            half_width: self.half_width(),
            hitbox: self.hitbox(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardSnapshot {
    pub id: u32,
    pub kind: HazardKind,
    pub phase: HazardPhase,
    pub x: f64,
    pub half_width: f64,
    pub hitbox: Option<Hitbox>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::combat::stub::StubTarget;

    fn timeline(start_time: Millis) -> HazardTimeline {
        HazardTimeline {
            start_time,
            durations: PhaseDurations {
                telegraph_ms: 100,
                active_ms: 50,
                recover_ms: 30,
            },
        }
    }

    fn laser_at(x: f64, start_time: Millis) -> Hazard {
        Hazard::LaserStrike(LaserStrike {
            id: 1,
            x,
            timeline: timeline(start_time),
            width: 12.0,
            world_height: 180.0,
            damage: 1,
            phase: HazardPhase::Telegraph,
            has_hit: false,
        })
    }

    fn magnet_at(x: f64, start_time: Millis) -> Hazard {
        Hazard::Magnet(Magnet {
            id: 2,
            x,
            ground_y: 100.0,
            timeline: timeline(start_time),
            width: 40.0,
            field_height: 96.0,
            phase: HazardPhase::Telegraph,
            grab_check_pending: false,
        })
    }

    fn player_box(x: f64) -> Hitbox {
        Hitbox::from_bottom_center(x, 100.0, 22.0, 34.0)
    }

    #[test]
    fn test_phase_boundaries() {
        let t = timeline(1000);
        assert_eq!(t.phase_at(0), HazardPhase::Telegraph);
        assert_eq!(t.phase_at(1099), HazardPhase::Telegraph);
        assert_eq!(t.phase_at(1100), HazardPhase::Active);
        assert_eq!(t.phase_at(1149), HazardPhase::Active);
        assert_eq!(t.phase_at(1150), HazardPhase::Recover);
        assert_eq!(t.phase_at(1179), HazardPhase::Recover);
        assert_eq!(t.phase_at(1180), HazardPhase::Done);
        assert_eq!(t.active_window(), (1100, 1150));
    }

    #[test]
    fn test_hitbox_only_while_active() {
        let mut laser = laser_at(50.0, 0);
        laser.update(10);
        assert!(laser.hitbox().is_none());
        laser.update(120);
        assert_eq!(laser.hitbox(), Some(Hitbox::new(44.0, 0.0, 12.0, 180.0)));
        laser.update(160);
        assert!(laser.hitbox().is_none());
        laser.update(500);
        assert!(laser.is_finished());
    }

    #[test]
    fn test_laser_hits_once() {
        let mut laser = laser_at(160.0, 0);
        let mut target = StubTarget::at(player_box(160.0));
        for now in (100..150).step_by(5) {
            laser.update(now);
            laser.apply_to_target(&mut target, now);
        }
        assert_eq!(target.damage_calls, vec![(1, DamageSource::LaserStrike, 100)]);
    }

    #[test]
    fn test_refused_laser_damage_can_retry() {
        let mut laser = laser_at(160.0, 0);
        let mut target = StubTarget::at(player_box(160.0));
        target.accept = false;
        laser.update(100);
        laser.apply_to_target(&mut target, 100);
        target.accept = true;
        laser.update(110);
        laser.apply_to_target(&mut target, 110);
        laser.update(120);
        laser.apply_to_target(&mut target, 120);
        assert_eq!(target.damage_calls.len(), 2);
    }

    #[test]
    fn test_laser_misses_distant_target() {
        let mut laser = laser_at(40.0, 0);
        let mut target = StubTarget::at(player_box(160.0));
        laser.update(120);
        laser.apply_to_target(&mut target, 120);
        assert!(target.damage_calls.is_empty());
    }

    #[test]
    fn test_magnet_grabs_on_first_active_tick_only() {
        let mut magnet = magnet_at(160.0, 0);
        let mut target = StubTarget::at(player_box(160.0));
        for now in [90, 105, 110, 120, 140] {
            magnet.update(now);
            magnet.apply_to_target(&mut target, now);
        }
        assert_eq!(target.grab_calls, vec![(DamageSource::Magnet, 105)]);
        assert!(target.damage_calls.is_empty());
    }

    #[test]
    fn test_magnet_miss_is_not_retried() {
        let mut magnet = magnet_at(160.0, 0);
        let mut target = StubTarget::at(player_box(20.0));
        magnet.update(100);
        magnet.apply_to_target(&mut target, 100);
        // Walking into the field later does nothing.
        target.hitbox = player_box(160.0);
        magnet.update(120);
        magnet.apply_to_target(&mut target, 120);
        assert!(target.grab_calls.is_empty());
    }

    #[test]
    fn test_magnet_skipping_active_never_grabs() {
        let mut magnet = magnet_at(160.0, 0);
        let mut target = StubTarget::at(player_box(160.0));
        magnet.update(50);
        magnet.update(170);
        magnet.apply_to_target(&mut target, 170);
        assert!(target.grab_calls.is_empty());
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut magnet = magnet_at(80.0, 0);
        magnet.update(120);
        let snapshot = magnet.snapshot();
        assert_eq!(snapshot.kind, HazardKind::Magnet);
        assert_eq!(snapshot.phase, HazardPhase::Active);
        assert_eq!(snapshot.hitbox, Some(Hitbox::new(60.0, 4.0, 40.0, 96.0)));
        assert!((snapshot.half_width - 20.0).abs() < f64::EPSILON);
    }
}
