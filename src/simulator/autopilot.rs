//! Scripted input policy used by the simulator.
//!
//! Keeps the trigger held, walks under the boss, and double-taps away from
//! any hazard whose column covers the player.

use crate::core::config::{EncounterConfig, WorldConfig};
use crate::core::encounter::EncounterSnapshot;
use crate::hazards::{HazardPhase, HazardSnapshot};
use crate::input::InputState;
use crate::player::PlayerState;
use std::collections::VecDeque;

/// Slack added around a hazard column before it counts as a threat.
const THREAT_MARGIN: f64 = 4.0;
/// Don't chase the boss closer than this.
const STEER_DEADZONE: f64 = 16.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    world: WorldConfig,
    player_half_width: f64,
    roll_distance: f64,
    /// Scripted inputs still to replay, one per tick.
    queued: VecDeque<InputState>,
}

impl Autopilot {
    pub fn new(config: &EncounterConfig) -> Self {
        Self {
            world: config.world,
            player_half_width: config.player.width / 2.0,
            roll_distance: config.player.move_speed * config.player.roll.duration_ms as f64
                / 1000.0,
            queued: VecDeque::new(),
        }
    }

    /// Input to hold for the next tick.
    pub fn next_input(&mut self, snapshot: &EncounterSnapshot) -> InputState {
        let mut input = match self.queued.pop_front() {
            Some(input) => input,
            None => self.decide(snapshot),
        };
        input.shoot = true;
        input
    }

    pub fn is_dodging(&self) -> bool {
        !self.queued.is_empty()
    }

    fn decide(&mut self, snapshot: &EncounterSnapshot) -> InputState {
        let player = &snapshot.player;

        if let Some(threat) = self.threat(snapshot) {
            let direction = self.escape_direction(player.x, threat);
            let grounded = matches!(
                player.state,
                PlayerState::Idle | PlayerState::Move | PlayerState::Shoot
            );
            if grounded && player.roll_cooldown_remaining == 0 {
                // Release, tap, release, release, tap.
                let tap = held(direction);
                self.queued
                    .extend([tap, InputState::NONE, InputState::NONE, tap]);
                return InputState::NONE;
            }
            return held(direction);
        }

        let dx = snapshot.boss.x - player.x;
        if dx.abs() > STEER_DEADZONE {
            held(if dx < 0.0 { -1 } else { 1 })
        } else {
            InputState::NONE
        }
    }

    /// First telegraphing or active hazard whose column reaches the player.
    fn threat<'a>(&self, snapshot: &'a EncounterSnapshot) -> Option<&'a HazardSnapshot> {
        let x = snapshot.player.x;
        snapshot.hazards.iter().find(|hazard| {
            let reach = hazard.half_width + self.player_half_width + THREAT_MARGIN;
            matches!(hazard.phase, HazardPhase::Telegraph | HazardPhase::Active)
                && (hazard.x - x).abs() <= reach
        })
    }

    /// Away from the hazard, unless a wall is in the way.
    fn escape_direction(&self, x: f64, threat: &HazardSnapshot) -> i8 {
        let preferred: i8 = if threat.x > x {
            -1
        } else if threat.x < x {
            1
        } else if x > self.world.width / 2.0 {
            -1
        } else {
            1
        };
        let landing = x + preferred as f64 * self.roll_distance;
        if landing < self.world.min_x() || landing > self.world.max_x() {
            -preferred
        } else {
            preferred
        }
    }
}

fn held(direction: i8) -> InputState {
    InputState {
        left: direction < 0,
        right: direction > 0,
        shoot: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encounter::Encounter;
    use crate::hazards::HazardKind;
    use crate::input::{DoubleTap, InputSnapshot};

    fn snapshot_with(hazards: Vec<HazardSnapshot>) -> EncounterSnapshot {
        let encounter = Encounter::new(EncounterConfig::default(), 1, 0);
        let mut snapshot = encounter.snapshot();
        snapshot.hazards = hazards;
        snapshot
    }

    fn laser(x: f64, phase: HazardPhase) -> HazardSnapshot {
        HazardSnapshot {
            id: 1,
            kind: HazardKind::LaserStrike,
            phase,
            x,
            half_width: 6.0,
            hitbox: None,
        }
    }

    #[test]
    fn test_always_shoots() {
        let mut pilot = Autopilot::new(&EncounterConfig::default());
        let input = pilot.next_input(&snapshot_with(Vec::new()));
        assert!(input.shoot);
    }

    #[test]
    fn test_steers_toward_boss() {
        let mut pilot = Autopilot::new(&EncounterConfig::default());
        let mut snapshot = snapshot_with(Vec::new());
        snapshot.boss.x = 40.0;
        let input = pilot.next_input(&snapshot);
        assert_eq!(input.move_direction(), -1);

        snapshot.boss.x = snapshot.player.x + 5.0;
        assert_eq!(pilot.next_input(&snapshot).move_direction(), 0);
    }

    #[test]
    fn test_ignores_distant_or_spent_hazards() {
        let mut pilot = Autopilot::new(&EncounterConfig::default());
        let snapshot = snapshot_with(vec![
            laser(20.0, HazardPhase::Telegraph),
            laser(160.0, HazardPhase::Recover),
        ]);
        pilot.next_input(&snapshot);
        assert!(!pilot.is_dodging());
    }

    #[test]
    fn test_dodge_script_is_a_double_tap() {
        let config = EncounterConfig::default();
        let mut pilot = Autopilot::new(&config);
        let snapshot = snapshot_with(vec![laser(170.0, HazardPhase::Telegraph)]);

        let mut edges = InputSnapshot::new();
        let mut taps = DoubleTap::new(&config.input);
        let mut rolled = None;
        for frame in 0..5u64 {
            let input = pilot.next_input(&snapshot);
            edges.update(input);
            let trigger = taps.resolve(&edges, frame * 16);
            if trigger.any() {
                rolled = trigger.direction();
            }
        }
        // Laser is to the right, so roll left.
        assert_eq!(rolled, Some(-1));
        assert!(!pilot.is_dodging());
    }

    #[test]
    fn test_escape_flips_at_wall() {
        let pilot = Autopilot::new(&EncounterConfig::default());
        let threat = laser(210.0, HazardPhase::Telegraph);
        assert_eq!(pilot.escape_direction(200.0, &threat), -1);
        let threat = laser(15.0, HazardPhase::Telegraph);
        // Preferred is right; plenty of room.
        assert_eq!(pilot.escape_direction(20.0, &threat), 1);
        let threat = laser(30.0, HazardPhase::Telegraph);
        // Preferred left would land past the wall.
        assert_eq!(pilot.escape_direction(25.0, &threat), 1);
    }
}
