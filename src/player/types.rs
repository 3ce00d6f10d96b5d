//! Player actor data structures.

use crate::core::config::{PlayerConfig, WorldConfig};
use crate::core::constants::Millis;
use crate::core::events::CombatEvent;
use serde::{Deserialize, Serialize};

/// Player finite-state machine. Exactly one variant is active; per-state
/// timing lives in the variant that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Move,
    Shoot,
    /// Dodge roll locked to `direction` (-1 or 1) until `ends_at`.
    Roll { direction: i8, ends_at: Millis },
    /// Stunned until `recover_at`.
    Hit { recover_at: Millis },
    /// Being pulled up by a magnet between `started_at` and `ends_at`.
    MagnetLifted {
        started_at: Millis,
        ends_at: Millis,
        start_y: f64,
        target_y: f64,
    },
    /// Dropping back to the ground. `damage_applied` guards the single
    /// landing hit.
    Falling { damage_applied: bool },
    Dead,
}

impl PlayerState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Move => "Move",
            Self::Shoot => "Shoot",
            Self::Roll { .. } => "Roll",
            Self::Hit { .. } => "Hit",
            Self::MagnetLifted { .. } => "MagnetLifted",
            Self::Falling { .. } => "Falling",
            Self::Dead => "Dead",
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, Self::Dead)
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self, Self::Roll { .. })
    }

    /// True while the magnet owns the player's vertical position.
    pub fn is_airborne(&self) -> bool {
        matches!(self, Self::MagnetLifted { .. } | Self::Falling { .. })
    }
}

/// Read-only view polled by presentation each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    pub hp: u32,
    pub max_hp: u32,
    pub invincible: bool,
    pub roll_cooldown_remaining: Millis,
    pub x: f64,
    pub y: f64,
}

/// The player-controlled actor.
///
/// Always starts `Idle` on the ground at full hp; the only way to change its
/// state afterwards is through [`Player::update`] and the damage/grab
/// contracts.
#[derive(Debug, Clone)]
pub struct Player {
    pub(super) config: PlayerConfig,
    pub(super) world: WorldConfig,
    pub(super) state: PlayerState,
    pub(super) state_entered_at: Millis,
    /// Horizontal centre.
    pub(super) x: f64,
    /// Feet.
    pub(super) y: f64,
    pub(super) ground_y: f64,
    pub(super) hp: u32,
    pub(super) invincible_until: Millis,
    pub(super) roll_cooldown_until: Millis,
    pub(super) events: Vec<CombatEvent>,
}

impl Player {
    /// Spawn at `x` (clamped into the play area), standing on the ground.
    pub fn new(config: PlayerConfig, world: WorldConfig, x: f64, now: Millis) -> Self {
        let ground_y = world.ground_y();
        Self {
            config,
            world,
            state: PlayerState::Idle,
            state_entered_at: now,
            x: world.clamp_x(x),
            y: ground_y,
            ground_y,
            hp: config.max_hp,
            invincible_until: 0,
            roll_cooldown_until: 0,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Milliseconds spent in the current state.
    pub fn state_duration(&self, now: Millis) -> Millis {
        now.saturating_sub(self.state_entered_at)
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.config.max_hp
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn ground_y(&self) -> f64 {
        self.ground_y
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn is_invincible(&self, now: Millis) -> bool {
        now < self.invincible_until
    }

    pub fn roll_cooldown_remaining(&self, now: Millis) -> Millis {
        self.roll_cooldown_until.saturating_sub(now)
    }

    /// Where bullets leave the player.
    pub fn shoot_origin(&self) -> (f64, f64) {
        (self.x, self.y - self.config.height + 2.0)
    }

    /// Firing is blocked while rolling, dead, or in the magnet sequence.
    pub fn can_shoot(&self) -> bool {
        !matches!(
            self.state,
            PlayerState::Roll { .. }
                | PlayerState::Dead
                | PlayerState::MagnetLifted { .. }
                | PlayerState::Falling { .. }
        )
    }

    pub fn snapshot(&self, now: Millis) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state,
            hp: self.hp,
            max_hp: self.config.max_hp,
            invincible: self.is_invincible(now),
            roll_cooldown_remaining: self.roll_cooldown_remaining(now),
            x: self.x,
            y: self.y,
        }
    }

    /// Drain notifications raised since the last call.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> Player {
        Player::new(PlayerConfig::default(), WorldConfig::default(), 160.0, 0)
    }

    #[test]
    fn test_new_player_defaults() {
        let player = spawn();
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.hp(), 5);
        assert_eq!(player.max_hp(), 5);
        assert!((player.y() - 100.0).abs() < f64::EPSILON);
        assert!(!player.is_invincible(0));
        assert_eq!(player.roll_cooldown_remaining(0), 0);
        assert!(player.can_shoot());
    }

    #[test]
    fn test_spawn_is_clamped_into_bounds() {
        let player = Player::new(PlayerConfig::default(), WorldConfig::default(), 1000.0, 0);
        assert!((player.x() - 308.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shoot_origin_is_near_head() {
        let player = spawn();
        let (x, y) = player.shoot_origin();
        assert!((x - 160.0).abs() < f64::EPSILON);
        assert!((y - 68.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(PlayerState::Idle.name(), "Idle");
        assert_eq!(
            PlayerState::Roll {
                direction: 1,
                ends_at: 0
            }
            .name(),
            "Roll"
        );
        assert_eq!(
            PlayerState::Falling {
                damage_applied: false
            }
            .name(),
            "Falling"
        );
        assert!(PlayerState::Falling {
            damage_applied: true
        }
        .is_airborne());
    }
}
