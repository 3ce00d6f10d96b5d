//! Player state machine: per-tick update plus the damage and grab contracts.

use super::types::{Player, PlayerState};
use crate::core::combat::{DamageTarget, GrabTarget};
use crate::core::constants::Millis;
use crate::core::events::{Combatant, CombatEvent, DamageEvent, DamageSource};
use crate::core::geometry::Hitbox;
use crate::input::{InputState, RollTrigger};

impl Player {
    /// Advance one tick. Does nothing once dead.
    ///
    /// `input` is the held state, `roll` the double-tap requests resolved for
    /// this tick. `delta_ms` only drives motion; every timed transition
    /// compares `now` against absolute timestamps.
    pub fn update(&mut self, input: &InputState, roll: RollTrigger, now: Millis, delta_ms: Millis) {
        match self.state {
            PlayerState::Dead => return,
            PlayerState::MagnetLifted {
                started_at,
                ends_at,
                start_y,
                target_y,
            } => {
                self.update_magnet_lift(started_at, ends_at, start_y, target_y, now);
                return;
            }
            PlayerState::Falling { damage_applied } => {
                self.update_falling(damage_applied, now, delta_ms);
                return;
            }
            PlayerState::Roll { direction, ends_at } => {
                if now < ends_at {
                    self.move_by(direction, delta_ms);
                    return;
                }
                self.exit_to_neutral(input, now);
            }
            PlayerState::Hit { recover_at } => {
                if now < recover_at {
                    return;
                }
                self.exit_to_neutral(input, now);
            }
            PlayerState::Idle | PlayerState::Move | PlayerState::Shoot => {}
        }

        // A hit during the lift can leave the player above ground.
        if self.state.is_airborne() {
            return;
        }

        if let Some(direction) = roll.direction() {
            if now >= self.roll_cooldown_until {
                self.start_roll(direction, now);
                return;
            }
        }

        self.exit_to_neutral(input, now);
        let direction = input.move_direction();
        if direction != 0 {
            self.move_by(direction, delta_ms);
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::from_bottom_center(self.x, self.y, self.config.width, self.config.height)
    }

    /// Subtract `amount` unless dead or roll-invincible. Returns whether the
    /// hit landed.
    pub fn apply_damage(&mut self, amount: u32, source: DamageSource, now: Millis) -> bool {
        if self.state.is_dead() || self.is_invincible(now) {
            return false;
        }

        self.hp = self.hp.saturating_sub(amount);
        self.events.push(CombatEvent::Damage(DamageEvent {
            amount,
            source,
            target: Combatant::Player,
            x: self.x,
            y: self.y,
        }));

        if self.hp == 0 {
            self.set_state(PlayerState::Dead, now);
            self.events.push(CombatEvent::PlayerDied { at: now });
            tracing::info!(now, source = source.name(), "player died");
            return true;
        }

        self.set_state(
            PlayerState::Hit {
                recover_at: now + self.config.hit_stun_ms,
            },
            now,
        );
        true
    }

    /// Start the lift-then-fall sequence. Refused while dead, rolling, or
    /// already in the magnet sequence.
    pub fn apply_magnet_grab(&mut self, source: DamageSource, now: Millis) -> bool {
        if matches!(
            self.state,
            PlayerState::Dead
                | PlayerState::Roll { .. }
                | PlayerState::MagnetLifted { .. }
                | PlayerState::Falling { .. }
        ) {
            return false;
        }

        self.set_state(
            PlayerState::MagnetLifted {
                started_at: now,
                ends_at: now + self.config.magnet.lift_ms,
                start_y: self.y,
                target_y: self.ground_y - self.config.magnet.lift_height,
            },
            now,
        );
        self.events
            .push(CombatEvent::PlayerGrabbed { source, at: now });
        true
    }

    fn start_roll(&mut self, direction: i8, now: Millis) {
        let roll = self.config.roll;
        self.set_state(
            PlayerState::Roll {
                direction,
                ends_at: now + roll.duration_ms,
            },
            now,
        );
        self.invincible_until = now + roll.invincible_ms;
        self.roll_cooldown_until = now + roll.cooldown_ms;
        self.events
            .push(CombatEvent::PlayerRolled { direction, at: now });
    }

    /// Pick Shoot / Move / Idle from held input.
    fn exit_to_neutral(&mut self, input: &InputState, now: Millis) {
        if self.y < self.ground_y {
            self.set_state(
                PlayerState::Falling {
                    damage_applied: true,
                },
                now,
            );
            return;
        }

        let next = if input.shoot {
            PlayerState::Shoot
        } else if input.move_direction() != 0 {
            PlayerState::Move
        } else {
            PlayerState::Idle
        };
        self.set_state(next, now);
    }

    fn move_by(&mut self, direction: i8, delta_ms: Millis) {
        let distance = self.config.move_speed * delta_ms as f64 / 1000.0;
        self.x = self.world.clamp_x(self.x + direction as f64 * distance);
    }

    fn update_magnet_lift(
        &mut self,
        started_at: Millis,
        ends_at: Millis,
        start_y: f64,
        target_y: f64,
        now: Millis,
    ) {
        let duration = ends_at.saturating_sub(started_at);
        let t = if duration > 0 {
            (now.saturating_sub(started_at) as f64 / duration as f64).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.y = start_y + (target_y - start_y) * t;

        if now >= ends_at {
            self.set_state(
                PlayerState::Falling {
                    damage_applied: false,
                },
                now,
            );
        }
    }

    fn update_falling(&mut self, damage_applied: bool, now: Millis, delta_ms: Millis) {
        let next_y = self.y + self.config.magnet.fall_speed * delta_ms as f64 / 1000.0;
        if next_y < self.ground_y {
            self.y = next_y;
            return;
        }

        self.y = self.ground_y;
        if !damage_applied {
            self.state = PlayerState::Falling {
                damage_applied: true,
            };
            self.apply_damage(self.config.magnet.fall_damage, DamageSource::MagnetDrop, now);
        }

        // Still falling means the landing hit was refused.
        if matches!(self.state, PlayerState::Falling { .. }) {
            self.set_state(PlayerState::Idle, now);
        }
    }

    pub(super) fn set_state(&mut self, next: PlayerState, now: Millis) {
        if self.state == next {
            return;
        }
        tracing::debug!(from = self.state.name(), to = next.name(), now, "player state");
        self.state = next;
        self.state_entered_at = now;
    }
}

impl DamageTarget for Player {
    fn hitbox(&self) -> Hitbox {
        Player::hitbox(self)
    }

    fn apply_damage(&mut self, amount: u32, source: DamageSource, now: Millis) -> bool {
        Player::apply_damage(self, amount, source, now)
    }
}

impl GrabTarget for Player {
    fn apply_magnet_grab(&mut self, source: DamageSource, now: Millis) -> bool {
        Player::apply_magnet_grab(self, source, now)
    }
}
