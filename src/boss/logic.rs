//! Boss state machine: phase resolution, attack cycle, enrage and crash.

use super::types::{Boss, BossPhase, BossState, PhaseTuning};
use crate::core::combat::DamageTarget;
use crate::core::config::scale_ms;
use crate::core::constants::Millis;
use crate::core::events::{Combatant, CombatEvent, DamageEvent, DamageSource};
use crate::core::geometry::Hitbox;
use crate::hazards::HazardScheduler;
use rand::Rng;

impl Boss {
    /// Advance one tick.
    ///
    /// `target_x` is where the player stands; attacks aim there. Hazards are
    /// spawned into `hazards`, which the caller updates afterwards.
    pub fn update<R: Rng>(
        &mut self,
        now: Millis,
        delta_ms: Millis,
        hazards: &mut HazardScheduler,
        target_x: f64,
        rng: &mut R,
    ) {
        if self.state == BossState::StageClear {
            return;
        }

        self.refresh_phase();

        let ratio = self.hp_ratio();
        if !self.enrage_triggered
            && ratio <= self.config.enrage_threshold
            && self.phase != BossPhase::Death
            && !self.state.is_crashing()
        {
            self.enrage_triggered = true;
            self.set_state(
                BossState::Enrage {
                    ends_at: now + self.config.enrage_ms,
                },
                now,
            );
            self.events.push(CombatEvent::BossEnraged { at: now });
            tracing::info!(now, hp = self.hp, "boss enraged");
        }

        if self.phase == BossPhase::Death {
            self.update_crash(now, delta_ms);
            return;
        }

        match self.state {
            BossState::SpawnIn => self.update_spawn_in(now),
            BossState::Patrol => {
                self.patrol(delta_ms);
                if now >= self.next_attack_at {
                    self.start_attack(now, hazards, target_x, rng);
                }
            }
            BossState::LaserTelegraph { ends_at } if now >= ends_at => {
                let active = self.scaled(self.attacks.laser.active_ms);
                self.set_state(BossState::LaserFire { ends_at: now + active }, now);
            }
            BossState::LaserFire { ends_at } if now >= ends_at => {
                let recover = self.scaled(self.attacks.laser.recover_ms);
                self.set_state(BossState::Recover { ends_at: now + recover }, now);
            }
            BossState::MagnetTelegraph { ends_at } if now >= ends_at => {
                let active = self.scaled(self.attacks.magnet.active_ms);
                self.set_state(BossState::MagnetLift { ends_at: now + active }, now);
            }
            BossState::MagnetLift { ends_at } if now >= ends_at => {
                let recover = self.scaled(self.attacks.magnet.recover_ms);
                self.set_state(BossState::MagnetDrop { ends_at: now + recover }, now);
            }
            BossState::MagnetDrop { ends_at } if now >= ends_at => {
                let recover = self.scaled(self.config.attack_recover_ms);
                self.set_state(BossState::Recover { ends_at: now + recover }, now);
            }
            BossState::Recover { ends_at } | BossState::Enrage { ends_at } if now >= ends_at => {
                self.return_to_patrol(now);
            }
            // Crash states only occur in the Death phase.
            _ => {}
        }

        self.update_hover();
    }

    /// Centred on the boss body.
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::from_center(
            self.x,
            self.y,
            self.config.hitbox_width,
            self.config.hitbox_height,
        )
    }

    /// Subtract `amount`, starting the crash when hp reaches zero. Refused for
    /// zero damage and once crashing.
    pub fn apply_damage(&mut self, amount: u32, source: DamageSource, now: Millis) -> bool {
        if amount == 0 || self.state.is_crashing() {
            return false;
        }

        self.hp = self.hp.saturating_sub(amount);
        self.events.push(CombatEvent::Damage(DamageEvent {
            amount,
            source,
            target: Combatant::Boss,
            x: self.x,
            y: self.y,
        }));
        tracing::debug!(now, hp = self.hp, source = source.name(), "boss damaged");

        if self.hp == 0 {
            self.start_crash(now);
        }
        true
    }

    /// Enter the one-way crash sequence. No-op if already in it.
    pub fn start_crash(&mut self, now: Millis) {
        if self.state.is_crashing() {
            return;
        }
        self.phase = BossPhase::Death;
        self.set_state(
            BossState::CrashStart {
                ends_at: now + self.config.crash_start_ms,
            },
            now,
        );
        self.events.push(CombatEvent::BossCrashStarted { at: now });
        tracing::info!(now, stage = self.stage.stage_index, "boss crash started");
    }

    /// Whether touching the boss currently hurts.
    pub fn deals_contact_damage(&self) -> bool {
        self.config.contact_damage > 0
            && !self.state.is_crashing()
            && self.state != BossState::SpawnIn
    }

    pub fn contact_damage(&self) -> u32 {
        self.config.contact_damage
    }

    // ── Phase ───────────────────────────────────────────────────────

    fn refresh_phase(&mut self) {
        let phase = if self.state.is_crashing() {
            BossPhase::Death
        } else {
            BossPhase::resolve(self.hp, self.hp_ratio(), &self.config)
        };
        if phase != self.phase {
            tracing::debug!(
                from = self.phase.name(),
                to = phase.name(),
                hp = self.hp,
                "boss phase"
            );
            self.phase = phase;
        }
        let base = match phase {
            BossPhase::P1 => self.config.p1,
            BossPhase::P2 => self.config.p2,
            BossPhase::P3 | BossPhase::Death => self.config.p3,
        };
        self.tuning = PhaseTuning::resolve(
            &base,
            &self.stage,
            self.config.min_weight,
            self.config.max_weight,
        );
    }

    fn scaled(&self, ms: Millis) -> Millis {
        scale_ms(ms, self.tuning.timing_scale)
    }

    // ── Movement ────────────────────────────────────────────────────

    fn update_spawn_in(&mut self, now: Millis) {
        let elapsed = self.state_duration(now);
        let duration = self.config.spawn_ms;
        let t = if duration > 0 {
            (elapsed as f64 / duration as f64).min(1.0)
        } else {
            1.0
        };
        self.y = self.config.spawn_start_y + (self.config.hover_y - self.config.spawn_start_y) * t;
        if elapsed >= duration {
            self.y = self.config.hover_y;
            self.return_to_patrol(now);
        }
    }

    /// Bounce between the play-area bounds.
    fn patrol(&mut self, delta_ms: Millis) {
        let step = self.tuning.move_speed * delta_ms as f64 / 1000.0;
        self.x += self.patrol_direction as f64 * step;
        if self.x <= self.world.min_x() {
            self.x = self.world.min_x();
            self.patrol_direction = 1;
        } else if self.x >= self.world.max_x() {
            self.x = self.world.max_x();
            self.patrol_direction = -1;
        }
    }

    fn update_hover(&mut self) {
        if !matches!(
            self.state,
            BossState::SpawnIn
                | BossState::CrashFall { .. }
                | BossState::CrashImpact { .. }
                | BossState::StageClear
        ) {
            self.y = self.config.hover_y;
        }
    }

    // ── Attacks ─────────────────────────────────────────────────────

    fn start_attack<R: Rng>(
        &mut self,
        now: Millis,
        hazards: &mut HazardScheduler,
        target_x: f64,
        rng: &mut R,
    ) {
        let tuning = self.tuning;
        let x = self.world.clamp_x(target_x);
        let total = tuning.laser_weight + tuning.magnet_weight;
        let use_laser = rng.gen::<f64>() * total < tuning.laser_weight;

        if use_laser {
            let telegraph_scale = self.stage.laser_telegraph_scale;
            hazards.spawn_laser_strike(x, now, tuning.timing_scale, telegraph_scale);
            let telegraph = scale_ms(
                self.attacks.laser.telegraph_ms,
                telegraph_scale * tuning.timing_scale,
            );
            self.set_state(BossState::LaserTelegraph { ends_at: now + telegraph }, now);
        } else {
            let telegraph_scale = self.stage.magnet_telegraph_scale;
            hazards.spawn_magnet(x, now, tuning.timing_scale, telegraph_scale);
            let telegraph = scale_ms(
                self.attacks.magnet.telegraph_ms,
                telegraph_scale * tuning.timing_scale,
            );
            self.set_state(BossState::MagnetTelegraph { ends_at: now + telegraph }, now);
        }
    }

    fn return_to_patrol(&mut self, now: Millis) {
        self.set_state(BossState::Patrol, now);
        self.next_attack_at = now + self.tuning.attack_interval_ms;
    }

    // ── Crash ───────────────────────────────────────────────────────

    fn update_crash(&mut self, now: Millis, delta_ms: Millis) {
        match self.state {
            BossState::CrashStart { ends_at } => {
                self.y = self.config.hover_y;
                if now >= ends_at {
                    let impact_y = self.world.ground_y() - self.config.crash_impact_offset;
                    self.set_state(BossState::CrashFall { impact_y }, now);
                }
            }
            BossState::CrashFall { impact_y } => {
                self.y += self.config.crash_fall_speed * delta_ms as f64 / 1000.0;
                if self.y >= impact_y {
                    self.y = impact_y;
                    self.set_state(
                        BossState::CrashImpact {
                            ends_at: now + self.config.crash_impact_ms,
                        },
                        now,
                    );
                }
            }
            BossState::CrashImpact { ends_at } if now >= ends_at => {
                self.set_state(BossState::StageClear, now);
                if !self.impact_reported {
                    self.impact_reported = true;
                    self.events.push(CombatEvent::BossCrashImpactDone { at: now });
                    tracing::info!(now, stage = self.stage.stage_index, "boss crash impact done");
                }
            }
            _ => {}
        }
    }

    pub(super) fn set_state(&mut self, next: BossState, now: Millis) {
        tracing::debug!(from = self.state.name(), to = next.name(), now, "boss state");
        self.state = next;
        self.state_entered_at = now;
    }
}

impl DamageTarget for Boss {
    fn hitbox(&self) -> Hitbox {
        Boss::hitbox(self)
    }

    fn apply_damage(&mut self, amount: u32, source: DamageSource, now: Millis) -> bool {
        Boss::apply_damage(self, amount, source, now)
    }
}
