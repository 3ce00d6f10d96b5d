//! The per-tick orchestrator for one boss encounter.
//!
//! [`Encounter::tick`] advances input, player, boss, hazards and bullets in a
//! fixed order and returns a [`TickOutcome`] listing everything that happened,
//! so the presentation layer can react without the simulation depending on
//! it.

use super::config::EncounterConfig;
use super::constants::Millis;
use super::events::{CombatEvent, DamageSource};
use super::stage::StageProfile;
use crate::boss::{deform_intensity, AttackTimings, Boss, BossSnapshot};
use crate::hazards::{HazardScheduler, HazardSnapshot};
use crate::input::{DoubleTap, InputSnapshot, InputState};
use crate::player::{Player, PlayerSnapshot};
use crate::projectiles::{Bullet, BulletManager};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    /// Built but not started.
    Boot,
    Playing,
    /// Player died. Waits for [`Encounter::retry`].
    GameOver,
    /// Boss crashed. Advances to the next stage after the clear delay.
    StageClear,
}

/// Result of processing a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Events raised during this tick, in emission order.
    pub events: Vec<CombatEvent>,
    pub flow: FlowState,
    pub stage: u32,
    /// True if the tick was swallowed by hitstop.
    pub hitstopped: bool,
}

/// Everything presentation needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub now: Millis,
    pub flow: FlowState,
    pub stage: u32,
    pub player: PlayerSnapshot,
    pub boss: BossSnapshot,
    pub boss_deform: f64,
    pub hazards: Vec<HazardSnapshot>,
    pub bullets: Vec<Bullet>,
}

#[derive(Debug, Clone)]
pub struct Encounter {
    config: EncounterConfig,
    stage: StageProfile,
    flow: FlowState,
    player: Player,
    boss: Boss,
    hazards: HazardScheduler,
    bullets: BulletManager,
    input: InputSnapshot,
    double_tap: DoubleTap,
    now: Millis,
    next_shot_at: Millis,
    hitstop_until: Millis,
    contact_ready_at: Millis,
    cleared_at: Option<Millis>,
    /// Raised outside `tick` (retry), reported with the next outcome.
    pending: Vec<CombatEvent>,
}

impl Encounter {
    /// Build `stage_index` (floored to 1) without starting the clock.
    pub fn boot(config: EncounterConfig, stage_index: u32) -> Self {
        let stage = StageProfile::from_config(stage_index, &config);
        let (player, boss) = spawn_actors(&config, stage, 0);
        Self {
            hazards: HazardScheduler::new(config.laser, config.magnet, &config.world),
            bullets: BulletManager::new(config.bullets, &config.world),
            double_tap: DoubleTap::new(&config.input),
            input: InputSnapshot::new(),
            config,
            stage,
            flow: FlowState::Boot,
            player,
            boss,
            now: 0,
            next_shot_at: 0,
            hitstop_until: 0,
            contact_ready_at: 0,
            cleared_at: None,
            pending: Vec::new(),
        }
    }

    /// Build `stage_index` and start playing at `now`.
    pub fn new(config: EncounterConfig, stage_index: u32, now: Millis) -> Self {
        let mut encounter = Self::boot(config, stage_index);
        encounter.start(now);
        encounter
    }

    /// Leave `Boot`. Actors are respawned so their clocks start at `now`.
    pub fn start(&mut self, now: Millis) {
        if self.flow != FlowState::Boot {
            return;
        }
        self.reset_actors(now);
        self.flow = FlowState::Playing;
        tracing::info!(stage = self.stage.stage_index, now, "encounter started");
    }

    /// Process one tick.
    ///
    /// `held` is the raw logical input for this tick. `delta_ms` only drives
    /// motion.
    pub fn tick<R: Rng>(
        &mut self,
        held: InputState,
        now: Millis,
        delta_ms: Millis,
        rng: &mut R,
    ) -> TickOutcome {
        self.now = now;
        let mut events = std::mem::take(&mut self.pending);

        // ── 1. Input ────────────────────────────────────────────────
        self.input.update(held);
        let roll = self.double_tap.resolve(&self.input, now);

        // ── 2. Hitstop ──────────────────────────────────────────────
        if now < self.hitstop_until {
            return self.outcome(events, true);
        }

        // ── 3. Flow ─────────────────────────────────────────────────
        match self.flow {
            FlowState::Boot | FlowState::GameOver => return self.outcome(events, false),
            FlowState::StageClear => {
                let cleared_at = self.cleared_at.unwrap_or(now);
                if now >= cleared_at + self.stage.clear_delay_ms {
                    self.advance_stage(now);
                    events.push(CombatEvent::StageAdvanced {
                        stage: self.stage.stage_index,
                    });
                }
                return self.outcome(events, false);
            }
            FlowState::Playing => {}
        }

        // ── 4. Shooting ─────────────────────────────────────────────
        if !self.input.down.shoot {
            self.next_shot_at = 0;
        } else if self.player.can_shoot() && now >= self.next_shot_at {
            let (x, y) = self.player.shoot_origin();
            self.bullets.spawn(x, y);
            self.next_shot_at = now + self.config.bullets.fire_rate_ms;
        }

        // ── 5. Player ───────────────────────────────────────────────
        self.player.update(&self.input.down, roll, now, delta_ms);
        self.drain_events(&mut events);

        // ── 6. Boss ─────────────────────────────────────────────────
        self.boss
            .update(now, delta_ms, &mut self.hazards, self.player.x(), rng);
        self.drain_events(&mut events);

        // ── 7. Contact damage ───────────────────────────────────────
        self.apply_contact_damage(now);
        self.drain_events(&mut events);

        // ── 8. Hazards vs player ────────────────────────────────────
        self.hazards.update(now, &mut self.player);
        self.drain_events(&mut events);

        // ── 9. Bullets vs boss ──────────────────────────────────────
        self.bullets.update(now, delta_ms, &mut self.boss);
        self.drain_events(&mut events);

        if self.config.hitstop_ms > 0 && events.iter().any(|e| e.as_damage().is_some()) {
            self.hitstop_until = now + self.config.hitstop_ms;
        }

        // ── 10. Terminal checks ─────────────────────────────────────
        if self.player.state().is_dead() {
            self.flow = FlowState::GameOver;
            self.hazards.clear();
            self.bullets.clear();
            events.push(CombatEvent::GameOver {
                stage: self.stage.stage_index,
            });
            tracing::info!(stage = self.stage.stage_index, now, "game over");
        } else if self.boss.is_stage_clear() {
            self.flow = FlowState::StageClear;
            self.cleared_at = Some(now);
            self.hazards.clear();
            self.bullets.clear();
            events.push(CombatEvent::StageCleared {
                stage: self.stage.stage_index,
            });
            tracing::info!(stage = self.stage.stage_index, now, "stage cleared");
        }

        self.outcome(events, false)
    }

    /// Start over from stage 1.
    pub fn retry(&mut self, now: Millis) {
        self.stage = StageProfile::from_config(1, &self.config);
        self.reset_actors(now);
        self.flow = FlowState::Playing;
        self.pending.push(CombatEvent::Retried);
        tracing::info!(now, "retry");
    }

    /// Rebuild every actor for the next stage. The player comes back at full
    /// hp.
    pub fn advance_stage(&mut self, now: Millis) {
        let next = self.stage.stage_index.saturating_add(1);
        self.stage = StageProfile::from_config(next, &self.config);
        self.reset_actors(now);
        self.flow = FlowState::Playing;
        tracing::info!(stage = next, boss_hp = self.stage.boss_max_hp, now, "stage advanced");
    }

    pub fn flow(&self) -> FlowState {
        self.flow
    }

    pub fn stage(&self) -> &StageProfile {
        &self.stage
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn hazards(&self) -> &HazardScheduler {
        &self.hazards
    }

    pub fn bullets(&self) -> &BulletManager {
        &self.bullets
    }

    pub fn is_hitstopped(&self, now: Millis) -> bool {
        now < self.hitstop_until
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            now: self.now,
            flow: self.flow,
            stage: self.stage.stage_index,
            player: self.player.snapshot(self.now),
            boss: self.boss.snapshot(),
            boss_deform: deform_intensity(self.boss.hp_ratio()),
            hazards: self.hazards.snapshots(),
            bullets: self.bullets.bullets().to_vec(),
        }
    }

    fn apply_contact_damage(&mut self, now: Millis) {
        if !self.boss.deals_contact_damage() || now < self.contact_ready_at {
            return;
        }
        if !self.boss.hitbox().intersects(&self.player.hitbox()) {
            return;
        }
        let amount = self.boss.contact_damage();
        if self
            .player
            .apply_damage(amount, DamageSource::BossContact, now)
        {
            self.contact_ready_at = now + self.config.boss.contact_cooldown_ms;
        }
    }

    fn drain_events(&mut self, events: &mut Vec<CombatEvent>) {
        events.append(&mut self.player.take_events());
        events.append(&mut self.boss.take_events());
        events.append(&mut self.hazards.take_events());
    }

    fn reset_actors(&mut self, now: Millis) {
        let (player, boss) = spawn_actors(&self.config, self.stage, now);
        self.player = player;
        self.boss = boss;
        self.hazards.clear();
        self.bullets.clear();
        self.double_tap.reset();
        self.now = now;
        self.next_shot_at = 0;
        self.hitstop_until = 0;
        self.contact_ready_at = 0;
        self.cleared_at = None;
    }

    fn outcome(&self, events: Vec<CombatEvent>, hitstopped: bool) -> TickOutcome {
        TickOutcome {
            events,
            flow: self.flow,
            stage: self.stage.stage_index,
            hitstopped,
        }
    }
}

fn spawn_actors(config: &EncounterConfig, stage: StageProfile, now: Millis) -> (Player, Boss) {
    let center = config.world.width / 2.0;
    let player = Player::new(config.player, config.world, center, now);
    let boss = Boss::new(
        config.boss,
        config.world,
        AttackTimings {
            laser: config.laser.durations,
            magnet: config.magnet.durations,
        },
        stage,
        center,
        now,
    );
    (player, boss)
}
