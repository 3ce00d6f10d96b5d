//! Encounter tuning tables.
//!
//! Every table derives serde with `#[serde(default)]`, so a JSON override
//! only needs to name the keys it changes.

use super::constants::*;
use serde::{Deserialize, Deserializer, Serialize};

/// Play-area dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub bounds_pad: f64,
    pub ground_height: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            bounds_pad: WORLD_BOUNDS_PAD,
            ground_height: GROUND_HEIGHT,
        }
    }
}

impl WorldConfig {
    /// Y of the ground line (feet of a grounded actor).
    pub fn ground_y(&self) -> f64 {
        self.height - self.ground_height
    }

    pub fn min_x(&self) -> f64 {
        self.bounds_pad
    }

    pub fn max_x(&self) -> f64 {
        self.width - self.bounds_pad
    }

    /// Clamp an x coordinate into the padded play area.
    pub fn clamp_x(&self, x: f64) -> f64 {
        x.clamp(self.min_x(), self.max_x().max(self.min_x()))
    }
}

/// Dodge-roll timings. Valid tables satisfy `invincible <= duration <= cooldown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollConfig {
    pub duration_ms: Millis,
    pub invincible_ms: Millis,
    pub cooldown_ms: Millis,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            duration_ms: ROLL_DURATION_MS,
            invincible_ms: ROLL_INVINCIBLE_MS,
            cooldown_ms: ROLL_COOLDOWN_MS,
        }
    }
}

/// How the player reacts to a magnet grab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnetGrabConfig {
    pub lift_height: f64,
    pub lift_ms: Millis,
    pub fall_speed: f64,
    pub fall_damage: u32,
}

impl Default for MagnetGrabConfig {
    fn default() -> Self {
        Self {
            lift_height: MAGNET_LIFT_HEIGHT,
            lift_ms: MAGNET_LIFT_MS,
            fall_speed: MAGNET_FALL_SPEED,
            fall_damage: MAGNET_FALL_DAMAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_hp: u32,
    pub move_speed: f64,
    pub hit_stun_ms: Millis,
    pub width: f64,
    pub height: f64,
    pub roll: RollConfig,
    pub magnet: MagnetGrabConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_hp: PLAYER_MAX_HP,
            move_speed: PLAYER_MOVE_SPEED,
            hit_stun_ms: PLAYER_HIT_STUN_MS,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            roll: RollConfig::default(),
            magnet: MagnetGrabConfig::default(),
        }
    }
}

/// Base pacing for one boss phase, before stage scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Lowest hp ratio (of the current stage max) at which this phase holds.
    pub min_ratio: f64,
    pub move_speed: f64,
    pub attack_interval_ms: Millis,
    pub laser_weight: f64,
    pub magnet_weight: f64,
    /// Multiplier applied to every hazard and sub-state duration.
    pub timing_scale: f64,
}

impl PhaseConfig {
    pub const P1: PhaseConfig = PhaseConfig {
        min_ratio: 0.7,
        move_speed: 80.0,
        attack_interval_ms: 2400,
        laser_weight: 0.7,
        magnet_weight: 0.3,
        timing_scale: 1.0,
    };

    pub const P2: PhaseConfig = PhaseConfig {
        min_ratio: 0.4,
        move_speed: 105.0,
        attack_interval_ms: 2000,
        laser_weight: 0.55,
        magnet_weight: 0.45,
        timing_scale: 0.9,
    };

    pub const P3: PhaseConfig = PhaseConfig {
        min_ratio: 0.01,
        move_speed: 130.0,
        attack_interval_ms: 1650,
        laser_weight: 0.45,
        magnet_weight: 0.55,
        timing_scale: 0.8,
    };
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self::P1
    }
}

/// A partial phase table. Unnamed keys keep the base phase's values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PhasePatch {
    min_ratio: Option<f64>,
    move_speed: Option<f64>,
    attack_interval_ms: Option<Millis>,
    laser_weight: Option<f64>,
    magnet_weight: Option<f64>,
    timing_scale: Option<f64>,
}

impl PhasePatch {
    fn apply(self, base: PhaseConfig) -> PhaseConfig {
        PhaseConfig {
            min_ratio: self.min_ratio.unwrap_or(base.min_ratio),
            move_speed: self.move_speed.unwrap_or(base.move_speed),
            attack_interval_ms: self.attack_interval_ms.unwrap_or(base.attack_interval_ms),
            laser_weight: self.laser_weight.unwrap_or(base.laser_weight),
            magnet_weight: self.magnet_weight.unwrap_or(base.magnet_weight),
            timing_scale: self.timing_scale.unwrap_or(base.timing_scale),
        }
    }
}

fn phase_over<'de, D: Deserializer<'de>>(
    deserializer: D,
    base: PhaseConfig,
) -> Result<PhaseConfig, D::Error> {
    PhasePatch::deserialize(deserializer).map(|patch| patch.apply(base))
}

fn p1_over_defaults<'de, D: Deserializer<'de>>(d: D) -> Result<PhaseConfig, D::Error> {
    phase_over(d, PhaseConfig::P1)
}

fn p2_over_defaults<'de, D: Deserializer<'de>>(d: D) -> Result<PhaseConfig, D::Error> {
    phase_over(d, PhaseConfig::P2)
}

fn p3_over_defaults<'de, D: Deserializer<'de>>(d: D) -> Result<PhaseConfig, D::Error> {
    phase_over(d, PhaseConfig::P3)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Stage 1 max hp; later stages add to it.
    pub base_max_hp: u32,
    pub spawn_start_y: f64,
    pub spawn_ms: Millis,
    pub hover_y: f64,
    pub hitbox_width: f64,
    pub hitbox_height: f64,
    pub attack_recover_ms: Millis,
    pub enrage_threshold: f64,
    pub enrage_ms: Millis,
    pub crash_start_ms: Millis,
    pub crash_fall_speed: f64,
    pub crash_impact_ms: Millis,
    pub crash_impact_offset: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    /// Damage dealt to the player on body contact. Zero disables contact damage.
    pub contact_damage: u32,
    pub contact_cooldown_ms: Millis,
    #[serde(deserialize_with = "p1_over_defaults")]
    pub p1: PhaseConfig,
    #[serde(deserialize_with = "p2_over_defaults")]
    pub p2: PhaseConfig,
    #[serde(deserialize_with = "p3_over_defaults")]
    pub p3: PhaseConfig,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            base_max_hp: BOSS_BASE_MAX_HP,
            spawn_start_y: BOSS_SPAWN_START_Y,
            spawn_ms: BOSS_SPAWN_MS,
            hover_y: BOSS_HOVER_Y,
            hitbox_width: BOSS_HITBOX_WIDTH,
            hitbox_height: BOSS_HITBOX_HEIGHT,
            attack_recover_ms: BOSS_ATTACK_RECOVER_MS,
            enrage_threshold: BOSS_ENRAGE_THRESHOLD,
            enrage_ms: BOSS_ENRAGE_MS,
            crash_start_ms: BOSS_CRASH_START_MS,
            crash_fall_speed: BOSS_CRASH_FALL_SPEED,
            crash_impact_ms: BOSS_CRASH_IMPACT_MS,
            crash_impact_offset: BOSS_CRASH_IMPACT_OFFSET,
            min_weight: BOSS_MIN_WEIGHT,
            max_weight: BOSS_MAX_WEIGHT,
            contact_damage: BOSS_CONTACT_DAMAGE,
            contact_cooldown_ms: BOSS_CONTACT_COOLDOWN_MS,
            p1: PhaseConfig::P1,
            p2: PhaseConfig::P2,
            p3: PhaseConfig::P3,
        }
    }
}

/// Telegraph / active / recover durations of one hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    pub telegraph_ms: Millis,
    pub active_ms: Millis,
    pub recover_ms: Millis,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::LASER
    }
}

impl PhaseDurations {
    pub const LASER: PhaseDurations = PhaseDurations {
        telegraph_ms: LASER_TELEGRAPH_MS,
        active_ms: LASER_ACTIVE_MS,
        recover_ms: LASER_RECOVER_MS,
    };

    pub const MAGNET: PhaseDurations = PhaseDurations {
        telegraph_ms: MAGNET_TELEGRAPH_MS,
        active_ms: MAGNET_ACTIVE_MS,
        recover_ms: MAGNET_RECOVER_MS,
    };

    pub fn total_ms(&self) -> Millis {
        self.telegraph_ms + self.active_ms + self.recover_ms
    }

    /// Every window scaled by `timing_scale`; the telegraph additionally by
    /// `telegraph_scale`.
    pub fn scaled(&self, timing_scale: f64, telegraph_scale: f64) -> PhaseDurations {
        PhaseDurations {
            telegraph_ms: scale_ms(self.telegraph_ms, telegraph_scale * timing_scale),
            active_ms: scale_ms(self.active_ms, timing_scale),
            recover_ms: scale_ms(self.recover_ms, timing_scale),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DurationsPatch {
    telegraph_ms: Option<Millis>,
    active_ms: Option<Millis>,
    recover_ms: Option<Millis>,
}

fn durations_over<'de, D: Deserializer<'de>>(
    deserializer: D,
    base: PhaseDurations,
) -> Result<PhaseDurations, D::Error> {
    let patch = DurationsPatch::deserialize(deserializer)?;
    Ok(PhaseDurations {
        telegraph_ms: patch.telegraph_ms.unwrap_or(base.telegraph_ms),
        active_ms: patch.active_ms.unwrap_or(base.active_ms),
        recover_ms: patch.recover_ms.unwrap_or(base.recover_ms),
    })
}

fn laser_durations<'de, D: Deserializer<'de>>(d: D) -> Result<PhaseDurations, D::Error> {
    durations_over(d, PhaseDurations::LASER)
}

fn magnet_durations<'de, D: Deserializer<'de>>(d: D) -> Result<PhaseDurations, D::Error> {
    durations_over(d, PhaseDurations::MAGNET)
}

/// Scale a duration, rounding to the nearest millisecond.
pub fn scale_ms(ms: Millis, scale: f64) -> Millis {
    (ms as f64 * scale).round().max(0.0) as Millis
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserConfig {
    #[serde(deserialize_with = "laser_durations")]
    pub durations: PhaseDurations,
    pub width: f64,
    pub damage: u32,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            durations: PhaseDurations::LASER,
            width: LASER_WIDTH,
            damage: LASER_DAMAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnetConfig {
    #[serde(deserialize_with = "magnet_durations")]
    pub durations: PhaseDurations,
    pub width: f64,
    pub field_height: f64,
}

impl Default for MagnetConfig {
    fn default() -> Self {
        Self {
            durations: PhaseDurations::MAGNET,
            width: MAGNET_WIDTH,
            field_height: MAGNET_FIELD_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub damage: u32,
    pub fire_rate_ms: Millis,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
            speed: BULLET_SPEED,
            damage: BULLET_DAMAGE,
            fire_rate_ms: BULLET_FIRE_RATE_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub double_tap_window_ms: Millis,
    pub tap_debounce_ms: Millis,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_tap_window_ms: DOUBLE_TAP_WINDOW_MS,
            tap_debounce_ms: TAP_DEBOUNCE_MS,
        }
    }
}

/// Per-stage difficulty steps. See [`StageProfile`](super::stage::StageProfile).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTuning {
    pub hp_per_stage: u32,
    pub move_speed_scale_step: f64,
    pub attack_interval_scale_step: f64,
    pub laser_telegraph_scale_step: f64,
    pub magnet_telegraph_scale_step: f64,
    pub magnet_weight_bias_step: f64,
    pub min_attack_interval_scale: f64,
    pub min_telegraph_scale: f64,
    pub max_move_speed_scale: f64,
    pub max_magnet_bias: f64,
    pub clear_delay_ms: Millis,
}

impl Default for StageTuning {
    fn default() -> Self {
        Self {
            hp_per_stage: STAGE_HP_PER_STAGE,
            move_speed_scale_step: STAGE_MOVE_SPEED_SCALE_STEP,
            attack_interval_scale_step: STAGE_ATTACK_INTERVAL_SCALE_STEP,
            laser_telegraph_scale_step: STAGE_LASER_TELEGRAPH_SCALE_STEP,
            magnet_telegraph_scale_step: STAGE_MAGNET_TELEGRAPH_SCALE_STEP,
            magnet_weight_bias_step: STAGE_MAGNET_WEIGHT_BIAS_STEP,
            min_attack_interval_scale: STAGE_MIN_ATTACK_INTERVAL_SCALE,
            min_telegraph_scale: STAGE_MIN_TELEGRAPH_SCALE,
            max_move_speed_scale: STAGE_MAX_MOVE_SPEED_SCALE,
            max_magnet_bias: STAGE_MAX_MAGNET_BIAS,
            clear_delay_ms: STAGE_CLEAR_DELAY_MS,
        }
    }
}

/// Complete tuning for one encounter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub boss: BossConfig,
    pub laser: LaserConfig,
    pub magnet: MagnetConfig,
    pub bullets: BulletConfig,
    pub input: InputConfig,
    pub stages: StageTuning,
    /// Simulation freeze after any accepted damage. Zero disables hitstop.
    pub hitstop_ms: Millis,
}

impl EncounterConfig {
    /// Default tuning with hitstop enabled.
    pub fn standard() -> Self {
        Self {
            hitstop_ms: HITSTOP_MS,
            ..Default::default()
        }
    }

    /// Parse a (possibly partial) JSON tuning document and validate it.
    /// Missing keys fall back to [`EncounterConfig::default`].
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: EncounterConfig =
            serde_json::from_str(json).map_err(|e| format!("Invalid tuning JSON: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain numeric tables with string keys; serializing them cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Reject tables the state machines cannot honour.
    pub fn validate(&self) -> Result<(), String> {
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return Err("World dimensions must be positive".to_string());
        }
        if self.world.ground_height < 0.0 || self.world.ground_height >= self.world.height {
            return Err("Ground height must lie inside the world".to_string());
        }
        if self.world.max_x() < self.world.min_x() {
            return Err("World bounds pad leaves no play area".to_string());
        }
        if self.player.width <= 0.0 || self.player.height <= 0.0 {
            return Err("Player dimensions must be positive".to_string());
        }
        if self.player.max_hp == 0 {
            return Err("Player max hp must be at least 1".to_string());
        }
        let roll = self.player.roll;
        if roll.invincible_ms > roll.duration_ms || roll.duration_ms > roll.cooldown_ms {
            return Err(format!(
                "Roll timings must satisfy invincible <= duration <= cooldown (got {} / {} / {})",
                roll.invincible_ms, roll.duration_ms, roll.cooldown_ms
            ));
        }
        if self.boss.base_max_hp == 0 {
            return Err("Boss max hp must be at least 1".to_string());
        }
        if self.boss.hitbox_width <= 0.0 || self.boss.hitbox_height <= 0.0 {
            return Err("Boss hitbox must be positive".to_string());
        }
        for (name, phase) in [
            ("p1", self.boss.p1),
            ("p2", self.boss.p2),
            ("p3", self.boss.p3),
        ] {
            if phase.laser_weight + phase.magnet_weight <= 0.0 {
                return Err(format!("Phase {} has no attack weight", name));
            }
        }
        if self.bullets.width <= 0.0 || self.bullets.height <= 0.0 {
            return Err("Bullet dimensions must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EncounterConfig::default().validate().is_ok());
        assert!(EncounterConfig::standard().validate().is_ok());
    }

    #[test]
    fn test_standard_enables_hitstop() {
        assert_eq!(EncounterConfig::default().hitstop_ms, 0);
        assert_eq!(EncounterConfig::standard().hitstop_ms, HITSTOP_MS);
    }

    #[test]
    fn test_world_ground_and_bounds() {
        let world = WorldConfig::default();
        assert!((world.ground_y() - 100.0).abs() < f64::EPSILON);
        assert!((world.clamp_x(-50.0) - 12.0).abs() < f64::EPSILON);
        assert!((world.clamp_x(500.0) - 308.0).abs() < f64::EPSILON);
        assert!((world.clamp_x(160.0) - 160.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_overrides_only_named_keys() {
        let config =
            EncounterConfig::from_json(r#"{ "player": { "max_hp": 9 }, "hitstop_ms": 10 }"#)
                .unwrap();
        assert_eq!(config.player.max_hp, 9);
        assert_eq!(config.hitstop_ms, 10);
        assert_eq!(config.player.roll, RollConfig::default());
        assert_eq!(config.boss, BossConfig::default());
    }

    #[test]
    fn test_partial_nested_tables_keep_their_own_defaults() {
        let config = EncounterConfig::from_json(
            r#"{
                "boss": { "p2": { "move_speed": 150.0 } },
                "laser": { "durations": { "telegraph_ms": 500 } },
                "magnet": { "durations": { "recover_ms": 90 } }
            }"#,
        )
        .unwrap();

        assert!((config.boss.p2.move_speed - 150.0).abs() < f64::EPSILON);
        assert_eq!(
            config.boss.p2,
            PhaseConfig {
                move_speed: 150.0,
                ..PhaseConfig::P2
            }
        );
        assert_eq!(config.boss.p1, PhaseConfig::P1);
        assert_eq!(config.boss.p3, PhaseConfig::P3);

        assert_eq!(
            config.laser.durations,
            PhaseDurations {
                telegraph_ms: 500,
                ..PhaseDurations::LASER
            }
        );
        assert_eq!(
            config.magnet.durations,
            PhaseDurations {
                recover_ms: 90,
                ..PhaseDurations::MAGNET
            }
        );
        assert!((config.laser.width - LASER_WIDTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nested_tables_parse_standalone() {
        let phase: PhaseConfig = serde_json::from_str(r#"{ "timing_scale": 0.5 }"#).unwrap();
        assert_eq!(
            phase,
            PhaseConfig {
                timing_scale: 0.5,
                ..PhaseConfig::P1
            }
        );
        let durations: PhaseDurations = serde_json::from_str("{}").unwrap();
        assert_eq!(durations, PhaseDurations::default());
    }

    #[test]
    fn test_invalid_roll_timings_rejected() {
        let err = EncounterConfig::from_json(
            r#"{ "player": { "roll": { "duration_ms": 100, "invincible_ms": 180 } } }"#,
        )
        .unwrap_err();
        assert!(err.contains("invincible <= duration <= cooldown"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(EncounterConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_tuning() {
        let config = EncounterConfig::standard();
        let parsed = EncounterConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_scaled_durations_round_each_window() {
        let base = PhaseDurations {
            telegraph_ms: 650,
            active_ms: 200,
            recover_ms: 250,
        };
        let scaled = base.scaled(0.9, 0.84);
        assert_eq!(scaled.telegraph_ms, 491); // 650 * 0.756 = 491.4
        assert_eq!(scaled.active_ms, 180);
        assert_eq!(scaled.recover_ms, 225);
        assert_eq!(base.scaled(1.0, 1.0), base);
        assert_eq!(scale_ms(0, 5.0), 0);
    }

    #[test]
    fn test_phase_durations_total() {
        let laser = LaserConfig::default();
        assert_eq!(
            laser.durations.total_ms(),
            LASER_TELEGRAPH_MS + LASER_ACTIVE_MS + LASER_RECOVER_MS
        );
    }
}
