//! Default tuning numbers for the encounter.
//!
//! These are the values [`EncounterConfig::default`](super::config::EncounterConfig)
//! is built from. Times are milliseconds, speeds are pixels per second.

/// Millisecond timestamp or duration.
pub type Millis = u64;

// World
pub const WORLD_WIDTH: f64 = 320.0;
pub const WORLD_HEIGHT: f64 = 180.0;
/// Allowed margin between an entity centre and the screen edge.
pub const WORLD_BOUNDS_PAD: f64 = 12.0;
pub const GROUND_HEIGHT: f64 = 80.0;

// Player
pub const PLAYER_MAX_HP: u32 = 5;
pub const PLAYER_MOVE_SPEED: f64 = 220.0;
pub const PLAYER_HIT_STUN_MS: Millis = 200;
pub const PLAYER_WIDTH: f64 = 22.0;
pub const PLAYER_HEIGHT: f64 = 34.0;
pub const ROLL_DURATION_MS: Millis = 250;
pub const ROLL_INVINCIBLE_MS: Millis = 180;
pub const ROLL_COOLDOWN_MS: Millis = 1200;
pub const MAGNET_LIFT_HEIGHT: f64 = 130.0;
pub const MAGNET_LIFT_MS: Millis = 420;
pub const MAGNET_FALL_SPEED: f64 = 780.0;
pub const MAGNET_FALL_DAMAGE: u32 = 1;

// Boss
pub const BOSS_BASE_MAX_HP: u32 = 18;
pub const BOSS_SPAWN_START_Y: f64 = -120.0;
pub const BOSS_SPAWN_MS: Millis = 1200;
pub const BOSS_HOVER_Y: f64 = 48.0;
pub const BOSS_HITBOX_WIDTH: f64 = 164.0;
pub const BOSS_HITBOX_HEIGHT: f64 = 48.0;
pub const BOSS_ATTACK_RECOVER_MS: Millis = 280;
pub const BOSS_ENRAGE_THRESHOLD: f64 = 0.4;
pub const BOSS_ENRAGE_MS: Millis = 600;
pub const BOSS_CRASH_START_MS: Millis = 520;
pub const BOSS_CRASH_FALL_SPEED: f64 = 360.0;
pub const BOSS_CRASH_IMPACT_MS: Millis = 700;
/// Crash settles this far above the ground line.
pub const BOSS_CRASH_IMPACT_OFFSET: f64 = 6.0;
pub const BOSS_MIN_WEIGHT: f64 = 0.05;
pub const BOSS_MAX_WEIGHT: f64 = 0.95;
pub const BOSS_CONTACT_DAMAGE: u32 = 0;
pub const BOSS_CONTACT_COOLDOWN_MS: Millis = 600;

// Hazards
pub const LASER_TELEGRAPH_MS: Millis = 650;
pub const LASER_ACTIVE_MS: Millis = 200;
pub const LASER_RECOVER_MS: Millis = 250;
pub const LASER_WIDTH: f64 = 12.0;
pub const LASER_DAMAGE: u32 = 1;
pub const MAGNET_TELEGRAPH_MS: Millis = 750;
pub const MAGNET_ACTIVE_MS: Millis = 450;
pub const MAGNET_RECOVER_MS: Millis = 350;
pub const MAGNET_WIDTH: f64 = 40.0;
pub const MAGNET_FIELD_HEIGHT: f64 = 96.0;

// Bullets
pub const BULLET_WIDTH: f64 = 2.0;
pub const BULLET_HEIGHT: f64 = 6.0;
pub const BULLET_SPEED: f64 = 320.0;
pub const BULLET_DAMAGE: u32 = 1;
pub const BULLET_FIRE_RATE_MS: Millis = 140;

// Input
pub const DOUBLE_TAP_WINDOW_MS: Millis = 220;
pub const TAP_DEBOUNCE_MS: Millis = 30;

// Stage scaling
pub const STAGE_HP_PER_STAGE: u32 = 3;
pub const STAGE_MOVE_SPEED_SCALE_STEP: f64 = 0.1;
pub const STAGE_ATTACK_INTERVAL_SCALE_STEP: f64 = -0.08;
pub const STAGE_LASER_TELEGRAPH_SCALE_STEP: f64 = -0.08;
pub const STAGE_MAGNET_TELEGRAPH_SCALE_STEP: f64 = -0.06;
pub const STAGE_MAGNET_WEIGHT_BIAS_STEP: f64 = 0.06;
pub const STAGE_MIN_ATTACK_INTERVAL_SCALE: f64 = 0.6;
pub const STAGE_MIN_TELEGRAPH_SCALE: f64 = 0.5;
pub const STAGE_MAX_MOVE_SPEED_SCALE: f64 = 1.8;
pub const STAGE_MAX_MAGNET_BIAS: f64 = 0.3;
pub const STAGE_CLEAR_DELAY_MS: Millis = 1200;

// Encounter
pub const HITSTOP_MS: Millis = 50;
