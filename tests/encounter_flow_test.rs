//! Integration test: Encounter orchestration
//!
//! Covers the flow states (boot, game over, retry, stage clear and advance),
//! hitstop, and hp monotonicity over long randomized sessions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use showdown::core::config::{BossConfig, PlayerConfig};
use showdown::core::{CombatEvent, Encounter, EncounterConfig, FlowState, Millis, TickOutcome};
use showdown::input::InputState;

const FRAME: Millis = 16;

const SHOOT: InputState = InputState {
    left: false,
    right: false,
    shoot: true,
};

/// Tick from `now` until `stop` matches an outcome or `until` passes.
/// Returns every event seen and the time of the last tick.
fn run_until(
    encounter: &mut Encounter,
    rng: &mut ChaCha8Rng,
    held: InputState,
    mut now: Millis,
    until: Millis,
    stop: impl Fn(&TickOutcome) -> bool,
) -> (Vec<CombatEvent>, Millis) {
    let mut events = Vec::new();
    while now < until {
        now += FRAME;
        let outcome = encounter.tick(held, now, FRAME, rng);
        let done = stop(&outcome);
        events.extend(outcome.events);
        if done {
            break;
        }
    }
    (events, now)
}

fn has_event(outcome: &TickOutcome, wanted: impl Fn(&CombatEvent) -> bool) -> bool {
    outcome.events.iter().any(wanted)
}

// =============================================================================
// Flow
// =============================================================================

#[test]
fn test_boot_waits_for_start() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut encounter = Encounter::boot(EncounterConfig::default(), 2);
    assert_eq!(encounter.flow(), FlowState::Boot);
    assert_eq!(encounter.stage().stage_index, 2);

    let outcome = encounter.tick(SHOOT, 100, FRAME, &mut rng);
    assert!(outcome.events.is_empty());
    assert!(encounter.bullets().is_empty());

    encounter.start(100);
    assert_eq!(encounter.flow(), FlowState::Playing);
    encounter.tick(SHOOT, 116, FRAME, &mut rng);
    assert_eq!(encounter.bullets().len(), 1);
}

#[test]
fn test_contact_death_ends_in_game_over_then_retry() {
    let config = EncounterConfig {
        player: PlayerConfig {
            max_hp: 1,
            ..Default::default()
        },
        boss: BossConfig {
            contact_damage: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut encounter = Encounter::new(config, 1, 0);

    let (events, now) = run_until(&mut encounter, &mut rng, InputState::NONE, 0, 10_000, |o| {
        o.flow == FlowState::GameOver
    });

    assert_eq!(encounter.flow(), FlowState::GameOver);
    assert!(events.contains(&CombatEvent::GameOver { stage: 1 }));
    assert!(events
        .iter()
        .any(|e| matches!(e, CombatEvent::PlayerDied { .. })));
    assert!(encounter.player().state().is_dead());
    assert!(encounter.hazards().is_empty());

    // Frozen until retry.
    let idle = encounter.tick(SHOOT, now + FRAME, FRAME, &mut rng);
    assert!(idle.events.is_empty());
    assert!(encounter.bullets().is_empty());

    encounter.retry(now + 2 * FRAME);
    let outcome = encounter.tick(InputState::NONE, now + 3 * FRAME, FRAME, &mut rng);
    assert_eq!(outcome.events.first(), Some(&CombatEvent::Retried));
    assert_eq!(outcome.flow, FlowState::Playing);
    assert_eq!(outcome.stage, 1);
    assert_eq!(encounter.player().hp(), 1);
    assert_eq!(encounter.boss().hp(), encounter.boss().max_hp());
}

#[test]
fn test_killing_boss_clears_and_advances_stage() {
    let config = EncounterConfig {
        boss: BossConfig {
            base_max_hp: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut encounter = Encounter::new(config, 1, 0);

    let (events, _) = run_until(&mut encounter, &mut rng, SHOOT, 0, 15_000, |o| {
        has_event(o, |e| matches!(e, CombatEvent::StageAdvanced { .. }))
    });

    let position = |wanted: &dyn Fn(&CombatEvent) -> bool| events.iter().position(wanted);
    let crash = position(&|e: &CombatEvent| matches!(e, CombatEvent::BossCrashStarted { .. }));
    let impact = position(&|e: &CombatEvent| matches!(e, CombatEvent::BossCrashImpactDone { .. }));
    let cleared = position(&|e: &CombatEvent| *e == CombatEvent::StageCleared { stage: 1 });
    let advanced = position(&|e: &CombatEvent| *e == CombatEvent::StageAdvanced { stage: 2 });
    assert!(crash.is_some() && impact.is_some() && cleared.is_some() && advanced.is_some());
    assert!(crash < impact && impact < cleared && cleared < advanced);

    assert_eq!(encounter.flow(), FlowState::Playing);
    assert_eq!(encounter.stage().stage_index, 2);
    assert_eq!(encounter.boss().max_hp(), 4);
    assert_eq!(encounter.player().hp(), encounter.player().max_hp());
}

#[test]
fn test_stage_clear_waits_for_clear_delay() {
    let config = EncounterConfig {
        boss: BossConfig {
            base_max_hp: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let mut encounter = Encounter::new(config, 1, 0);

    let (_, cleared_at) = run_until(&mut encounter, &mut rng, SHOOT, 0, 15_000, |o| {
        o.flow == FlowState::StageClear
    });
    assert_eq!(encounter.flow(), FlowState::StageClear);
    assert!(encounter.bullets().is_empty());

    let delay = encounter.stage().clear_delay_ms;
    let early = encounter.tick(SHOOT, cleared_at + delay - 1, FRAME, &mut rng);
    assert_eq!(early.flow, FlowState::StageClear);
    let late = encounter.tick(SHOOT, cleared_at + delay, FRAME, &mut rng);
    assert_eq!(late.flow, FlowState::Playing);
    assert_eq!(late.stage, 2);
}

// =============================================================================
// Hitstop
// =============================================================================

#[test]
fn test_damage_triggers_hitstop() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut encounter = Encounter::new(EncounterConfig::standard(), 1, 0);

    let (_, hit_at) = run_until(&mut encounter, &mut rng, SHOOT, 0, 10_000, |o| {
        o.events.iter().any(|e| e.as_damage().is_some())
    });
    assert!(encounter.is_hitstopped(hit_at + 49));
    assert!(!encounter.is_hitstopped(hit_at + 50));

    let hp = encounter.boss().hp();
    let frozen = encounter.tick(SHOOT, hit_at + FRAME, FRAME, &mut rng);
    assert!(frozen.hitstopped);
    assert!(frozen.events.is_empty());
    assert_eq!(encounter.boss().hp(), hp);

    let resumed = encounter.tick(SHOOT, hit_at + 4 * FRAME, FRAME, &mut rng);
    assert!(!resumed.hitstopped);
}

#[test]
fn test_default_tuning_has_no_hitstop() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut encounter = Encounter::new(EncounterConfig::default(), 1, 0);
    let (_, hit_at) = run_until(&mut encounter, &mut rng, SHOOT, 0, 10_000, |o| {
        o.events.iter().any(|e| e.as_damage().is_some())
    });
    assert!(!encounter.is_hitstopped(hit_at + 1));
}

// =============================================================================
// Properties over long sessions
// =============================================================================

fn random_input(rng: &mut ChaCha8Rng) -> InputState {
    InputState {
        left: rng.gen_bool(0.3),
        right: rng.gen_bool(0.3),
        shoot: rng.gen_bool(0.8),
    }
}

#[test]
fn test_hp_never_increases_within_a_stage() {
    for seed in 0..5u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut encounter = Encounter::new(EncounterConfig::standard(), 1, 0);
        let mut player_hp = encounter.player().hp();
        let mut boss_hp = encounter.boss().hp();
        let mut now = 0;

        while now < 60_000 {
            let delta = rng.gen_range(8..=32);
            now += delta;
            let input = random_input(&mut rng);
            let outcome = encounter.tick(input, now, delta, &mut rng);

            let reset = outcome
                .events
                .iter()
                .any(|e| matches!(e, CombatEvent::StageAdvanced { .. } | CombatEvent::Retried));
            if !reset {
                assert!(encounter.player().hp() <= player_hp, "seed {seed} at {now}");
                assert!(encounter.boss().hp() <= boss_hp, "seed {seed} at {now}");
            }
            player_hp = encounter.player().hp();
            boss_hp = encounter.boss().hp();

            if outcome.flow == FlowState::GameOver {
                encounter.retry(now);
            }
        }
    }
}

#[test]
fn test_snapshot_tracks_live_state() {
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let mut encounter = Encounter::new(EncounterConfig::standard(), 1, 0);
    run_until(&mut encounter, &mut rng, SHOOT, 0, 3000, |_| false);

    let snapshot = encounter.snapshot();
    assert_eq!(snapshot.flow, FlowState::Playing);
    assert_eq!(snapshot.player.hp, encounter.player().hp());
    assert_eq!(snapshot.boss.hp, encounter.boss().hp());
    assert_eq!(snapshot.hazards.len(), encounter.hazards().len());
    assert_eq!(snapshot.bullets.len(), encounter.bullets().len());
    assert!((0.0..=1.0).contains(&snapshot.boss_deform));

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"flow\":\"Playing\""));
}
