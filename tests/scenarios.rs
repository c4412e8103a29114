use flappy_plus::Tuning;
use flappy_plus::sim::{
    BossPhase, FixedSampler, GamePhase, GameState, Intent, PipePair, PowerUp, PowerUpKind,
    RngSampler, TickInput, apply_intent, tick,
};
use flappy_plus::view::snapshot;
use glam::Vec2;
use proptest::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn session() -> GameState<FixedSampler> {
    GameState::new(Tuning::default(), FixedSampler::new(0.5)).unwrap()
}

fn idle() -> TickInput {
    TickInput::default()
}

fn flap() -> TickInput {
    TickInput {
        intents: vec![Intent::Flap],
    }
}

/// Keep the bird hovering mid-screen so only the thing under test can hit it
fn hover(state: &mut GameState<FixedSampler>) {
    state.bird.pos.y = 320.0;
    state.bird.vel_y = 0.0;
}

// ── Start and first flap ──────────────────────────────────────────────────────

#[test]
fn first_flap_starts_run() {
    let mut state = session();
    assert_eq!(state.phase, GamePhase::Ready);
    assert_eq!(state.score, 0);

    apply_intent(&mut state, Intent::Flap);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.bird.vel_y, -360.0);
}

#[test]
fn one_second_of_gravity_after_flap() {
    let mut state = session();
    apply_intent(&mut state, Intent::Flap);
    // The bird lands on the floor within this step; velocity is already integrated
    state.bird.pos.y = 100.0;
    tick(&mut state, &idle(), 1.0);
    assert!((state.bird.vel_y - 940.0).abs() < 1e-3);
}

// ── Score and boss threshold ──────────────────────────────────────────────────

#[test]
fn ninth_to_tenth_point_brings_boss() {
    let mut state = session();
    apply_intent(&mut state, Intent::Flap);
    state.score = 9;
    let t = state.tuning.clone();
    state.pipes.push(PipePair::new(
        t.bird_x - t.pipe_width + 1.0,
        320.0,
        400.0,
        t.pipe_width,
        t.floor_y(),
    ));
    hover(&mut state);
    tick(&mut state, &idle(), DT);

    assert_eq!(state.score, 10);
    let boss = state.boss.as_ref().expect("boss should spawn at threshold");
    assert_eq!(boss.phase, BossPhase::Entering);
    assert_eq!(boss.level, 1);
}

#[test]
fn full_boss_fight_cycle() {
    let mut state = session();
    apply_intent(&mut state, Intent::Flap);
    state.score = 10;
    state.spawn_boss();

    let mut saw_active = false;
    let mut saw_bullet = false;
    let mut ticks = 0;
    while state.boss.is_some() {
        hover(&mut state);
        // Keep the bird alive: bullets are checked, then dropped
        state.bird.invuln = 1.0;
        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.pipes.is_empty(), "no pipes during a boss fight");
        assert!(state.powerups.is_empty(), "no power-ups during a boss fight");
        if let Some(boss) = &state.boss {
            saw_active |= boss.phase == BossPhase::Active;
        }
        saw_bullet |= !state.bullets.is_empty();
        ticks += 1;
        assert!(ticks < 60 * 30, "boss never left");
    }

    assert!(saw_active);
    assert!(saw_bullet);
    assert_eq!(state.level, 2);
    assert_eq!(state.score, 13);
    assert_eq!(state.next_boss_at, 20);
    assert!(state.bullets.is_empty());

    // Pipes come back once the boss is gone
    for _ in 0..120 {
        hover(&mut state);
        state.bird.invuln = 1.0;
        tick(&mut state, &idle(), DT);
    }
    assert!(!state.pipes.is_empty());
}

#[test]
fn survive_timer_runs_in_real_time_under_slowmo() {
    let mut state = session();
    apply_intent(&mut state, Intent::Flap);
    state.spawn_boss();
    state.slowmo = 10.0;
    let before = state.boss_time;
    hover(&mut state);
    tick(&mut state, &idle(), 0.1);
    assert!((before - state.boss_time - 0.1).abs() < 1e-5);
}

// ── Shields, grace and death ──────────────────────────────────────────────────

#[test]
fn shield_then_grace_then_death() {
    let mut state = session();
    apply_intent(&mut state, Intent::Flap);
    let t = state.tuning.clone();
    // Bottom pipe covering the bird, far from scoring
    state
        .pipes
        .push(PipePair::new(t.bird_x - 10.0, 150.0, 130.0, t.pipe_width, t.floor_y()));
    state.bird.shield = 3.0;

    hover(&mut state);
    tick(&mut state, &idle(), DT);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.bird.shield, 0.0);
    let sparks = state.particles.len();
    assert!(sparks > 0);

    hover(&mut state);
    tick(&mut state, &idle(), DT);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.particles.len(), sparks, "ignored hits spawn no burst");

    // Grace runs out while still inside the pipe
    let mut ticks = 0;
    while state.phase == GamePhase::Playing {
        hover(&mut state);
        state.pipes[0].x = t.bird_x - 10.0;
        state.pipes[0].update(0.0, 0.0);
        tick(&mut state, &idle(), DT);
        ticks += 1;
        assert!(ticks < 120);
    }
    assert_eq!(state.phase, GamePhase::Dead);
    assert!(ticks >= 35, "grace window of 0.7s should hold for ~42 ticks, held {ticks}");
}

#[test]
fn best_score_survives_reset() {
    let mut state = session();
    apply_intent(&mut state, Intent::Flap);
    state.score = 8;
    state.bird.pos.y = state.tuning.floor_y();
    tick(&mut state, &idle(), DT);
    assert_eq!(state.phase, GamePhase::Dead);
    assert_eq!(state.best, 8);

    tick(&mut state, &flap(), DT);
    assert_eq!(state.phase, GamePhase::Ready);
    assert_eq!(state.score, 0);
    assert_eq!(state.best, 8);

    // A worse run doesn't lower it
    tick(&mut state, &TickInput { intents: vec![Intent::Confirm] }, DT);
    assert_eq!(state.phase, GamePhase::Playing);
    state.score = 3;
    state.bird.pos.y = 0.0;
    tick(&mut state, &idle(), DT);
    assert_eq!(state.phase, GamePhase::Dead);
    assert_eq!(state.best, 8);
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[test]
fn slow_pickup_then_expiry() {
    let mut state = session();
    apply_intent(&mut state, Intent::Flap);
    let t = state.tuning.clone();
    let at = state.bird.pos;
    state.powerups.push(PowerUp::new(at, PowerUpKind::Slow, &t));
    hover(&mut state);
    tick(&mut state, &idle(), DT);
    assert_eq!(state.slowmo, t.slow_time);
    assert_eq!(state.time_scale(), t.slow_factor);

    // 3 real seconds later it's gone
    for _ in 0..181 {
        hover(&mut state);
        state.bird.invuln = 1.0;
        tick(&mut state, &idle(), DT);
    }
    assert_eq!(state.slowmo, 0.0);
    assert_eq!(state.time_scale(), 1.0);
}

#[test]
fn powerups_spawn_in_open_play() {
    let mut state = session();
    apply_intent(&mut state, Intent::Flap);
    // Midpoint interval is 7s
    for _ in 0..(60 * 8) {
        hover(&mut state);
        state.bird.invuln = 1.0;
        tick(&mut state, &idle(), DT);
    }
    assert_eq!(state.phase, GamePhase::Playing);
    assert!(state.pipes.len() > 1);
    let band_max = state.tuning.floor_y() - state.tuning.powerup_margin;
    for pu in &state.powerups {
        assert!(pu.pos.y >= state.tuning.powerup_margin && pu.pos.y <= band_max);
    }
    assert_eq!(state.powerups.len(), 1);
    assert!(state.score >= 3);
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn pause_freezes_everything() {
    let mut state = session();
    apply_intent(&mut state, Intent::Flap);
    state.spawn_pipe();
    for _ in 0..10 {
        tick(&mut state, &idle(), DT);
    }
    tick(&mut state, &TickInput { intents: vec![Intent::PauseToggle] }, DT);
    assert_eq!(state.phase, GamePhase::Paused);
    let frozen = state.clone();
    for _ in 0..100 {
        tick(&mut state, &idle(), DT);
    }
    assert_eq!(state, frozen);
    assert_eq!(snapshot(&state).overlay.unwrap().title, "Paused");
}

#[test]
fn quit_is_only_reported() {
    let mut state = session();
    let input = TickInput {
        intents: vec![Intent::Quit],
    };
    assert!(input.quit_requested());
    tick(&mut state, &input, DT);
    assert_eq!(state.phase, GamePhase::Ready);
}

// ── Properties ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn gravity_strictly_increases_velocity(
        start_vel in -400.0f32..400.0,
        steps in prop::collection::vec(0.001f32..0.05, 1..40),
    ) {
        let mut state = GameState::new(Tuning::default(), RngSampler::from_seed(3)).unwrap();
        apply_intent(&mut state, Intent::Flap);
        state.bird.vel_y = start_vel;
        state.bird.pos.y = 280.0;
        state.bird.invuln = 100.0;
        let mut last = state.bird.vel_y;
        for dt in steps {
            tick(&mut state, &idle(), dt);
            prop_assert!(state.bird.vel_y > last);
            last = state.bird.vel_y;
        }
    }

    #[test]
    fn flap_overrides_velocity_only(
        vel in -1000.0f32..1000.0,
        shield in 0.0f32..5.0,
        invuln in 0.0f32..1.0,
    ) {
        let mut state = session();
        apply_intent(&mut state, Intent::Flap);
        state.bird.vel_y = vel;
        state.bird.shield = shield;
        state.bird.invuln = invuln;
        apply_intent(&mut state, Intent::Flap);
        prop_assert_eq!(state.bird.vel_y, state.tuning.flap_velocity);
        prop_assert_eq!(state.bird.shield, shield);
        prop_assert_eq!(state.bird.invuln, invuln);
    }

    #[test]
    fn seeded_runs_keep_pipes_playable(seed in any::<u64>()) {
        let mut state = GameState::new(Tuning::default(), RngSampler::from_seed(seed)).unwrap();
        apply_intent(&mut state, Intent::Flap);
        let mut last_center = state.last_gap_center;
        let mut seen = 0;
        for _ in 0..(60 * 10) {
            state.bird.pos = Vec2::new(state.tuning.bird_x, 320.0);
            state.bird.vel_y = 0.0;
            state.bird.invuln = 1.0;
            state.bullets.clear();
            tick(&mut state, &idle(), DT);
            if state.last_gap_center != last_center {
                prop_assert!((state.last_gap_center - last_center).abs() <= state.tuning.gap_shift + 1e-3);
                prop_assert!(state.tuning.gap_band.contains(state.last_gap_center));
                last_center = state.last_gap_center;
                seen += 1;
            }
        }
        prop_assert!(seen > 0);
    }
}
