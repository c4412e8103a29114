//! Simulation tick
//!
//! One call to [`tick`] applies the pending intents, then (only while
//! playing) advances every entity, resolves collisions in a fixed order and
//! sweeps out expired entities.

use glam::Vec2;

use super::boss::BossPhase;
use super::collision::{rect_circle_overlap, rect_rect_overlap};
use super::rng::Sampler;
use super::state::{GamePhase, GameState, HitOutcome, Particle, PowerUpKind, Tint};

/// Abstract input produced by a front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Keyboard flap: starts a run, flaps, or resets after death
    Flap,
    /// Pointer click: like flap, but a reset goes straight into a new run
    Confirm,
    PauseToggle,
    /// Back to the ready screen from any phase
    Restart,
    Quit,
}

/// Intents collected since the previous tick, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    pub fn quit_requested(&self) -> bool {
        self.intents.contains(&Intent::Quit)
    }

    pub fn clear(&mut self) {
        self.intents.clear();
    }
}

/// Apply one intent to the top-level state machine
pub fn apply_intent<R: Sampler>(state: &mut GameState<R>, intent: Intent) {
    match intent {
        Intent::Flap => match state.phase {
            GamePhase::Ready => {
                state.phase = GamePhase::Playing;
                state.bird.flap(&state.tuning);
                log::info!("Run started");
            }
            GamePhase::Playing => state.bird.flap(&state.tuning),
            GamePhase::Dead => state.reset(),
            GamePhase::Paused => {}
        },
        Intent::Confirm => match state.phase {
            GamePhase::Ready | GamePhase::Dead => {
                state.reset();
                state.phase = GamePhase::Playing;
                state.bird.flap(&state.tuning);
                log::info!("Run started");
            }
            GamePhase::Playing => state.bird.flap(&state.tuning),
            GamePhase::Paused => {}
        },
        Intent::PauseToggle => match state.phase {
            GamePhase::Playing => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        },
        Intent::Restart => state.reset(),
        Intent::Quit => {}
    }
}

/// Advance the session by `dt` real seconds
pub fn tick<R: Sampler>(state: &mut GameState<R>, input: &TickInput, dt: f32) {
    for &intent in &input.intents {
        apply_intent(state, intent);
    }

    // Paused and dead sessions are frozen
    if state.phase != GamePhase::Playing {
        return;
    }

    // Slow-motion scales entity time; its own timer and the shake run in real time
    let edt = dt * state.time_scale();
    state.slowmo = (state.slowmo - dt).max(0.0);
    state.screen_shake = (state.screen_shake - dt).max(0.0);

    // --- Movement: bird, spawners, pipes, power-ups, boss + bullets ---
    state.bird.update(edt, state.tuning.gravity);
    state.run_spawners(edt);

    let pipe_speed = state.tuning.pipe_speed;
    for pipe in &mut state.pipes {
        pipe.update(edt, pipe_speed);
    }
    for powerup in &mut state.powerups {
        powerup.update(edt);
    }
    advance_boss(state, edt);

    // --- Scoring ---
    if !state.boss_active() {
        let bird_x = state.bird.pos.x;
        for pipe in &mut state.pipes {
            if !pipe.passed && pipe.trailing_edge() < bird_x {
                pipe.passed = true;
                state.score += 1;
            }
        }
    }

    // --- Collisions: bounds, obstacles, bullets, pickups ---
    resolve_collisions(state);
    if state.phase == GamePhase::Dead {
        return;
    }

    // --- Boss lifecycle (real-time survive timer) ---
    update_boss_lifecycle(state, dt);
    state.check_boss_threshold();

    for particle in &mut state.particles {
        particle.update(edt, state.tuning.particle_gravity);
    }

    // --- Sweep ---
    state.pipes.retain(|p| !p.offscreen());
    state.powerups.retain(|p| p.alive);
    state.bullets.retain(|b| b.alive);
    state.particles.retain(|p| !p.expired());
}

/// Move the boss and its bullets; fire when the cooldown allows
fn advance_boss<R: Sampler>(state: &mut GameState<R>, edt: f32) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    boss.update(edt, &state.tuning);
    if let Some(bullet) = boss.try_fire(edt, state.bird.pos, &state.tuning, &mut state.sampler) {
        state.bullets.push(bullet);
    }
    let (w, h) = (state.tuning.width, state.tuning.height);
    for bullet in &mut state.bullets {
        bullet.update(edt, w, h);
    }
}

fn resolve_collisions<R: Sampler>(state: &mut GameState<R>) {
    let floor = state.tuning.floor_y();
    let bird = &state.bird;
    let bird_rect = bird.rect();

    // (a) ceiling / floor
    if bird.pos.y - bird.radius <= 0.0 || bird.pos.y + bird.radius >= floor {
        let at = bird.pos;
        if resolve_hit(state, at) == HitOutcome::Lethal {
            return;
        }
    }

    // (b) obstacles: pipes still on screen, plus the boss body
    let pipe_hits = state
        .pipes
        .iter()
        .flat_map(|p| p.rects())
        .filter(|r| rect_rect_overlap(r, &bird_rect))
        .count();
    let boss_hit = state
        .boss
        .as_ref()
        .is_some_and(|b| rect_rect_overlap(&b.rect(), &bird_rect));
    for _ in 0..pipe_hits + usize::from(boss_hit) {
        let at = state.bird.pos;
        if resolve_hit(state, at) == HitOutcome::Lethal {
            return;
        }
    }

    // (c) bullets, only while a boss is up
    if state.boss_active() {
        for i in 0..state.bullets.len() {
            let bullet = &state.bullets[i];
            if !bullet.alive || !rect_circle_overlap(&bird_rect, bullet.pos, bullet.radius) {
                continue;
            }
            let at = Vec2::new(bullet.pos.x, state.bird.pos.y);
            match resolve_hit(state, at) {
                HitOutcome::Lethal => return,
                HitOutcome::Absorbed => state.bullets[i].alive = false,
                HitOutcome::Ignored => {}
            }
        }
    }

    // (d) pickups
    for i in 0..state.powerups.len() {
        let powerup = &state.powerups[i];
        if !powerup.alive || !rect_circle_overlap(&bird_rect, powerup.pos, powerup.radius) {
            continue;
        }
        match powerup.kind {
            PowerUpKind::Shield => state.bird.shield = state.tuning.shield_time,
            PowerUpKind::Slow => state.slowmo = state.tuning.slow_time,
        }
        log::debug!("Picked up {:?}", powerup.kind);
        state.powerups[i].alive = false;
    }
}

/// Single entry point for every lethal contact
fn resolve_hit<R: Sampler>(state: &mut GameState<R>, at: Vec2) -> HitOutcome {
    let outcome = state.bird.hit(state.tuning.grace_time);
    match outcome {
        HitOutcome::Absorbed => {
            log::debug!("Shield absorbed a hit");
            hit_burst(state, at);
        }
        HitOutcome::Ignored => {}
        HitOutcome::Lethal => {
            state.phase = GamePhase::Dead;
            state.best = state.best.max(state.score);
            log::info!("Bird down: score {}, level {}, best {}", state.score, state.level, state.best);
        }
    }
    outcome
}

/// Spark burst plus a short shake
fn hit_burst<R: Sampler>(state: &mut GameState<R>, at: Vec2) {
    let t = &state.tuning;
    for _ in 0..t.burst_count {
        let angle = state.sampler.uniform(0.0, std::f32::consts::TAU);
        let speed = state.sampler.sample(t.burst_speed);
        state.particles.push(Particle {
            pos: at,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            radius: 2.0,
            tint: Tint::Cyan,
            age: 0.0,
            lifetime: t.burst_lifetime,
        });
    }
    state.screen_shake = state.screen_shake.max(t.hit_shake);
}

/// Survive timer, defeat bonus and removal once the boss has left
fn update_boss_lifecycle<R: Sampler>(state: &mut GameState<R>, dt: f32) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    state.boss_time = (state.boss_time - dt).max(0.0);
    if state.boss_time <= 0.0 && boss.phase != BossPhase::Leaving {
        boss.begin_leaving(&state.tuning);
        state.level += 1;
        state.score += state.tuning.boss_bonus;
        state.screen_shake = state.tuning.boss_defeat_shake;
        log::info!("Boss survived! Level {} (score {})", state.level, state.score);
    }

    if !boss.alive {
        state.boss = None;
        state.next_boss_at += state.tuning.boss_every;
        state.bullets.clear();
        state.pipe_timer.restart(&mut state.sampler);
        log::debug!("Boss gone; next boss at {}", state.next_boss_at);
    }
}
