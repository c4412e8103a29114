//! Game state and entity types
//!
//! `GameState` exclusively owns every entity collection and timer. Entities
//! carry their own kinematics and collision geometry but never reference
//! the state that owns them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::collision::Rect;
use super::rng::{RngSampler, Sampler};
use super::spawner::SpawnTimer;
use crate::tuning::{Tuning, TuningError};

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first flap
    Ready,
    Playing,
    Paused,
    /// Run ended; only a reset leaves this phase
    Dead,
}

/// Cosmetic color tag for bullets and particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Red,
    Cyan,
}

/// What a lethal contact did to the bird
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Shield consumed, grace window started
    Absorbed,
    /// Inside the grace window; nothing happens
    Ignored,
    Lethal,
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// x never changes during a run
    pub pos: Vec2,
    pub vel_y: f32,
    pub radius: f32,
    pub alive: bool,
    /// Seconds of shield left
    pub shield: f32,
    /// Seconds of post-hit invulnerability left
    pub invuln: f32,
    /// Visual flap pulse, no gameplay effect
    pub flap_timer: f32,
}

impl Bird {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.bird_x, tuning.height / 2.0),
            vel_y: 0.0,
            radius: tuning.bird_radius,
            alive: true,
            shield: 0.0,
            invuln: 0.0,
            flap_timer: 0.0,
        }
    }

    /// Override vertical velocity with the flap impulse
    pub fn flap(&mut self, tuning: &Tuning) {
        if self.alive {
            self.vel_y = tuning.flap_velocity;
            self.flap_timer = tuning.flap_anim_time;
        }
    }

    /// Semi-implicit Euler: velocity first, then position
    pub fn update(&mut self, dt: f32, gravity: f32) {
        self.vel_y += gravity * dt;
        self.pos.y += self.vel_y * dt;
        self.shield = (self.shield - dt).max(0.0);
        self.invuln = (self.invuln - dt).max(0.0);
        self.flap_timer = (self.flap_timer - dt).max(0.0);
    }

    /// Bounding square used against pipes, the boss, bullets and pickups
    pub fn rect(&self) -> Rect {
        Rect::around(self.pos, self.radius)
    }

    /// Resolve a lethal contact. A shield turns it into a grace window,
    /// a running grace window swallows it.
    pub fn hit(&mut self, grace_time: f32) -> HitOutcome {
        if self.shield > 0.0 {
            self.shield = 0.0;
            self.invuln = grace_time;
            return HitOutcome::Absorbed;
        }
        if self.invuln > 0.0 {
            return HitOutcome::Ignored;
        }
        self.alive = false;
        HitOutcome::Lethal
    }

    /// Nose angle for renderers (radians, positive is down)
    pub fn tilt(&self) -> f32 {
        (self.vel_y / 500.0).clamp(-0.6, 0.6)
    }

    /// Draw scale for renderers
    pub fn flap_scale(&self) -> f32 {
        if self.flap_timer > 0.0 { 1.12 } else { 1.0 }
    }
}

/// A top/bottom obstacle pair with a passable gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipePair {
    /// Leading (left) edge
    pub x: f32,
    pub width: f32,
    pub gap_center: f32,
    pub gap: f32,
    pub top: Rect,
    pub bottom: Rect,
    /// Already counted toward the score
    pub passed: bool,
}

impl PipePair {
    /// Build the pair from its gap. Top spans ceiling..gap, bottom spans
    /// gap..floor, so the two never overlap.
    pub fn new(x: f32, gap_center: f32, gap: f32, width: f32, floor: f32) -> Self {
        let top_height = (gap_center - gap / 2.0).max(0.0);
        let bottom_y = (top_height + gap).min(floor);
        Self {
            x,
            width,
            gap_center,
            gap,
            top: Rect::new(x, 0.0, width, top_height),
            bottom: Rect::new(x, bottom_y, width, floor - bottom_y),
            passed: false,
        }
    }

    pub fn update(&mut self, dt: f32, speed: f32) {
        self.x += speed * dt;
        self.top.pos.x = self.x;
        self.bottom.pos.x = self.x;
    }

    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn offscreen(&self) -> bool {
        self.trailing_edge() < 0.0
    }

    pub fn rects(&self) -> [Rect; 2] {
        [self.top, self.bottom]
    }
}

/// Boss projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub tint: Tint,
    pub alive: bool,
}

/// How far past the play area a bullet may travel before it is dropped
const BULLET_BOUNDS_MARGIN: f32 = 20.0;

impl EnemyBullet {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            tint: Tint::Red,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32, width: f32, height: f32) {
        self.pos += self.vel * dt;
        let m = BULLET_BOUNDS_MARGIN;
        if self.pos.x < -m || self.pos.x > width + m || self.pos.y < -m || self.pos.y > height + m {
            self.alive = false;
        }
    }
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    Slow,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Shield, PowerUpKind::Slow];
}

/// A floating pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: PowerUpKind,
    pub radius: f32,
    pub alive: bool,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: Vec2::new(tuning.pipe_speed, 0.0),
            kind,
            radius: tuning.powerup_radius,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        if self.pos.x + self.radius < -5.0 {
            self.alive = false;
        }
    }
}

/// Cosmetic spark; never collides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub tint: Tint,
    pub age: f32,
    pub lifetime: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32, gravity: f32) {
        self.age += dt;
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
    }

    pub fn expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Remaining life in 0..=1, for fading
    pub fn alpha(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

/// Complete session state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState<R = RngSampler> {
    pub tuning: Tuning,
    /// Injected randomness
    pub sampler: R,
    pub phase: GamePhase,
    pub score: u64,
    /// Survives resets for the life of the process
    pub best: u64,
    /// Difficulty tier, +1 per boss survived
    pub level: u32,
    pub bird: Bird,
    pub pipes: Vec<PipePair>,
    pub powerups: Vec<PowerUp>,
    pub bullets: Vec<EnemyBullet>,
    pub particles: Vec<Particle>,
    pub boss: Option<Boss>,
    /// Real-time seconds left before the boss retreats
    pub boss_time: f32,
    pub pipe_timer: SpawnTimer,
    pub powerup_timer: SpawnTimer,
    pub next_boss_at: u64,
    /// Seconds of slow-motion left (real time)
    pub slowmo: f32,
    /// Seconds of screen shake left (real time, cosmetic)
    pub screen_shake: f32,
    pub last_gap_center: f32,
}

impl<R: Sampler> GameState<R> {
    /// Validate the tuning table and start a session in the ready phase
    pub fn new(tuning: Tuning, mut sampler: R) -> Result<Self, TuningError> {
        tuning.validate()?;
        let pipe_timer = SpawnTimer::new(tuning.pipe_interval, &mut sampler);
        let powerup_timer = SpawnTimer::new(tuning.powerup_interval, &mut sampler);
        Ok(Self {
            bird: Bird::new(&tuning),
            next_boss_at: tuning.boss_every,
            last_gap_center: tuning.initial_gap_center,
            tuning,
            sampler,
            phase: GamePhase::Ready,
            score: 0,
            best: 0,
            level: 1,
            pipes: Vec::new(),
            powerups: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            boss: None,
            boss_time: 0.0,
            pipe_timer,
            powerup_timer,
            slowmo: 0.0,
            screen_shake: 0.0,
        })
    }

    /// Start a fresh run. Best score, tuning and sampler carry over.
    pub fn reset(&mut self) {
        let t = &self.tuning;
        self.phase = GamePhase::Ready;
        self.score = 0;
        self.level = 1;
        self.bird = Bird::new(t);
        self.pipes.clear();
        self.powerups.clear();
        self.bullets.clear();
        self.particles.clear();
        self.boss = None;
        self.boss_time = 0.0;
        self.next_boss_at = t.boss_every;
        self.slowmo = 0.0;
        self.screen_shake = 0.0;
        self.last_gap_center = t.initial_gap_center;
        self.pipe_timer = SpawnTimer::new(t.pipe_interval, &mut self.sampler);
        self.powerup_timer = SpawnTimer::new(t.powerup_interval, &mut self.sampler);
        log::debug!("Session reset (best {})", self.best);
    }

    /// Multiplier applied to entity dt
    pub fn time_scale(&self) -> f32 {
        if self.slowmo > 0.0 {
            self.tuning.slow_factor
        } else {
            1.0
        }
    }

    pub fn boss_active(&self) -> bool {
        self.boss.is_some()
    }
}
