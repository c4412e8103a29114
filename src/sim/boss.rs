//! Boss phase controller
//!
//! The boss slides in from the right, hovers and fires aimed bullets until
//! the session's survive timer runs out, then retreats off the right edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::rng::Sampler;
use super::state::EnemyBullet;
use crate::tuning::Tuning;

/// Boss sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Entering,
    Active,
    Leaving,
}

/// Resting height of the hover oscillation
const HOVER_BASE_Y: f32 = 80.0;
const HOVER_AMPLITUDE: f32 = 60.0;
const HOVER_BASE_FREQ: f32 = 1.2;
const HOVER_FREQ_PER_LEVEL: f32 = 0.1;
/// Active-phase horizontal band is [HOVER_MIN_X, width - w - HOVER_RIGHT_PAD]
const HOVER_MIN_X: f32 = 60.0;
const HOVER_RIGHT_PAD: f32 = 20.0;
/// Entering stops once the boss is this far from the right edge
const REST_RIGHT_PAD: f32 = 40.0;
/// Vertical jitter of the muzzle
const MUZZLE_JITTER: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub level: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub vel_x: f32,
    pub size: Vec2,
    /// Cleared once the boss has left the screen
    pub alive: bool,
    /// Seconds since spawn (scaled time)
    pub time: f32,
    pub fire_cooldown: f32,
    pub phase: BossPhase,
}

impl Boss {
    pub fn new(level: u32, tuning: &Tuning, sampler: &mut impl Sampler) -> Self {
        let tier = level.saturating_sub(1) as f32;
        Self {
            level,
            pos: Vec2::new(tuning.width + tuning.spawn_margin, 120.0),
            vel_x: -tuning.boss_enter_speed,
            size: Vec2::new(tuning.boss_width, tuning.boss_height),
            alive: true,
            time: 0.0,
            fire_cooldown: sampler.sample(tuning.boss_fire_cooldown) / (1.0 + 0.05 * tier),
            phase: BossPhase::Entering,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Angular frequency of the hover, faster at higher levels
    pub fn hover_frequency(&self) -> f32 {
        HOVER_BASE_FREQ + HOVER_FREQ_PER_LEVEL * self.level as f32
    }

    pub fn bullet_speed(&self, tuning: &Tuning) -> f32 {
        tuning.bullet_speed + tuning.bullet_speed_per_level * self.level as f32
    }

    /// Advance the movement state machine
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.time += dt;
        match self.phase {
            BossPhase::Entering => {
                self.pos.x += self.vel_x * dt;
                if self.pos.x <= tuning.width - self.size.x - REST_RIGHT_PAD {
                    self.phase = BossPhase::Active;
                    self.vel_x = 0.0;
                    log::debug!("Boss L{} engaged", self.level);
                }
            }
            BossPhase::Active => {
                self.pos.y = HOVER_BASE_Y + HOVER_AMPLITUDE * (self.time * self.hover_frequency()).sin();
                self.pos.x = self
                    .pos
                    .x
                    .clamp(HOVER_MIN_X, tuning.width - self.size.x - HOVER_RIGHT_PAD);
            }
            BossPhase::Leaving => {
                self.pos.x += self.vel_x * dt;
                if self.pos.x > tuning.width + 50.0 {
                    self.alive = false;
                }
            }
        }
    }

    /// Start the retreat
    pub fn begin_leaving(&mut self, tuning: &Tuning) {
        self.phase = BossPhase::Leaving;
        self.vel_x = tuning.boss_leave_speed;
    }

    /// Count the cooldown down; when it runs out, fire one bullet aimed at
    /// `target` and redraw the cooldown
    pub fn try_fire(
        &mut self,
        dt: f32,
        target: Vec2,
        tuning: &Tuning,
        sampler: &mut impl Sampler,
    ) -> Option<EnemyBullet> {
        if self.phase != BossPhase::Active {
            return None;
        }
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        if self.fire_cooldown > 0.0 {
            return None;
        }

        let tier = self.level.saturating_sub(1) as f32;
        self.fire_cooldown = sampler.sample(tuning.boss_fire_cooldown) / (1.0 + 0.06 * tier);

        let muzzle = Vec2::new(
            self.pos.x + 10.0,
            self.pos.y + self.size.y * 0.5 + sampler.uniform(-MUZZLE_JITTER, MUZZLE_JITTER),
        );
        let vel = crate::aim(muzzle, target) * self.bullet_speed(tuning);
        Some(EnemyBullet::new(muzzle, vel, tuning.bullet_radius))
    }
}
