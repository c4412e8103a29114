//! Spawn policies
//!
//! Pipes and power-ups appear on randomized timers that only run while no
//! boss is alive; the boss appears when the score reaches a running
//! threshold.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::rng::Sampler;
use super::state::{GameState, PipePair, PowerUp, PowerUpKind};
use crate::tuning::{Span, Tuning};

/// Accumulates tick time until a randomly drawn threshold is reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub elapsed: f32,
    pub threshold: f32,
    pub interval: Span,
}

impl SpawnTimer {
    pub fn new(interval: Span, sampler: &mut impl Sampler) -> Self {
        Self {
            elapsed: 0.0,
            threshold: sampler.sample(interval),
            interval,
        }
    }

    /// Advance by `dt`; returns true (and redraws the threshold) when due
    pub fn advance(&mut self, dt: f32, sampler: &mut impl Sampler) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.threshold {
            self.restart(sampler);
            return true;
        }
        false
    }

    pub fn restart(&mut self, sampler: &mut impl Sampler) {
        self.elapsed = 0.0;
        self.threshold = sampler.sample(self.interval);
    }
}

/// Next gap center: previous center plus a bounded random shift, clamped
/// into the gap band
pub fn next_gap_center(tuning: &Tuning, last_center: f32, sampler: &mut impl Sampler) -> f32 {
    let shift = sampler.uniform(-tuning.gap_shift, tuning.gap_shift);
    (last_center + shift).clamp(tuning.gap_band.min, tuning.gap_band.max)
}

/// Create the next pipe pair just past the right edge
pub fn make_pipe(tuning: &Tuning, last_center: f32, sampler: &mut impl Sampler) -> PipePair {
    let gap = sampler.sample(tuning.pipe_gap);
    let center = next_gap_center(tuning, last_center, sampler);
    PipePair::new(
        tuning.width + tuning.spawn_margin,
        center,
        gap,
        tuning.pipe_width,
        tuning.floor_y(),
    )
}

/// Create a power-up slightly ahead of the incoming pipes
pub fn make_powerup(tuning: &Tuning, sampler: &mut impl Sampler) -> PowerUp {
    let x = tuning.width + tuning.spawn_margin + tuning.pipe_width + 30.0;
    let y = sampler.uniform(
        tuning.powerup_margin,
        tuning.floor_y() - tuning.powerup_margin,
    );
    let kind = sampler.choose(&PowerUpKind::ALL);
    PowerUp::new(Vec2::new(x, y), kind, tuning)
}

impl<R: Sampler> GameState<R> {
    pub fn spawn_pipe(&mut self) {
        let pipe = make_pipe(&self.tuning, self.last_gap_center, &mut self.sampler);
        log::debug!("Pipe spawned: gap {:.0} at y={:.0}", pipe.gap, pipe.gap_center);
        self.last_gap_center = pipe.gap_center;
        self.pipes.push(pipe);
    }

    pub fn spawn_powerup(&mut self) {
        let powerup = make_powerup(&self.tuning, &mut self.sampler);
        log::debug!("Power-up spawned: {:?} at y={:.0}", powerup.kind, powerup.pos.y);
        self.powerups.push(powerup);
    }

    pub fn spawn_boss(&mut self) {
        self.boss = Some(Boss::new(self.level, &self.tuning, &mut self.sampler));
        self.boss_time = self.tuning.boss_survive_time;
        log::info!("Boss L{} incoming at score {}", self.level, self.score);
    }

    /// Run the pipe and power-up timers; both are frozen while a boss is up
    pub(crate) fn run_spawners(&mut self, dt: f32) {
        if self.boss.is_some() {
            return;
        }
        if self.pipe_timer.advance(dt, &mut self.sampler) {
            self.spawn_pipe();
        }
        if self.powerup_timer.advance(dt, &mut self.sampler) {
            self.spawn_powerup();
        }
    }

    /// Spawn the boss once the score reaches the current threshold
    pub(crate) fn check_boss_threshold(&mut self) {
        if self.boss.is_none() && self.score >= self.next_boss_at {
            self.spawn_boss();
        }
    }
}
