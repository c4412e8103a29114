//! Render snapshot
//!
//! Copies what a renderer needs out of the game state so drawing never
//! touches (or mutates) the simulation.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{BossPhase, GamePhase, GameState, PowerUpKind, Sampler, Tint};

/// Semantic tag used to pick a visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Bird,
    PipeTop,
    PipeBottom,
    Boss(BossPhase),
    Bullet(Tint),
    PowerUp(PowerUpKind),
    Particle(Tint),
}

/// One drawable, `pos` is the top-left corner of its bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// 0..=1 fade
    pub alpha: f32,
}

impl Sprite {
    fn solid(kind: SpriteKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            pos,
            size,
            alpha: 1.0,
        }
    }

    fn circle(kind: SpriteKind, center: Vec2, radius: f32, alpha: f32) -> Self {
        Self {
            kind,
            pos: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
            alpha,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossHud {
    pub level: u32,
    pub phase: BossPhase,
    /// Whole seconds left to survive
    pub survive_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub best: u64,
    pub level: u32,
    pub shield: f32,
    pub slowmo: f32,
    pub screen_shake: f32,
    /// Present once the boss has finished entering
    pub boss: Option<BossHud>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub title: String,
    pub subtitle: String,
}

/// Everything a renderer may read for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub width: f32,
    pub height: f32,
    pub floor_y: f32,
    pub hud: Hud,
    pub overlay: Option<Overlay>,
    /// Back to front
    pub sprites: Vec<Sprite>,
    pub bird_tilt: f32,
    pub bird_scale: f32,
}

/// Title/subtitle pair for the current phase (none while playing)
pub fn overlay_text(phase: GamePhase, score: u64) -> Option<Overlay> {
    let (title, subtitle) = match phase {
        GamePhase::Playing => return None,
        GamePhase::Ready => (
            "Click/Space to start".to_string(),
            "W/Up/Space to flap - Boss every 10!".to_string(),
        ),
        GamePhase::Paused => ("Paused".to_string(), "Press P to resume".to_string()),
        GamePhase::Dead => (
            format!("Game Over - score {}", score),
            "Press R or click to restart".to_string(),
        ),
    };
    Some(Overlay { title, subtitle })
}

/// Build the snapshot for the current frame
pub fn snapshot<R: Sampler>(state: &GameState<R>) -> Snapshot {
    let mut sprites = Vec::with_capacity(
        state.pipes.len() * 2 + state.powerups.len() + state.bullets.len() + state.particles.len() + 2,
    );

    for pipe in &state.pipes {
        sprites.push(Sprite::solid(SpriteKind::PipeTop, pipe.top.pos, pipe.top.size));
        sprites.push(Sprite::solid(SpriteKind::PipeBottom, pipe.bottom.pos, pipe.bottom.size));
    }
    for powerup in &state.powerups {
        sprites.push(Sprite::circle(
            SpriteKind::PowerUp(powerup.kind),
            powerup.pos,
            powerup.radius,
            1.0,
        ));
    }
    if let Some(boss) = &state.boss {
        sprites.push(Sprite::solid(SpriteKind::Boss(boss.phase), boss.pos, boss.size));
        for bullet in &state.bullets {
            sprites.push(Sprite::circle(
                SpriteKind::Bullet(bullet.tint),
                bullet.pos,
                bullet.radius,
                1.0,
            ));
        }
    }
    for particle in &state.particles {
        let alpha = particle.alpha();
        sprites.push(Sprite::circle(
            SpriteKind::Particle(particle.tint),
            particle.pos,
            (particle.radius * alpha).max(1.0),
            alpha,
        ));
    }
    sprites.push(Sprite::circle(
        SpriteKind::Bird,
        state.bird.pos,
        state.bird.radius * state.bird.flap_scale(),
        1.0,
    ));

    let boss = state
        .boss
        .as_ref()
        .filter(|b| b.phase != BossPhase::Entering)
        .map(|b| BossHud {
            level: state.level,
            phase: b.phase,
            survive_secs: state.boss_time as u32,
        });

    Snapshot {
        phase: state.phase,
        width: state.tuning.width,
        height: state.tuning.height,
        floor_y: state.tuning.floor_y(),
        hud: Hud {
            score: state.score,
            best: state.best,
            level: state.level,
            shield: state.bird.shield,
            slowmo: state.slowmo,
            screen_shake: state.screen_shake,
            boss,
        },
        overlay: overlay_text(state.phase, state.score),
        sprites,
        bird_tilt: state.bird.tilt(),
        bird_scale: state.bird.flap_scale(),
    }
}
