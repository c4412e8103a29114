//! Simulation module
//!
//! All gameplay logic lives here:
//! - Time-scaled semi-implicit Euler integration
//! - Randomness only through the injected `Sampler`
//! - Stable iteration order (insertion order) within a tick
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossPhase};
pub use collision::{Rect, rect_circle_overlap, rect_rect_overlap};
pub use rng::{FixedSampler, RngSampler, Sampler};
pub use spawner::{SpawnTimer, make_pipe, make_powerup, next_gap_center};
pub use state::{
    Bird, EnemyBullet, GamePhase, GameState, HitOutcome, Particle, PipePair, PowerUp, PowerUpKind,
    Tint,
};
pub use tick::{Intent, TickInput, apply_intent, tick};
