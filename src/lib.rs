//! Flappy Plus - a side-scrolling gap runner with boss fights
//!
//! Core modules:
//! - `sim`: Simulation (physics, spawning, collisions, game state machine)
//! - `tuning`: Data-driven game balance
//! - `view`: Read-only render snapshot for front-ends
//! - `platform`: Input translation for the terminal front-end
//! - `renderer`: Terminal renderer

pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod view;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Span, Tuning, TuningError};

use glam::Vec2;

/// Front-end loop constants
pub mod consts {
    /// Target frame rate of the tick loop
    pub const TICK_RATE: u32 = 60;
    /// Largest dt fed to a single tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
}

/// Unit vector from `from` toward `to` (zero-safe)
#[inline]
pub fn aim(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    d / (d.length() + 1e-5)
}
