//! Front-end preferences
//!
//! Loaded from an optional JSON file; missing fields fall back to defaults.
//! None of this changes gameplay.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_FRAME_DT, TICK_RATE};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_frame_dt must be finite and positive, got {0}")]
    FrameDt(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frames (and ticks) per second
    pub tick_rate: u32,
    /// Upper bound on the dt handed to one tick
    pub max_frame_dt: f32,

    // === Visual Effects ===
    /// Screen shake on hits and boss defeats
    pub screen_shake: bool,
    /// Hit spark particles
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            max_frame_dt: MAX_FRAME_DT,
            screen_shake: true,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(SettingsError::FrameDt(self.max_frame_dt));
        }
        Ok(())
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Wall-clock budget of one frame
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate.max(1)))
    }

    /// Clamp a measured frame time into the dt handed to `tick`
    pub fn clamp_dt(&self, elapsed: Duration) -> f32 {
        let cap = if self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0 {
            self.max_frame_dt
        } else {
            MAX_FRAME_DT
        };
        elapsed.as_secs_f32().min(cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(Settings::default().effective_screen_shake());
    }

    #[test]
    fn test_clamp_dt() {
        let settings = Settings::default();
        assert_eq!(settings.clamp_dt(Duration::from_millis(500)), MAX_FRAME_DT);
        assert!((settings.clamp_dt(Duration::from_millis(16)) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_bad_frame_cap_rejected_and_never_reaches_tick() {
        for cap in [-0.1, 0.0, f32::NAN] {
            let settings = Settings {
                max_frame_dt: cap,
                ..Default::default()
            };
            assert!(matches!(settings.validate(), Err(SettingsError::FrameDt(_))));
            let dt = settings.clamp_dt(Duration::from_millis(500));
            assert_eq!(dt, MAX_FRAME_DT);
        }
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{ "tick_rate": 30 }"#).unwrap();
        assert_eq!(settings.tick_rate, 30);
        assert!(settings.particles);
        assert_eq!(settings.frame_duration(), Duration::from_secs_f64(1.0 / 30.0));
    }
}
