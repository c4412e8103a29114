//! Data-driven game balance
//!
//! Every physics, spawn and boss constant the simulation reads lives in
//! [`Tuning`]. `Tuning::default()` is the stock balance; a JSON file can
//! override any subset of fields. Tables are validated once at session
//! construction so bad geometry never reaches the tick loop.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed float interval used for every randomized parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Rejected tuning tables
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{name} range is inverted or non-finite ({min}..={max})")]
    InvalidSpan { name: &'static str, min: f32, max: f32 },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("gap center band {min}..={max} does not fit inside the playable area (0..={floor})")]
    GapBandOutOfBounds { min: f32, max: f32, floor: f32 },

    #[error("initial gap center {center} lies outside the gap band {min}..={max}")]
    InitialGapOutsideBand { center: f32, min: f32, max: f32 },

    #[error("largest gap {gap} cannot open around a center in {min}..={max} within 0..={floor}")]
    GapTooLarge { gap: f32, min: f32, max: f32, floor: f32 },

    #[error("slow-motion factor must lie in (0, 1], got {0}")]
    SlowFactor(f32),

    #[error("{name} must point {expected}, got {value}")]
    WrongDirection {
        name: &'static str,
        expected: &'static str,
        value: f32,
    },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("boss threshold must be at least 1")]
    BossThreshold,

    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub width: f32,
    pub height: f32,
    /// Ground strip at the bottom; the floor of play is `height - ground_height`
    pub ground_height: f32,

    // === Bird ===
    pub bird_x: f32,
    pub bird_radius: f32,
    /// px/s²
    pub gravity: f32,
    /// px/s, negative is up
    pub flap_velocity: f32,
    /// Visual flap pulse duration
    pub flap_anim_time: f32,

    // === Pipes ===
    pub pipe_width: f32,
    /// px/s, negative scrolls left
    pub pipe_speed: f32,
    pub pipe_gap: Span,
    /// Seconds between pipe spawns
    pub pipe_interval: Span,
    /// Largest vertical shift of a gap center relative to the previous pipe
    pub gap_shift: f32,
    /// Allowed gap centers
    pub gap_band: Span,
    pub initial_gap_center: f32,
    /// Spawn x offset past the right edge
    pub spawn_margin: f32,

    // === Power-ups ===
    pub powerup_interval: Span,
    pub powerup_radius: f32,
    /// Vertical margin kept free above the ceiling and floor for power-up spawns
    pub powerup_margin: f32,
    pub shield_time: f32,
    pub slow_time: f32,
    /// Time-scale applied while slow-motion is active
    pub slow_factor: f32,
    /// Invulnerability after a shield absorbs a hit
    pub grace_time: f32,

    // === Boss ===
    /// A boss appears every N points
    pub boss_every: u64,
    pub boss_survive_time: f32,
    pub boss_bonus: u64,
    pub boss_width: f32,
    pub boss_height: f32,
    pub boss_enter_speed: f32,
    pub boss_leave_speed: f32,
    pub boss_fire_cooldown: Span,
    pub bullet_speed: f32,
    pub bullet_speed_per_level: f32,
    pub bullet_radius: f32,

    // === Effects ===
    pub hit_shake: f32,
    pub boss_defeat_shake: f32,
    pub burst_count: u32,
    pub burst_speed: Span,
    pub burst_lifetime: f32,
    pub particle_gravity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 640.0,
            ground_height: 80.0,

            bird_x: 120.0,
            bird_radius: 14.0,
            gravity: 1300.0,
            flap_velocity: -360.0,
            flap_anim_time: 0.12,

            pipe_width: 68.0,
            pipe_speed: -170.0,
            pipe_gap: Span::new(130.0, 190.0),
            pipe_interval: Span::new(0.95, 1.55),
            gap_shift: 80.0,
            gap_band: Span::new(120.0, 440.0),
            initial_gap_center: 320.0,
            spawn_margin: 40.0,

            powerup_interval: Span::new(5.0, 9.0),
            powerup_radius: 10.0,
            powerup_margin: 60.0,
            shield_time: 4.5,
            slow_time: 3.0,
            slow_factor: 0.6,
            grace_time: 0.7,

            boss_every: 10,
            boss_survive_time: 20.0,
            boss_bonus: 3,
            boss_width: 120.0,
            boss_height: 70.0,
            boss_enter_speed: 120.0,
            boss_leave_speed: 240.0,
            boss_fire_cooldown: Span::new(0.7, 1.1),
            bullet_speed: 220.0,
            bullet_speed_per_level: 20.0,
            bullet_radius: 6.0,

            hit_shake: 0.2,
            boss_defeat_shake: 0.5,
            burst_count: 12,
            burst_speed: Span::new(80.0, 160.0),
            burst_lifetime: 0.4,
            particle_gravity: 400.0,
        }
    }
}

impl Tuning {
    /// Load a (possibly partial) table from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Bottom of the playable band (top of the ground strip)
    pub fn floor_y(&self) -> f32 {
        self.height - self.ground_height
    }

    /// Reject tables that would produce undefined geometry at runtime
    pub fn validate(&self) -> Result<(), TuningError> {
        let spans = [
            ("pipe_gap", self.pipe_gap),
            ("pipe_interval", self.pipe_interval),
            ("gap_band", self.gap_band),
            ("powerup_interval", self.powerup_interval),
            ("boss_fire_cooldown", self.boss_fire_cooldown),
            ("burst_speed", self.burst_speed),
        ];
        for (name, span) in spans {
            if !span.is_ordered() {
                return Err(TuningError::InvalidSpan {
                    name,
                    min: span.min,
                    max: span.max,
                });
            }
        }

        let positives = [
            ("width", self.width),
            ("height", self.height),
            ("bird_radius", self.bird_radius),
            ("pipe_width", self.pipe_width),
            ("pipe_gap.min", self.pipe_gap.min),
            ("pipe_interval.min", self.pipe_interval.min),
            ("powerup_interval.min", self.powerup_interval.min),
            ("boss_fire_cooldown.min", self.boss_fire_cooldown.min),
            ("boss_width", self.boss_width),
            ("boss_height", self.boss_height),
            ("boss_enter_speed", self.boss_enter_speed),
            ("boss_leave_speed", self.boss_leave_speed),
            ("bullet_speed", self.bullet_speed),
        ];
        for (name, value) in positives {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { name, value });
            }
        }

        // Pipes only leave the screen by scrolling left; gravity pulls down and flaps push up
        let directions = [
            ("pipe_speed", self.pipe_speed, "left (negative)", self.pipe_speed < 0.0),
            ("gravity", self.gravity, "down (positive)", self.gravity > 0.0),
            ("flap_velocity", self.flap_velocity, "up (negative)", self.flap_velocity < 0.0),
        ];
        for (name, value, expected, ok) in directions {
            if !ok || !value.is_finite() {
                return Err(TuningError::WrongDirection {
                    name,
                    expected,
                    value,
                });
            }
        }

        let non_negatives = [
            ("gap_shift", self.gap_shift),
            ("spawn_margin", self.spawn_margin),
            ("flap_anim_time", self.flap_anim_time),
            ("powerup_radius", self.powerup_radius),
            ("powerup_margin", self.powerup_margin),
            ("shield_time", self.shield_time),
            ("slow_time", self.slow_time),
            ("grace_time", self.grace_time),
            ("boss_survive_time", self.boss_survive_time),
            ("bullet_speed_per_level", self.bullet_speed_per_level),
            ("bullet_radius", self.bullet_radius),
            ("hit_shake", self.hit_shake),
            ("boss_defeat_shake", self.boss_defeat_shake),
            ("burst_speed.min", self.burst_speed.min),
            ("burst_lifetime", self.burst_lifetime),
            ("particle_gravity", self.particle_gravity),
        ];
        for (name, value) in non_negatives {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Negative { name, value });
            }
        }

        let floor = self.floor_y();
        if !(floor > 0.0) || self.gap_band.min < 0.0 || self.gap_band.max > floor {
            return Err(TuningError::GapBandOutOfBounds {
                min: self.gap_band.min,
                max: self.gap_band.max,
                floor,
            });
        }
        if !self.gap_band.contains(self.initial_gap_center) {
            return Err(TuningError::InitialGapOutsideBand {
                center: self.initial_gap_center,
                min: self.gap_band.min,
                max: self.gap_band.max,
            });
        }
        let half = self.pipe_gap.max / 2.0;
        if self.gap_band.min - half < 0.0 || self.gap_band.max + half > floor {
            return Err(TuningError::GapTooLarge {
                gap: self.pipe_gap.max,
                min: self.gap_band.min,
                max: self.gap_band.max,
                floor,
            });
        }
        if self.powerup_margin * 2.0 > floor {
            return Err(TuningError::NotPositive {
                name: "powerup spawn band",
                value: floor - self.powerup_margin * 2.0,
            });
        }

        if !(self.slow_factor > 0.0 && self.slow_factor <= 1.0) {
            return Err(TuningError::SlowFactor(self.slow_factor));
        }
        if self.boss_every == 0 {
            return Err(TuningError::BossThreshold);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_gap_range_rejected() {
        let tuning = Tuning {
            pipe_gap: Span::new(200.0, 150.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::InvalidSpan { name: "pipe_gap", .. })
        ));
    }

    #[test]
    fn test_gap_band_below_ground_rejected() {
        let tuning = Tuning {
            gap_band: Span::new(120.0, 600.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::GapBandOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_initial_center_outside_band_rejected() {
        let tuning = Tuning {
            initial_gap_center: 50.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::InitialGapOutsideBand { .. })
        ));
    }

    #[test]
    fn test_slow_factor_bounds() {
        let tuning = Tuning {
            slow_factor: 0.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::SlowFactor(_))));
    }

    #[test]
    fn test_stalled_or_reversed_pipes_rejected() {
        for speed in [0.0, 170.0, f32::NAN] {
            let tuning = Tuning {
                pipe_speed: speed,
                ..Default::default()
            };
            assert!(matches!(
                tuning.validate(),
                Err(TuningError::WrongDirection { name: "pipe_speed", .. })
            ));
        }
    }

    #[test]
    fn test_upward_gravity_rejected() {
        let tuning = Tuning {
            gravity: -1300.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::WrongDirection { name: "gravity", .. })
        ));
    }

    #[test]
    fn test_downward_flap_rejected() {
        let tuning = Tuning {
            flap_velocity: 360.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::WrongDirection { name: "flap_velocity", .. })
        ));
    }

    #[test]
    fn test_negative_gap_shift_rejected() {
        let tuning = Tuning {
            gap_shift: -80.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Negative { name: "gap_shift", .. })
        ));
    }

    #[test]
    fn test_non_finite_durations_rejected() {
        let tuning = Tuning {
            burst_lifetime: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Negative { name: "burst_lifetime", .. })
        ));

        let tuning = Tuning {
            grace_time: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Negative { name: "grace_time", .. })
        ));

        let tuning = Tuning {
            shield_time: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Negative { name: "shield_time", .. })
        ));
    }

    #[test]
    fn test_partial_json_overrides_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 900.0, "boss_every": 5 }"#).unwrap();
        assert_eq!(tuning.gravity, 900.0);
        assert_eq!(tuning.boss_every, 5);
        assert_eq!(tuning.flap_velocity, -360.0);
    }

    #[test]
    fn test_invalid_json_table_fails_fast() {
        let result = Tuning::from_json(r#"{ "pipe_interval": { "min": 2.0, "max": 1.0 } }"#);
        assert!(result.is_err());
    }
}
