//! Data-driven game balance
//!
//! Every gameplay constant lives here so hosts can swap in a JSON override
//! without touching the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay constants for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between the paddle top and the floor
    pub paddle_floor_gap: f32,
    /// Keep the whole paddle rectangle inside the field
    pub clamp_paddle: bool,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub launch_angle_deg: f32,
    pub max_bounce_angle_deg: f32,

    // === Bricks ===
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    /// Left margin, also the starting scroll offset
    pub brick_offset_x: f32,
    pub brick_offset_y: f32,
    pub brick_rows: usize,
    /// Scroll per nominal frame (0 = static formation)
    pub brick_drift: f32,

    // === Scoring ===
    pub brick_points: u64,
    pub win_bonus: u64,
    pub starting_lives: u8,

    // === Particles ===
    pub particle_burst: usize,
    pub particle_fade: f32,
    pub particle_spread: f32,

    // === Timing ===
    pub max_dt_scale: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_floor_gap: PADDLE_FLOOR_GAP,
            clamp_paddle: false,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            launch_angle_deg: LAUNCH_ANGLE_DEG,
            max_bounce_angle_deg: MAX_BOUNCE_ANGLE_DEG,

            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_padding: BRICK_PADDING,
            brick_offset_x: BRICK_OFFSET_X,
            brick_offset_y: BRICK_OFFSET_Y,
            brick_rows: BRICK_ROWS,
            brick_drift: BRICK_DRIFT,

            brick_points: BRICK_POINTS,
            win_bonus: WIN_BONUS,
            starting_lives: STARTING_LIVES,

            particle_burst: PARTICLE_BURST,
            particle_fade: PARTICLE_FADE,
            particle_spread: PARTICLE_SPREAD,

            max_dt_scale: MAX_DT_SCALE,
        }
    }
}

impl Tuning {
    /// Three static rows with no drift
    pub fn classic() -> Self {
        Self {
            brick_rows: 3,
            brick_drift: 0.0,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("brick_width", self.brick_width),
            ("brick_height", self.brick_height),
            ("max_dt_scale", self.max_dt_scale),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }

        let non_negative = [
            ("paddle_floor_gap", self.paddle_floor_gap),
            ("brick_padding", self.brick_padding),
            ("brick_offset_x", self.brick_offset_x),
            ("brick_offset_y", self.brick_offset_y),
            ("particle_fade", self.particle_fade),
            ("particle_spread", self.particle_spread),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be zero or positive",
                });
            }
        }

        if !self.brick_drift.is_finite() {
            return Err(TuningError::Invalid {
                field: "brick_drift",
                reason: "must be finite",
            });
        }
        if !(self.max_bounce_angle_deg > 0.0 && self.max_bounce_angle_deg < 90.0) {
            return Err(TuningError::Invalid {
                field: "max_bounce_angle_deg",
                reason: "must be between 0 and 90 degrees",
            });
        }
        if !(self.launch_angle_deg.abs() < 90.0) {
            return Err(TuningError::Invalid {
                field: "launch_angle_deg",
                reason: "must point upward",
            });
        }
        if self.brick_rows == 0 {
            return Err(TuningError::Invalid {
                field: "brick_rows",
                reason: "needs at least one row",
            });
        }
        if self.starting_lives == 0 {
            return Err(TuningError::Invalid {
                field: "starting_lives",
                reason: "needs at least one life",
            });
        }
        Ok(())
    }

    /// Launch angle in radians
    #[inline]
    pub fn launch_angle(&self) -> f32 {
        self.launch_angle_deg.to_radians()
    }

    /// Largest paddle deflection in radians
    #[inline]
    pub fn max_bounce_angle(&self) -> f32 {
        self.max_bounce_angle_deg.to_radians()
    }
}

/// Why a tuning override was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON for [`Tuning`]
    Parse(serde_json::Error),
    /// Parsed, but a value is out of range
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "invalid tuning JSON: {err}"),
            TuningError::Invalid { field, reason } => write!(f, "tuning `{field}` {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid { .. } => None,
        }
    }
}
