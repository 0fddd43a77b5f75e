//! Neon Breakout - a Breakout variant with a drifting brick formation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, round state)
//! - `frame`: Frame clock and the per-frame scheduler
//! - `renderer`: 2D surface abstraction, tessellation and the WebGPU pipeline
//! - `audio`: Tone feedback for gameplay events
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod frame;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use frame::{FrameClock, Game};
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

/// RGBA color with components in 0.0 - 1.0
pub type Rgba = [f32; 4];

/// Game configuration constants
pub mod consts {
    /// Frame duration the motion constants are tuned for (60 fps)
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest dt scale applied in one frame (100 ms stall)
    pub const MAX_DT_SCALE: f32 = 6.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Distance from the paddle top to the bottom of the field
    pub const PADDLE_FLOOR_GAP: f32 = 30.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPEED: f32 = 6.0;
    /// Launch direction, degrees from vertical (positive = rightward)
    pub const LAUNCH_ANGLE_DEG: f32 = 45.0;
    /// Largest paddle deflection, degrees from vertical
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;

    /// Brick formation defaults
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_X: f32 = 30.0;
    pub const BRICK_OFFSET_Y: f32 = 50.0;
    pub const BRICK_ROWS: usize = 5;
    /// Horizontal drift per nominal frame
    pub const BRICK_DRIFT: f32 = 5.0;

    /// Scoring
    pub const BRICK_POINTS: u64 = 10;
    pub const WIN_BONUS: u64 = 100;
    pub const STARTING_LIVES: u8 = 3;

    /// Particle bursts
    pub const PARTICLE_BURST: usize = 10;
    /// Opacity lost per nominal frame
    pub const PARTICLE_FADE: f32 = 0.02;
    /// Full width of the per-axis velocity range
    pub const PARTICLE_SPREAD: f32 = 5.0;

    /// Autopilot aim: frames of ball travel to lead by
    pub const AUTOPILOT_LEAD_FRAMES: f32 = 4.0;
    /// Autopilot wobble as two sines (rad/s, fraction of paddle width)
    pub const AUTOPILOT_SLOW_WOBBLE: (f32, f32) = (0.9, 0.3);
    pub const AUTOPILOT_FAST_WOBBLE: (f32, f32) = (2.3, 0.1);
}

/// Wrap `value` into `[0, modulus)`, also for negative inputs
///
/// A non-positive modulus leaves the value untouched.
#[inline]
pub fn wrap(value: f32, modulus: f32) -> f32 {
    if modulus <= 0.0 {
        return value;
    }
    let wrapped = value.rem_euclid(modulus);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= modulus { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_positive_and_negative() {
        assert_eq!(wrap(30.0, 850.0), 30.0);
        assert_eq!(wrap(860.0, 850.0), 10.0);
        assert_eq!(wrap(-10.0, 850.0), 840.0);
        assert_eq!(wrap(-1700.0, 850.0), 0.0);
    }

    #[test]
    fn test_wrap_tiny_negative_stays_in_range() {
        let w = wrap(-1.0e-9, 850.0);
        assert!((0.0..850.0).contains(&w));
    }

    #[test]
    fn test_wrap_degenerate_modulus() {
        assert_eq!(wrap(12.5, 0.0), 12.5);
    }
}
