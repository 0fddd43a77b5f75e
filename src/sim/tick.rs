//! Per-frame simulation step
//!
//! One call per display frame. Movement is scaled by `dt_scale`, the frame's
//! length in nominal 60 Hz frames.

use super::physics::advance;
use super::state::{GamePhase, GameState};
use crate::consts::{
    AUTOPILOT_FAST_WOBBLE, AUTOPILOT_LEAD_FRAMES, AUTOPILOT_SLOW_WOBBLE, NOMINAL_FRAME_MS,
};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer X in field pixels (mouse or first touch)
    pub pointer_x: Option<f32>,
    /// Launch the served ball (click/tap)
    pub launch: bool,
    /// Demo mode - the paddle tracks the ball and serves by itself
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt_scale: f32) {
    state.anim_time_ms += f64::from(dt_scale) * NOMINAL_FRAME_MS;

    if state.phase.is_terminal() || state.phase == GamePhase::Idle {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        steer_autopilot(state, &mut input);
    }

    if let Some(x) = input.pointer_x {
        let clamp = state.tuning.clamp_paddle;
        state.paddle.follow_pointer(x, &state.field, clamp);
    }

    state.particles.tick(dt_scale);

    // Drift before physics so the offset hit-tested here is the one drawn
    state.grid.scroll(dt_scale);

    match state.phase {
        GamePhase::Serving => {
            state.ball.rest_on(&state.paddle);
            if input.launch {
                state.launch();
            }
        }
        GamePhase::InPlay => {
            let outcome = advance(state, dt_scale);
            state.apply_outcome(outcome);
        }
        _ => {}
    }
}

/// Point the paddle at the ball and serve immediately
fn steer_autopilot(state: &GameState, input: &mut TickInput) {
    if state.phase == GamePhase::Serving {
        input.launch = true;
    }

    // Wobble around the ball so rallies don't settle into a loop
    let t = (state.anim_time_ms / 1000.0) as f32;
    let (slow_rate, slow_amp) = AUTOPILOT_SLOW_WOBBLE;
    let (fast_rate, fast_amp) = AUTOPILOT_FAST_WOBBLE;
    let wobble = (t * slow_rate).sin() * slow_amp + (t * fast_rate).sin() * fast_amp;
    let lead = state.ball.vel.x * AUTOPILOT_LEAD_FRAMES;
    let target = state.ball.pos.x + lead + wobble * state.paddle.size.x;

    // Stay strictly inside the field so the pointer is never ignored
    let width = state.field.width;
    input.pointer_x = Some(target.clamp(1.0, (width - 1.0).max(1.0)));
}
