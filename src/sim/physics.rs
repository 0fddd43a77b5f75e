//! Ball integration and collision response
//!
//! Checks run in a fixed order each frame: walls, ceiling, paddle, bricks,
//! floor. A brick win or a floor hit ends the frame early.

use super::collision::paddle_bounce_velocity;
use super::grid::row_color;
use super::state::{GameEvent, GameState, Outcome};

/// Advance the active ball by one frame scaled by `dt_scale`
pub fn advance(state: &mut GameState, dt_scale: f32) -> Outcome {
    let GameState {
        field,
        tuning,
        score,
        lives,
        paddle,
        ball,
        grid,
        particles,
        events,
        rng,
        ..
    } = state;

    ball.pos += ball.vel * dt_scale;

    // Side walls. Reflect only when heading outward so a deep overlap
    // cannot flip the ball back and forth.
    let hits_right = ball.pos.x + ball.radius >= field.width && ball.vel.x > 0.0;
    let hits_left = ball.pos.x - ball.radius <= 0.0 && ball.vel.x < 0.0;
    if hits_right || hits_left {
        ball.vel.x = -ball.vel.x;
        events.push(GameEvent::WallBounce);
    }

    // Ceiling
    if ball.pos.y - ball.radius < 0.0 && ball.vel.y < 0.0 {
        ball.vel.y = -ball.vel.y;
        events.push(GameEvent::WallBounce);
    }

    // Paddle
    let paddle_rect = paddle.rect();
    if ball.bounds().overlaps(&paddle_rect) {
        ball.vel = paddle_bounce_velocity(
            ball.pos.x,
            &paddle_rect,
            ball.speed,
            tuning.max_bounce_angle(),
        );
        events.push(GameEvent::PaddleBounce);
    }

    // Bricks: first hit only
    if let Some((column, row)) = grid.first_hit(&ball.bounds(), field.width) {
        ball.vel.y = -ball.vel.y;
        grid.break_cell(column, row);
        *score += tuning.brick_points;
        events.push(GameEvent::BrickBroken { column, row });
        particles.spawn(ball.pos, row_color(row), tuning.particle_burst, rng);

        if grid.all_broken() {
            return Outcome::BrickWin;
        }
    }

    // Floor
    if ball.pos.y + ball.radius > field.height {
        *lives = lives.saturating_sub(1);
        events.push(GameEvent::LifeLost);
        if *lives == 0 {
            return Outcome::FloorGameOver;
        }
        paddle.recenter(field);
        ball.rest_on(paddle);
        return Outcome::FloorLifeLost;
    }

    Outcome::Continue
}
