//! Round state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`], which the
//! scheduler owns and lends to each component call.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::grid::{BrickGrid, BrickLayout};
use super::particle::ParticleSystem;
use crate::tuning::Tuning;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Before the first start
    Idle,
    /// Ball resting on the paddle, waiting for launch input
    Serving,
    /// Ball moving, physics active
    InPlay,
    /// Ball dropped with lives left; passes straight back to `Serving`
    LifeLost,
    /// Every brick destroyed
    Won,
    /// Out of lives
    GameOver,
}

impl GamePhase {
    /// Round finished; only a retry leaves this phase
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::GameOver)
    }
}

/// Gameplay events raised during a tick, drained by the host for audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    WallBounce,
    PaddleBounce,
    BrickBroken { column: usize, row: usize },
    LifeLost,
}

/// Result of advancing the ball one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The last brick was destroyed
    BrickWin,
    /// Ball hit the floor, lives remain
    FloorLifeLost,
    /// Ball hit the floor on the last life
    FloorGameOver,
}

/// Play field dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Ball state - resting on the paddle or moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    Dormant,
    Active,
}

/// The ball
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Scalar speed every bounce preserves
    pub speed: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            speed,
            state: BallState::Dormant,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::around_circle(self.pos, self.radius)
    }

    #[inline]
    pub fn is_dormant(&self) -> bool {
        self.state == BallState::Dormant
    }

    /// Sit motionless on top of the paddle, horizontally centered
    pub fn rest_on(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.pos.y - self.radius);
        self.vel = Vec2::ZERO;
        self.state = BallState::Dormant;
    }

    /// Leave the paddle at `angle` from vertical (positive = rightward)
    pub fn launch(&mut self, angle: f32) {
        self.vel = Vec2::new(self.speed * angle.sin(), -self.speed * angle.cos());
        self.state = BallState::Active;
    }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal displacement applied by the last pointer update
    pub dx: f32,
}

impl Paddle {
    pub fn new(field: &Field, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.paddle_width, tuning.paddle_height);
        Self {
            pos: Vec2::new(
                field.width / 2.0 - size.x / 2.0,
                field.height - tuning.paddle_floor_gap,
            ),
            size,
            dx: 0.0,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    #[inline]
    pub fn rect(&self) -> Aabb {
        Aabb::from_origin_size(self.pos, self.size)
    }

    /// Center horizontally in the field
    pub fn recenter(&mut self, field: &Field) {
        self.pos.x = field.width / 2.0 - self.size.x / 2.0;
        self.dx = 0.0;
    }

    /// Center the paddle on a pointer X
    ///
    /// Pointer positions outside the open interval `(0, field.width)` are
    /// ignored. With `clamp` the rectangle is also kept inside the field.
    pub fn follow_pointer(&mut self, pointer_x: f32, field: &Field, clamp: bool) {
        if !(pointer_x > 0.0 && pointer_x < field.width) {
            return;
        }
        let mut x = pointer_x - self.size.x / 2.0;
        if clamp {
            x = x.clamp(0.0, (field.width - self.size.x).max(0.0));
        }
        self.dx = x - self.pos.x;
        self.pos.x = x;
    }
}

/// Complete simulation state for one play field
#[derive(Debug, Clone)]
pub struct GameState {
    pub field: Field,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub paddle: Paddle,
    pub ball: Ball,
    pub grid: BrickGrid,
    pub particles: ParticleSystem,
    /// Milliseconds of animation time, drives the brick glow pulse
    pub anim_time_ms: f64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Particle RNG
    pub rng: Pcg32,
}

impl GameState {
    /// Fresh field in `Idle`, ball parked at the center
    pub fn new(field: Field, tuning: Tuning, seed: u64, max_particles: usize) -> Self {
        let paddle = Paddle::new(&field, &tuning);
        let ball = Ball::new(field.center(), tuning.ball_radius, tuning.ball_speed);
        let grid = BrickGrid::new(BrickLayout::for_field(field.width, &tuning));
        let particles =
            ParticleSystem::new(max_particles, tuning.particle_fade, tuning.particle_spread);

        Self {
            field,
            phase: GamePhase::Idle,
            score: 0,
            lives: tuning.starting_lives,
            paddle,
            ball,
            grid,
            particles,
            anim_time_ms: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Restore score, lives, bricks, particles, paddle and ball
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.grid.reset();
        self.particles.clear();
        self.events.clear();
        self.paddle.recenter(&self.field);
        self.ball.rest_on(&self.paddle);
    }

    fn transition(&mut self, to: GamePhase) {
        log::debug!("Phase {:?} -> {:?}", self.phase, to);
        self.phase = to;
    }

    /// Idle -> Serving with a fresh round
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.reset_round();
        self.transition(GamePhase::Serving);
        log::info!("Round started ({} columns x {} rows)", self.grid.columns(), self.grid.rows());
        true
    }

    /// Serving -> InPlay
    pub fn launch(&mut self) -> bool {
        if self.phase != GamePhase::Serving {
            return false;
        }
        self.ball.launch(self.tuning.launch_angle());
        self.transition(GamePhase::InPlay);
        true
    }

    /// Won/GameOver -> Serving with a fresh round
    pub fn retry(&mut self) -> bool {
        if !self.phase.is_terminal() {
            return false;
        }
        self.reset_round();
        self.transition(GamePhase::Serving);
        log::info!("Round restarted");
        true
    }

    /// Apply a physics outcome to the lifecycle
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        if self.phase != GamePhase::InPlay {
            return;
        }
        match outcome {
            Outcome::Continue => {}
            Outcome::BrickWin => {
                self.score += self.tuning.win_bonus;
                self.transition(GamePhase::Won);
                log::info!("All bricks cleared, final score {}", self.score);
            }
            Outcome::FloorLifeLost => {
                self.transition(GamePhase::LifeLost);
                self.transition(GamePhase::Serving);
                log::info!("Ball lost, {} lives left", self.lives);
            }
            Outcome::FloorGameOver => {
                self.transition(GamePhase::GameOver);
                log::info!("Game over, final score {}", self.score);
            }
        }
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
