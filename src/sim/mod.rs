//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time enters only as a per-frame `dt_scale`
//! - Seeded RNG only
//! - Stable iteration order (column-major bricks)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod particle;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Aabb, normalized_hit, paddle_bounce_velocity};
pub use grid::{BRICK_PALETTE, Brick, BrickGrid, BrickLayout, row_color};
pub use particle::{Particle, ParticleSystem};
pub use physics::advance;
pub use state::{Ball, BallState, Field, GameEvent, GamePhase, GameState, Outcome, Paddle};
pub use tick::{TickInput, tick};
