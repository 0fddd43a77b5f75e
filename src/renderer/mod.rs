//! Rendering
//!
//! The scene is described through [`Surface2d`], a minimal immediate-mode
//! drawing surface. [`MeshSurface`] tessellates it into vertices which
//! [`RenderState`] draws with WebGPU.

pub mod mesh;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use mesh::{MeshSurface, TextItem};
pub use pipeline::RenderState;
pub use vertex::{Vertex, colors};

use glam::Vec2;

use crate::Rgba;
use crate::settings::Settings;
use crate::sim::GameState;

/// Glow blur around the paddle and ball
pub const ENTITY_GLOW: f32 = 20.0;
/// Base glow blur around bricks; the pulse swings it by `BRICK_GLOW_PULSE`
pub const BRICK_GLOW: f32 = 10.0;
pub const BRICK_GLOW_PULSE: f32 = 5.0;

/// HUD text inset from the top corners
const HUD_INSET: Vec2 = Vec2::new(20.0, 30.0);

/// Horizontal anchor for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

/// 2D drawing surface in field pixels, origin top-left
pub trait Surface2d {
    fn clear(&mut self);
    /// Filled circle, optionally with a neon glow of the given blur radius
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Option<f32>);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba, glow: Option<f32>);
    fn draw_text(&mut self, text: &str, at: Vec2, align: TextAlign, color: Rgba);
}

/// Brick glow blur for `row` at the current animation time
pub fn brick_glow(anim_time_ms: f64, row: usize, settings: &Settings) -> Option<f32> {
    if !settings.glow {
        return None;
    }
    if !settings.glow_pulse() {
        return Some(BRICK_GLOW);
    }
    let pulse = (anim_time_ms / 200.0 + row as f64).sin() as f32 * BRICK_GLOW_PULSE;
    Some(BRICK_GLOW + pulse)
}

/// Draw one frame of the scene
pub fn draw_scene(state: &GameState, settings: &Settings, surface: &mut impl Surface2d) {
    let entity_glow = settings.glow.then_some(ENTITY_GLOW);

    surface.clear();

    surface.fill_rect(
        state.paddle.pos,
        state.paddle.size,
        colors::PADDLE,
        entity_glow,
    );
    surface.fill_circle(state.ball.pos, state.ball.radius, colors::BALL, entity_glow);

    // Each brick twice: at its primary X and one formation width to the left
    let layout = state.grid.layout();
    let formation_width = layout.formation_width();
    for (column, row, brick) in state.grid.intact() {
        let x = state.grid.draw_x(column);
        let y = layout.row_y(row);
        let glow = brick_glow(state.anim_time_ms, row, settings);
        surface.fill_rect(Vec2::new(x, y), layout.brick_size, brick.color, glow);
        surface.fill_rect(
            Vec2::new(x - formation_width, y),
            layout.brick_size,
            brick.color,
            glow,
        );
    }

    surface.draw_text(
        &format!("Score: {}", state.score),
        HUD_INSET,
        TextAlign::Left,
        colors::SCORE_TEXT,
    );
    surface.draw_text(
        &format!("Lives: {}", state.lives),
        Vec2::new(state.field.width - HUD_INSET.x, HUD_INSET.y),
        TextAlign::Right,
        colors::LIVES_TEXT,
    );

    for particle in state.particles.iter() {
        surface.fill_circle(
            particle.pos,
            particle.radius,
            colors::with_alpha(particle.color, particle.alpha),
            None,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Field, row_color};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Circle(Vec2, Rgba, Option<f32>),
        Rect(Vec2, Rgba, Option<f32>),
        Text(String, Vec2, TextAlign),
    }

    #[derive(Default)]
    struct Recorder(Vec<Call>);

    impl Surface2d for Recorder {
        fn clear(&mut self) {
            self.0.push(Call::Clear);
        }
        fn fill_circle(&mut self, center: Vec2, _radius: f32, color: Rgba, glow: Option<f32>) {
            self.0.push(Call::Circle(center, color, glow));
        }
        fn fill_rect(&mut self, origin: Vec2, _size: Vec2, color: Rgba, glow: Option<f32>) {
            self.0.push(Call::Rect(origin, color, glow));
        }
        fn draw_text(&mut self, text: &str, at: Vec2, align: TextAlign, _color: Rgba) {
            self.0.push(Call::Text(text.to_string(), at, align));
        }
    }

    fn state() -> GameState {
        let mut s = GameState::new(Field::new(800.0, 600.0), Tuning::default(), 1, 256);
        s.start();
        s
    }

    #[test]
    fn test_draw_order() {
        let mut s = state();
        for c in 0..s.grid.columns() {
            for r in 0..s.grid.rows() {
                if (c, r) != (1, 2) {
                    s.grid.break_cell(c, r);
                }
            }
        }
        s.particles
            .spawn(Vec2::new(5.0, 5.0), row_color(0), 1, &mut Pcg32::seed_from_u64(3));

        let mut rec = Recorder::default();
        draw_scene(&s, &Settings::default(), &mut rec);

        assert_eq!(rec.0.len(), 8);
        assert_eq!(rec.0[0], Call::Clear);
        assert_eq!(rec.0[1], Call::Rect(Vec2::new(350.0, 570.0), colors::PADDLE, Some(20.0)));
        assert_eq!(rec.0[2], Call::Circle(Vec2::new(400.0, 560.0), colors::BALL, Some(20.0)));
        // Column 1 at scroll 30: primary 115, duplicate 115 - 680
        assert!(matches!(rec.0[3], Call::Rect(p, c, _) if p == Vec2::new(115.0, 110.0) && c == row_color(2)));
        assert!(matches!(rec.0[4], Call::Rect(p, _, _) if p == Vec2::new(-565.0, 110.0)));
        assert_eq!(
            rec.0[5],
            Call::Text("Score: 0".into(), Vec2::new(20.0, 30.0), TextAlign::Left)
        );
        assert_eq!(
            rec.0[6],
            Call::Text("Lives: 3".into(), Vec2::new(780.0, 30.0), TextAlign::Right)
        );
        assert!(matches!(rec.0[7], Call::Circle(_, c, None) if c[3] == 1.0));
    }

    #[test]
    fn test_glow_off_draws_plain_shapes() {
        let s = state();
        let settings = Settings {
            glow: false,
            ..Settings::default()
        };
        let mut rec = Recorder::default();
        draw_scene(&s, &settings, &mut rec);
        assert!(rec.0.iter().all(|c| match c {
            Call::Circle(_, _, g) | Call::Rect(_, _, g) => g.is_none(),
            _ => true,
        }));
    }

    #[test]
    fn test_brick_glow_pulse() {
        let settings = Settings::default();
        // sin(0 + 0) = 0
        assert_eq!(brick_glow(0.0, 0, &settings), Some(10.0));
        let peak = brick_glow(200.0 * std::f64::consts::FRAC_PI_2, 0, &settings).unwrap();
        assert!((peak - 15.0).abs() < 1e-4);

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(brick_glow(314.0, 3, &calm), Some(10.0));
    }

    #[test]
    fn test_particles_fade_with_alpha() {
        let mut s = state();
        s.particles
            .spawn(Vec2::ZERO, row_color(1), 1, &mut Pcg32::seed_from_u64(3));
        s.particles.tick(25.0);
        let mut rec = Recorder::default();
        draw_scene(&s, &Settings::default(), &mut rec);
        let Some(Call::Circle(_, color, None)) = rec.0.last() else {
            panic!("particle not drawn last");
        };
        assert!((color[3] - 0.5).abs() < 1e-4);
    }
}
