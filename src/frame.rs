//! Frame clock and per-frame scheduler
//!
//! [`Game`] owns the simulation state and is driven by the host once per
//! display frame: tick, play tones for the events raised, then draw.

use crate::audio::{SoundEffect, ToneGenerator};
use crate::consts::NOMINAL_FRAME_MS;
use crate::renderer::{Surface2d, draw_scene};
use crate::settings::Settings;
use crate::sim::{Field, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Converts host timestamps into a movement scale
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_scale: f32,
}

impl FrameClock {
    pub fn new(max_scale: f32) -> Self {
        Self {
            last_ms: None,
            max_scale,
        }
    }

    /// Frame length in nominal 60 Hz frames since the previous call
    ///
    /// 1.0 for the first frame and whenever time did not advance.
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        let previous = self.last_ms.replace(timestamp_ms);
        let Some(previous) = previous else {
            return 1.0;
        };
        let elapsed = timestamp_ms - previous;
        if elapsed <= 0.0 {
            return 1.0;
        }
        ((elapsed / NOMINAL_FRAME_MS) as f32).min(self.max_scale)
    }

    /// Forget the previous timestamp
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Game instance holding all state
pub struct Game {
    pub state: GameState,
    pub clock: FrameClock,
    /// Input accumulated since the last frame
    pub input: TickInput,
    pub settings: Settings,
    seed: u64,
}

impl Game {
    pub fn new(field: Field, tuning: Tuning, settings: Settings, seed: u64) -> Self {
        let clock = FrameClock::new(tuning.max_dt_scale);
        let state = GameState::new(field, tuning, seed, settings.max_particles());
        Self {
            state,
            clock,
            input: TickInput::default(),
            settings,
            seed,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Start button
    pub fn start(&mut self) -> bool {
        self.state.start()
    }

    /// Play-again button or a touch on a finished round
    pub fn retry(&mut self) -> bool {
        if !self.state.retry() {
            return false;
        }
        self.clock.reset();
        self.input = TickInput::default();
        true
    }

    /// Queue a launch for the next frame
    pub fn launch(&mut self) {
        self.input.launch = true;
    }

    pub fn pointer_moved(&mut self, x: f32) {
        self.input.pointer_x = Some(x);
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    /// Replace the player settings, persist them and resize the particle cap
    pub fn apply_settings(&mut self, settings: Settings) {
        log::info!(
            "Settings: quality {}, glow {}, muted {}",
            settings.quality.as_str(),
            settings.glow,
            settings.muted
        );
        self.state.particles.set_capacity(settings.max_particles());
        settings.save();
        self.settings = settings;
    }

    /// Rebuild everything for a new field size and return to Idle
    pub fn resize(&mut self, field: Field) {
        log::info!("Field resized to {}x{}", field.width, field.height);
        let tuning = self.state.tuning.clone();
        self.seed = self.seed.wrapping_add(1);
        self.state = GameState::new(field, tuning, self.seed, self.settings.max_particles());
        self.clock.reset();
        self.input = TickInput::default();
    }

    /// Run one display frame
    pub fn frame(
        &mut self,
        timestamp_ms: f64,
        surface: &mut impl Surface2d,
        tones: &mut impl ToneGenerator,
    ) {
        let dt_scale = self.clock.advance(timestamp_ms);

        if !self.state.phase.is_terminal() {
            tick(&mut self.state, &self.input, dt_scale);
        }

        // Clear one-shot inputs after processing
        self.input.launch = false;

        for event in self.state.drain_events() {
            let tone = SoundEffect::from(&event).tone();
            if let Err(e) = tones.play(tone) {
                log::debug!("Dropped {:?} tone: {}", event, e);
            }
        }

        draw_scene(&self.state, &self.settings, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgba;
    use crate::audio::{AudioError, Tone, ToneLog};
    use crate::renderer::{MeshSurface, TextAlign};
    use crate::settings::QualityPreset;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Keeps every rectangle drawn
    #[derive(Default)]
    struct Rects(Vec<(Vec2, Vec2)>);

    impl Surface2d for Rects {
        fn clear(&mut self) {
            self.0.clear();
        }
        fn fill_circle(&mut self, _: Vec2, _: f32, _: Rgba, _: Option<f32>) {}
        fn fill_rect(&mut self, origin: Vec2, size: Vec2, _: Rgba, _: Option<f32>) {
            self.0.push((origin, size));
        }
        fn draw_text(&mut self, _: &str, _: Vec2, _: TextAlign, _: Rgba) {}
    }

    struct Broken;

    impl ToneGenerator for Broken {
        fn play(&mut self, _tone: Tone) -> Result<(), AudioError> {
            Err(AudioError::Unavailable)
        }
    }

    fn game() -> Game {
        Game::new(
            Field::new(800.0, 600.0),
            Tuning::default(),
            Settings::default(),
            7,
        )
    }

    #[test]
    fn test_clock_scales_by_nominal_frame() {
        let mut clock = FrameClock::new(6.0);
        assert_eq!(clock.advance(1000.0), 1.0);
        let scale = clock.advance(1000.0 + NOMINAL_FRAME_MS * 2.0);
        assert!((scale - 2.0).abs() < 1e-5);
        // Time standing still
        let t = 1000.0 + NOMINAL_FRAME_MS * 2.0;
        assert_eq!(clock.advance(t), 1.0);
    }

    #[test]
    fn test_clock_caps_stalls() {
        let mut clock = FrameClock::new(6.0);
        clock.advance(0.0);
        assert_eq!(clock.advance(5000.0), 6.0);
        clock.reset();
        assert_eq!(clock.advance(9000.0), 1.0);
    }

    #[test]
    fn test_frame_plays_tones_for_events() {
        let mut g = game();
        g.start();
        g.launch();
        let mut mesh = MeshSurface::new(12);
        let mut tones = ToneLog::default();
        g.frame(0.0, &mut mesh, &mut tones);
        assert_eq!(g.phase(), GamePhase::InPlay);
        assert!(!g.input.launch);

        // Straight into the right wall
        g.state.ball.pos = Vec2::new(784.0, 300.0);
        g.state.ball.vel = Vec2::new(6.0, -6.0);
        g.frame(NOMINAL_FRAME_MS, &mut mesh, &mut tones);
        assert_eq!(tones.played.len(), 1);
        assert_eq!(tones.played[0].frequency_hz, 440.0);
        assert!(mesh.label("Score: 0").is_some());
    }

    #[test]
    fn test_failing_audio_does_not_abort_frame() {
        let mut g = game();
        g.start();
        g.launch();
        let mut mesh = MeshSurface::new(12);
        g.frame(0.0, &mut mesh, &mut Broken);

        g.state.ball.pos = Vec2::new(60.0, 115.0);
        g.state.ball.vel = Vec2::new(2.0, -6.0);
        g.frame(NOMINAL_FRAME_MS, &mut mesh, &mut Broken);
        assert_eq!(g.state.score, 10);
        assert!(g.state.events.is_empty());
        assert!(mesh.label("Score: 10").is_some());
        assert!(!mesh.vertices.is_empty());
    }

    #[test]
    fn test_terminal_frames_only_draw() {
        let mut g = game();
        g.start();
        g.launch();
        let mut mesh = MeshSurface::new(12);
        let mut tones = ToneLog::default();
        g.frame(0.0, &mut mesh, &mut tones);
        g.state.phase = GamePhase::Won;
        let ball = g.state.ball.pos;
        g.frame(16.0, &mut mesh, &mut tones);
        assert_eq!(g.state.ball.pos, ball);
        assert!(!mesh.vertices.is_empty());
    }

    #[test]
    fn test_retry_resets_clock_and_round() {
        let mut g = game();
        g.start();
        g.launch();
        let mut mesh = MeshSurface::new(12);
        let mut tones = ToneLog::default();
        g.frame(0.0, &mut mesh, &mut tones);
        g.state.phase = GamePhase::GameOver;
        g.state.score = 50;

        assert!(g.retry());
        assert_eq!(g.phase(), GamePhase::Serving);
        assert_eq!(g.state.score, 0);
        // A long gap after retry is not one giant frame
        assert_eq!(g.clock.advance(60_000.0), 1.0);
    }

    #[test]
    fn test_resize_returns_to_idle() {
        let mut g = game();
        g.start();
        g.resize(Field::new(1024.0, 768.0));
        assert_eq!(g.phase(), GamePhase::Idle);
        assert_eq!(g.state.grid.columns(), 11);
        assert_eq!(g.state.paddle.pos.x, 462.0);
        assert_eq!(g.state.paddle.pos.y, 738.0);
    }

    #[test]
    fn test_bricks_drawn_where_they_were_hit_tested() {
        let mut g = game();
        g.start();
        g.launch();
        let mut rects = Rects::default();
        let mut tones = ToneLog::default();
        for i in 0..3 {
            g.frame(i as f64 * NOMINAL_FRAME_MS, &mut rects, &mut tones);

            let brick = g.state.grid.layout().brick_size;
            let drawn: Vec<Vec2> = rects.0.iter().filter(|r| r.1 == brick).map(|r| r.0).collect();
            // Column 0, row 0 primary comes first
            let hit = g.state.grid.hit_rect(0, 0, g.state.field.width);
            assert_eq!(drawn[0], hit.min);
        }
        assert_eq!(g.state.grid.scroll_offset(), 45.0);
    }

    #[test]
    fn test_apply_settings_trims_particles() {
        let mut g = game();
        g.start();
        g.launch();
        let mut mesh = MeshSurface::new(12);
        g.frame(0.0, &mut mesh, &mut ToneLog::default());
        let mut rng = Pcg32::seed_from_u64(5);
        g.state.particles.spawn(Vec2::ZERO, [1.0; 4], 100, &mut rng);
        assert_eq!(g.state.particles.len(), 100);

        let low = Settings::from_preset(QualityPreset::Low);
        g.apply_settings(low.clone());
        assert_eq!(g.state.particles.len(), 60);
        assert_eq!(g.settings, low);

        g.apply_settings(Settings {
            particles: false,
            ..low
        });
        assert!(g.state.particles.is_empty());
    }
}
