//! Neon Breakout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use neon_breakout::audio::WebAudio;
    use neon_breakout::renderer::{MeshSurface, RenderState};
    use neon_breakout::settings::QualityPreset;
    use neon_breakout::sim::{Field, GamePhase};
    use neon_breakout::{Game, Settings, Tuning};

    /// Game plus everything the browser frame needs
    struct App {
        game: Game,
        mesh: MeshSurface,
        render_state: Option<RenderState>,
        audio: WebAudio,
        /// Phase the DOM screens were last updated for
        shown_phase: Option<GamePhase>,
    }

    impl App {
        /// Change, persist and re-apply the player settings
        fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
            let mut settings = self.game.settings.clone();
            change(&mut settings);
            self.audio.apply_settings(&settings);
            self.mesh.set_segments(settings.quality.circle_segments());
            self.game.apply_settings(settings);
        }

        /// Tick, sound, draw, then sync the DOM
        fn frame(&mut self, time: f64) {
            self.game.frame(time, &mut self.mesh, &mut self.audio);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.mesh.vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            self.update_dom();
        }

        /// HUD text and start/game-over screens
        fn update_dom(&mut self) {
            let Some(document) = document() else { return };

            for (prefix, id) in [("Score", "hud-score"), ("Lives", "hud-lives")] {
                if let Some(item) = self.mesh.label(prefix) {
                    set_text(&document, id, &item.text);
                }
            }

            let phase = self.game.phase();
            if self.shown_phase == Some(phase) {
                return;
            }
            self.shown_phase = Some(phase);

            set_visible(&document, "startScreen", phase == GamePhase::Idle);
            set_visible(&document, "gameOverScreen", phase.is_terminal());
            set_visible(&document, "gameCanvas", !phase.is_terminal());
            set_visible(&document, "hud", !phase.is_terminal());

            if phase.is_terminal() {
                let message = if phase == GamePhase::Won {
                    "YOU WIN!"
                } else {
                    "GAME OVER"
                };
                set_text(&document, "gameOverMessage", message);
                set_text(
                    &document,
                    "finalScore",
                    &format!("Score: {}", self.game.state.score),
                );
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Viewport size in CSS pixels
    fn viewport() -> (f32, f32) {
        let Some(window) = web_sys::window() else {
            return (800.0, 600.0);
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64());
        let h = window.inner_height().ok().and_then(|v| v.as_f64());
        (w.unwrap_or(800.0) as f32, h.unwrap_or(600.0) as f32)
    }

    /// Size the canvas backing store for the device pixel ratio
    fn size_canvas(canvas: &HtmlCanvasElement, css_w: f32, css_h: f32) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = ((css_w as f64 * dpr) as u32).max(1);
        let height = ((css_h as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn query() -> String {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }

    /// `?quality=low|medium|high` overrides the stored preset
    fn quality_from_query() -> Option<QualityPreset> {
        let search = query();
        let value = search
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("quality="))?;
        match value.parse() {
            Ok(preset) => Some(preset),
            Err(e) => {
                log::warn!("Ignoring ?quality: {}", e);
                None
            }
        }
    }

    /// `?classic` selects the three-row static layout
    fn tuning_from_query() -> Tuning {
        if query().contains("classic") {
            log::info!("Using classic layout");
            Tuning::classic()
        } else {
            Tuning::default()
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Neon Breakout starting...");

        let Some(document) = document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let (css_w, css_h) = viewport();
        let (width, height) = size_canvas(&canvas, css_w, css_h);

        let mut settings = Settings::load();
        if let Some(preset) = quality_from_query() {
            settings.apply_preset(preset);
        }
        let seed = js_sys::Date::now() as u64;
        let mesh = MeshSurface::new(settings.quality.circle_segments());
        let audio = WebAudio::new(&settings);
        let game = Game::new(Field::new(css_w, css_h), tuning_from_query(), settings, seed);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            mesh,
            render_state: None,
            audio,
            shown_phase: None,
        }));

        // Initialize WebGPU; without it the game still runs, just undrawn
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(mut render_state) => {
                                render_state.set_field_size(css_w, css_h);
                                app.borrow_mut().render_state = Some(render_state);
                            }
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(app.clone());
        setup_resize(canvas, app.clone());

        // Hide loading indicator
        set_visible(&document, "loading", false);

        request_animation_frame(app);

        log::info!("Neon Breakout running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse move anywhere on the page steers the paddle
        if let Some(document) = document() {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                app.borrow_mut().game.pointer_moved(x);
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - launch
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.game.launch();
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    app.borrow_mut().game.pointer_moved(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start on a finished round plays again
        if let Some(document) = document() {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut a = app.borrow_mut();
                if a.game.phase().is_terminal() {
                    a.audio.resume();
                    a.game.retry();
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => a.game.launch(),
                    "i" | "I" => {
                        let on = !a.game.input.autopilot;
                        a.game.set_autopilot(on);
                        log::info!("Autopilot: {}", on);
                    }
                    "m" | "M" => a.update_settings(|s| s.muted = !s.muted),
                    "g" | "G" => a.update_settings(|s| s.glow = !s.glow),
                    "q" | "Q" => a.update_settings(|s| {
                        let next = s.quality.cycle();
                        s.apply_preset(next);
                    }),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("startButton") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.game.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("playAgainButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.game.retry();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (css_w, css_h) = viewport();
            let (width, height) = size_canvas(&canvas, css_w, css_h);
            let mut a = app.borrow_mut();
            if let Some(ref mut render_state) = a.render_state {
                render_state.resize(width, height);
                render_state.set_field_size(css_w, css_h);
            }
            a.game.resize(Field::new(css_w, css_h));
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_breakout::Tuning;

    env_logger::init();
    log::info!("Neon Breakout (native) starting...");
    log::info!("Native mode runs a headless autopilot round - run with `trunk serve` to play");

    let tuning = match std::env::args().nth(1) {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::error!("Bad tuning file {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => Tuning::default(),
    };

    headless::run(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_breakout::audio::ToneLog;
    use neon_breakout::consts::NOMINAL_FRAME_MS;
    use neon_breakout::renderer::MeshSurface;
    use neon_breakout::sim::{Field, GamePhase};
    use neon_breakout::{Game, Settings, Tuning};

    /// Five minutes of frames at 60 Hz
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    /// Let the autopilot play one round and report how it went
    pub fn run(tuning: Tuning) {
        let settings = Settings::default();
        let mut mesh = MeshSurface::new(settings.quality.circle_segments());
        let mut tones = ToneLog::default();
        let mut game = Game::new(Field::new(800.0, 600.0), tuning, settings, 42);

        game.start();
        game.set_autopilot(true);

        let mut frames = 0;
        while frames < MAX_FRAMES && !game.phase().is_terminal() {
            game.frame(frames as f64 * NOMINAL_FRAME_MS, &mut mesh, &mut tones);
            frames += 1;
        }

        let outcome = match game.phase() {
            GamePhase::Won => "won",
            GamePhase::GameOver => "game over",
            _ => "time limit",
        };
        log::info!(
            "Round ended ({}) after {} frames: score {}, lives {}, {} bricks left, {} tones",
            outcome,
            frames,
            game.state.score,
            game.state.lives,
            game.state.grid.intact_count(),
            tones.played.len(),
        );
        println!(
            "{}: score {} with {} lives left after {} frames",
            outcome, game.state.score, game.state.lives, frames
        );
    }
}
