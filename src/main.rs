//! Seal Slalom entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, TouchEvent,
    };

    use seal_slalom::platform::{InputTracker, ReadyBarrier};
    use seal_slalom::renderer::{CanvasRenderer, SpriteKind, Sprites};
    use seal_slalom::sim::SimConfig;
    use seal_slalom::{GameSession, Settings};

    const SEAL_IMAGE: &str = "seal.png";
    const TREE_IMAGE: &str = "tree.png";

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        settings: Settings,
        input: InputTracker,
        renderer: Option<CanvasRenderer>,
        assets: ReadyBarrier,
        /// Set when the asset gate opens; the next frame starts the session
        start_pending: bool,
        /// Set after a render error was reported; repeats go to debug
        render_failing: bool,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                session: build_session(&settings, seed),
                settings,
                input: InputTracker::new(),
                renderer: None,
                assets: ReadyBarrier::new(),
                start_pending: false,
                render_failing: false,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// One animation frame: timers, tick, draw
        fn frame(&mut self, time: f64) {
            self.last_time = time;
            if self.start_pending {
                self.start_pending = false;
                self.session.start(time);
            }
            if !self.session.is_started() {
                return;
            }

            let snapshot = self.session.frame(time, &self.input.state());

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59_000.0 / elapsed).round() as u32;
                }
            }

            if let Some(ref renderer) = self.renderer {
                let fps = self.settings.show_fps.then_some(self.fps);
                match renderer.render(&snapshot, fps) {
                    Ok(()) => self.render_failing = false,
                    Err(e) if self.render_failing => log::debug!("Render error: {:?}", e),
                    Err(e) => {
                        log::warn!("Render error: {:?}", e);
                        self.render_failing = true;
                    }
                }
            }
        }

        /// Switch between isometric and top-down, keeping the canvas size
        fn toggle_mode(&mut self) {
            self.settings.mode = self.settings.mode.toggled();
            self.settings.save();

            let size = self.session.simulation().playfield;
            let was_started = self.session.is_started();
            self.session.stop();
            self.session = build_session(&self.settings, self.session.seed());
            self.session.resize(size.x, size.y);
            if was_started {
                self.session.start(self.last_time);
            }
            log::info!("Switched to {} mode", self.settings.mode.as_str());
        }

        fn resize(&mut self, width: u32, height: u32) {
            if let Some(ref mut renderer) = self.renderer {
                renderer.resize(width, height);
            }
            self.session.resize(width as f32, height as f32);
        }
    }

    fn build_session(settings: &Settings, seed: u64) -> GameSession {
        let seed = settings.seed.unwrap_or(seed);
        match GameSession::new(settings.sim_config(), seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid game config ({}), using {} defaults", e, settings.mode.as_str());
                // Mode defaults always validate
                GameSession::new(SimConfig::for_mode(settings.mode), seed)
                    .expect("default config is valid")
            }
        }
    }

    fn window_size(window: &web_sys::Window) -> (u32, u32) {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        (w as u32, h as u32)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Seal Slalom starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = window_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));
        log::info!("Game initialized with seed: {}", game.borrow().session.seed());

        let seal = HtmlImageElement::new()?;
        let tree = HtmlImageElement::new()?;
        {
            let mut g = game.borrow_mut();
            g.resize(width, height);
            // Fallback shapes until each image has loaded
            g.renderer = Some(CanvasRenderer::new(ctx, Sprites::default(), width, height));
        }

        load_image(seal, SpriteKind::Seal, SEAL_IMAGE, game.clone());
        load_image(tree, SpriteKind::Tree, TREE_IMAGE, game.clone());

        setup_input_handlers(&canvas, game.clone());
        setup_resize(canvas, game.clone());
        setup_auto_pause(&document, game.clone());

        // Start game loop; the session begins once the images settled
        request_animation_frame(game);

        log::info!("Seal Slalom running!");
        Ok(())
    }

    /// Gate the session start on an image, success or failure
    fn load_image(image: HtmlImageElement, kind: SpriteKind, src: &str, game: Rc<RefCell<Game>>) {
        let index = game.borrow_mut().assets.declare(src);

        {
            let game = game.clone();
            let loaded = image.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let mut g = game.borrow_mut();
                if g.assets.mark_loaded(index) {
                    g.start_pending = true;
                }
                if let Some(img) = g.assets.usable(index, loaded.clone()) {
                    if let Some(ref mut renderer) = g.renderer {
                        renderer.set_sprite(kind, img);
                    }
                }
            });
            image.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        {
            let src = src.to_string();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let mut g = game.borrow_mut();
                if g.assets.mark_failed(index, &format!("could not load {}", src)) {
                    g.start_pending = true;
                }
            });
            image.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        image.set_src(src);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.input.key_down(&key) {
                    // Keep arrow keys from scrolling the page
                    event.prevent_default();
                } else if key.eq_ignore_ascii_case("m") && !event.repeat() {
                    g.toggle_mode();
                } else if key.eq_ignore_ascii_case("f") && !event.repeat() {
                    g.settings.show_fps = !g.settings.show_fps;
                    g.settings.save();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur releases held keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move / end
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let pos = Vec2::new(
                        touch.client_x() as f32 - rect.left() as f32,
                        touch.client_y() as f32 - rect.top() as f32,
                    );
                    let mut g = game.borrow_mut();
                    if event.type_() == "touchstart" {
                        g.input.touch_start(pos);
                    } else {
                        g.input.touch_move(pos);
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.touch_end();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Hidden tabs get no animation frames; drop held input so the seal does
    /// not keep sliding when the player comes back. The session clamps the
    /// frame gap, so the time away does not count.
    fn setup_auto_pause(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                game.borrow_mut().input.clear();
                log::info!("Auto-paused (tab hidden)");
            } else {
                log::info!("Resumed (tab visible)");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = window_size(&window);
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, game loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use seal_slalom::sim::{GamePhase, InputState};
    use seal_slalom::{GameMode, GameSession, Settings};

    env_logger::init();
    log::info!("Seal Slalom (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    // Usage: seal-slalom [mode] [frames] [seed]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = Settings::load();
    if let Some(mode) = args.first() {
        match GameMode::from_str(mode) {
            Some(mode) => settings.mode = mode,
            None => log::warn!("Unknown mode '{}', using {}", mode, settings.mode.as_str()),
        }
    }
    let frames: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(3600);
    let seed: u64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .or(settings.seed)
        .unwrap_or(42);

    let mut session = match GameSession::new(settings.sim_config(), seed) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid game config: {}", e);
            std::process::exit(1);
        }
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    session.start(0.0);

    // Weave left and right, switching every second
    let mut runs = 0u32;
    let mut best = 0u64;
    let mut last_phase = session.phase();
    let mut snapshot = session.simulation().snapshot();
    for frame in 1..=frames {
        let going_right = (frame / 60) % 2 == 0;
        let input = InputState {
            left: !going_right,
            right: going_right,
            ..Default::default()
        };
        snapshot = session.frame(frame as f64 * FRAME_MS, &input);
        best = best.max(snapshot.score);
        if session.phase() != last_phase {
            if session.phase() == GamePhase::GameOver {
                runs += 1;
            }
            last_phase = session.phase();
        }
    }

    log::info!("{} frames, {} crashes, best score {}", frames, runs, best);
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize snapshot: {}", e),
    }
}
