//! Fruit Blaster entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use fruit_blaster::Settings;
    use fruit_blaster::audio::{AudioManager, cues};
    use fruit_blaster::consts::*;
    use fruit_blaster::renderer::{RenderState, build_scene};
    use fruit_blaster::sim::{Command, GameEvent, GamePhase, GameState, TickInput, TickOutcome, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        /// Wall clock at start-up, for animation time
        start_ms: f64,
        input: TickInput,
        /// Whether a requestAnimationFrame callback is pending
        looping: bool,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                state: GameState::new(seed),
                settings,
                render_state: None,
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                start_ms: js_sys::Date::now(),
                input: TickInput::default(),
                looping: false,
            }
        }

        fn anim_time(&self) -> f32 {
            ((js_sys::Date::now() - self.start_ms) / 1000.0) as f32
        }

        /// Run simulation ticks. Returns Halt once the game stops running.
        fn update(&mut self, dt: f32) -> TickOutcome {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut outcome = if self.state.is_running() {
                TickOutcome::Continue
            } else {
                TickOutcome::Halt
            };
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                outcome = tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // A mouse move steers once; held keys take over after it
                self.input.clear_one_shot();

                let events = self.state.drain_events();
                self.handle_events(&events);

                if outcome == TickOutcome::Halt {
                    self.accumulator = 0.0;
                    break;
                }
            }
            outcome
        }

        fn handle_events(&self, events: &[GameEvent]) {
            for effect in cues(events) {
                self.audio.play(effect);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let time = self.anim_time();
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state, &self.settings, time);
                match render_state.render(&vertices) {
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
        }

        /// Apply a button/key command, then redraw so halted states stay current
        fn command(&mut self, command: Command) -> bool {
            let applied = self.state.apply(command);
            if applied {
                self.input = TickInput::default();
                self.accumulator = 0.0;
                self.last_time = 0.0;
            }
            self.render();
            self.update_hud();
            applied
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = self.state.hud();

            set_text(&document, "score", &hud.score.to_string());
            set_text(&document, "lives", &hud.lives.to_string());
            set_text(&document, "level", &hud.level.to_string());
            set_text(
                &document,
                "bullets",
                &format!("{} (stage {})", hud.bullet_count, hud.bullet_level),
            );

            if self.settings.show_debug {
                set_text(
                    &document,
                    "debug",
                    &format!(
                        "Enemies: {} | Bullets: {} | Items: {} | Tick: {}",
                        self.state.enemies.len(),
                        self.state.bullets.len(),
                        self.state.items.len(),
                        self.state.time_ticks
                    ),
                );
            }

            set_visible(&document, "pause-overlay", hud.phase == GamePhase::Paused);
            set_visible(&document, "game-over", hud.phase == GamePhase::GameOver);
            set_visible(&document, "level-won", hud.phase == GamePhase::LevelWon);
            match hud.phase {
                GamePhase::GameOver => {
                    set_text(&document, "final-score", &hud.score.to_string());
                    set_text(&document, "final-level", &hud.level.to_string());
                }
                GamePhase::LevelWon => {
                    set_text(&document, "won-score", &hud.score.to_string());
                    set_text(&document, "won-level", &hud.level.to_string());
                }
                _ => {}
            }

            set_disabled(&document, "start-btn", hud.phase != GamePhase::Idle);
            set_disabled(&document, "pause-btn", hud.phase != GamePhase::Running);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    fn set_disabled(document: &Document, id: &str, disabled: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if disabled {
                el.set_attribute("disabled", "")
            } else {
                el.remove_attribute("disabled")
            };
        }
    }

    /// Settings from an embedded `<script id="settings" type="application/json">`
    fn load_settings(document: &Document) -> Settings {
        match document
            .get_element_by_id("settings")
            .and_then(|el| el.text_content())
        {
            Some(json) => Settings::from_json_or_default(&json),
            None => Settings::default(),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Fruit Blaster starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Backing store in physical pixels; the sim always draws in 800x600
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = load_settings(&document);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let canvas_size = glam::Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        match RenderState::new(surface, &adapter, width, height, canvas_size).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        {
            let mut g = game.borrow_mut();
            g.render();
            g.update_hud();
        }

        log::info!("Fruit Blaster ready");
    }

    /// Send a command and restart the frame loop if the game is running again
    fn dispatch(game: &Rc<RefCell<Game>>, command: Command) {
        let restart = {
            let mut g = game.borrow_mut();
            g.audio.resume();
            g.command(command);
            let restart = g.state.is_running() && !g.looping;
            if restart {
                g.looping = true;
            }
            restart
        };
        if restart {
            request_animation_frame(game.clone());
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                match key.as_str() {
                    "ArrowLeft" | "a" | "A" => game.borrow_mut().input.left = true,
                    "ArrowRight" | "d" | "D" => game.borrow_mut().input.right = true,
                    " " => {
                        event.prevent_default();
                        game.borrow_mut().input.fire = true;
                    }
                    "p" | "P" | "Escape" => {
                        let phase = game.borrow().state.phase;
                        match phase {
                            GamePhase::Running => dispatch(&game, Command::Pause),
                            GamePhase::Paused => dispatch(&game, Command::Resume),
                            _ => {}
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move steers the ship
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                if rect.width() <= 0.0 {
                    return;
                }
                let scale = CANVAS_WIDTH / rect.width() as f32;
                let x = (event.client_x() as f32 - rect.left() as f32) * scale;
                game.borrow_mut().input.pointer_x = Some(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click fires
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.fire = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        let buttons: [(&str, &[Command]); 6] = [
            ("start-btn", &[Command::Start]),
            ("pause-btn", &[Command::Pause]),
            ("resume-btn", &[Command::Resume]),
            ("reset-btn", &[Command::Reset]),
            ("retry-btn", &[Command::Reset, Command::Start]),
            ("next-level-btn", &[Command::NextLevel]),
        ];

        for (id, commands) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing button #{}", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                for &command in commands {
                    dispatch(&game, command);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let outcome = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let outcome = g.update(dt);
            g.render();
            g.update_hud();
            if outcome == TickOutcome::Halt {
                g.looping = false;
            }
            outcome
        };

        if outcome == TickOutcome::Continue {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use serde::Serialize;

    use fruit_blaster::sim::{
        Bounds, GameEvent, GamePhase, GameState, Hud, TickInput, TickOutcome, tick,
    };

    /// Ticks between autopilot volleys
    const FIRE_EVERY: u64 = 8;

    /// Final report printed as JSON
    #[derive(Debug, Serialize)]
    pub struct RunSummary {
        pub seed: u64,
        pub ticks: u64,
        pub hud: Hud,
    }

    /// Steer toward the nearest enemy and fire on a fixed cadence
    pub fn autopilot(state: &GameState) -> TickInput {
        let ship = state.player.center();
        let target = state
            .enemies
            .iter()
            .map(|e| e.center())
            .min_by(|a, b| a.distance_squared(ship).total_cmp(&b.distance_squared(ship)));

        let mut input = TickInput {
            fire: state.time_ticks % FIRE_EVERY == 0,
            ..TickInput::default()
        };
        if let Some(target) = target {
            let dx = target.x - ship.x;
            input.left = dx < -fruit_blaster::consts::PLAYER_SPEED;
            input.right = dx > fruit_blaster::consts::PLAYER_SPEED;
        }
        input
    }

    /// Play one session to game over or until `max_ticks` have run
    pub fn run(seed: u64, max_ticks: u64) -> RunSummary {
        let mut state = GameState::new(seed);
        let mut ticks = 0;

        while ticks < max_ticks {
            match state.phase {
                GamePhase::Idle => {
                    state.start();
                }
                GamePhase::Paused => {
                    state.resume();
                }
                GamePhase::LevelWon => {
                    state.next_level();
                }
                GamePhase::GameOver => break,
                GamePhase::Running => {
                    let input = autopilot(&state);
                    let outcome = tick(&mut state, &input);
                    ticks += 1;
                    for event in state.drain_events() {
                        match event {
                            GameEvent::LevelWon { level, score } => {
                                log::info!("Level {} cleared at tick {} ({} points)", level, ticks, score);
                            }
                            GameEvent::GameOver { level, score } => {
                                log::info!("Game over at tick {} on level {} ({} points)", ticks, level, score);
                            }
                            GameEvent::PowerPickup { bullet_count } => {
                                log::debug!("Bullets per shot: {}", bullet_count);
                            }
                            _ => {}
                        }
                    }
                    if outcome == TickOutcome::Halt {
                        log::trace!("Tick halted in {:?}", state.phase);
                    }
                }
            }
        }

        RunSummary {
            seed,
            ticks,
            hud: state.hud(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use fruit_blaster::sim::{Enemy, EnemyKind};
        use glam::Vec2;

        fn enemy_at(x: f32, y: f32) -> Enemy {
            Enemy {
                pos: Vec2::new(x, y),
                kind: EnemyKind::Small,
                health: 1,
                max_health: 1,
                speed: 0.0,
                shoot_timer: 0,
                shoot_interval: 1000.0,
            }
        }

        #[test]
        fn test_autopilot_steers_to_nearest() {
            let mut state = GameState::new(1);
            state.player.pos = Vec2::new(385.0, 550.0);
            state.enemies.push(enemy_at(40.0, 500.0));
            state.enemies.push(enemy_at(700.0, 50.0));
            let input = autopilot(&state);
            assert!(input.left);
            assert!(!input.right);
        }

        #[test]
        fn test_autopilot_holds_when_lined_up() {
            let mut state = GameState::new(1);
            state.player.pos = Vec2::new(385.0, 550.0);
            state.enemies.push(enemy_at(392.0, 100.0));
            let input = autopilot(&state);
            assert!(!input.left && !input.right);
        }

        #[test]
        fn test_run_is_reproducible() {
            let a = run(7, 3000);
            let b = run(7, 3000);
            assert_eq!(a.hud, b.hud);
            assert_eq!(a.ticks, b.ticks);
            assert!(a.ticks <= 3000);
            assert!(a.hud.level >= 1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fruit Blaster (native) starting headless autoplay...");
    log::info!("Run with `trunk serve` for the playable web version");

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|e| {
            log::warn!("Invalid seed {:?} ({}), using 1", arg, e);
            1
        }),
        None => 1,
    };

    // Ten minutes of simulated play
    let max_ticks = 60 * 60 * 10;
    let summary = headless::run(seed, max_ticks);

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
