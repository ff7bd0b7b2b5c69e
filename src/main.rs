//! Powder Run entry point
//!
//! On the web this drives the simulation from requestAnimationFrame and wires
//! the DOM HUD, controls and leaderboard. Natively it runs a headless
//! autopilot descent, which is handy for balancing tuning files.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, KeyboardEvent};

    use powder_run::highscores::{HighScores, LeaderboardService, MAX_HIGH_SCORES};
    use powder_run::platform::{
        InputSource, JoystickInput, KeyboardInput, StaticModels, audit_models, sample_all,
    };
    use powder_run::sim::{FrameClock, GameEvent, GameState, InputState, tick};
    use powder_run::ui::{FpsCounter, HudSnapshot, debug_hitboxes, leaderboard_rows};
    use powder_run::Settings;

    /// How far along the slope the hitbox readout reaches
    const DEBUG_HITBOX_RANGE: f32 = 30.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        keyboard: KeyboardInput,
        joystick: JoystickInput,
        leaderboard: HighScores,
        settings: Settings,
        fps: FpsCounter,
        /// Name/score of the entry submitted this run, for highlighting
        submitted: Option<(String, u32)>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            Self {
                state: GameState::with_defaults(seed),
                clock: FrameClock::new(),
                keyboard: KeyboardInput::new(),
                joystick: JoystickInput::new(settings.effective_deadzone()),
                leaderboard: HighScores::load(),
                settings,
                fps: FpsCounter::new(),
                submitted: None,
            }
        }

        fn input(&self) -> InputState {
            let sources: [&dyn InputSource; 2] = [&self.keyboard, &self.joystick];
            sample_all(&sources)
        }

        /// One display frame
        fn frame(&mut self, time: f64) {
            let dt = self.clock.delta(time);
            self.fps.record(dt);
            let input = self.input();
            tick(&mut self.state, &input, dt);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::Crashed { cause } => log::info!("Crashed: {:?}", cause),
                    GameEvent::LeaderboardShown => self.show_leaderboard(),
                    _ => {}
                }
            }
            self.update_hud();
        }

        fn restart(&mut self, seed: u64) {
            self.state.restart(seed);
            self.state.start();
            self.clock.reset();
            self.keyboard.release_all();
            self.joystick.release();
            self.submitted = None;
            set_hidden("leaderboard", true);
        }

        fn submit(&mut self, name: &str) {
            let score = self.state.score_points();
            let time = self.state.time_seconds();
            match self.leaderboard.submit_entry(name, score, time) {
                Ok(()) => {
                    let initials = name.trim().to_uppercase();
                    self.settings.remember_initials(&initials);
                    self.settings.save();
                    self.submitted = Some((initials, score));
                }
                Err(e) => {
                    log::warn!("Leaderboard submit failed: {}", e);
                    set_text("#leaderboard-status", &e.to_string());
                }
            }
            self.show_leaderboard();
        }

        fn update_hud(&self) {
            let hud = HudSnapshot::from_state(&self.state);
            set_text("#hud-score .hud-value", &hud.score.to_string());
            set_text("#hud-speed .hud-value", &hud.speed_label());
            set_text("#hud-time .hud-value", &hud.time_label());

            if self.settings.show_fps {
                set_text("#hud-fps", &self.fps.label());
            }
            if self.settings.show_hitboxes {
                let lines: Vec<String> = debug_hitboxes(&self.state, DEBUG_HITBOX_RANGE)
                    .iter()
                    .map(|b| b.label())
                    .collect();
                set_text("#debug-hitboxes", &lines.join("\n"));
            }
        }

        fn update_best(&self) {
            let best = self
                .leaderboard
                .top_score()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            set_text("#hud-best .hud-value", &best);
        }

        fn show_leaderboard(&self) {
            let Some(document) = document() else {
                return;
            };
            let score = self.state.score_points();
            let qualifies = self.submitted.is_none()
                && self.leaderboard.would_qualify(score).unwrap_or(false);
            set_hidden("name-form", !qualifies);

            if qualifies {
                if let Some(input) = document
                    .get_element_by_id("name-input")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                {
                    input.set_value(&self.settings.last_initials);
                }
                if let Some(rank) = self.leaderboard.potential_rank(score) {
                    set_text("#leaderboard-status", &format!("New high score! Rank #{}", rank));
                }
            } else {
                set_text("#leaderboard-status", "");
            }
            self.update_best();

            match self.leaderboard.fetch_top_entries(MAX_HIGH_SCORES) {
                Ok(entries) => {
                    let highlight = self.submitted.as_ref().map(|(n, s)| (n.as_str(), *s));
                    let html: String = leaderboard_rows(&entries, highlight)
                        .iter()
                        .map(|row| {
                            format!(
                                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                                if row.highlight { "mine" } else { "" },
                                row.rank,
                                row.name,
                                row.score,
                                row.time
                            )
                        })
                        .collect();
                    if let Some(body) = document.get_element_by_id("leaderboard-rows") {
                        body.set_inner_html(&html);
                    }
                }
                Err(e) => set_text("#leaderboard-status", &e.to_string()),
            }
            set_hidden("leaderboard", false);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_text(selector: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.query_selector(selector).ok().flatten()) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn random_seed() -> u64 {
        (js_sys::Math::random() * u32::MAX as f64) as u64
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Powder Run starting...");

        let seed = random_seed();
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // The page preloads every model; anything missing renders as a placeholder
        audit_models(&StaticModels::complete(), &game.borrow().state.catalog);

        setup_keyboard(game.clone());
        setup_touch_buttons(game.clone());
        setup_restart_button(game.clone());
        setup_name_form(game.clone());
        setup_blur(game.clone());

        {
            let g = game.borrow();
            set_hidden("hud-fps", !g.settings.show_fps);
            set_hidden("debug-hitboxes", !g.settings.show_hitboxes);
            g.update_best();
        }

        game.borrow_mut().state.start();
        request_animation_frame(game);
        log::info!("Powder Run running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keyboard.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            game.borrow_mut().keyboard.key_up(&event.code());
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// On-screen left/right buttons act as a two-position joystick
    fn setup_touch_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };
        if !game.borrow().settings.touch_controls {
            set_hidden("touch-controls", true);
        }

        for (id, axis) in [("btn-left", -1.0f32), ("btn-right", 1.0f32)] {
            let Some(button) = document.get_element_by_id(id) else {
                log::warn!("Missing #{}, touch steering disabled", id);
                continue;
            };

            let g = game.clone();
            let press = Closure::<dyn FnMut(_)>::new(move |_: web_sys::PointerEvent| {
                g.borrow_mut().joystick.set_axis(axis);
            });
            let _ = button.add_event_listener_with_callback("pointerdown", press.as_ref().unchecked_ref());
            press.forget();

            for release_event in ["pointerup", "pointerleave", "pointercancel"] {
                let g = game.clone();
                let release = Closure::<dyn FnMut(_)>::new(move |_: web_sys::PointerEvent| {
                    g.borrow_mut().joystick.release();
                });
                let _ = button
                    .add_event_listener_with_callback(release_event, release.as_ref().unchecked_ref());
                release.forget();
            }
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(button) = document().and_then(|d| d.get_element_by_id("restart-btn")) else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            let seed = random_seed();
            game.borrow_mut().restart(seed);
            log::info!("Game restarted with seed: {}", seed);
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_name_form(game: Rc<RefCell<Game>>) {
        let Some(form) = document().and_then(|d| d.get_element_by_id("name-form")) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let name = document()
                .and_then(|d| d.get_element_by_id("name-input"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            game.borrow_mut().submit(&name);
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Keyup never arrives for keys held while the window loses focus
    fn setup_blur(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = game.borrow_mut();
            g.keyboard.release_all();
            g.joystick.release();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
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
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Powder Run (native) starting...");
    log::info!("Native mode runs a headless autopilot descent");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => powder_run::Tuning::default(),
    };
    headless::run(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> powder_run::Tuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| powder_run::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Could not load tuning from {}: {}; using defaults", path, e);
            powder_run::Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::sync::Arc;

    use powder_run::highscores::{HighScores, LeaderboardService};
    use powder_run::platform::{StaticModels, audit_models};
    use powder_run::sim::{Catalog, GameEvent, GameState, InputState, RunPhase, tick};
    use powder_run::ui::{HudSnapshot, debug_hitboxes, leaderboard_rows};
    use powder_run::{Settings, Tuning};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Steer away from the nearest obstacle in the skier's lane
    fn autopilot(state: &GameState) -> InputState {
        let player = state.player.position;
        let horizon = 8.0 + 6.0 * state.speed;
        let threat = state
            .terrain
            .obstacles()
            .iter()
            .filter(|o| {
                let ahead = player.z - o.position.z;
                ahead > 0.0 && ahead < horizon && (o.position.x - player.x).abs() < 3.0
            })
            .min_by(|a, b| b.position.z.total_cmp(&a.position.z));

        let Some(threat) = threat else {
            return InputState::default();
        };
        let boundary = state.tuning.player.boundary_x;
        // Dodge toward open space, turning back near the edge
        let go_right = if player.x > boundary - 3.0 {
            false
        } else if player.x < -boundary + 3.0 {
            true
        } else {
            threat.position.x <= player.x
        };
        InputState {
            steer_left: !go_right,
            steer_right: go_right,
        }
    }

    pub fn run(tuning: Tuning) {
        let tuning = Arc::new(tuning);
        let catalog = Arc::new(Catalog::standard());
        audit_models(&StaticModels::complete(), &catalog);

        let settings = Settings::load();
        let seed = rand::random::<u64>();
        let mut state = GameState::new(seed, tuning, catalog);
        state.start();

        let mut chasers = 0;
        let mut frames = 0;
        while state.phase != RunPhase::LeaderboardShown && frames < MAX_FRAMES {
            let input = autopilot(&state);
            tick(&mut state, &input, FRAME_DT);
            for event in state.drain_events() {
                match event {
                    GameEvent::ChaserSpawned { .. } => chasers += 1,
                    GameEvent::Crashed { cause } => {
                        log::info!("Crashed: {:?}", cause);
                        if settings.show_hitboxes {
                            for hitbox in debug_hitboxes(&state, 5.0) {
                                log::info!("  {}", hitbox.label());
                            }
                        }
                    }
                    _ => {}
                }
            }
            frames += 1;
        }

        let hud = HudSnapshot::from_state(&state);
        println!(
            "Seed {}: score {} in {} at {} ({} chasers)",
            seed,
            hud.score,
            hud.time_label(),
            hud.speed_label(),
            chasers
        );

        let mut leaderboard = HighScores::load();
        if let Some(best) = leaderboard.top_score() {
            println!("Best so far: {}", best);
        }
        match leaderboard.would_qualify(hud.score) {
            Ok(true) => {
                if let Some(rank) = leaderboard.potential_rank(hud.score) {
                    println!("Qualifies at rank #{}", rank);
                }
                if let Err(e) = leaderboard.submit_entry("cpu", hud.score, hud.time) {
                    log::warn!("Leaderboard submit failed: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => log::warn!("Leaderboard unavailable: {}", e),
        }
        if let Ok(entries) = leaderboard.fetch_top_entries(10) {
            for row in leaderboard_rows(&entries, Some(("CPU", hud.score))) {
                println!("{:>2}. {:<3} {:>6} {:>6}", row.rank, row.name, row.score, row.time);
            }
        }
    }
}
