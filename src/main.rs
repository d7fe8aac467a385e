//! Cattris entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use cattris::Settings;
    use cattris::consts::BLOCK_SIZE;
    use cattris::highscores::{DEFAULT_PLAYER_NAME, HighScores};
    use cattris::platform::action_for_key;
    use cattris::renderer::CanvasRenderer;
    use cattris::sim::{GameEvent, GamePhase, GameState, apply_action, tick};

    /// How long overlay text stays visible
    const OVERLAY_MS: i32 = 2000;
    /// Delay before the start button comes back after game over
    const RESTART_DELAY_MS: i32 = 3500;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        board_view: CanvasRenderer,
        preview_view: Option<CanvasRenderer>,
        highscores: HighScores,
        last_time: Option<f64>,
        overlay_timeout: Option<i32>,
    }

    impl Game {
        fn new(
            settings: Settings,
            board_view: CanvasRenderer,
            preview_view: Option<CanvasRenderer>,
        ) -> Self {
            let seed = js_sys::Date::now() as u64;
            Self {
                state: GameState::new(seed, settings.clone()),
                settings,
                board_view,
                preview_view,
                highscores: HighScores::with_defaults(),
                last_time: None,
                overlay_timeout: None,
            }
        }

        /// Fresh run with a new seed
        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.state = GameState::new(seed, self.settings.clone());
            self.state.start();
            self.last_time = None;
            self.render();
            update_score(self.state.score());
        }

        /// Run the simulation for one animation frame
        fn update(&mut self, time: f64) {
            let dt = self.last_time.map_or(0.0, |last| time - last);
            self.last_time = Some(time);
            tick(&mut self.state, dt);
            self.handle_events();
        }

        /// Draw the current frame
        fn render(&self) {
            self.board_view.draw_game(&self.state);
            if let Some(preview) = &self.preview_view {
                preview.draw_preview(&self.state.next);
            }
        }

        /// React to what the simulation reported
        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::SpecialActivated { special } => {
                        if let Some(text) = special.banner() {
                            self.show_overlay(text);
                        }
                    }
                    GameEvent::LinesCleared { rows } => {
                        log::debug!("Cleared {} row(s)", rows);
                    }
                    GameEvent::GameOver { score } => self.end_game(score),
                    GameEvent::PieceLocked => {}
                }
            }
            update_score(self.state.score());
        }

        fn end_game(&mut self, score: u64) {
            match self.highscores.add_score(DEFAULT_PLAYER_NAME, score) {
                Some(rank) => log::info!("Game over, final score {} (rank #{})", score, rank),
                None => log::info!("Game over, final score {}", score),
            }
            render_highscores(&self.highscores);
            self.show_overlay(&format!("Game Over! Points: {}", score));
            show_start_button_later();
        }

        /// Show overlay text, replacing any text still on screen
        fn show_overlay(&mut self, text: &str) {
            let window = web_sys::window().unwrap();
            let Some(overlay) = window
                .document()
                .and_then(|d| d.get_element_by_id("textOverlay"))
            else {
                return;
            };

            if let Some(handle) = self.overlay_timeout.take() {
                window.clear_timeout_with_handle(handle);
            }
            overlay.set_text_content(Some(text));
            let _ = overlay.class_list().add_1("show");

            let hide = Closure::once(move || {
                let _ = overlay.class_list().remove_1("show");
            });
            self.overlay_timeout = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    hide.as_ref().unchecked_ref(),
                    OVERLAY_MS,
                )
                .ok();
            hide.forget();
        }
    }

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn update_score(score: u64) {
        if let Some(el) = document().get_element_by_id("score") {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn render_highscores(highscores: &HighScores) {
        let document = document();
        let Some(list) = document.get_element_by_id("highscoreList") else {
            return;
        };
        list.set_inner_html("");
        for entry in &highscores.entries {
            let (Ok(li), Ok(span)) = (
                document.create_element("li"),
                document.create_element("span"),
            ) else {
                continue;
            };
            li.set_text_content(Some(&entry.name));
            span.set_text_content(Some(&entry.score.to_string()));
            let _ = span.set_attribute("style", "float:right; font-weight:700");
            let _ = li.append_child(&span);
            let _ = list.append_child(&li);
        }
    }

    fn start_button() -> Option<HtmlElement> {
        document()
            .get_element_by_id("startGame")?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn show_start_button_later() {
        let closure = Closure::once(move || {
            if let Some(btn) = start_button() {
                let _ = btn.style().set_property("display", "inline-block");
            }
        });
        let _ = web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                RESTART_DELAY_MS,
            );
        closure.forget();
    }

    fn canvas_by_id(document: &Document, id: &str) -> Option<HtmlCanvasElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cattris starting...");

        let document = document();
        let settings = Settings::load();
        // Persist the defaults on first visit
        settings.save();

        let canvas = canvas_by_id(&document, "game").expect("no game canvas");
        canvas.set_width((settings.cols as f64 * BLOCK_SIZE) as u32);
        canvas.set_height((settings.rows as f64 * BLOCK_SIZE) as u32);
        let board_view = CanvasRenderer::new(&canvas).expect("no 2d context");

        let preview_view = canvas_by_id(&document, "nextPiece")
            .and_then(|c| CanvasRenderer::new(&c).ok());
        if preview_view.is_none() {
            log::warn!("No preview canvas, next piece will not be shown");
        }

        let game = Rc::new(RefCell::new(Game::new(settings, board_view, preview_view)));
        render_highscores(&game.borrow().highscores);

        setup_keyboard(game.clone());
        setup_start_button(game);

        log::info!("Cattris ready");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            if !g.state.is_playing() {
                return;
            }
            if let Some(action) = action_for_key(&event.key()) {
                event.prevent_default();
                apply_action(&mut g.state, action);
                g.handle_events();
                g.render();
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let Some(btn) = start_button() else {
            log::error!("No start button");
            return;
        };

        let btn_clone = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            if game.borrow().state.is_playing() {
                return;
            }
            let _ = btn_clone.style().set_property("display", "none");
            game.borrow_mut().start();
            request_animation_frame(game.clone());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
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
        {
            let mut g = game.borrow_mut();
            if g.state.phase != GamePhase::Playing {
                // Stop the loop; the start button schedules a new one
                return;
            }
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result, bail};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use cattris::Settings;
    use cattris::highscores::{DEFAULT_PLAYER_NAME, HighScores};
    use cattris::sim::{Action, GameEvent, GameState, apply_action, tick};

    /// Simulated frame length (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frames between two bot inputs
    const INPUT_EVERY: u64 = 20;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    struct Options {
        seed: u64,
        settings: Settings,
        json: bool,
    }

    fn parse_args() -> Result<Options> {
        let mut options = Options {
            seed: 1,
            settings: Settings::load(),
            json: false,
        };

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().context("--seed needs a value")?;
                    options.seed = value
                        .parse()
                        .with_context(|| format!("invalid seed {:?}", value))?;
                }
                "--settings" => {
                    let path = args.next().context("--settings needs a path")?;
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path))?;
                    options.settings = Settings::from_json(&json)
                        .with_context(|| format!("parsing {}", path))?;
                }
                "--json" => options.json = true,
                other => bail!(
                    "unknown argument {:?} (expected --seed N, --settings PATH, --json)",
                    other
                ),
            }
        }
        Ok(options)
    }

    /// Play a whole game with a random-input bot
    fn autoplay(seed: u64, settings: Settings) -> GameState {
        let mut state = GameState::new(seed, settings);
        state.start();
        let mut bot = Pcg32::seed_from_u64(seed.wrapping_add(0x5eed));

        let mut frame = 0;
        while state.is_playing() && frame < MAX_FRAMES {
            if frame % INPUT_EVERY == 0 {
                let action = match bot.random_range(0..5) {
                    0 => Action::MoveLeft,
                    1 => Action::MoveRight,
                    2 => Action::Rotate,
                    3 => Action::SoftDrop,
                    _ => Action::HardDrop,
                };
                apply_action(&mut state, action);
            }
            tick(&mut state, FRAME_MS);

            for event in state.drain_events() {
                match event {
                    GameEvent::LinesCleared { rows } => {
                        log::info!("Frame {}: cleared {} row(s)", frame, rows)
                    }
                    GameEvent::SpecialActivated { special } => {
                        log::info!("Frame {}: {:?} piece", frame, special)
                    }
                    GameEvent::GameOver { score } => {
                        log::info!("Frame {}: game over with {} points", frame, score)
                    }
                    GameEvent::PieceLocked => {}
                }
            }
            frame += 1;
        }
        state
    }

    pub fn run() -> Result<()> {
        let options = parse_args()?;
        log::info!("Cattris (native) headless run, seed {}", options.seed);

        let state = autoplay(options.seed, options.settings);

        if options.json {
            let snapshot = serde_json::to_string_pretty(&state.snapshot())
                .context("serializing snapshot")?;
            println!("{}", snapshot);
            return Ok(());
        }

        println!("{}", state.board);
        println!(
            "Score: {} ({} rows, {:.1} s, {:?})",
            state.score(),
            state.score.rows_cleared(),
            state.play_ms / 1000.0,
            state.phase
        );

        let mut highscores = HighScores::with_defaults();
        match highscores.add_score(DEFAULT_PLAYER_NAME, state.score()) {
            Some(rank) => println!("Leaderboard rank: #{}", rank),
            None => println!("Not on the leaderboard"),
        }
        if let Some(best) = highscores.top_score() {
            println!("Best score: {}", best);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    native::run()
}
