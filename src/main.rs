//! Skyward Feedback entry point
//!
//! Hosts a small word-flight game on top of the feedback engine: steer the
//! plane into the cloud carrying the target word. The browser build draws
//! into a canvas and plays the music; the native build runs a scripted
//! headless session and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Word-flight rules shared by both hosts
mod flight {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use skyward_feedback::GameSession;
    use skyward_feedback::audio::Track;
    use skyward_feedback::consts::SIM_DT;
    use skyward_feedback::effects::EffectKind;
    use skyward_feedback::sim::{Playfield, TickInput, tick};

    pub const WORDS: [&str; 6] = ["kucing", "anjing", "burung", "ikan", "kuda", "sapi"];
    /// Seconds between cloud spawns
    pub const SPAWN_INTERVAL: f32 = 1.6;
    /// Chance that a new cloud carries the target word
    const TARGET_CHANCE: f64 = 0.4;
    /// Keep cloud centres this far from the top and bottom edges
    const SPAWN_MARGIN: f32 = 60.0;

    pub struct Flight {
        pub field: Playfield,
        rng: Pcg32,
        spawn_timer: f32,
        pub target: &'static str,
        pub successes: u32,
        pub misses: u32,
    }

    impl Flight {
        pub fn new(size: Vec2, seed: u64) -> Self {
            let mut rng = Pcg32::seed_from_u64(seed);
            let target = WORDS[rng.random_range(0..WORDS.len())];
            Self {
                field: Playfield::new(size),
                rng,
                spawn_timer: 0.0,
                target,
                successes: 0,
                misses: 0,
            }
        }

        /// Start a fresh round in the same field size
        pub fn reset(&mut self) {
            self.field = Playfield::new(self.field.size);
            self.spawn_timer = 0.0;
            self.successes = 0;
            self.misses = 0;
            self.pick_target();
        }

        /// Advance one fixed step and report contacts to the session
        pub fn step<T: Track>(&mut self, session: &mut GameSession<T>, input: &TickInput, now: f64) {
            self.spawn_timer -= SIM_DT;
            if self.spawn_timer <= 0.0 {
                self.spawn();
                self.spawn_timer = SPAWN_INTERVAL;
            }

            for contact in tick(&mut self.field, input, SIM_DT) {
                let kind = if contact.obstacle.label == self.target {
                    self.successes += 1;
                    self.pick_target();
                    EffectKind::Success
                } else {
                    self.misses += 1;
                    EffectKind::Miss
                };
                log::info!("{:?} on '{}' (next: {})", kind, contact.obstacle.label, self.target);
                session.trigger(kind, contact.point, now);
            }

            session.set_actor(self.field.actor);
            session.set_obstacles(self.field.obstacles.clone());
        }

        /// Vertical centre of the nearest cloud carrying the target word
        pub fn target_y(&self) -> Option<f32> {
            let actor_x = self.field.actor.pos.x;
            self.field
                .obstacles
                .iter()
                .filter(|o| o.label == self.target && o.bounds().max().x > actor_x)
                .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
                .map(|o| o.bounds().center().y)
        }

        fn spawn(&mut self) {
            let label = if self.rng.random_bool(TARGET_CHANCE) {
                self.target
            } else {
                WORDS[self.rng.random_range(0..WORDS.len())]
            };
            let height = self.field.size.y;
            let y = if height > SPAWN_MARGIN * 2.0 {
                self.rng.random_range(SPAWN_MARGIN..height - SPAWN_MARGIN)
            } else {
                height * 0.5
            };
            self.field.spawn_obstacle(label, y);
        }

        fn pick_target(&mut self) {
            self.target = WORDS[self.rng.random_range(0..WORDS.len())];
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use skyward_feedback::assets::web::{Completion, load_image, load_video, watch_media};
    use skyward_feedback::assets::{AssetId, AssetKind, ReadinessHandle};
    use skyward_feedback::audio::web_track::WebTrack;
    use skyward_feedback::audio::{ChannelId, Screen};
    use skyward_feedback::consts::*;
    use skyward_feedback::error::FeedbackError;
    use skyward_feedback::render::web_canvas::WebCanvas;
    use skyward_feedback::sim::TickInput;
    use skyward_feedback::{GameSession, Settings};

    use crate::flight::Flight;

    /// Game instance holding all state
    struct Game {
        session: GameSession<WebTrack>,
        flight: Flight,
        canvas: WebCanvas,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn screen(&self) -> Option<Screen> {
            self.session.audio().screen()
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if self.screen() == Some(Screen::Playing) {
                    let input = self.input.clone();
                    self.flight.step(&mut self.session, &input, time);
                }
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.flap = false;
            }
        }

        fn render(&mut self, time: f64) {
            self.session.frame(&mut self.canvas, time);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            if let Some(el) = document.query_selector("#hud-target .hud-value").ok().flatten() {
                el.set_text_content(Some(self.flight.target));
            }
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.flight.successes.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-misses .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.flight.misses.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-muted") {
                let class = if self.session.audio().is_muted() { "hud-item" } else { "hud-item hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("pause-menu") {
                let class = if self.screen() == Some(Screen::Paused) { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }

        fn handle_key(&mut self, key: &str) {
            match key {
                " " => self.input.flap = true,
                "Enter" => {
                    if matches!(self.screen(), None | Some(Screen::Menu)) {
                        self.flight.reset();
                    }
                    self.session.set_screen(Screen::Playing);
                }
                "Escape" => match self.screen() {
                    Some(Screen::Playing) => self.session.set_screen(Screen::Paused),
                    Some(Screen::Paused) => self.session.set_screen(Screen::Playing),
                    _ => {}
                },
                "q" | "Q" => self.session.set_screen(Screen::Menu),
                "m" | "M" => {
                    let muted = self.session.toggle_muted();
                    self.session.settings().save();
                    log::info!("Music {}", if muted { "muted" } else { "unmuted" });
                }
                "n" | "N" => {
                    let mode = self.session.audio().mode().toggled();
                    self.session.set_mode(mode);
                    log::info!("Mode: {:?}", mode);
                }
                _ => {}
            }
        }
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Skyward Feedback starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let size = Vec2::new(width as f32, height as f32);

        let settings = Settings::load();
        let [ambient_normal, ambient_alt, active_normal, active_alt] =
            ChannelId::ALL.map(|id| WebTrack::new(settings.manifest.path(AssetId::Music(id))));
        let tracks = [
            ambient_normal.map_err(js_err)?,
            ambient_alt.map_err(js_err)?,
            active_normal.map_err(js_err)?,
            active_alt.map_err(js_err)?,
        ];
        let audio_elements = tracks.each_ref().map(|t| t.element().clone());

        let seed = js_sys::Date::now() as u64;
        let web_canvas = WebCanvas::new(&canvas).ok_or("no 2d context")?;
        let game = Rc::new(RefCell::new(Game {
            session: GameSession::new(settings, seed, size, tracks),
            flight: Flight::new(size, seed),
            canvas: web_canvas,
            accumulator: 0.0,
            last_time: 0.0,
            input: TickInput::default(),
        }));
        log::info!("Game initialized with seed: {}", seed);

        // Start every load; completions land back in the session
        let done: Completion = {
            let game = Rc::downgrade(&game);
            Rc::new(move |handle: ReadinessHandle, outcome: Result<(), FeedbackError>| {
                if let Some(game) = game.upgrade() {
                    game.borrow_mut().session.asset_loaded(handle, outcome);
                }
            })
        };
        let handles = game.borrow_mut().session.request_assets(now());
        for handle in handles {
            let path = game
                .borrow()
                .session
                .assets()
                .path(handle.id)
                .unwrap_or_default()
                .to_string();
            let started = match (handle.id, handle.id.kind()) {
                (AssetId::Music(id), _) => {
                    let index = ChannelId::ALL.iter().position(|c| *c == id).unwrap_or(0);
                    watch_media(&audio_elements[index], handle, &path, done.clone());
                    Ok(())
                }
                (_, AssetKind::Video) => load_video(&document, handle, &path, done.clone()).map(|video| {
                    video.set_class_name("sky-video");
                    let anchor: &web_sys::Node = &canvas;
                    if let Some(parent) = anchor.parent_node() {
                        let _ = parent.insert_before(&video, Some(anchor));
                    }
                }),
                (id, _) => load_image(handle, &path, done.clone())
                    .map(|image| game.borrow_mut().canvas.insert_image(id, image)),
            };
            if let Err(e) = started {
                game.borrow_mut().session.asset_loaded(handle, Err(e));
            }
        }

        game.borrow_mut().session.set_screen(Screen::Menu);

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone(), &document);
        request_animation_frame(game);

        log::info!("Skyward Feedback running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let key = event.key();
            if key == " " {
                event.prevent_default();
            }
            game.borrow_mut().handle_key(&key);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>, document: &Document) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.screen() == Some(Screen::Playing) {
                    g.session.set_screen(Screen::Paused);
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use glam::Vec2;

    use skyward_feedback::audio::{Screen, Track};
    use skyward_feedback::consts::SIM_DT;
    use skyward_feedback::error::FeedbackError;
    use skyward_feedback::render::DisplayList;
    use skyward_feedback::sim::TickInput;
    use skyward_feedback::{FrameOutcome, GameSession, Settings};

    use crate::flight::Flight;

    pub const SIZE: Vec2 = Vec2::new(800.0, 500.0);
    /// Length of the scripted run (seconds)
    const RUN_SECONDS: f32 = 20.0;

    /// Directory the manifest paths are resolved against
    pub fn asset_root() -> PathBuf {
        std::env::var("SKYWARD_ASSETS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"))
    }

    pub fn resolve(root: &Path, manifest_path: &str) -> PathBuf {
        root.join(manifest_path.trim_start_matches('/'))
    }

    #[derive(Debug, Default)]
    struct Tally {
        drawn: u32,
        skipped: u32,
        loading: u32,
        effects_drawn: u32,
    }

    /// Drive a scripted session; `advance` moves the music clock by one step
    pub fn run<T: Track>(settings: Settings, tracks: [T; 4], seed: u64, mut advance: impl FnMut(Duration)) {
        let mut session = GameSession::new(settings, seed, SIZE, tracks);
        let mut flight = Flight::new(SIZE, seed);
        let mut canvas = DisplayList::new();
        let mut tally = Tally::default();

        // Sprites and video are only checked for presence; no decoding natively
        let root = asset_root();
        for handle in session.request_assets(0.0) {
            let path = session.assets().path(handle.id).unwrap_or_default().to_string();
            let outcome = if resolve(&root, &path).exists() {
                Ok(())
            } else {
                Err(FeedbackError::asset(path.as_str(), "not found"))
            };
            session.asset_loaded(handle, outcome);
        }

        session.set_screen(Screen::Menu);
        let steps = (RUN_SECONDS / SIM_DT) as u32;
        let step_duration = Duration::from_secs_f32(SIM_DT);

        for i in 0..steps {
            let now = f64::from(i) * f64::from(SIM_DT) * 1000.0;
            let t = i as f32 * SIM_DT;

            // Script: menu, play, switch theme, mute, pause, back to menu
            match i {
                _ if i == secs(1.0) => session.set_screen(Screen::Playing),
                _ if i == secs(8.0) => {
                    let mode = session.audio().mode().toggled();
                    session.set_mode(mode);
                }
                _ if i == secs(11.0) => {
                    session.toggle_muted();
                }
                _ if i == secs(12.5) => {
                    session.toggle_muted();
                }
                _ if i == secs(14.0) => session.set_screen(Screen::Paused),
                _ if i == secs(15.0) => session.set_screen(Screen::Playing),
                _ if i == secs(19.0) => session.set_screen(Screen::Menu),
                _ => {}
            }

            if session.audio().screen() == Some(Screen::Playing) {
                // Autopilot: climb toward the target cloud, otherwise hold mid-field
                let aim = flight.target_y().unwrap_or(SIZE.y * 0.5);
                let actor = flight.field.actor;
                let input = TickInput {
                    flap: actor.center().y > aim && actor.vy >= 0.0,
                };
                flight.step(&mut session, &input, now);
            }

            match session.frame(&mut canvas, now) {
                FrameOutcome::Drawn(stats) => {
                    tally.drawn += 1;
                    tally.effects_drawn += stats.effects as u32;
                }
                FrameOutcome::Skipped => tally.skipped += 1,
                FrameOutcome::Loading => tally.loading += 1,
            }

            advance(step_duration);
            if t.fract() < SIM_DT {
                log::debug!(
                    "t={:.0}s screen={:?} mode={:?} active={:?} playing={}",
                    t,
                    session.audio().screen(),
                    session.audio().mode(),
                    session.audio().active_channel(),
                    session.audio().playing_count()
                );
            }
        }

        log::info!(
            "Run finished: {} hits, {} misses, {} frames drawn ({} with effects), {} skipped, {} loading",
            flight.successes,
            flight.misses,
            tally.drawn,
            tally.effects_drawn,
            tally.skipped,
            tally.loading
        );
        for status in session.audio().statuses() {
            log::info!(
                "{:?}: playing={} muted={} position={:.1}s",
                status.id,
                status.playing,
                status.muted,
                status.position.as_secs_f32()
            );
        }
        session.close();
    }

    fn secs(s: f32) -> u32 {
        (s / SIM_DT).round() as u32
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use skyward_feedback::Settings;
    use skyward_feedback::audio::{ChannelId, SimClock, SimTrack};

    env_logger::init();
    log::info!("Skyward Feedback (native) starting...");

    let settings = Settings::load();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);

    #[cfg(feature = "native-audio")]
    {
        use skyward_feedback::assets::AssetId;
        use skyward_feedback::audio::rodio_track::{RodioOutput, RodioTrack};

        let root = headless::asset_root();
        let speakers = RodioOutput::try_default().and_then(|output| {
            let [a, b, c, d] = ChannelId::ALL.map(|id| {
                RodioTrack::load(
                    &output,
                    headless::resolve(&root, settings.manifest.path(AssetId::Music(id))),
                )
            });
            Ok((output, [a?, b?, c?, d?]))
        });
        match speakers {
            Ok((_output, tracks)) => {
                log::info!("Playing music through the default output device");
                headless::run(settings, tracks, seed, std::thread::sleep);
                return;
            }
            Err(e) => log::warn!("{}; falling back to silent tracks", e),
        }
    }

    let clock = SimClock::new();
    let tracks = ChannelId::ALL.map(|_| SimTrack::new(&clock));
    headless::run(settings, tracks, seed, |dt| clock.advance(dt));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
