//! Double Jump entry point
//!
//! Web builds run the game in a canvas; native builds run the simulation
//! headless with a scripted pilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement};

    use double_jump::Settings;
    use double_jump::assets;
    use double_jump::consts::*;
    use double_jump::hud::{FpsCounter, TextOverlay};
    use double_jump::renderer::SpriteRenderer;
    use double_jump::sim::{GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<SpriteRenderer>,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        fps: FpsCounter,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed),
                renderer: None,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                fps: FpsCounter::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                // Drop the backlog rather than fast-forwarding later
                self.accumulator = self.accumulator.min(SIM_DT);
            }

            self.fps.record(time);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(renderer) = self.renderer.as_mut() {
                match renderer.render(&self.state, &self.settings) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        renderer.resize(renderer.size.0, renderer.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            sync_overlay(&document, "score-text", &self.state.score_text);
            sync_overlay(&document, "game-over-text", &self.state.game_over_text);

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&format!("{} fps", self.fps.fps())));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        fn set_key(&mut self, key: &str, held: bool) -> bool {
            match key {
                "ArrowLeft" => self.input.left = held,
                "ArrowRight" => self.input.right = held,
                "ArrowUp" => self.input.up = held,
                "ArrowDown" => self.input.down = held,
                _ => return false,
            }
            true
        }
    }

    /// Mirror an overlay into an absolutely positioned element
    fn sync_overlay(document: &Document, id: &str, overlay: &TextOverlay) {
        let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };

        if el.text_content().as_deref() != Some(overlay.text.as_str()) {
            el.set_text_content(Some(&overlay.text));
        }

        // Percentages keep the text anchored when the canvas is scaled by CSS
        let style = el.style();
        let _ = style.set_property("left", &format!("{}%", overlay.pos.x / CANVAS_WIDTH * 100.0));
        let _ = style.set_property("top", &format!("{}%", overlay.pos.y / CANVAS_HEIGHT * 100.0));
        let _ = style.set_property("font-size", &format!("{}px", overlay.font_px));
        let _ = style.set_property("color", &overlay.fill);
        let _ = style.set_property("transform", &overlay.css_transform());
        let _ = style.set_property("display", if overlay.visible { "block" } else { "none" });
    }

    fn show_loading_message(message: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"))
        {
            el.set_text_content(Some(message));
            let _ = el.set_attribute("class", "error");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Double Jump starting...");

        if let Err(e) = start().await {
            log::error!("Startup failed: {:#}", e);
            show_loading_message(&format!("Failed to start: {:#}", e));
        }
    }

    async fn start() -> anyhow::Result<()> {
        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        let settings = Settings::load();

        // Every texture must be in place before the scene is built
        let images = assets::load_all().await?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .context("no #canvas element")?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas"))?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .context("Failed to create surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to get adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer =
            SpriteRenderer::new(surface, &adapter, width, height, images, &settings).await?;

        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        game.borrow_mut().renderer = Some(renderer);
        log::info!("Game initialized with seed: {}", seed);

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(&window, game.clone());

        request_animation_frame(game);
        log::info!("Double Jump running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Held keys; arrows would otherwise scroll the page
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                if g.set_key(&key, true) {
                    event.prevent_default();
                } else if !event.repeat() && g.settings.apply_hotkey(&key) {
                    g.settings.save();
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if game.borrow_mut().set_key(&event.key(), false) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup events are lost, so release everything
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input = TickInput::default();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, bail};

    use double_jump::consts::*;
    use double_jump::sim::{GameState, TickInput, tick};

    /// Frames simulated when no count is given (30 s at 60 Hz)
    pub const DEFAULT_FRAMES: u64 = 1800;

    /// Frames between hops
    const HOP_PERIOD: u64 = 90;
    /// Frames after a hop to press jump again in the air
    const DOUBLE_JUMP_DELAY: u64 = 20;

    #[derive(Debug, PartialEq, Eq)]
    pub struct Args {
        pub seed: Option<u64>,
        pub frames: u64,
    }

    /// Parse `[SEED] [FRAMES]`
    pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Args> {
        let args: Vec<String> = args.into_iter().collect();
        if args.len() > 2 {
            bail!("usage: double-jump [SEED] [FRAMES]");
        }

        let seed = match args.first() {
            Some(s) => Some(
                s.parse::<u64>()
                    .with_context(|| format!("invalid seed '{}'", s))?,
            ),
            None => None,
        };
        let frames = match args.get(1) {
            Some(s) => s
                .parse::<u64>()
                .with_context(|| format!("invalid frame count '{}'", s))?,
            None => DEFAULT_FRAMES,
        };

        Ok(Args { seed, frames })
    }

    /// Scripted input: run across the level, turning at the walls, with a
    /// double hop every couple of seconds
    #[derive(Debug)]
    pub struct DemoPilot {
        heading_right: bool,
    }

    impl Default for DemoPilot {
        fn default() -> Self {
            Self { heading_right: true }
        }
    }

    impl DemoPilot {
        pub fn input(&mut self, state: &GameState, frame: u64) -> TickInput {
            let body = &state.player.body;
            if self.heading_right && body.blocked.right {
                self.heading_right = false;
            } else if !self.heading_right && body.blocked.left {
                self.heading_right = true;
            }

            let phase = frame % HOP_PERIOD;
            TickInput {
                left: !self.heading_right,
                right: self.heading_right,
                up: phase == 0 || phase == DOUBLE_JUMP_DELAY,
                down: false,
            }
        }
    }

    /// How a headless run ended
    #[derive(Debug)]
    pub struct Summary {
        pub seed: u64,
        pub ticks: u64,
        pub game_over: bool,
        pub enemies: usize,
        pub bullets: usize,
    }

    impl std::fmt::Display for Summary {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "seed {}: {} ticks, {}, {} enemies, {} bullets",
                self.seed,
                self.ticks,
                if self.game_over { "game over" } else { "still alive" },
                self.enemies,
                self.bullets
            )
        }
    }

    pub fn run(seed: u64, frames: u64) -> Summary {
        let mut state = GameState::new(seed);
        let mut pilot = DemoPilot::default();
        let frames_per_second = (1.0 / SIM_DT).round() as u64;

        for frame in 0..frames {
            let input = pilot.input(&state, frame);
            tick(&mut state, &input, SIM_DT);

            if (frame + 1) % frames_per_second == 0 {
                log::info!(
                    "t={}s player=({:.0}, {:.0}) bullets={} game_over={}",
                    (frame + 1) / frames_per_second,
                    state.player.body.pos.x,
                    state.player.body.pos.y,
                    state.bullets.len(),
                    state.game_over
                );
            }
        }

        Summary {
            seed,
            ticks: state.tick_count,
            game_over: state.game_over,
            enemies: state.enemies.len(),
            bullets: state.bullets.len(),
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = headless::parse_args(std::env::args().skip(1))?;
    let settings = double_jump::Settings::load();
    let clock_seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let seed = args.seed.unwrap_or_else(|| settings.seed_or(clock_seed));

    log::info!("Double Jump (headless) seed {} for {} frames", seed, args.frames);
    let summary = headless::run(seed, args.frames);
    println!("{}", summary);
    Ok(())
}
