//! Flappy Dust entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use flappy_dust::audio::{AudioManager, Microphone};
    use flappy_dust::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use flappy_dust::platform::SignalSource;
    use flappy_dust::platform::web::CanvasSurface;
    use flappy_dust::sim::{ControlMode, InputEvent, level_meter_width};
    use flappy_dust::{FrameOutcome, Game, Settings};

    /// Everything the browser callbacks share
    struct App {
        game: Game,
        surface: CanvasSurface,
        /// An animation frame is scheduled
        running: bool,
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn element(id: &str) -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn set_display(id: &str, value: &str) {
        if let Some(el) = element(id) {
            let _ = el.style().set_property("display", value);
        }
    }

    fn show_menu(last_mode: Option<ControlMode>) {
        set_display("menu", "flex");
        set_display("game", "none");
        set_display("level", "none");

        for (id, mode) in [
            ("click-mode-btn", ControlMode::Click),
            ("voice-mode-btn", ControlMode::Signal),
        ] {
            if let Some(btn) = element(id) {
                let _ = btn
                    .class_list()
                    .toggle_with_force("selected", last_mode == Some(mode));
            }
        }
    }

    fn show_game(mode: ControlMode, settings: &Settings) {
        set_display("menu", "none");
        set_display("game", "block");
        let meter = mode == ControlMode::Signal && settings.show_level_meter;
        set_display("level", if meter { "block" } else { "none" });
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Dust starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let surface = CanvasSurface::new(&canvas).expect("no 2d context");

        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("LocalStorage unavailable, scores will not persist");
                Box::new(MemoryStore::new())
            }
        };
        let settings = Settings::load(store.as_ref());
        let sound = Box::new(AudioManager::new(&settings));

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed, store, sound),
            surface,
            running: false,
        }));

        let last_mode = app.borrow().game.settings().last_mode;
        setup_menu_buttons(app.clone());
        setup_input_handlers(&canvas, app);
        show_menu(last_mode);

        log::info!("Flappy Dust ready");
    }

    fn setup_menu_buttons(app: Rc<RefCell<App>>) {
        // Click mode
        if let Some(btn) = element("click-mode-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let started = app.borrow_mut().game.start_click(now());
                match started {
                    Ok(()) => {
                        show_game(ControlMode::Click, app.borrow().game.settings());
                        start_loop(app.clone());
                    }
                    Err(e) => log::warn!("Could not start: {}", e),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Voice mode
        if let Some(btn) = element("voice-mode-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let app = app.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let opened = Microphone::open()
                        .await
                        .map(|mic| Box::new(mic) as Box<dyn SignalSource>);
                    let started = app.borrow_mut().game.start_signal(opened, now());
                    match started {
                        Ok(()) => {
                            show_game(ControlMode::Signal, app.borrow().game.settings());
                            start_loop(app.clone());
                        }
                        Err(e) => {
                            if let Some(window) = web_sys::window() {
                                let _ = window.alert_with_message(&e.to_string());
                            }
                        }
                    }
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse click - jump
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.push_input(InputEvent::Click);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.push_input(InputEvent::Key(event.key()));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.running {
                return;
            }
            a.running = true;
        }
        request_animation_frame(app);
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let (outcome, last_mode) = {
            let mut a = app.borrow_mut();
            let App { game, surface, .. } = &mut *a;
            let outcome = game.frame(time, surface);

            if game.state().mode == Some(ControlMode::Signal) {
                if let Some(fill) = element("level-fill") {
                    let width = level_meter_width(game.state().volume);
                    let _ = fill.style().set_property("width", &format!("{}px", width));
                }
            }
            let last_mode = game.settings().last_mode;
            if outcome == FrameOutcome::Stop {
                a.running = false;
            }
            (outcome, last_mode)
        };

        match outcome {
            FrameOutcome::Continue => request_animation_frame(app),
            FrameOutcome::Stop => show_menu(last_mode),
        }
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
fn main() {
    use flappy_dust::persistence::MemoryStore;
    use flappy_dust::platform::{NullSurface, SilentPlayer};
    use flappy_dust::sim::{GamePhase, InputEvent};
    use flappy_dust::{FrameOutcome, Game};

    env_logger::init();
    log::info!("Flappy Dust (native) starting...");
    log::info!("Native mode has no window - build for wasm32 and serve the page to play");

    // Headless autopilot run to exercise the loop
    let mut game = Game::new(1, Box::new(MemoryStore::new()), Box::new(SilentPlayer));
    if let Err(e) = game.start_click(0.0) {
        log::error!("{}", e);
        return;
    }

    let mut surface = NullSurface::default();
    let mut t = 0.0;
    while game.phase() == GamePhase::Playing && t < 120_000.0 {
        let state = game.state();
        let target = state
            .obstacles
            .iter()
            .find(|o| !o.passed)
            .map(|o| (o.gap_top + o.gap_bottom) / 2.0)
            .unwrap_or(flappy_dust::consts::START_Y);
        if state.character.y > target + 20.0 {
            game.push_input(InputEvent::Click);
        }
        t += 1000.0 / 60.0;
        if game.frame(t, &mut surface) == FrameOutcome::Stop {
            break;
        }
    }

    println!(
        "Autopilot scored {} in {:.1}s of play",
        game.state().score,
        t / 1000.0
    );
}
