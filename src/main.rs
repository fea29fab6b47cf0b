//! Neon Breaker entry point
//!
//! Wires platform events into the game context and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use glam::Vec2;
    use neon_breaker::Game;
    use neon_breaker::game::Key;
    use neon_breaker::hud::HudSink;
    use neon_breaker::sim::Session;

    /// HUD sink writing into the DOM overlay
    struct DomHud;

    impl HudSink for DomHud {
        fn show_session(&mut self, session: &Session) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            for (id, value) in [
                ("hud-score", session.score.to_string()),
                ("hud-lives", session.lives.to_string()),
                ("hud-level", session.level.to_string()),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&value));
                }
            }
        }

        fn set_visible(&mut self, visible: bool) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("hud") {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }
    }

    fn event_ndc(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let w = canvas.client_width().max(1) as f32;
        let h = canvas.client_height().max(1) as f32;
        Vec2::new(
            event.offset_x() as f32 / w * 2.0 - 1.0,
            -(event.offset_y() as f32 / h * 2.0 - 1.0),
        )
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Breaker starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);

        log::info!("Neon Breaker running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let ndc = event_ndc(&canvas_clone, &event);
                game.borrow_mut().pointer_moved(ndc);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down / up
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let ndc = event_ndc(&canvas_clone, &event);
                game.borrow_mut().pointer_down(ndc);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().pointer_up();
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => g.key_pressed(Key::Pause),
                    "s" | "S" => g.key_pressed(Key::Settings),
                    "i" | "I" => {
                        g.idle_demo = !g.idle_demo;
                        log::info!("Idle demo: {}", g.idle_demo);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().focus_lost();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().focus_lost();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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

    thread_local! {
        static LAST_TIME: RefCell<f64> = const { RefCell::new(0.0) };
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let dt = LAST_TIME.with(|last| {
            let mut last = last.borrow_mut();
            let dt = if *last > 0.0 {
                ((time - *last) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            *last = time;
            dt.min(0.1)
        });

        game.borrow_mut().frame(dt, &mut DomHud);
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

/// Headless demo: the idle AI plays a run and logs the HUD
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use neon_breaker::Game;
    use neon_breaker::hud::LogHud;

    env_logger::init();
    log::info!("Neon Breaker (native) starting headless demo...");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1);
    let mut game = Game::new(seed);
    game.idle_demo = true;

    // Press START
    game.pointer_moved(Vec2::new(0.0, 0.2));
    game.pointer_down(Vec2::new(0.0, 0.2));
    game.pointer_up();

    let mut hud = LogHud;
    let dt = 1.0 / 60.0;
    // Cap the demo at ten minutes of virtual time
    for _ in 0..(600 * 60) {
        game.frame(dt, &mut hud);
        if game.quit_requested || game.state.mode == neon_breaker::sim::Mode::GameOver {
            break;
        }
    }

    log::info!(
        "demo finished: score {}, level {}",
        game.state.session.score,
        game.state.session.level
    );
}
