//! Sticker Burst entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_scene {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, Window,
    };

    use sticker_burst::SceneConfig;
    use sticker_burst::platform::{BodyScrollGate, DomRegions, SystemClock, set_interactive};
    use sticker_burst::renderer::{CanvasMeasure, render_scene};
    use sticker_burst::sim::{ApproxMeasure, Clock, SceneState, TextMeasure, tick};

    /// Scene plus the browser handles it draws into
    struct App {
        state: SceneState,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        measure: Box<dyn TextMeasure>,
        regions: DomRegions,
        gate: BodyScrollGate,
        clock: SystemClock,
    }

    impl App {
        fn frame(&mut self) {
            let now = self.clock.now_ms();
            tick(&mut self.state, now, self.measure.as_ref(), &self.regions, &mut self.gate);
            render_scene(&mut self.ctx, &self.state);
        }

        /// Match the canvas backing store to the viewport and pixel ratio
        fn fit_canvas(&self, window: &Window, viewport: Vec2) {
            let dpr = self.state.config.pixel_ratio(window.device_pixel_ratio());
            self.canvas.set_width((viewport.x as f64 * dpr) as u32);
            self.canvas.set_height((viewport.y as f64 * dpr) as u32);

            let style = self.canvas.style();
            let _ = style.set_property("width", &format!("{}px", viewport.x));
            let _ = style.set_property("height", &format!("{}px", viewport.y));
            let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        }

        /// Client coordinates to canvas coordinates
        fn to_canvas(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                client_x as f32 - rect.left() as f32,
                client_y as f32 - rect.top() as f32,
            )
        }
    }

    fn viewport(window: &Window) -> Vec2 {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        Vec2::new(w as f32, h as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sticker Burst starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let measure: Box<dyn TextMeasure> = match CanvasMeasure::new(&document) {
            Some(m) => Box::new(m),
            None => {
                log::warn!("Text measurement unavailable, using approximate widths");
                Box::new(ApproxMeasure::default())
            }
        };

        let config = SceneConfig::load();
        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let clock = SystemClock::new();
        let size = viewport(&window);
        let state = SceneState::new(config, size, seed, clock.now_ms());

        let app = App {
            state,
            canvas,
            ctx,
            measure,
            regions: DomRegions::new(document.clone()),
            gate: BodyScrollGate::new(document),
            clock,
        };
        app.fit_canvas(&window, size);

        let app = Rc::new(RefCell::new(app));
        setup_window_handlers(&window, app.clone());
        setup_pointer_handlers(&window, app.clone());

        request_animation_frame(app);
        log::info!("Sticker Burst running with seed {seed}");
    }

    fn setup_window_handlers(window: &Window, app: Rc<RefCell<App>>) {
        // Resize
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let size = viewport(&window);
                let mut a = app.borrow_mut();
                a.fit_canvas(&window, size);
                let a = &mut *a;
                a.state.on_resize(size, &a.regions);
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Scroll moves the tracked footer proxies
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                let a = &mut *a;
                let now = a.clock.now_ms();
                a.state.on_scroll(now, &a.regions);
            });
            let _ = window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer_handlers(window: &Window, app: Rc<RefCell<App>>) {
        // Hold the mouse button to drag
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                set_interactive(&a.canvas, true);
                let pos = a.to_canvas(event.client_x(), event.client_y());
                a.state.pointer_down(pos);
            });
            let _ = window.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pos = a.to_canvas(event.client_x(), event.client_y());
                a.state.pointer_move(pos);
            });
            let _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                set_interactive(&a.canvas, false);
                a.state.pointer_up();
            });
            let _ = window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: two-finger drag only, one finger scrolls the page
        let passive = AddEventListenerOptions::new();
        passive.set_passive(true);

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let touches = event.touches();
                if touches.length() < 2 {
                    return;
                }
                let mut a = app.borrow_mut();
                set_interactive(&a.canvas, true);
                if let Some(touch) = touches.get(0) {
                    let pos = a.to_canvas(touch.client_x(), touch.client_y());
                    a.state.pointer_down(pos);
                }
            });
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &passive,
            );
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut a = app.borrow_mut();
                if !a.state.pointer.is_dragging() {
                    return;
                }
                if let Some(touch) = event.touches().get(0) {
                    let pos = a.to_canvas(touch.client_x(), touch.client_y());
                    a.state.pointer_move(pos);
                }
            });
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                closure.as_ref().unchecked_ref(),
                &passive,
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut a = app.borrow_mut();
                set_interactive(&a.canvas, false);
                a.state.pointer_up();
            });
            let _ = window.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().frame();
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_scene::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: simulate the scene on a fixed clock and log what happens
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use sticker_burst::consts::STEP_MS;
    use sticker_burst::sim::{
        ApproxMeasure, Clock, LatchGate, ManualClock, PhysicsWorld, RegionSource, SceneState, TrackedRegion, tick,
    };
    use sticker_burst::{Rect, SceneConfig};

    /// A page without a footer
    struct NoPage;

    impl RegionSource for NoPage {
        fn host_rect(&self) -> Option<Rect> {
            None
        }

        fn region_rect(&self, _region: TrackedRegion) -> Option<Rect> {
            None
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sticker Burst (native) starting...");
    log::info!("Native mode runs a headless simulation - build for wasm32 to see the scene");

    let config = SceneConfig::load();
    let seed = config.seed.unwrap_or_else(rand::random);
    let clock = ManualClock::new(0.0);
    let mut state = SceneState::new(config, Vec2::new(1280.0, 800.0), seed, clock.now_ms());
    let measure = ApproxMeasure::default();
    let mut gate = LatchGate::default();

    for second in 1..=8 {
        let until = second as f64 * 1000.0;
        while clock.now_ms() < until {
            clock.advance(STEP_MS);
            tick(&mut state, clock.now_ms(), &measure, &NoPage, &mut gate);
        }
        log::info!(
            "t={second}s phase={:?} stickers={} bodies={} scroll_unlocked={}",
            state.launcher.phase(),
            state.sticker_count(),
            state.world.len(),
            gate.opened > 0
        );
    }
}
