use deck_core::{DeckError, Scheduler, TimerId};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `setInterval` / `requestAnimationFrame` backed scheduler.
///
/// The deck runs at most one countdown interval and one pending frame, so a
/// single long-lived closure serves each kind.
pub struct WebScheduler {
    window: web::Window,
    tick: Closure<dyn FnMut()>,
    frame: Closure<dyn FnMut()>,
}

impl WebScheduler {
    pub fn new(
        window: web::Window,
        on_tick: impl FnMut() + 'static,
        on_frame: impl FnMut() + 'static,
    ) -> Self {
        Self {
            window,
            tick: Closure::wrap(Box::new(on_tick) as Box<dyn FnMut()>),
            frame: Closure::wrap(Box::new(on_frame) as Box<dyn FnMut()>),
        }
    }
}

impl Scheduler for WebScheduler {
    fn start_interval(&mut self, period: Duration) -> deck_core::Result<TimerId> {
        let ms = period.as_millis().min(i32::MAX as u128) as i32;
        self.window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.tick.as_ref().unchecked_ref(),
                ms,
            )
            .map(|h| TimerId(h as u32))
            .map_err(|e| DeckError::Scheduler(format!("{:?}", e)))
    }

    fn cancel_interval(&mut self, id: TimerId) {
        self.window.clear_interval_with_handle(id.0 as i32);
    }

    fn request_frame(&mut self) -> deck_core::Result<TimerId> {
        self.window
            .request_animation_frame(self.frame.as_ref().unchecked_ref())
            .map(|h| TimerId(h as u32))
            .map_err(|e| DeckError::Scheduler(format!("{:?}", e)))
    }

    fn cancel_frame(&mut self, id: TimerId) {
        _ = self.window.cancel_animation_frame(id.0 as i32);
    }
}
