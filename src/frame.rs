//! requestAnimationFrame driver.
//!
//! Holds the callback closure for the lifetime of the host and at most one
//! pending request handle, so a request can always be cancelled.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameLoop {
    callback: Closure<dyn FnMut(f64)>,
    pending: Option<i32>,
}

impl FrameLoop {
    pub fn new(on_frame: impl FnMut(f64) + 'static) -> Self {
        Self {
            callback: Closure::wrap(Box::new(on_frame) as Box<dyn FnMut(f64)>),
            pending: None,
        }
    }

    /// Request one callback unless one is already pending.
    pub fn request(&mut self) {
        if self.pending.is_some() {
            return;
        }
        if let Some(w) = web::window() {
            self.pending = w
                .request_animation_frame(self.callback.as_ref().unchecked_ref())
                .ok();
        }
    }

    pub fn cancel(&mut self) {
        if let (Some(handle), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(handle);
        }
    }

    /// Call first thing in the callback: the pending request has been consumed.
    pub fn fired(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
