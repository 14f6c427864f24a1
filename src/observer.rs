//! IntersectionObserver wrapper feeding one container's visibility.

use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

type EntriesCallback = Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>;

/// Observes one element; disconnects on drop.
pub struct VisibilityObserver {
    observer: web::IntersectionObserver,
    _callback: EntriesCallback,
}

impl VisibilityObserver {
    /// Report `is_intersecting` of the newest entry for every observer batch.
    pub fn observe(
        target: &web::Element,
        threshold: f64,
        mut on_change: impl FnMut(bool) + 'static,
    ) -> anyhow::Result<Self> {
        let callback: EntriesCallback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web::IntersectionObserver| {
                let latest = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
                    .last();
                if let Some(entry) = latest {
                    on_change(entry.is_intersecting());
                }
            },
        ) as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);
        let init = web::IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer = web::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &init,
        )
        .map_err(|e| anyhow!("{:?}", e))?;
        observer.observe(target);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
