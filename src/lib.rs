#![cfg(target_arch = "wasm32")]
//! Browser front-end: mounts animated backgrounds on page sections and
//! exposes them to JavaScript.

use crate::constants::{SURFACE_ATTR, SURFACE_CONFIG_ATTR, SURFACE_SELECTOR};
use crate::host::SurfaceHost;
use std::cell::RefCell;
use surface_core::{ConfigPatch, EffectKind, HostPhase};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod config;
mod constants;
mod dom;
mod frame;
mod host;
mod input;
mod observer;
mod render;

thread_local! {
    static MOUNTED: RefCell<Vec<SurfaceHost>> = const { RefCell::new(Vec::new()) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("surface-web starting");
    mount_all();
    Ok(())
}

/// Mount every `[data-surface]` element that is not mounted yet. Returns the
/// number of new surfaces.
#[wasm_bindgen(js_name = mountAll)]
pub fn mount_all() -> u32 {
    let Some(document) = dom::window_document() else {
        return 0;
    };
    let Ok(nodes) = document.query_selector_all(SURFACE_SELECTOR) else {
        return 0;
    };
    MOUNTED.with(|m| m.borrow_mut().retain(|h| h.phase() != HostPhase::TornDown));
    let mut mounted = 0;
    for i in 0..nodes.length() {
        let Some(element) = nodes.get(i).and_then(|n| n.dyn_into::<web::HtmlElement>().ok()) else {
            continue;
        };
        let already = MOUNTED.with(|m| m.borrow().iter().any(|h| h.is_attached_to(&element)));
        if already {
            continue;
        }
        match mount_element(&element) {
            Ok(host) => {
                MOUNTED.with(|m| m.borrow_mut().push(host));
                mounted += 1;
            }
            Err(e) => log::warn!("[surface] skipped element: {}", e),
        }
    }
    mounted
}

fn mount_element(element: &web::HtmlElement) -> anyhow::Result<SurfaceHost> {
    let kind: EffectKind = element
        .get_attribute(SURFACE_ATTR)
        .unwrap_or_default()
        .parse()?;
    let patch = match element.get_attribute(SURFACE_CONFIG_ATTR) {
        Some(json) => ConfigPatch::from_json(&json).unwrap_or_else(|e| {
            log::warn!("[config] {}: {}", kind, e);
            ConfigPatch::default()
        }),
        None => ConfigPatch::default(),
    };
    let host = SurfaceHost::new(kind, &patch);
    host.attach(element.clone());
    Ok(host)
}

/// Tear down every surface mounted by [`mount_all`].
#[wasm_bindgen(js_name = unmountAll)]
pub fn unmount_all() {
    let hosts = MOUNTED.with(|m| std::mem::take(&mut *m.borrow_mut()));
    for host in hosts {
        host.teardown();
    }
}

/// JavaScript handle for one animated background.
#[wasm_bindgen(js_name = AnimatedSurface)]
pub struct JsAnimatedSurface {
    host: SurfaceHost,
}

#[wasm_bindgen(js_class = AnimatedSurface)]
impl JsAnimatedSurface {
    /// Throws only for an unknown effect name; bad options fall back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str, config: JsValue) -> Result<JsAnimatedSurface, JsValue> {
        let kind: EffectKind = kind
            .parse()
            .map_err(|e: surface_core::ConfigError| JsValue::from_str(&e.to_string()))?;
        let patch = config::patch_from_js(&config).unwrap_or_else(|e| {
            log::warn!("[config] {}: {}", kind, e);
            ConfigPatch::default()
        });
        Ok(Self {
            host: SurfaceHost::new(kind, &patch),
        })
    }

    /// Silently ignores anything that is not an HTML element.
    pub fn attach(&self, container: JsValue) {
        if let Ok(element) = container.dyn_into::<web::HtmlElement>() {
            self.host.attach(element);
        }
    }

    /// Replaces the whole configuration; keys left out return to their defaults.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&self, config: JsValue) {
        match config::patch_from_js(&config) {
            Ok(patch) => {
                self.host.set_config(&patch);
            }
            Err(e) => log::warn!("[config] {} ignored: {}", self.host.kind(), e),
        }
    }

    pub fn resize(&self) {
        self.host.resize();
    }

    pub fn teardown(&self) {
        self.host.teardown();
    }

    #[wasm_bindgen(getter, js_name = drawCalls)]
    pub fn draw_calls(&self) -> f64 {
        self.host.draw_calls() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.host.is_active()
    }

    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        self.host.kind().to_string()
    }
}
