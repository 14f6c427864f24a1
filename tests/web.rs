// Browser tests for the JavaScript API. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use surface_web::{mount_all, unmount_all, JsAnimatedSurface};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn section(kind: &str, config: Option<&str>) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document.create_element("section").unwrap();
    el.set_attribute("data-surface", kind).unwrap();
    if let Some(config) = config {
        el.set_attribute("data-surface-config", config).unwrap();
    }
    document.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn unknown_effect_is_rejected() {
    assert!(JsAnimatedSurface::new("sparkles", JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn aliases_are_accepted() {
    let s = JsAnimatedSurface::new("rays", JsValue::NULL).unwrap();
    assert_eq!(s.kind(), "light-rays");
}

#[wasm_bindgen_test]
fn teardown_without_attach_is_harmless() {
    let s = JsAnimatedSurface::new("particle-field", JsValue::UNDEFINED).unwrap();
    s.teardown();
    s.teardown();
    assert_eq!(s.draw_calls(), 0.0);
    assert!(!s.active());
}

#[wasm_bindgen_test]
fn attach_ignores_non_elements() {
    let s = JsAnimatedSurface::new("fog-field", JsValue::UNDEFINED).unwrap();
    s.attach(JsValue::NULL);
    s.attach(JsValue::from_str("#hero"));
    s.resize();
    assert!(!s.active());
    s.teardown();
}

#[wasm_bindgen_test]
fn bad_config_never_throws() {
    let s = JsAnimatedSurface::new("aurora", JsValue::from_str("{ not json")).unwrap();
    s.set_config(JsValue::from_str("[1, 2"));
    let patch = js_sys::JSON::parse(r##"{"colors": ["#00ffff", "nope"], "speed": -3}"##).unwrap();
    s.set_config(patch);
    s.teardown();
}

#[wasm_bindgen_test]
fn unmount_leaves_no_canvas() {
    let el = section("beam-field", Some(r#"{"count": 4}"#));
    assert!(mount_all() >= 1);
    assert_eq!(mount_all(), 0, "already mounted");
    unmount_all();
    assert!(el.query_selector("canvas").unwrap().is_none());
    el.remove();
}

#[wasm_bindgen_test]
fn malformed_mount_config_uses_defaults() {
    let el = section("gradient-aurora", Some("{oops"));
    assert!(mount_all() >= 1);
    unmount_all();
    el.remove();
}
