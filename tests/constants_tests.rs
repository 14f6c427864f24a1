// Host-side tests for DOM wiring constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn selector_matches_the_mount_attribute() {
    assert_eq!(SURFACE_SELECTOR, format!("[{}]", SURFACE_ATTR));
    assert!(SURFACE_CONFIG_ATTR.starts_with(SURFACE_ATTR));
}

#[test]
fn canvas_fills_its_container_without_catching_input() {
    let style: std::collections::HashMap<_, _> = CANVAS_STYLE.into_iter().collect();
    assert_eq!(style["position"], "absolute");
    assert_eq!(style["width"], "100%");
    assert_eq!(style["height"], "100%");
    assert_eq!(style["pointer-events"], "none");
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn initial_canvas_is_never_empty() {
    assert!(INITIAL_CANVAS_PX >= 1);
}
