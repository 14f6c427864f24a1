// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn pointer_maps_into_container_units() {
    let uv = uv_in_rect(Vec2::new(150.0, 75.0), Vec2::new(100.0, 50.0), Vec2::new(200.0, 100.0));
    assert_eq!(uv, Vec2::new(0.25, 0.25));
}

#[test]
fn corners_map_to_unit_square_corners() {
    let origin = Vec2::new(10.0, 20.0);
    let size = Vec2::new(400.0, 300.0);
    assert_eq!(uv_in_rect(origin, origin, size), Vec2::ZERO);
    assert_eq!(uv_in_rect(origin + size, origin, size), Vec2::ONE);
}

#[test]
fn points_outside_are_not_clamped_here() {
    // Clamped later by the pointer smoother.
    let uv = uv_in_rect(Vec2::new(-100.0, 0.0), Vec2::ZERO, Vec2::new(100.0, 100.0));
    assert_eq!(uv.x, -1.0);
}

#[test]
fn collapsed_rect_maps_to_center() {
    assert_eq!(
        uv_in_rect(Vec2::new(3.0, 4.0), Vec2::ZERO, Vec2::new(0.0, 100.0)),
        Vec2::splat(0.5)
    );
}
