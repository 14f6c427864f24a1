// Host-side tests for generated particle and beam geometry.

use surface_core::geometry::{
    fullscreen_triangle, point_cloud, stacked_planes, PARTICLE_STRIDE, PLANE_STRIDE,
};
use surface_core::{Rgb, VertexStep};

#[test]
fn fullscreen_triangle_is_procedural() {
    let g = fullscreen_triangle();
    assert!(g.layout.is_none());
    assert!(g.data.is_empty());
    assert!(!g.is_indexed());
    assert_eq!((g.vertex_count, g.instance_count), (3, 1));
}

#[test]
fn point_cloud_has_one_instance_per_particle() {
    let palette = [Rgb::from_bytes([255, 0, 0]), Rgb::from_bytes([0, 0, 255])];
    let g = point_cloud(400, &palette, 7);
    assert_eq!(g.data.len(), 400 * PARTICLE_STRIDE as usize);
    assert_eq!(g.instance_count, 400);
    assert_eq!(g.vertex_count, 6);
    let layout = g.layout.as_ref().unwrap();
    assert_eq!(layout.step, VertexStep::Instance);
    assert_eq!(layout.stride, PARTICLE_STRIDE);
    assert_eq!(g.byte_len(), g.data.len() * 4);
}

#[test]
fn point_cloud_stays_inside_the_unit_sphere() {
    let g = point_cloud(1000, &[Rgb::WHITE], 3);
    for p in g.data.chunks_exact(PARTICLE_STRIDE as usize) {
        let r2 = p[0] * p[0] + p[1] * p[1] + p[2] * p[2];
        assert!(r2 <= 1.0 + 1e-5, "{r2}");
        assert!(p[3..7].iter().all(|r| (0.0..1.0).contains(r)));
    }
}

#[test]
fn point_cloud_colors_come_from_the_palette() {
    let palette = [Rgb::from_bytes([255, 0, 0]), Rgb::from_bytes([0, 255, 0])];
    let g = point_cloud(200, &palette, 11);
    for p in g.data.chunks_exact(PARTICLE_STRIDE as usize) {
        let c = Rgb::new(p[7], p[8], p[9]);
        assert!(palette.contains(&c));
    }
}

#[test]
fn point_cloud_is_deterministic_per_seed() {
    let a = point_cloud(64, &[Rgb::WHITE], 42);
    let b = point_cloud(64, &[Rgb::WHITE], 42);
    let c = point_cloud(64, &[Rgb::WHITE], 43);
    assert_eq!(a, b);
    assert_ne!(a.data, c.data);
}

#[test]
fn stacked_planes_layout() {
    let g = stacked_planes(12, 3.0, 15.0, 100, 42);
    assert_eq!(g.data.len(), 12 * 101 * 2 * PLANE_STRIDE as usize);
    assert_eq!(g.indices.len(), 12 * 100 * 6);
    assert_eq!(g.vertex_count as usize, g.indices.len());
    assert_eq!(g.layout.as_ref().map(|l| l.step), Some(VertexStep::Vertex));
    let vertices = (g.data.len() / PLANE_STRIDE as usize) as u32;
    assert!(g.indices.iter().all(|i| *i < vertices));
}

#[test]
fn stacked_planes_are_centered() {
    let g = stacked_planes(12, 3.0, 15.0, 100, 42);
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (f32::MAX, f32::MIN, f32::MAX, f32::MIN);
    for v in g.data.chunks_exact(PLANE_STRIDE as usize) {
        min_x = min_x.min(v[0]);
        max_x = max_x.max(v[0]);
        min_y = min_y.min(v[1]);
        max_y = max_y.max(v[1]);
        assert_eq!(v[2], 0.0);
    }
    assert_eq!((min_x, max_x), (-18.0, 18.0));
    assert_eq!((min_y, max_y), (-7.5, 7.5));
}

#[test]
fn each_strip_has_its_own_noise_offset() {
    let g = stacked_planes(4, 1.0, 1.0, 10, 9);
    let strip = 11 * 2 * PLANE_STRIDE as usize;
    let offsets: Vec<f32> = g.data.chunks_exact(strip).map(|s| s[3]).collect();
    assert_eq!(offsets.len(), 4);
    assert!(offsets.iter().all(|u| (0.0..300.0).contains(u)));
    assert!(offsets.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn empty_counts_produce_empty_buffers() {
    assert!(point_cloud(0, &[], 1).data.is_empty());
    let g = stacked_planes(0, 3.0, 15.0, 100, 1);
    assert!(g.data.is_empty() && g.indices.is_empty());
}
