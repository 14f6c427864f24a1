//! CPU-side geometry for the three mesh shapes the effects use.
//!
//! Buffers are plain interleaved `f32` data with a layout description; the
//! web crate turns that into `wgpu` vertex buffer layouts.

use crate::color::Rgb;
use crate::constants::BEAM_UV_OFFSET_RANGE;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::{smallvec, SmallVec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexStep {
    Vertex,
    Instance,
}

/// One shader input: `@location(location)`, `components` floats at `offset` floats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub offset: u32,
    pub components: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VertexLayout {
    pub stride: u32,
    pub step: VertexStep,
    pub attributes: SmallVec<[VertexAttribute; 4]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub label: &'static str,
    /// Interleaved attribute data; empty for procedural geometry.
    pub data: Vec<f32>,
    /// `None` when the vertex shader generates positions from the vertex index.
    pub layout: Option<VertexLayout>,
    pub indices: Vec<u32>,
    /// Vertices (or indices) drawn per instance.
    pub vertex_count: u32,
    pub instance_count: u32,
}

impl Geometry {
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn byte_len(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}

/// Three vertices covering the viewport, generated in the vertex stage.
pub fn fullscreen_triangle() -> Geometry {
    Geometry {
        label: "fullscreen_triangle",
        data: Vec::new(),
        layout: None,
        indices: Vec::new(),
        vertex_count: 3,
        instance_count: 1,
    }
}

/// Floats per particle instance: position (3), random (4), color (3).
pub const PARTICLE_STRIDE: u32 = 10;

/// Instanced point cloud; each instance is expanded to a camera-facing quad.
///
/// Positions are rejection-sampled inside the unit sphere, then pulled in by
/// the cube root of a uniform sample. Colors are drawn from `palette`.
pub fn point_cloud(count: u32, palette: &[Rgb], seed: u64) -> Geometry {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity((count * PARTICLE_STRIDE) as usize);
    for _ in 0..count {
        let v = loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            let len_sq = v.length_squared();
            if len_sq > 0.0 && len_sq <= 1.0 {
                break v;
            }
        };
        let p = v * rng.gen::<f32>().cbrt();
        let color = if palette.is_empty() {
            Rgb::WHITE
        } else {
            palette[rng.gen_range(0..palette.len())]
        };
        data.extend_from_slice(&p.to_array());
        data.extend_from_slice(&[rng.gen(), rng.gen(), rng.gen(), rng.gen()]);
        data.extend_from_slice(&color.to_array());
    }
    Geometry {
        label: "point_cloud",
        data,
        layout: Some(VertexLayout {
            stride: PARTICLE_STRIDE,
            step: VertexStep::Instance,
            attributes: smallvec![
                VertexAttribute { location: 0, offset: 0, components: 3 },
                VertexAttribute { location: 1, offset: 3, components: 4 },
                VertexAttribute { location: 2, offset: 7, components: 3 },
            ],
        }),
        indices: Vec::new(),
        vertex_count: 6,
        instance_count: count,
    }
}

/// Floats per beam vertex: position (3), uv (2).
pub const PLANE_STRIDE: u32 = 5;

/// `count` vertical strips side by side, centered on the origin.
///
/// Every strip has `segments` rows so the vertex stage can displace it along
/// z. Each strip samples the noise field at its own random uv offset.
pub fn stacked_planes(count: u32, width: f32, height: f32, segments: u32, seed: u64) -> Geometry {
    let mut rng = StdRng::seed_from_u64(seed);
    let segments = segments.max(1);
    let rows = segments + 1;
    let mut data = Vec::with_capacity((count * rows * 2 * PLANE_STRIDE) as usize);
    let mut indices = Vec::with_capacity((count * segments * 6) as usize);
    let total_width = count as f32 * width;
    let x_base = -total_width / 2.0;

    for i in 0..count {
        let x0 = x_base + i as f32 * width;
        let u_off: f32 = rng.gen_range(0.0..BEAM_UV_OFFSET_RANGE);
        let v_off: f32 = rng.gen_range(0.0..BEAM_UV_OFFSET_RANGE);
        let first = i * rows * 2;
        for j in 0..rows {
            let t = j as f32 / segments as f32;
            let y = height * (t - 0.5);
            data.extend_from_slice(&[x0, y, 0.0, u_off, t + v_off]);
            data.extend_from_slice(&[x0 + width, y, 0.0, u_off + 1.0, t + v_off]);
            if j < segments {
                let a = first + j * 2;
                let (b, c, d) = (a + 1, a + 2, a + 3);
                indices.extend_from_slice(&[a, b, c, c, b, d]);
            }
        }
    }
    let vertex_count = indices.len() as u32;
    Geometry {
        label: "stacked_planes",
        data,
        layout: Some(VertexLayout {
            stride: PLANE_STRIDE,
            step: VertexStep::Vertex,
            attributes: smallvec![
                VertexAttribute { location: 0, offset: 0, components: 3 },
                VertexAttribute { location: 1, offset: 3, components: 2 },
            ],
        }),
        indices,
        vertex_count,
        instance_count: 1,
    }
}
