//! The five effects as strategies over one capability set.
//!
//! An effect contributes its WGSL program, a geometry builder and a uniform
//! writer; everything else (lifecycle, pacing, visibility, pointer) is shared
//! by [`AnimatedSurface`](crate::surface::AnimatedSurface).

mod aurora;
mod beams;
mod fog;
mod particles;
mod rays;

pub use aurora::{AuroraUniforms, GradientAurora};
pub use beams::{BeamField, BeamUniforms};
pub use fog::{FogField, FogUniforms};
pub use particles::{particle_model, ParticleField, ParticleUniforms};
pub use rays::{ray_anchor, LightRays, RayUniforms};

use crate::config::SurfaceConfig;
use crate::geometry::{fullscreen_triangle, Geometry};
use crate::kind::{EffectKind, HiddenPolicy};
use crate::sizing::SurfaceSize;
use glam::Vec2;

/// Per-effect runtime behavior derived from the current config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectPolicy {
    pub hidden: HiddenPolicy,
    /// Pointer smoothing factor; `None` when the effect ignores the pointer.
    pub pointer_smoothing: Option<f32>,
    pub dpr_cap: f32,
    pub pixel_scale: f32,
    pub visibility_threshold: f64,
    /// Premultiplied clear color.
    pub clear: [f64; 4],
    pub target_fps: Option<f32>,
}

/// Shader program and the size of its single uniform block.
#[derive(Clone, Copy, Debug)]
pub struct ProgramSpec {
    pub label: &'static str,
    /// WGSL with `vs_main` / `fs_main` entry points and the uniform block at group 0, binding 0.
    pub shader: &'static str,
    pub uniform_size: usize,
}

/// Inputs for one frame's uniforms.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    /// Speed-scaled seconds.
    pub elapsed: f32,
    pub size: SurfaceSize,
    /// Smoothed pointer in container uv (y down).
    pub pointer: Vec2,
}

pub const TRANSPARENT: [f64; 4] = [0.0, 0.0, 0.0, 0.0];

pub trait Effect {
    fn kind(&self) -> EffectKind;

    fn policy(&self, config: &SurfaceConfig) -> EffectPolicy;

    fn program(&self) -> ProgramSpec;

    /// Identity of the geometry built for `config`; a change means rebuild.
    fn geometry_key(&self, _config: &SurfaceConfig) -> u64 {
        0
    }

    fn build_geometry(&self, _config: &SurfaceConfig) -> Geometry {
        fullscreen_triangle()
    }

    /// Replace `out` with this frame's uniform bytes.
    fn write_uniforms(&self, config: &SurfaceConfig, frame: &FrameParams, out: &mut Vec<u8>);
}

static FOG: FogField = FogField;
static AURORA: GradientAurora = GradientAurora;
static RAYS: LightRays = LightRays;
static PARTICLES: ParticleField = ParticleField;
static BEAMS: BeamField = BeamField;

pub fn effect_for(kind: EffectKind) -> &'static dyn Effect {
    match kind {
        EffectKind::FogField => &FOG,
        EffectKind::GradientAurora => &AURORA,
        EffectKind::LightRays => &RAYS,
        EffectKind::ParticleField => &PARTICLES,
        EffectKind::BeamField => &BEAMS,
    }
}

pub(crate) fn write_pod<T: bytemuck::Pod>(value: &T, out: &mut Vec<u8>) {
    out.clear();
    out.extend_from_slice(bytemuck::bytes_of(value));
}
