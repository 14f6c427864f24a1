use super::{write_pod, Effect, EffectPolicy, FrameParams, ProgramSpec, TRANSPARENT};
use crate::config::SurfaceConfig;
use crate::constants::{
    RAYS_ANCHOR_OUTSIDE, RAYS_DPR_CAP, RAYS_POINTER_SMOOTHING, RAYS_VISIBILITY_THRESHOLD,
};
use crate::kind::{EffectKind, HiddenPolicy, RaysOrigin};
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

const SHADER: &str = include_str!("../../shaders/rays.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct RayUniforms {
    /// width, height, time, unused
    pub frame: [f32; 4],
    /// anchor.xy (pixels, y down), direction.xy
    pub anchor: [f32; 4],
    /// rgb, saturation
    pub color: [f32; 4],
    /// spread, ray length, fade distance, pulsating (0/1)
    pub shape: [f32; 4],
    /// pointer.xy (uv), influence, noise
    pub pointer: [f32; 4],
    /// distortion, unused x3
    pub extra: [f32; 4],
}

/// Anchor point (pixels, y down) and unit direction for a surface of `size` pixels.
///
/// Anchors sit just outside the surface edge so the rays enter from off-screen.
pub fn ray_anchor(origin: RaysOrigin, size: Vec2) -> (Vec2, Vec2) {
    let (w, h) = (size.x, size.y);
    let o = RAYS_ANCHOR_OUTSIDE;
    match origin {
        RaysOrigin::TopLeft => (Vec2::new(0.0, -o * h), Vec2::Y),
        RaysOrigin::TopCenter => (Vec2::new(0.5 * w, -o * h), Vec2::Y),
        RaysOrigin::TopRight => (Vec2::new(w, -o * h), Vec2::Y),
        RaysOrigin::Left => (Vec2::new(-o * w, 0.5 * h), Vec2::X),
        RaysOrigin::Right => (Vec2::new((1.0 + o) * w, 0.5 * h), -Vec2::X),
        RaysOrigin::BottomLeft => (Vec2::new(0.0, (1.0 + o) * h), -Vec2::Y),
        RaysOrigin::BottomCenter => (Vec2::new(0.5 * w, (1.0 + o) * h), -Vec2::Y),
        RaysOrigin::BottomRight => (Vec2::new(w, (1.0 + o) * h), -Vec2::Y),
    }
}

/// Volumetric-looking light shafts from an off-screen anchor.
pub struct LightRays;

impl LightRays {
    fn tracks_pointer(config: &SurfaceConfig) -> bool {
        config.follow_pointer && config.pointer_influence > 0.0
    }
}

impl Effect for LightRays {
    fn kind(&self) -> EffectKind {
        EffectKind::LightRays
    }

    fn policy(&self, config: &SurfaceConfig) -> EffectPolicy {
        EffectPolicy {
            hidden: HiddenPolicy::Release,
            pointer_smoothing: Self::tracks_pointer(config).then_some(RAYS_POINTER_SMOOTHING),
            dpr_cap: RAYS_DPR_CAP,
            pixel_scale: 1.0,
            visibility_threshold: RAYS_VISIBILITY_THRESHOLD,
            clear: TRANSPARENT,
            target_fps: None,
        }
    }

    fn program(&self) -> ProgramSpec {
        ProgramSpec {
            label: "light_rays",
            shader: SHADER,
            uniform_size: std::mem::size_of::<RayUniforms>(),
        }
    }

    fn write_uniforms(&self, config: &SurfaceConfig, frame: &FrameParams, out: &mut Vec<u8>) {
        let rays = config.rays();
        let size = Vec2::new(frame.size.width as f32, frame.size.height as f32);
        let (anchor, dir) = ray_anchor(rays.origin, size);
        let influence = if Self::tracks_pointer(config) {
            config.pointer_influence
        } else {
            0.0
        };
        let u = RayUniforms {
            frame: [size.x, size.y, frame.elapsed, 0.0],
            anchor: [anchor.x, anchor.y, dir.x, dir.y],
            color: config.color(0).to_vec4(rays.saturation),
            shape: [
                config.spread,
                rays.ray_length,
                rays.fade_distance,
                if rays.pulsating { 1.0 } else { 0.0 },
            ],
            pointer: [frame.pointer.x, frame.pointer.y, influence, config.noise],
            extra: [config.distortion, 0.0, 0.0, 0.0],
        };
        write_pod(&u, out);
    }
}
