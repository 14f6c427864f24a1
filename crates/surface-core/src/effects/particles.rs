use super::{write_pod, Effect, EffectPolicy, FrameParams, ProgramSpec, TRANSPARENT};
use crate::camera::Camera;
use crate::config::SurfaceConfig;
use crate::constants::{
    DEFAULT_DPR_CAP, FIELD_VISIBILITY_THRESHOLD, PARTICLES_FOV_DEG, PARTICLES_POINTER_SMOOTHING,
    PARTICLES_SPIN_Z_RATE, PARTICLES_TILT_X_RATE, PARTICLES_TILT_Y_RATE,
};
use crate::geometry::{point_cloud, Geometry};
use crate::kind::{EffectKind, HiddenPolicy};
use bytemuck::{Pod, Zeroable};
use fnv::FnvHasher;
use glam::{EulerRot, Mat4, Vec2, Vec3};
use std::hash::{Hash, Hasher};

const SHADER: &str = include_str!("../../shaders/particles.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// time, spread, base size, size randomness
    pub params: [f32; 4],
    /// width, height, pixel ratio, alpha particles (0/1)
    pub viewport: [f32; 4],
}

/// Drifting cloud of soft points in front of a perspective camera.
pub struct ParticleField;

/// Model transform for the cloud at `elapsed` speed-scaled seconds.
///
/// The pointer (uv, y down) shifts the cloud opposite to the cursor by up to
/// `hover` world units.
pub fn particle_model(elapsed: f32, pointer: Option<Vec2>, hover: f32, rotate: bool) -> Mat4 {
    let offset = pointer
        .map(|uv| {
            let ndc = Vec2::new(uv.x * 2.0 - 1.0, -(uv.y * 2.0 - 1.0));
            -ndc * hover
        })
        .unwrap_or(Vec2::ZERO);
    let rotation = if rotate {
        Mat4::from_euler(
            EulerRot::XYZ,
            (elapsed * PARTICLES_TILT_X_RATE).sin() * 0.1,
            (elapsed * PARTICLES_TILT_Y_RATE).cos() * 0.15,
            elapsed * PARTICLES_SPIN_Z_RATE,
        )
    } else {
        Mat4::IDENTITY
    };
    Mat4::from_translation(Vec3::new(offset.x, offset.y, 0.0)) * rotation
}

impl Effect for ParticleField {
    fn kind(&self) -> EffectKind {
        EffectKind::ParticleField
    }

    fn policy(&self, config: &SurfaceConfig) -> EffectPolicy {
        EffectPolicy {
            hidden: HiddenPolicy::Pause,
            pointer_smoothing: config.follow_pointer.then_some(PARTICLES_POINTER_SMOOTHING),
            dpr_cap: DEFAULT_DPR_CAP,
            pixel_scale: 1.0,
            visibility_threshold: FIELD_VISIBILITY_THRESHOLD,
            clear: TRANSPARENT,
            target_fps: None,
        }
    }

    fn program(&self) -> ProgramSpec {
        ProgramSpec {
            label: "particle_field",
            shader: SHADER,
            uniform_size: std::mem::size_of::<ParticleUniforms>(),
        }
    }

    fn geometry_key(&self, config: &SurfaceConfig) -> u64 {
        let mut h = FnvHasher::default();
        config.count.hash(&mut h);
        config.seed.hash(&mut h);
        for c in &config.colors {
            c.to_bytes().hash(&mut h);
        }
        h.finish()
    }

    fn build_geometry(&self, config: &SurfaceConfig) -> Geometry {
        point_cloud(config.count, &config.colors, config.seed)
    }

    fn write_uniforms(&self, config: &SurfaceConfig, frame: &FrameParams, out: &mut Vec<u8>) {
        let p = config.particles();
        let camera =
            Camera::looking_at_origin(p.camera_distance, PARTICLES_FOV_DEG, frame.size.aspect());
        let pointer = config.follow_pointer.then_some(frame.pointer);
        let model = particle_model(
            frame.elapsed,
            pointer,
            config.pointer_influence,
            !p.disable_rotation,
        );
        let pixel_ratio = if frame.size.css_width > 0.0 {
            frame.size.width as f32 / frame.size.css_width
        } else {
            1.0
        };
        let u = ParticleUniforms {
            projection: camera.projection_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            params: [frame.elapsed, config.spread, p.base_size, p.size_randomness],
            viewport: [
                frame.size.width as f32,
                frame.size.height as f32,
                pixel_ratio,
                if p.alpha_particles { 1.0 } else { 0.0 },
            ],
        };
        write_pod(&u, out);
    }
}
