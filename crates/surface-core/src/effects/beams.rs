use super::{write_pod, Effect, EffectPolicy, FrameParams, ProgramSpec};
use crate::camera::Camera;
use crate::config::SurfaceConfig;
use crate::constants::{
    BEAMS_AMBIENT, BEAMS_CAMERA_Z, BEAMS_DPR_CAP, BEAMS_FOV_DEG, BEAMS_LIGHT_POSITION,
    BEAMS_TIME_SCALE, BEAM_HEIGHT_SEGMENTS, FIELD_VISIBILITY_THRESHOLD,
};
use crate::geometry::{stacked_planes, Geometry};
use crate::kind::{EffectKind, HiddenPolicy};
use bytemuck::{Pod, Zeroable};
use fnv::FnvHasher;
use glam::Mat4;
use std::hash::{Hash, Hasher};

const SHADER: &str = include_str!("../../shaders/beams.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BeamUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// time, noise intensity, noise scale, unused
    pub params: [f32; 4],
    /// rgb, ambient
    pub light_color: [f32; 4],
    /// light position (model space), unused
    pub light_pos: [f32; 4],
    /// camera position, unused
    pub eye: [f32; 4],
}

/// Rotated bank of noise-displaced strips lit by one directional light.
pub struct BeamField;

impl Effect for BeamField {
    fn kind(&self) -> EffectKind {
        EffectKind::BeamField
    }

    fn policy(&self, _config: &SurfaceConfig) -> EffectPolicy {
        EffectPolicy {
            hidden: HiddenPolicy::Pause,
            pointer_smoothing: None,
            dpr_cap: BEAMS_DPR_CAP,
            pixel_scale: 1.0,
            visibility_threshold: FIELD_VISIBILITY_THRESHOLD,
            clear: [0.0, 0.0, 0.0, 1.0],
            target_fps: None,
        }
    }

    fn program(&self) -> ProgramSpec {
        ProgramSpec {
            label: "beam_field",
            shader: SHADER,
            uniform_size: std::mem::size_of::<BeamUniforms>(),
        }
    }

    fn geometry_key(&self, config: &SurfaceConfig) -> u64 {
        let b = config.beams();
        let mut h = FnvHasher::default();
        config.count.hash(&mut h);
        config.seed.hash(&mut h);
        b.beam_width.to_bits().hash(&mut h);
        b.beam_height.to_bits().hash(&mut h);
        h.finish()
    }

    fn build_geometry(&self, config: &SurfaceConfig) -> Geometry {
        let b = config.beams();
        stacked_planes(
            config.count,
            b.beam_width,
            b.beam_height,
            BEAM_HEIGHT_SEGMENTS,
            config.seed,
        )
    }

    fn write_uniforms(&self, config: &SurfaceConfig, frame: &FrameParams, out: &mut Vec<u8>) {
        let b = config.beams();
        let camera = Camera::looking_at_origin(BEAMS_CAMERA_Z, BEAMS_FOV_DEG, frame.size.aspect());
        let [lx, ly, lz] = BEAMS_LIGHT_POSITION;
        let u = BeamUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            model: Mat4::from_rotation_z(b.rotation_deg.to_radians()).to_cols_array_2d(),
            params: [frame.elapsed * BEAMS_TIME_SCALE, config.noise, b.scale, 0.0],
            light_color: config.color(0).to_vec4(BEAMS_AMBIENT),
            light_pos: [lx, ly, lz, 0.0],
            eye: camera.eye.extend(0.0).to_array(),
        };
        write_pod(&u, out);
    }
}
