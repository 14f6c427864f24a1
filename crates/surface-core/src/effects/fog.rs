use super::{write_pod, Effect, EffectPolicy, FrameParams, ProgramSpec, TRANSPARENT};
use crate::config::SurfaceConfig;
use crate::constants::{DEFAULT_DPR_CAP, FIELD_VISIBILITY_THRESHOLD};
use crate::kind::{EffectKind, HiddenPolicy};
use bytemuck::{Pod, Zeroable};

const SHADER: &str = include_str!("../../shaders/fog.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FogUniforms {
    /// width, height, time, hue shift (degrees)
    pub frame: [f32; 4],
    /// rgb, grain amount
    pub tint_a: [f32; 4],
    /// rgb, warp distortion
    pub tint_b: [f32; 4],
    /// scanline intensity, scanline frequency, amplitude, unused
    pub scan: [f32; 4],
}

/// Slow drifting fog behind the hero section.
pub struct FogField;

impl Effect for FogField {
    fn kind(&self) -> EffectKind {
        EffectKind::FogField
    }

    fn policy(&self, config: &SurfaceConfig) -> EffectPolicy {
        let fog = config.fog();
        EffectPolicy {
            hidden: HiddenPolicy::Pause,
            pointer_smoothing: None,
            dpr_cap: DEFAULT_DPR_CAP,
            pixel_scale: fog.resolution_scale,
            visibility_threshold: FIELD_VISIBILITY_THRESHOLD,
            clear: TRANSPARENT,
            target_fps: Some(fog.target_fps).filter(|f| *f > 0.0),
        }
    }

    fn program(&self) -> ProgramSpec {
        ProgramSpec {
            label: "fog_field",
            shader: SHADER,
            uniform_size: std::mem::size_of::<FogUniforms>(),
        }
    }

    fn write_uniforms(&self, config: &SurfaceConfig, frame: &FrameParams, out: &mut Vec<u8>) {
        let fog = config.fog();
        let u = FogUniforms {
            frame: [
                frame.size.width as f32,
                frame.size.height as f32,
                frame.elapsed,
                fog.hue_shift,
            ],
            tint_a: config.color(0).to_vec4(config.noise),
            tint_b: config.color(1).to_vec4(config.distortion),
            scan: [
                fog.scanline_intensity,
                fog.scanline_frequency,
                config.amplitude,
                0.0,
            ],
        };
        write_pod(&u, out);
    }
}
