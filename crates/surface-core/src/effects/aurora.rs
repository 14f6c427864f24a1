use super::{write_pod, Effect, EffectPolicy, FrameParams, ProgramSpec, TRANSPARENT};
use crate::config::SurfaceConfig;
use crate::constants::{AURORA_PIXEL_SCALE, DEFAULT_DPR_CAP, FIELD_VISIBILITY_THRESHOLD};
use crate::kind::{EffectKind, HiddenPolicy};
use bytemuck::{Pod, Zeroable};

const SHADER: &str = include_str!("../../shaders/aurora.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AuroraUniforms {
    /// width, height, time, amplitude
    pub frame: [f32; 4],
    /// rgb, ramp position
    pub stops: [[f32; 4]; 3],
    /// blend, unused x3
    pub params: [f32; 4],
}

/// Three-stop color ramp with a noise-driven aurora curtain.
pub struct GradientAurora;

impl Effect for GradientAurora {
    fn kind(&self) -> EffectKind {
        EffectKind::GradientAurora
    }

    fn policy(&self, _config: &SurfaceConfig) -> EffectPolicy {
        EffectPolicy {
            hidden: HiddenPolicy::Pause,
            pointer_smoothing: None,
            dpr_cap: DEFAULT_DPR_CAP,
            pixel_scale: AURORA_PIXEL_SCALE,
            visibility_threshold: FIELD_VISIBILITY_THRESHOLD,
            clear: TRANSPARENT,
            target_fps: None,
        }
    }

    fn program(&self) -> ProgramSpec {
        ProgramSpec {
            label: "gradient_aurora",
            shader: SHADER,
            uniform_size: std::mem::size_of::<AuroraUniforms>(),
        }
    }

    fn write_uniforms(&self, config: &SurfaceConfig, frame: &FrameParams, out: &mut Vec<u8>) {
        // Palettes shorter than three stops wrap around.
        let u = AuroraUniforms {
            frame: [
                frame.size.width as f32,
                frame.size.height as f32,
                frame.elapsed,
                config.amplitude,
            ],
            stops: [
                config.color(0).to_vec4(0.0),
                config.color(1).to_vec4(0.5),
                config.color(2).to_vec4(1.0),
            ],
            params: [config.aurora().blend, 0.0, 0.0, 0.0],
        };
        write_pod(&u, out);
    }
}
