use crate::config::SurfaceConfig;
use crate::constants::POINTER_REST;
use crate::effects::{effect_for, Effect, EffectPolicy, FrameParams};
use crate::geometry::Geometry;
use crate::pointer::PointerSmoother;
use crate::sizing::SurfaceSize;
use glam::Vec2;

/// Mirrors the latest [`SurfaceConfig`] into uniform bytes once per frame.
///
/// Holds exactly one config (last write wins). Config changes that alter the
/// geometry identity are remembered and picked up by the next frame through
/// [`take_geometry_rebuild`](Self::take_geometry_rebuild).
pub struct ParameterBridge {
    effect: &'static dyn Effect,
    config: SurfaceConfig,
    policy: EffectPolicy,
    pointer: Option<PointerSmoother>,
    geometry_key: u64,
    geometry_dirty: bool,
    uniforms: Vec<u8>,
}

impl ParameterBridge {
    pub fn new(config: SurfaceConfig) -> Self {
        let effect = effect_for(config.kind);
        let policy = effect.policy(&config);
        let geometry_key = effect.geometry_key(&config);
        Self {
            effect,
            pointer: policy.pointer_smoothing.map(PointerSmoother::new),
            policy,
            geometry_key,
            geometry_dirty: false,
            uniforms: Vec::with_capacity(effect.program().uniform_size),
            config,
        }
    }

    pub fn effect(&self) -> &'static dyn Effect {
        self.effect
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn policy(&self) -> EffectPolicy {
        self.policy
    }

    /// Install a new config. Never touches the render context.
    pub fn replace(&mut self, config: SurfaceConfig) {
        let policy = self.effect.policy(&config);
        match (policy.pointer_smoothing, self.pointer.as_ref()) {
            (Some(k), Some(p)) if p.smoothing() == k => {}
            (Some(k), _) => self.pointer = Some(PointerSmoother::new(k)),
            (None, _) => self.pointer = None,
        }
        let key = self.effect.geometry_key(&config);
        if key != self.geometry_key {
            self.geometry_key = key;
            self.geometry_dirty = true;
        }
        self.policy = policy;
        self.config = config;
    }

    pub fn tracks_pointer(&self) -> bool {
        self.pointer.is_some()
    }

    /// Raw pointer position in container uv; ignored when the effect does not follow it.
    pub fn set_pointer_raw(&mut self, uv: Vec2) {
        if let Some(p) = self.pointer.as_mut() {
            p.set_raw(uv);
        }
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
            .as_ref()
            .map(PointerSmoother::smoothed)
            .unwrap_or_else(|| Vec2::from(POINTER_REST))
    }

    /// Step the pointer smoothing and write this frame's uniforms.
    pub fn sync_to_program(&mut self, elapsed: f64, size: SurfaceSize) -> &[u8] {
        let pointer = match self.pointer.as_mut() {
            Some(p) => p.advance(),
            None => Vec2::from(POINTER_REST),
        };
        let frame = FrameParams {
            elapsed: elapsed as f32,
            size,
            pointer,
        };
        self.effect
            .write_uniforms(&self.config, &frame, &mut self.uniforms);
        &self.uniforms
    }

    /// Geometry for a fresh context; clears any pending rebuild.
    pub fn fresh_geometry(&mut self) -> Geometry {
        self.geometry_dirty = false;
        self.geometry_key = self.effect.geometry_key(&self.config);
        self.effect.build_geometry(&self.config)
    }

    /// New geometry if the config changed it since the last build.
    pub fn take_geometry_rebuild(&mut self) -> Option<Geometry> {
        if !self.geometry_dirty {
            return None;
        }
        Some(self.fresh_geometry())
    }
}
