use crate::constants::POINTER_REST;
use glam::Vec2;

/// Exponentially smoothed pointer in container-relative unit coordinates.
///
/// The raw position is written from pointer events at any time; `advance` is
/// called once per rendered frame and moves the smoothed value toward it.
#[derive(Clone, Debug)]
pub struct PointerSmoother {
    smoothing: f32,
    raw: Vec2,
    smoothed: Vec2,
}

impl PointerSmoother {
    pub fn new(smoothing: f32) -> Self {
        let rest = Vec2::from(POINTER_REST);
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            raw: rest,
            smoothed: rest,
        }
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Record a raw position, clamped to \[0,1\]².
    pub fn set_raw(&mut self, uv: Vec2) {
        if uv.is_finite() {
            self.raw = uv.clamp(Vec2::ZERO, Vec2::ONE);
        }
    }

    pub fn raw(&self) -> Vec2 {
        self.raw
    }

    /// One smoothing step: `s = s * k + raw * (1 - k)`.
    pub fn advance(&mut self) -> Vec2 {
        let k = self.smoothing;
        self.smoothed = self.smoothed * k + self.raw * (1.0 - k);
        self.smoothed
    }

    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }

    /// Snap both raw and smoothed positions back to the rest point.
    pub fn reset(&mut self) {
        let rest = Vec2::from(POINTER_REST);
        self.raw = rest;
        self.smoothed = rest;
    }
}
