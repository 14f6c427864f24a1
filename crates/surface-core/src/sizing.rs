/// Drawing-buffer size in physical pixels plus the CSS size it covers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub css_width: f32,
    pub css_height: f32,
}

impl SurfaceSize {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Scale down proportionally so neither side exceeds `max_dimension`.
    pub fn clamped(self, max_dimension: u32) -> Self {
        let max_side = self.width.max(self.height);
        if max_dimension == 0 || max_side <= max_dimension {
            return self;
        }
        let k = max_dimension as f32 / max_side as f32;
        Self {
            width: ((self.width as f32 * k).floor() as u32).max(1),
            height: ((self.height as f32 * k).floor() as u32).max(1),
            ..self
        }
    }
}

/// Physical size for a container of `css_width` x `css_height` CSS pixels.
///
/// The device pixel ratio is capped at `dpr_cap` and then multiplied by
/// `pixel_scale` (< 1 for effects that render below native resolution).
/// Each side is at least one pixel so a collapsed container stays valid.
pub fn surface_size(
    css_width: f32,
    css_height: f32,
    device_pixel_ratio: f32,
    dpr_cap: f32,
    pixel_scale: f32,
) -> SurfaceSize {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(dpr_cap)
    } else {
        1.0
    };
    let scale = dpr * pixel_scale.clamp(0.05, 1.0);
    let css_width = css_width.max(0.0);
    let css_height = css_height.max(0.0);
    SurfaceSize {
        width: ((css_width * scale).round() as u32).max(1),
        height: ((css_height * scale).round() as u32).max(1),
        css_width,
        css_height,
    }
}
