use glam::Vec2;
use web_sys as web;

/// Position of `client` relative to a rect at `origin` of `size`, in unit
/// coordinates with y down. Points outside the rect map outside \[0,1\];
/// a degenerate rect maps to the center.
#[inline]
pub fn uv_in_rect(client: Vec2, origin: Vec2, size: Vec2) -> Vec2 {
    if size.x > 0.0 && size.y > 0.0 {
        (client - origin) / size
    } else {
        Vec2::splat(0.5)
    }
}

#[inline]
pub fn pointer_uv(ev: &web::PointerEvent, container: &web::Element) -> Vec2 {
    let rect = container.get_bounding_client_rect();
    uv_in_rect(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(rect.left() as f32, rect.top() as f32),
        Vec2::new(rect.width() as f32, rect.height() as f32),
    )
}
