use crate::constants::{CAMERA_ZFAR, CAMERA_ZNEAR};
use glam::{Mat4, Vec3};

/// Right-handed perspective camera for the mesh effects.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera on the +z axis at `distance`, looking at the origin.
    pub fn looking_at_origin(distance: f32, fovy_degrees: f32, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            fovy_radians: fovy_degrees.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR.max(distance * 4.0),
        }
    }

    /// Clip-space projection with a 0..1 depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Viewport height in pixels divided by the world height visible at unit distance.
    pub fn pixels_per_unit(&self, viewport_height: f32) -> f32 {
        viewport_height / (2.0 * (self.fovy_radians * 0.5).tan())
    }
}
