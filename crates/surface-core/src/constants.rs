/// Lifecycle, pacing and per-effect tuning constants.
///
/// Values mirror what each background was tuned to in the portfolio page; the
/// names say what they control so call sites read without magic numbers.

// Frame pacing
pub const MAX_FRAME_DT_SEC: f64 = 0.25; // clamp after a backgrounded tab resumes
pub const FRAME_INTERVAL_SLACK_SEC: f64 = 0.002; // tolerance for targetFps throttling

// Pointer smoothing factors (new = old * k + raw * (1 - k))
pub const RAYS_POINTER_SMOOTHING: f32 = 0.92;
pub const PARTICLES_POINTER_SMOOTHING: f32 = 0.90;
pub const POINTER_REST: [f32; 2] = [0.5, 0.5];

// Visibility thresholds (fraction of the container that must intersect)
pub const FIELD_VISIBILITY_THRESHOLD: f64 = 0.01;
pub const RAYS_VISIBILITY_THRESHOLD: f64 = 0.1;

// Device pixel ratio caps and render scales
pub const DEFAULT_DPR_CAP: f32 = 2.0;
pub const RAYS_DPR_CAP: f32 = 1.5;
pub const BEAMS_DPR_CAP: f32 = 1.5;
pub const AURORA_PIXEL_SCALE: f32 = 0.8; // aurora renders at 80% resolution
pub const FALLBACK_MAX_DIMENSION: u32 = 2048;

// Geometry limits
pub const MAX_PARTICLES: u32 = 20_000;
pub const MAX_BEAMS: u32 = 256;
pub const BEAM_HEIGHT_SEGMENTS: u32 = 100;
pub const BEAM_UV_OFFSET_RANGE: f32 = 300.0;

// Cameras (vertical field of view in degrees)
pub const PARTICLES_FOV_DEG: f32 = 15.0;
pub const BEAMS_FOV_DEG: f32 = 30.0;
pub const BEAMS_CAMERA_Z: f32 = 20.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Particle motion (per unit of speed-scaled elapsed time)
pub const PARTICLES_TILT_X_RATE: f32 = 0.2;
pub const PARTICLES_TILT_Y_RATE: f32 = 0.5;
pub const PARTICLES_SPIN_Z_RATE: f32 = 0.6;

// Beam lighting
pub const BEAMS_LIGHT_POSITION: [f32; 3] = [0.0, 3.0, 10.0];
pub const BEAMS_AMBIENT: f32 = 0.06;
pub const BEAMS_TIME_SCALE: f32 = 0.1;

// Light rays anchor distance outside the surface (fraction of width/height)
pub const RAYS_ANCHOR_OUTSIDE: f32 = 0.2;

// Geometry seed used when the caller does not supply one
pub const DEFAULT_SEED: u64 = 42;
