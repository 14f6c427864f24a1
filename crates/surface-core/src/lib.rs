//! Platform-free core of the animated page backgrounds.
//!
//! Everything here runs on the host as well as in the browser: configuration
//! parsing and validation, color conversion, geometry generation, the five
//! effect strategies with their WGSL programs, and the lifecycle state
//! machines (visibility gate, context slot, frame scheduler) composed by
//! [`AnimatedSurface`]. The web crate supplies the DOM and GPU halves.

pub mod bridge;
pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod context;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod kind;
pub mod pointer;
pub mod scheduler;
pub mod sizing;
pub mod surface;
pub mod visibility;

pub use bridge::ParameterBridge;
pub use color::{hex_to_rgb, rgb_to_hex, Rgb};
pub use config::{ColorList, ConfigPatch, EffectExtras, Field, SurfaceConfig};
pub use context::{ContextSlot, RenderContext, Ticket};
pub use effects::{effect_for, Effect, EffectPolicy, FrameParams, ProgramSpec};
pub use error::{ConfigError, SurfaceError};
pub use geometry::{Geometry, VertexAttribute, VertexLayout, VertexStep};
pub use kind::{ClockPolicy, EffectKind, HiddenPolicy, RaysOrigin};
pub use pointer::PointerSmoother;
pub use scheduler::{FrameClock, FrameScheduler, SchedulerState, Tick};
pub use sizing::{surface_size, SurfaceSize};
pub use surface::{AcquireRequest, AnimatedSurface, Directives, FrameOutcome, HostPhase, SurfaceStats};
pub use visibility::VisibilityGate;
