//! Failure taxonomy for animated surfaces.
//!
//! Nothing here is meant to reach the page: every variant degrades to
//! "effect silently absent" or "value ignored". The types exist so the host
//! can log precisely and tests can assert which path was taken.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// The GPU context could not be created; the effect stays disabled.
    #[error("render context unavailable: {0}")]
    ContextAcquisition(String),
    /// The driver dropped the context mid-session; the loop halts for good.
    #[error("render context lost: {0}")]
    ContextLost(String),
    #[error("ignored configuration value: {0}")]
    Configuration(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("{field} has the wrong type: {message}")]
    WrongType { field: &'static str, message: String },
    #[error("unknown effect kind {0:?}")]
    UnknownEffect(String),
    #[error("unknown rays origin {0:?}")]
    UnknownOrigin(String),
    #[error("unknown clock policy {0:?}")]
    UnknownClockPolicy(String),
    #[error("malformed configuration: {0}")]
    Malformed(String),
}
