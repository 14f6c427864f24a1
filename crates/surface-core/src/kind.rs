use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// The five decorative backgrounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    FogField,
    GradientAurora,
    LightRays,
    ParticleField,
    BeamField,
}

impl EffectKind {
    pub const ALL: [EffectKind; 5] = [
        EffectKind::FogField,
        EffectKind::GradientAurora,
        EffectKind::LightRays,
        EffectKind::ParticleField,
        EffectKind::BeamField,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::FogField => "fog-field",
            EffectKind::GradientAurora => "gradient-aurora",
            EffectKind::LightRays => "light-rays",
            EffectKind::ParticleField => "particle-field",
            EffectKind::BeamField => "beam-field",
        }
    }
}

impl FromStr for EffectKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fog-field" | "fog" | "dark-veil" => Ok(EffectKind::FogField),
            "gradient-aurora" | "aurora" => Ok(EffectKind::GradientAurora),
            "light-rays" | "rays" => Ok(EffectKind::LightRays),
            "particle-field" | "particles" => Ok(EffectKind::ParticleField),
            "beam-field" | "beams" => Ok(EffectKind::BeamField),
            _ => Err(ConfigError::UnknownEffect(s.to_string())),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the loop does with the context while the container is off-screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HiddenPolicy {
    /// Keep the context; ticks continue but skip drawing.
    Pause,
    /// Stop the loop and release the context; re-acquire when visible again.
    Release,
}

/// Whether the elapsed-time accumulator moves while nothing is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClockPolicy {
    #[default]
    FreezeWhileHidden,
    AdvanceWhileHidden,
}

impl FromStr for ClockPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "freeze" => Ok(ClockPolicy::FreezeWhileHidden),
            "advance" => Ok(ClockPolicy::AdvanceWhileHidden),
            _ => Err(ConfigError::UnknownClockPolicy(s.to_string())),
        }
    }
}

/// Where light rays are anchored relative to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RaysOrigin {
    TopLeft,
    #[default]
    TopCenter,
    TopRight,
    Left,
    Right,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl FromStr for RaysOrigin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top-left" => Ok(RaysOrigin::TopLeft),
            "top-center" => Ok(RaysOrigin::TopCenter),
            "top-right" => Ok(RaysOrigin::TopRight),
            "left" => Ok(RaysOrigin::Left),
            "right" => Ok(RaysOrigin::Right),
            "bottom-left" => Ok(RaysOrigin::BottomLeft),
            "bottom-center" => Ok(RaysOrigin::BottomCenter),
            "bottom-right" => Ok(RaysOrigin::BottomRight),
            _ => Err(ConfigError::UnknownOrigin(s.to_string())),
        }
    }
}
