//! Surface configuration: the raw, all-optional patch that crosses the JS
//! boundary and the resolved, validated config the bridge mirrors per frame.
//!
//! Resolution never fails. A missing key takes the effect default; a present
//! but unusable value keeps the last valid value (or the default when there is
//! none) and is reported back as a [`ConfigError`] for logging.

use crate::color::{hex_to_rgb, Rgb};
use crate::constants::{DEFAULT_SEED, MAX_BEAMS, MAX_PARTICLES};
use crate::error::ConfigError;
use crate::kind::{ClockPolicy, EffectKind, RaysOrigin};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use smallvec::{smallvec, SmallVec};
use std::ops::RangeInclusive;
use std::str::FromStr;

pub type Palette = SmallVec<[Rgb; 4]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogExtras {
    pub hue_shift: f32,
    pub scanline_intensity: f32,
    pub scanline_frequency: f32,
    pub resolution_scale: f32,
    /// 0 renders on every display refresh.
    pub target_fps: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuroraExtras {
    pub blend: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayExtras {
    pub origin: RaysOrigin,
    pub ray_length: f32,
    pub pulsating: bool,
    pub fade_distance: f32,
    pub saturation: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleExtras {
    pub base_size: f32,
    pub size_randomness: f32,
    pub alpha_particles: bool,
    pub camera_distance: f32,
    pub disable_rotation: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamExtras {
    pub beam_width: f32,
    pub beam_height: f32,
    pub rotation_deg: f32,
    pub scale: f32,
}

impl Default for FogExtras {
    fn default() -> Self {
        Self {
            hue_shift: 0.0,
            scanline_intensity: 0.0,
            scanline_frequency: 0.0,
            resolution_scale: 0.75,
            target_fps: 30.0,
        }
    }
}

impl Default for AuroraExtras {
    fn default() -> Self {
        Self { blend: 0.5 }
    }
}

impl Default for RayExtras {
    fn default() -> Self {
        Self {
            origin: RaysOrigin::TopCenter,
            ray_length: 2.0,
            pulsating: false,
            fade_distance: 1.0,
            saturation: 1.0,
        }
    }
}

impl Default for ParticleExtras {
    fn default() -> Self {
        Self {
            base_size: 100.0,
            size_randomness: 1.0,
            alpha_particles: false,
            camera_distance: 20.0,
            disable_rotation: false,
        }
    }
}

impl Default for BeamExtras {
    fn default() -> Self {
        Self {
            beam_width: 3.0,
            beam_height: 15.0,
            rotation_deg: 50.0,
            scale: 0.2,
        }
    }
}

/// Effect-specific options; the variant always matches the config's kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectExtras {
    Fog(FogExtras),
    Aurora(AuroraExtras),
    Rays(RayExtras),
    Particles(ParticleExtras),
    Beams(BeamExtras),
}

impl EffectExtras {
    pub fn default_for(kind: EffectKind) -> Self {
        match kind {
            EffectKind::FogField => EffectExtras::Fog(FogExtras::default()),
            EffectKind::GradientAurora => EffectExtras::Aurora(AuroraExtras::default()),
            EffectKind::LightRays => EffectExtras::Rays(RayExtras::default()),
            EffectKind::ParticleField => EffectExtras::Particles(ParticleExtras::default()),
            EffectKind::BeamField => EffectExtras::Beams(BeamExtras::default()),
        }
    }
}

/// Fully resolved parameters for one surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceConfig {
    pub kind: EffectKind,
    pub colors: Palette,
    pub speed: f32,
    pub amplitude: f32,
    pub spread: f32,
    pub noise: f32,
    pub distortion: f32,
    /// Primitive count (particles / beams); 0 for field effects.
    pub count: u32,
    pub follow_pointer: bool,
    pub pointer_influence: f32,
    pub class_name: String,
    pub seed: u64,
    pub clock: ClockPolicy,
    pub extras: EffectExtras,
}

fn palette_of(hexes: &[[u8; 3]]) -> Palette {
    hexes.iter().copied().map(Rgb::from_bytes).collect()
}

impl SurfaceConfig {
    /// Defaults per effect, matching the values the page was designed with.
    pub fn defaults(kind: EffectKind) -> Self {
        let base = SurfaceConfig {
            kind,
            colors: smallvec![Rgb::WHITE],
            speed: 1.0,
            amplitude: 1.0,
            spread: 1.0,
            noise: 0.0,
            distortion: 0.0,
            count: 0,
            follow_pointer: false,
            pointer_influence: 0.0,
            class_name: String::new(),
            seed: DEFAULT_SEED,
            clock: ClockPolicy::default(),
            extras: EffectExtras::default_for(kind),
        };
        match kind {
            EffectKind::FogField => SurfaceConfig {
                colors: palette_of(&[[0x1b, 0x0b, 0x3a], [0x6a, 0x4c, 0xff]]),
                speed: 0.5,
                ..base
            },
            EffectKind::GradientAurora => SurfaceConfig {
                colors: palette_of(&[[0x52, 0x27, 0xff], [0x7c, 0xff, 0x67], [0x52, 0x27, 0xff]]),
                speed: 0.5,
                ..base
            },
            EffectKind::LightRays => SurfaceConfig {
                follow_pointer: true,
                pointer_influence: 0.1,
                ..base
            },
            EffectKind::ParticleField => SurfaceConfig {
                speed: 0.1,
                spread: 10.0,
                count: 200,
                pointer_influence: 1.0,
                ..base
            },
            EffectKind::BeamField => SurfaceConfig {
                speed: 2.0,
                noise: 1.75,
                count: 12,
                ..base
            },
        }
    }

    /// Resolve `patch` for `kind`, falling back to `previous` for bad values.
    pub fn resolve(
        kind: EffectKind,
        patch: &ConfigPatch,
        previous: Option<&SurfaceConfig>,
    ) -> (SurfaceConfig, Vec<ConfigError>) {
        let previous = previous.filter(|p| p.kind == kind);
        let d = SurfaceConfig::defaults(kind);
        let mut r = Resolver::default();

        let count = match kind {
            EffectKind::ParticleField => r.count(
                "count",
                patch.count.as_ref(),
                d.count,
                previous.map(|p| p.count),
                MAX_PARTICLES,
            ),
            EffectKind::BeamField => {
                r.count("count", patch.count.as_ref(), d.count, previous.map(|p| p.count), MAX_BEAMS)
            }
            _ => 0,
        };

        let extras = match (d.extras, previous.map(|p| p.extras)) {
            (EffectExtras::Fog(def), prev) => {
                let prev = match prev {
                    Some(EffectExtras::Fog(p)) => Some(p),
                    _ => None,
                };
                EffectExtras::Fog(FogExtras {
                    hue_shift: r.scalar("hueShift", patch.hue_shift.as_ref(), def.hue_shift, prev.map(|p| p.hue_shift), -360.0..=360.0),
                    scanline_intensity: r.scalar("scanlineIntensity", patch.scanline_intensity.as_ref(), def.scanline_intensity, prev.map(|p| p.scanline_intensity), 0.0..=1.0),
                    scanline_frequency: r.scalar("scanlineFrequency", patch.scanline_frequency.as_ref(), def.scanline_frequency, prev.map(|p| p.scanline_frequency), 0.0..=10.0),
                    resolution_scale: r.scalar("resolutionScale", patch.resolution_scale.as_ref(), def.resolution_scale, prev.map(|p| p.resolution_scale), 0.1..=1.0),
                    target_fps: r.scalar("targetFps", patch.target_fps.as_ref(), def.target_fps, prev.map(|p| p.target_fps), 0.0..=240.0),
                })
            }
            (EffectExtras::Aurora(def), prev) => {
                let prev = match prev {
                    Some(EffectExtras::Aurora(p)) => Some(p),
                    _ => None,
                };
                EffectExtras::Aurora(AuroraExtras {
                    blend: r.scalar("blend", patch.blend.as_ref(), def.blend, prev.map(|p| p.blend), 0.0..=1.0),
                })
            }
            (EffectExtras::Rays(def), prev) => {
                let prev = match prev {
                    Some(EffectExtras::Rays(p)) => Some(p),
                    _ => None,
                };
                EffectExtras::Rays(RayExtras {
                    origin: r.parsed("origin", patch.origin.as_ref(), def.origin, prev.map(|p| p.origin)),
                    ray_length: r.scalar("rayLength", patch.ray_length.as_ref(), def.ray_length, prev.map(|p| p.ray_length), 0.0..=10.0),
                    pulsating: r.value("pulsating", patch.pulsating.as_ref(), def.pulsating, prev.map(|p| p.pulsating)),
                    fade_distance: r.scalar("fadeDistance", patch.fade_distance.as_ref(), def.fade_distance, prev.map(|p| p.fade_distance), 0.0..=10.0),
                    saturation: r.scalar("saturation", patch.saturation.as_ref(), def.saturation, prev.map(|p| p.saturation), 0.0..=2.0),
                })
            }
            (EffectExtras::Particles(def), prev) => {
                let prev = match prev {
                    Some(EffectExtras::Particles(p)) => Some(p),
                    _ => None,
                };
                EffectExtras::Particles(ParticleExtras {
                    base_size: r.scalar("baseSize", patch.base_size.as_ref(), def.base_size, prev.map(|p| p.base_size), 0.0..=1000.0),
                    size_randomness: r.scalar("sizeRandomness", patch.size_randomness.as_ref(), def.size_randomness, prev.map(|p| p.size_randomness), 0.0..=10.0),
                    alpha_particles: r.value("alphaParticles", patch.alpha_particles.as_ref(), def.alpha_particles, prev.map(|p| p.alpha_particles)),
                    camera_distance: r.scalar("cameraDistance", patch.camera_distance.as_ref(), def.camera_distance, prev.map(|p| p.camera_distance), 1.0..=100.0),
                    disable_rotation: r.value("disableRotation", patch.disable_rotation.as_ref(), def.disable_rotation, prev.map(|p| p.disable_rotation)),
                })
            }
            (EffectExtras::Beams(def), prev) => {
                let prev = match prev {
                    Some(EffectExtras::Beams(p)) => Some(p),
                    _ => None,
                };
                EffectExtras::Beams(BeamExtras {
                    beam_width: r.scalar("beamWidth", patch.beam_width.as_ref(), def.beam_width, prev.map(|p| p.beam_width), 0.01..=100.0),
                    beam_height: r.scalar("beamHeight", patch.beam_height.as_ref(), def.beam_height, prev.map(|p| p.beam_height), 0.01..=200.0),
                    rotation_deg: r.scalar("rotation", patch.rotation.as_ref(), def.rotation_deg, prev.map(|p| p.rotation_deg), -360.0..=360.0),
                    scale: r.scalar("scale", patch.scale.as_ref(), def.scale, prev.map(|p| p.scale), 0.0..=10.0),
                })
            }
        };

        let config = SurfaceConfig {
            kind,
            colors: r.palette(patch.colors.as_ref(), &d.colors, previous.map(|p| &p.colors)),
            speed: r.scalar("speed", patch.speed.as_ref(), d.speed, previous.map(|p| p.speed), 0.0..=100.0),
            amplitude: r.scalar("amplitude", patch.amplitude.as_ref(), d.amplitude, previous.map(|p| p.amplitude), 0.0..=10.0),
            spread: r.scalar("spread", patch.spread.as_ref(), d.spread, previous.map(|p| p.spread), 0.0..=1000.0),
            noise: r.scalar("noise", patch.noise.as_ref(), d.noise, previous.map(|p| p.noise), 0.0..=10.0),
            distortion: r.scalar("distortion", patch.distortion.as_ref(), d.distortion, previous.map(|p| p.distortion), -10.0..=10.0),
            count,
            follow_pointer: r.value("followPointer", patch.follow_pointer.as_ref(), d.follow_pointer, previous.map(|p| p.follow_pointer)),
            pointer_influence: r.scalar("pointerInfluence", patch.pointer_influence.as_ref(), d.pointer_influence, previous.map(|p| p.pointer_influence), 0.0..=10.0),
            class_name: r.value("className", patch.class_name.as_ref(), String::new(), previous.map(|p| p.class_name.clone())),
            seed: r.value("seed", patch.seed.as_ref(), d.seed, previous.map(|p| p.seed)),
            clock: r.parsed("clockWhileHidden", patch.clock_while_hidden.as_ref(), d.clock, previous.map(|p| p.clock)),
            extras,
        };
        (config, r.issues)
    }

    /// Apply `patch` on top of this config's kind, keeping current values for bad input.
    pub fn apply(&self, patch: &ConfigPatch) -> (SurfaceConfig, Vec<ConfigError>) {
        SurfaceConfig::resolve(self.kind, patch, Some(self))
    }

    pub fn fog(&self) -> FogExtras {
        match self.extras {
            EffectExtras::Fog(x) => x,
            _ => FogExtras::default(),
        }
    }

    pub fn aurora(&self) -> AuroraExtras {
        match self.extras {
            EffectExtras::Aurora(x) => x,
            _ => AuroraExtras::default(),
        }
    }

    pub fn rays(&self) -> RayExtras {
        match self.extras {
            EffectExtras::Rays(x) => x,
            _ => RayExtras::default(),
        }
    }

    pub fn particles(&self) -> ParticleExtras {
        match self.extras {
            EffectExtras::Particles(x) => x,
            _ => ParticleExtras::default(),
        }
    }

    pub fn beams(&self) -> BeamExtras {
        match self.extras {
            EffectExtras::Beams(x) => x,
            _ => BeamExtras::default(),
        }
    }

    /// Palette entry `i`, wrapping; white for an empty palette.
    pub fn color(&self, i: usize) -> Rgb {
        if self.colors.is_empty() {
            Rgb::WHITE
        } else {
            self.colors[i % self.colors.len()]
        }
    }
}

/// One supplied value: usable as `T`, or the type error that kept it out.
///
/// A wrong-typed key only loses itself; the rest of the patch still applies.
#[derive(Clone, Debug, PartialEq)]
pub enum Field<T> {
    Set(T),
    WrongType(String),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match serde_json::from_value(value) {
            Ok(v) => Field::Set(v),
            Err(e) => Field::WrongType(e.to_string()),
        })
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Set(value)
    }
}

/// `colors` as either a single hex string or a list of them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorList {
    One(String),
    Many(Vec<String>),
}

impl ColorList {
    pub fn as_slice(&self) -> &[String] {
        match self {
            ColorList::One(hex) => std::slice::from_ref(hex),
            ColorList::Many(hexes) => hexes,
        }
    }
}

/// Raw configuration as supplied by the page. Every key is optional.
///
/// Applying it replaces the whole configuration: a key left out goes back to
/// its default rather than keeping the current value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub colors: Option<Field<ColorList>>,
    pub speed: Option<Field<f64>>,
    pub amplitude: Option<Field<f64>>,
    pub spread: Option<Field<f64>>,
    pub noise: Option<Field<f64>>,
    pub distortion: Option<Field<f64>>,
    pub count: Option<Field<f64>>,
    pub follow_pointer: Option<Field<bool>>,
    pub pointer_influence: Option<Field<f64>>,
    pub class_name: Option<Field<String>>,
    pub seed: Option<Field<u64>>,
    pub clock_while_hidden: Option<Field<String>>,
    // fog-field
    pub hue_shift: Option<Field<f64>>,
    pub scanline_intensity: Option<Field<f64>>,
    pub scanline_frequency: Option<Field<f64>>,
    pub resolution_scale: Option<Field<f64>>,
    pub target_fps: Option<Field<f64>>,
    // gradient-aurora
    pub blend: Option<Field<f64>>,
    // light-rays
    pub origin: Option<Field<String>>,
    pub ray_length: Option<Field<f64>>,
    pub pulsating: Option<Field<bool>>,
    pub fade_distance: Option<Field<f64>>,
    pub saturation: Option<Field<f64>>,
    // particle-field
    pub base_size: Option<Field<f64>>,
    pub size_randomness: Option<Field<f64>>,
    pub alpha_particles: Option<Field<bool>>,
    pub camera_distance: Option<Field<f64>>,
    pub disable_rotation: Option<Field<bool>>,
    // beam-field
    pub beam_width: Option<Field<f64>>,
    pub beam_height: Option<Field<f64>>,
    pub rotation: Option<Field<f64>>,
    pub scale: Option<Field<f64>>,
}

impl ConfigPatch {
    /// Parse a JSON object. Only a document that is not an object is rejected;
    /// wrong-typed keys surface later as [`ConfigError::WrongType`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Ok(ConfigPatch::default());
        }
        serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))
    }
}

enum Input<'a, T> {
    Omitted,
    Given(&'a T),
    Rejected,
}

#[derive(Default)]
struct Resolver {
    issues: Vec<ConfigError>,
}

impl Resolver {
    fn input<'a, T>(&mut self, field: &'static str, value: Option<&'a Field<T>>) -> Input<'a, T> {
        match value {
            None => Input::Omitted,
            Some(Field::Set(v)) => Input::Given(v),
            Some(Field::WrongType(message)) => {
                self.issues.push(ConfigError::WrongType {
                    field,
                    message: message.clone(),
                });
                Input::Rejected
            }
        }
    }

    fn scalar(
        &mut self,
        field: &'static str,
        value: Option<&Field<f64>>,
        default: f32,
        previous: Option<f32>,
        range: RangeInclusive<f32>,
    ) -> f32 {
        match self.input(field, value) {
            Input::Omitted => default,
            Input::Given(&v) if v.is_finite() && range.contains(&(v as f32)) => v as f32,
            Input::Given(&v) => {
                self.issues.push(ConfigError::OutOfRange { field, value: v });
                previous.unwrap_or(default)
            }
            Input::Rejected => previous.unwrap_or(default),
        }
    }

    fn count(
        &mut self,
        field: &'static str,
        value: Option<&Field<f64>>,
        default: u32,
        previous: Option<u32>,
        max: u32,
    ) -> u32 {
        match self.input(field, value) {
            Input::Omitted => default,
            Input::Given(&v) if v.is_finite() && v.fract() == 0.0 && v >= 1.0 && v <= max as f64 => {
                v as u32
            }
            Input::Given(&v) => {
                self.issues.push(ConfigError::OutOfRange { field, value: v });
                previous.unwrap_or(default)
            }
            Input::Rejected => previous.unwrap_or(default),
        }
    }

    fn value<T: Clone>(
        &mut self,
        field: &'static str,
        value: Option<&Field<T>>,
        default: T,
        previous: Option<T>,
    ) -> T {
        match self.input(field, value) {
            Input::Omitted => default,
            Input::Given(v) => v.clone(),
            Input::Rejected => previous.unwrap_or(default),
        }
    }

    fn parsed<T>(
        &mut self,
        field: &'static str,
        value: Option<&Field<String>>,
        default: T,
        previous: Option<T>,
    ) -> T
    where
        T: FromStr<Err = ConfigError> + Copy,
    {
        match self.input(field, value) {
            Input::Omitted => default,
            Input::Given(s) => match s.parse::<T>() {
                Ok(v) => v,
                Err(e) => {
                    self.issues.push(e);
                    previous.unwrap_or(default)
                }
            },
            Input::Rejected => previous.unwrap_or(default),
        }
    }

    fn palette(
        &mut self,
        value: Option<&Field<ColorList>>,
        default: &Palette,
        previous: Option<&Palette>,
    ) -> Palette {
        let hexes = match self.input("colors", value) {
            Input::Given(list) if !list.as_slice().is_empty() => list.as_slice(),
            Input::Rejected => return previous.unwrap_or(default).clone(),
            _ => return default.clone(),
        };
        hexes
            .iter()
            .enumerate()
            .map(|(i, hex)| match hex_to_rgb(hex) {
                Ok(c) => c,
                Err(e) => {
                    self.issues.push(e);
                    previous
                        .and_then(|p| p.get(i).copied())
                        .unwrap_or_else(|| default[i % default.len()])
                }
            })
            .collect()
    }
}
