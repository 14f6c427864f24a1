use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Linear 0..1 RGB triple as consumed by the shaders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_bytes([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Quantize back to 8-bit channels (rounded, clamped).
    pub fn to_bytes(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Pack into a uniform-friendly vec4 with the given trailing lane.
    pub fn to_vec4(self, w: f32) -> [f32; 4] {
        [self.r, self.g, self.b, w]
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_bytes();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional, alpha ignored).
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ConfigError> {
    let invalid = || ConfigError::InvalidColor(hex.to_string());
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let bytes = match digits.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in digits.chars().enumerate() {
                let nibble = c.to_digit(16).ok_or_else(invalid)? as u8;
                out[i] = nibble * 17;
            }
            out
        }
        6 | 8 => [
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ],
        _ => return Err(invalid()),
    };
    Ok(Rgb::from_bytes(bytes))
}

/// Lowercase `#rrggbb` form of a color.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    rgb.to_string()
}
