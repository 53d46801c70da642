//! RGB colors edited as `#rrggbb` strings and handed to the shader as floats.

use std::fmt;
use std::str::FromStr;

/// Error returned when a hex color string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("expected 6 hex digits, got '{0}'")]
    Length(String),
    #[error("invalid hex digit in '{0}'")]
    Digit(String),
}

/// RGB color with channels in 0..=1, stored in the same encoding as the hex form
///
/// No gamma conversion happens between the hex string and the floats: the
/// shader mixes the values exactly as they were typed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channels
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0] as f32 / 255.0,
            g: rgb[1] as f32 / 255.0,
            b: rgb[2] as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` (leading `#` optional, case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 {
            return Err(ColorParseError::Length(hex.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::Digit(hex.to_string()));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| ColorParseError::Digit(hex.to_string()))?;
        Ok(Self::from_rgb8([
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ]))
    }

    /// Quantize back to 8-bit channels
    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Lowercase `#rrggbb` form shown in the panel
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
