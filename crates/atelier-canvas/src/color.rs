//! Paint colors
//!
//! Colors travel as CSS-style strings (`#rgb`, `#rrggbb`, `#rrggbbaa`,
//! `transparent` and a few named colors) and are stored as straight-alpha RGBA.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    /// Opaque black
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    /// Opaque white
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Create an opaque color
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Create a color with explicit alpha
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Alpha channel
    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    /// Whether painting this color changes nothing
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.0[3] == 0
    }

    /// Pixel value for raster buffers
    #[must_use]
    pub fn to_pixel(self) -> Rgba<u8> {
        Rgba(self.0)
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "orange" => Self::rgb(255, 165, 0),
            "yellow" => Self::rgb(255, 255, 0),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            _ => return None,
        };
        Some(color)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        if let Some(color) = Self::named(&trimmed) {
            return Ok(color);
        }

        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| Error::invalid_argument(format!("unrecognised color: {s}")))?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::invalid_argument(format!("invalid hex color: {s}")));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| Error::invalid_argument(format!("invalid hex color {s}: {e}")))
        };
        let short = |i: usize| channel(i..i + 1).map(|v| v * 17);

        match hex.len() {
            3 => Ok(Self::rgb(short(0)?, short(1)?, short(2)?)),
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(Error::invalid_argument(format!("invalid hex color: {s}"))),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        match a {
            0 => write!(f, "transparent"),
            255 => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            _ => write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}"),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!("#0f0".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(
            "#0000ff80".parse::<Color>().unwrap(),
            Color::rgba(0, 0, 255, 128)
        );
        assert_eq!(" #FFFFFF ".parse::<Color>().unwrap(), Color::WHITE);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!("black".parse::<Color>().unwrap(), Color::BLACK);
        assert!("transparent".parse::<Color>().unwrap().is_transparent());
        assert_eq!("Orange".parse::<Color>().unwrap(), Color::rgb(255, 165, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
        assert!("chartreuse-ish".parse::<Color>().is_err());
        let err = "".parse::<Color>().unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(255, 165, 0).to_string(), "#ffa500");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
        assert_eq!(Color::TRANSPARENT.to_string(), "transparent");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(0, 0, 255)).unwrap();
        assert_eq!(json, "\"#0000ff\"");

        let parsed: Color = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(parsed, Color::rgb(255, 0, 0));

        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
