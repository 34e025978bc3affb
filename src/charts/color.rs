//! Trace colors and the default palette.

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color '{0}': expected #rrggbb or a named color")]
pub struct ColorError(pub String);

/// 24-bit color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Per-KPI color overrides, keyed by column name.
pub type ColorMap = HashMap<String, Rgb>;

pub const PALETTE: [Rgb; 10] = [
    Rgb::new(52, 152, 219),  // Blue
    Rgb::new(231, 76, 60),   // Red
    Rgb::new(46, 204, 113),  // Green
    Rgb::new(155, 89, 182),  // Purple
    Rgb::new(243, 156, 18),  // Orange
    Rgb::new(26, 188, 156),  // Teal
    Rgb::new(233, 30, 99),   // Pink
    Rgb::new(0, 188, 212),   // Cyan
    Rgb::new(121, 85, 72),   // Brown
    Rgb::new(96, 125, 139),  // Blue Grey
];

const NAMED: [(&str, Rgb); 12] = [
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("orange", Rgb::new(255, 165, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("teal", Rgb::new(0, 128, 128)),
    ("pink", Rgb::new(255, 192, 203)),
    ("brown", Rgb::new(165, 42, 42)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
];

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Palette color for the trace at `index` when no override is given.
    pub fn default_for(index: usize) -> Self {
        PALETTE[index % PALETTE.len()]
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_color32(self, opacity: f32) -> Color32 {
        Color32::from_rgb(self.r, self.g, self.b).gamma_multiply(opacity.clamp(0.0, 1.0))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(ColorError(s.to_string()));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorError(s.to_string()))
            };
            return Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?));
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, rgb)| *rgb)
            .ok_or_else(|| ColorError(s.to_string()))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}
