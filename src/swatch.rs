use crate::error::{Error, Result};
use std::fmt;

/// A representative color of one quantized region and the number of pixels in that region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    red: u8,
    green: u8,
    blue: u8,
    population: u64,
}

impl Swatch {
    pub fn new((red, green, blue): (u8, u8, u8), population: u64) -> Swatch {
        Self {
            red,
            green,
            blue,
            population,
        }
    }

    /// The swatch standing in for a region that received no colors: black with no pixels.
    pub fn placeholder() -> Swatch {
        Self::new((0, 0, 0), 0)
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    pub fn hsl(self) -> (f32, f32, f32) {
        crate::rgb_to_hsl(self.rgb())
    }

    pub fn population(self) -> u64 {
        self.population
    }

    pub fn hex(self) -> String {
        rgb_to_hex(self.rgb())
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Format a color as `#RRGGBB` with uppercase, zero-padded hex digits.
pub fn rgb_to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Parse a color from `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`. Parsing is case-insensitive and ignores surrounding
/// whitespace.
pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8)> {
    let invalid = || Error::InvalidHexColor(hex.to_owned());

    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match digits.len() {
        // shorthand: each digit is doubled, 0xF -> 0xFF
        3 => Ok((
            channel(&digits[0..1])? * 17,
            channel(&digits[1..2])? * 17,
            channel(&digits[2..3])? * 17,
        )),
        6 => Ok((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => Err(invalid()),
    }
}
