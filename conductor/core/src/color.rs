//! Colour Primitives
//!
//! Surface colours are normalised RGB triples in `[0, 1]`, the same shape a
//! shader uniform takes. A [`Palette`] is always exactly four colours: the
//! Surface Model blends four noise-weighted colours per fragment.
//!
//! Colours travel through configuration and inbound events as CSS-style hex
//! strings (`#4A90E2` or `#49E`), so `Rgb` serialises to and from that form.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Four blend colours
pub type Palette = [Rgb; 4];

/// Per-channel hex offsets used to spread a single base colour into a palette
pub const PALETTE_OFFSETS: [u8; 4] = [0x00, 0x11, 0x22, 0x33];

/// Errors produced when parsing a hex colour string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The string did not start with `#`
    #[error("colour {0:?} must start with '#'")]
    MissingHash(String),
    /// Wrong number of hex digits (only 3 or 6 are accepted)
    #[error("colour must have 3 or 6 hex digits, got {0}")]
    BadLength(usize),
    /// Digits were not valid hexadecimal
    #[error("colour {0:?} contains non-hex digits")]
    BadDigits(String),
}

/// Normalised RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel (0.0-1.0)
    pub r: f32,
    /// Green channel (0.0-1.0)
    pub g: f32,
    /// Blue channel (0.0-1.0)
    pub b: f32,
}

impl Rgb {
    /// Create a colour from normalised channels
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a colour from 8-bit channels
    #[must_use]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Create a colour from a packed `0xRRGGBB` value
    #[must_use]
    pub fn from_hex_u32(value: u32) -> Self {
        let [_, r, g, b] = value.to_be_bytes();
        Self::from_u8(r, g, b)
    }

    /// Parse `#RRGGBB` or `#RGB`
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError`] when the string is not a hex colour.
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(trimmed.to_string()))?;

        let expanded = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            n => return Err(ColorParseError::BadLength(n)),
        };

        let bytes =
            hex::decode(&expanded).map_err(|_| ColorParseError::BadDigits(trimmed.to_string()))?;
        Ok(Self::from_u8(bytes[0], bytes[1], bytes[2]))
    }

    /// Quantise to 8-bit channels (clamped, rounded)
    #[must_use]
    pub fn to_u8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Lowercase `#rrggbb` form
    #[must_use]
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{}", hex::encode([r, g, b]))
    }

    /// Linear blend, `self * (1 - t) + other * t`
    ///
    /// At `t == 1.0` the result is exactly `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::from_vec3(self.to_vec3() * (1.0 - t) + other.to_vec3() * t)
    }

    /// Add `delta` to every 8-bit channel, saturating at 0xFF
    #[must_use]
    pub fn offset(self, delta: u8) -> Self {
        let [r, g, b] = self.to_u8();
        Self::from_u8(
            r.saturating_add(delta),
            g.saturating_add(delta),
            b.saturating_add(delta),
        )
    }

    /// As a vector for shading math
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// From a vector produced by shading math
    #[must_use]
    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// The starting palette: two greens, a terracotta and an orange
#[must_use]
pub fn default_palette() -> Palette {
    [
        Rgb::from_hex_u32(0x0042_7c44),
        Rgb::from_hex_u32(0x0066_b65d),
        Rgb::from_hex_u32(0x00d8_5e42),
        Rgb::from_hex_u32(0x00f6_8835),
    ]
}

/// Spread one base colour into four by per-channel hex offsets
///
/// Channels saturate at 0xFF instead of carrying into the neighbouring
/// channel.
#[must_use]
pub fn derive_palette(base: Rgb) -> Palette {
    PALETTE_OFFSETS.map(|delta| base.offset(delta))
}

/// Blend two palettes colour by colour
#[must_use]
pub fn lerp_palette(from: &Palette, to: &Palette, t: f32) -> Palette {
    std::array::from_fn(|i| from[i].lerp(to[i], t))
}
