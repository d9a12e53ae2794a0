//! Colormap evaluation.
//!
//! Maps a normalised scalar to a [`Color`]. Ramps are pure functions of `t`:
//! - `viridis`, `plasma`: piecewise-linear through five anchors
//! - `inferno`, `magma`, `cividis`: cubic polynomials in `t`
//! - `rainbow`: hue rotation (`h = 1 - t`, full saturation, half lightness)
//! - `sinebow`: squared sines phase-shifted by a third of a turn per channel
//! - `turbo`: polynomial approximation
//! - `red-blue`, `red-yellow-green`, `custom`: linear colour interpolation
//!
//! Every ramp clamps its channels to `[0, 1]` for `t` in `[0, 1]`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EncodeError, Result};

/// Fixed categorical palette, assigned in first-seen order and wrapped.
pub const CATEGORY_PALETTE: [u32; 12] = [
    0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff, 0xffa500, 0x800080, 0x008000,
    0x800000, 0x008080, 0x000080,
];

/// Number of stops sampled for the sinebow legend gradient.
const LEGEND_SAMPLES: usize = 7;

/// An RGB colour with channels nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` integer.
    pub fn from_rgb_u32(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xff) as f64 / 255.0,
            ((hex >> 8) & 0xff) as f64 / 255.0,
            (hex & 0xff) as f64 / 255.0,
        )
    }

    /// Parse `#rrggbb`, `#rgb` or the same without `#`.
    ///
    /// ```
    /// use geoencode::Color;
    /// assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::RED);
    /// assert_eq!(Color::from_hex("00f").unwrap(), Color::BLUE);
    /// ```
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(EncodeError::InvalidColor(text.to_string())),
        };
        u32::from_str_radix(&expanded, 16)
            .map(Self::from_rgb_u32)
            .map_err(|_| EncodeError::InvalidColor(text.to_string()))
    }

    /// `#rrggbb`, channels clamped and rounded.
    pub fn to_hex(&self) -> String {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Build from hue, saturation and lightness, all in `[0, 1]`.
    /// Hue wraps; saturation and lightness are clamped.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Self::rgb(l, l, l);
        }

        let high = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let low = 2.0 * l - high;
        Self::rgb(
            hue_to_channel(low, high, h + 1.0 / 3.0),
            hue_to_channel(low, high, h),
            hue_to_channel(low, high, h - 1.0 / 3.0),
        )
    }

    fn clamped(r: f64, g: f64, b: f64) -> Self {
        Self::rgb(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }
}

fn hue_to_channel(low: f64, high: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        low + (high - low) * 6.0 * t
    } else if t < 0.5 {
        high
    } else if t < 2.0 / 3.0 {
        low + (high - low) * 6.0 * (2.0 / 3.0 - t)
    } else {
        low
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Per-channel linear interpolation `c1 + factor * (c2 - c1)`, unclamped.
pub fn interpolate_color(c1: &Color, c2: &Color, factor: f64) -> Color {
    Color::rgb(
        c1.r + factor * (c2.r - c1.r),
        c1.g + factor * (c2.g - c1.g),
        c1.b + factor * (c2.b - c1.b),
    )
}

/// A two-colour linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub start: Color,
    pub end: Color,
}

impl Gradient {
    pub const fn new(start: Color, end: Color) -> Self {
        Self { start, end }
    }

    pub fn at(&self, t: f64) -> Color {
        interpolate_color(&self.start, &self.end, t)
    }
}

/// Named colour ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RampId {
    #[default]
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
    Rainbow,
    Sinebow,
    Turbo,
    RedBlue,
    RedYellowGreen,
    /// Two-colour gradient between the configured endpoints.
    Custom,
}

impl RampId {
    pub const ALL: [RampId; 11] = [
        RampId::Viridis,
        RampId::Plasma,
        RampId::Inferno,
        RampId::Magma,
        RampId::Cividis,
        RampId::Rainbow,
        RampId::Sinebow,
        RampId::Turbo,
        RampId::RedBlue,
        RampId::RedYellowGreen,
        RampId::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RampId::Viridis => "viridis",
            RampId::Plasma => "plasma",
            RampId::Inferno => "inferno",
            RampId::Magma => "magma",
            RampId::Cividis => "cividis",
            RampId::Rainbow => "rainbow",
            RampId::Sinebow => "sinebow",
            RampId::Turbo => "turbo",
            RampId::RedBlue => "red-blue",
            RampId::RedYellowGreen => "red-yellow-green",
            RampId::Custom => "custom",
        }
    }
}

impl fmt::Display for RampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RampId {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        RampId::ALL
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| EncodeError::UnknownOption {
                kind: "color ramp",
                value: s.to_string(),
            })
    }
}

/// A ramp selection together with the custom gradient it may refer to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colormap {
    pub ramp: RampId,
    pub custom: Gradient,
}

impl Colormap {
    pub fn new(ramp: RampId, custom: Gradient) -> Self {
        Self { ramp, custom }
    }

    /// Evaluate the ramp at `t`.
    ///
    /// ```
    /// use geoencode::{Color, Colormap, Gradient, RampId};
    /// let map = Colormap::new(RampId::RedBlue, Gradient::new(Color::BLUE, Color::RED));
    /// assert_eq!(map.evaluate(0.0), Color::RED);
    /// assert_eq!(map.evaluate(1.0), Color::BLUE);
    /// ```
    pub fn evaluate(&self, t: f64) -> Color {
        match self.ramp {
            RampId::Viridis => piecewise(&VIRIDIS, t),
            RampId::Plasma => piecewise(&PLASMA, t),
            RampId::Inferno => inferno(t),
            RampId::Magma => magma(t),
            RampId::Cividis => cividis(t),
            RampId::Rainbow => Color::from_hsl(1.0 - t, 1.0, 0.5),
            RampId::Sinebow => sinebow(t),
            RampId::Turbo => turbo(t),
            RampId::RedBlue => interpolate_color(&Color::RED, &Color::BLUE, t),
            RampId::RedYellowGreen => {
                if t < 0.5 {
                    interpolate_color(&Color::RED, &Color::YELLOW, t * 2.0)
                } else {
                    interpolate_color(&Color::YELLOW, &Color::GREEN, (t - 0.5) * 2.0)
                }
            }
            RampId::Custom => self.custom.at(t),
        }
    }

    /// Gradient stops for a legend bar, left to right.
    pub fn legend_stops(&self) -> Vec<Color> {
        match self.ramp {
            RampId::RedBlue => vec![Color::RED, Color::BLUE],
            RampId::RedYellowGreen => vec![Color::RED, Color::YELLOW, Color::GREEN],
            RampId::Custom => vec![self.custom.start, self.custom.end],
            RampId::Viridis => stops(&VIRIDIS_STOPS),
            RampId::Plasma => stops(&PLASMA_STOPS),
            RampId::Inferno => stops(&INFERNO_STOPS),
            RampId::Magma => stops(&MAGMA_STOPS),
            RampId::Cividis => stops(&CIVIDIS_STOPS),
            RampId::Rainbow => stops(&RAINBOW_STOPS),
            RampId::Turbo => stops(&TURBO_STOPS),
            RampId::Sinebow => (0..LEGEND_SAMPLES)
                .map(|i| self.evaluate(i as f64 / (LEGEND_SAMPLES - 1) as f64))
                .collect(),
        }
    }
}

fn stops(table: &[u32]) -> Vec<Color> {
    table.iter().copied().map(Color::from_rgb_u32).collect()
}

// Reference stops of the published ramps, drawn by legend bars.
const VIRIDIS_STOPS: [u32; 6] = [0x440154, 0x414487, 0x2a788e, 0x22a884, 0x7ad151, 0xfde725];
const PLASMA_STOPS: [u32; 6] = [0x0d0887, 0x6a00a8, 0xb12a90, 0xe16462, 0xfca636, 0xf0f921];
const INFERNO_STOPS: [u32; 6] = [0x000004, 0x320a5a, 0x781c6d, 0xbb3754, 0xed6925, 0xfcffa4];
const MAGMA_STOPS: [u32; 6] = [0x000004, 0x2c105c, 0x711f81, 0xb63679, 0xee605e, 0xfcfdbf];
const CIVIDIS_STOPS: [u32; 6] = [0x00204c, 0x2c456b, 0x666870, 0x9a8d72, 0xcdb567, 0xffe945];
const RAINBOW_STOPS: [u32; 6] = [0x6e40aa, 0xbe3caf, 0xfe4b83, 0xff7847, 0xe2b72f, 0xaff05b];
const TURBO_STOPS: [u32; 9] = [
    0x30123b, 0x4444a4, 0x1a9be2, 0x29deaf, 0x92ee5a, 0xfefe05, 0xfaa107, 0xd12600, 0x7a0000,
];

const VIRIDIS: [Color; 5] = [
    Color::rgb(0.267, 0.004, 0.329),
    Color::rgb(0.283, 0.300, 0.406),
    Color::rgb(0.127, 0.563, 0.550),
    Color::rgb(0.369, 0.832, 0.294),
    Color::rgb(0.983, 0.945, 0.036),
];

const PLASMA: [Color; 5] = [
    Color::rgb(0.050, 0.029, 0.527),
    Color::rgb(0.532, 0.000, 0.592),
    Color::rgb(0.881, 0.196, 0.394),
    Color::rgb(0.988, 0.497, 0.131),
    Color::rgb(0.940, 0.975, 0.131),
];

fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Four equal-width linear pieces through five anchors. The local parameter
/// is clamped, so values outside `[0, 1]` hold the end anchors.
fn piecewise(anchors: &[Color; 5], t: f64) -> Color {
    let piece = if t < 0.25 {
        0
    } else if t < 0.5 {
        1
    } else if t < 0.75 {
        2
    } else {
        3
    };
    let local = (t - piece as f64 * 0.25) * 4.0;
    let (a, b) = (anchors[piece], anchors[piece + 1]);
    Color::rgb(mix(a.r, b.r, local), mix(a.g, b.g, local), mix(a.b, b.b, local))
}

fn inferno(t: f64) -> Color {
    let (t2, t3) = (t * t, t * t * t);
    Color::clamped(
        0.8 - 1.4 * t + 0.6 * t2 + 0.8 * t3,
        0.1 + 0.5 * t - 0.4 * t2 + 0.1 * t3,
        0.5 - 2.0 * t + 2.1 * t2 - 0.6 * t3,
    )
}

fn magma(t: f64) -> Color {
    let (t2, t3) = (t * t, t * t * t);
    Color::clamped(
        0.2 + 1.9 * t - 0.5 * t2,
        1.0 * t - 0.2 * t2,
        0.4 + 0.8 * t - 1.2 * t2 + 0.4 * t3,
    )
}

fn cividis(t: f64) -> Color {
    let (t2, t3) = (t * t, t * t * t);
    Color::clamped(
        -0.1 + 2.7 * t - 1.9 * t2 + 0.3 * t3,
        0.2 + 0.8 * t + 0.2 * t2 - 0.2 * t3,
        0.5 - 0.4 * t - 0.1 * t2,
    )
}

fn sinebow(t: f64) -> Color {
    let channel = |phase: f64| {
        let s = (2.0 * PI * (t + phase) / 3.0).sin();
        s * s
    };
    Color::clamped(channel(0.0), channel(1.0), channel(2.0))
}

fn turbo(t: f64) -> Color {
    Color::clamped(
        1.0 - 1.2 * (t - 0.8).powi(2),
        1.8 * t.max(0.0).powf(0.8) * (1.0 - t),
        1.3 * (1.0 - t).max(0.0).powf(1.2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        for hex in ["#ff0000", "#00ff00", "#ffa500", "#000080"] {
            assert_eq!(Color::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(Color::from_hex("#ff00").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn piecewise_hits_anchors() {
        assert_eq!(piecewise(&VIRIDIS, 0.0), VIRIDIS[0]);
        assert_eq!(piecewise(&VIRIDIS, 1.0), VIRIDIS[4]);
        assert_eq!(piecewise(&PLASMA, 0.5), PLASMA[2]);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5), Color::RED);
        let green = Color::from_hsl(1.0 / 3.0, 1.0, 0.5);
        assert!((green.g - 1.0).abs() < 1e-12 && green.r.abs() < 1e-12);
    }
}
