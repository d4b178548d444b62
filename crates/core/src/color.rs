//! sRGB color value used by draw commands.
//!
//! Components are `f64` in [0, 1]. Colors serialize as `"#rrggbb"` so draw
//! command dumps and scene files stay readable; the hex round-trip quantizes
//! to 8 bits.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VizError;

/// sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const LIGHT_BLUE: Srgb = Srgb {
        r: 173.0 / 255.0,
        g: 216.0 / 255.0,
        b: 230.0 / 255.0,
    };
    pub const ORANGE: Srgb = Srgb {
        r: 1.0,
        g: 165.0 / 255.0,
        b: 0.0,
    };

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Srgb {
        Srgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Quantizes to 8-bit channels with rounding; out-of-range values clamp.
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
        ]
    }

    /// Parses `"#rrggbb"` or `"rrggbb"`, case insensitive.
    pub fn from_hex(hex: &str) -> Result<Srgb, VizError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(VizError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| VizError::InvalidColor(format!("'{hex}': {e}")))
        };
        Ok(Srgb::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// CSS functional notation, e.g. `rgb(255, 127, 50)`.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("rgb({r}, {g}, {b})")
    }

    /// Linear blend in sRGB space; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        Srgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}

fn channel_to_u8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_accepts_prefix_and_case() {
        assert_eq!(Srgb::from_hex("#FF7F32").unwrap().to_rgb8(), [255, 127, 50]);
        assert_eq!(Srgb::from_hex("0064ff").unwrap().to_rgb8(), [0, 100, 255]);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(Srgb::from_hex("#fff").is_err());
        assert!(Srgb::from_hex("#gg0000").is_err());
        assert!(Srgb::from_hex("").is_err());
        assert!(Srgb::from_hex("#ff00é").is_err());
    }

    #[test]
    fn to_hex_round_trips_8_bit_values() {
        let c = Srgb::from_rgb8(12, 200, 255);
        assert_eq!(c.to_hex(), "#0cc8ff");
        assert_eq!(Srgb::from_hex(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn to_css_uses_rounded_channels() {
        let c = Srgb {
            r: 1.0,
            g: 0.5,
            b: -0.2,
        };
        assert_eq!(c.to_css(), "rgb(255, 128, 0)");
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Srgb::BLACK;
        let b = Srgb::WHITE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5).to_rgb8(), [128, 128, 128]);
    }

    #[test]
    fn named_colors_match_css() {
        assert_eq!(Srgb::LIGHT_BLUE.to_hex(), "#add8e6");
        assert_eq!(Srgb::ORANGE.to_hex(), "#ffa500");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Srgb::ORANGE).unwrap();
        assert_eq!(json, "\"#ffa500\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Srgb::ORANGE);
        assert!(serde_json::from_str::<Srgb>("\"nope\"").is_err());
    }
}
