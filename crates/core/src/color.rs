//! 8-bit RGBA color used for particle trails and the canvas background.
//!
//! Serializes as a hex string: `"#rrggbb"` when fully opaque, `"#rrggbbaa"`
//! otherwise.

use crate::error::SimError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    /// Fully opaque color from three channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `"#rrggbb"`, `"#rrggbbaa"`, or either form without the `#`
    /// (case insensitive).
    ///
    /// Returns `SimError::InvalidColor` for any other shape.
    pub fn from_hex(hex: &str) -> Result<Rgba, SimError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(SimError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got {}",
                hex.len()
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            hex.get(range)
                .ok_or_else(|| SimError::InvalidColor(format!("non-ascii {name} component")))
                .and_then(|s| {
                    // from_str_radix alone would take a leading '+'
                    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
                        return Err(SimError::InvalidColor(format!(
                            "invalid {name} component '{s}'"
                        )));
                    }
                    u8::from_str_radix(s, 16).map_err(|e| {
                        SimError::InvalidColor(format!("invalid {name} component: {e}"))
                    })
                })
        };
        let r = channel(0..2, "red")?;
        let g = channel(2..4, "green")?;
        let b = channel(4..6, "blue")?;
        let a = if hex.len() == 8 {
            channel(6..8, "alpha")?
        } else {
            255
        };
        Ok(Rgba { r, g, b, a })
    }

    /// Formats as `"#rrggbb"`, appending the alpha byte only if not opaque.
    pub fn to_hex(self) -> String {
        let Rgba { r, g, b, a } = self;
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Channels in RGBA byte order.
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
