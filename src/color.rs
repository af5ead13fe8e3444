use crate::error::{Error, Result};
use serde::Deserialize;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A colour with a straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn opaque(self) -> Rgba {
        self.with_alpha(1.0)
    }

    pub(crate) fn to_unit(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }

    pub(crate) fn from_unit(c: [f32; 3]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Rgb(q(c[0]), q(c[1]), q(c[2]))
    }
}

impl FromStr for Rgb {
    type Err = Error;

    // Accepts RRGGBB with or without a leading '#'
    fn from_str(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        let bad = || Error::InvalidColor(hex.to_string());
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(bad());
        }

        let r = u8::from_str_radix(&digits[0..2], 16).map_err(|_| bad())?;
        let g = u8::from_str_radix(&digits[2..4], 16).map_err(|_| bad())?;
        let b = u8::from_str_radix(&digits[4..6], 16).map_err(|_| bad())?;

        Ok(Rgb(r, g, b))
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
