use crate::error::{GridError, Result};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB color, written as `#rrggbb`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parses `#rrggbb`, `rrggbb`, `#rgb` or `rgb`
    pub fn from_hex(text: &str) -> Result<Self> {
        let invalid = || GridError::InvalidColor(text.to_string());
        let digits = text.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Rgb::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let short = |s: &str| channel(s).map(|v| v * 17);
                Ok(Rgb::new(
                    short(&digits[0..1])?,
                    short(&digits[1..2])?,
                    short(&digits[2..3])?,
                ))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation towards `other`, `t` clamped to [0, 1]
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Composites `overlay` at `alpha` opacity on top of this color
    pub fn blend(self, overlay: Rgb, alpha: f64) -> Rgb {
        self.lerp(overlay, alpha)
    }

    pub fn channel(self, index: usize) -> u8 {
        match index {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    pub fn with_channel(mut self, index: usize, value: u8) -> Rgb {
        match index {
            0 => self.r = value,
            1 => self.g = value,
            _ => self.b = value,
        }
        self
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        Rgb::from_hex(s)
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(c: Rgb) -> Self {
        crossterm::style::Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::from_hex("#ff2d2d").unwrap(), Rgb::new(255, 45, 45));
        assert_eq!(Rgb::from_hex("FFAC8C").unwrap(), Rgb::new(255, 172, 140));
        assert_eq!(Rgb::from_hex("#0f8").unwrap(), Rgb::new(0, 255, 136));
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#", "#12345", "#gggggg", "#ff2d2d0", "+12345"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(GridError::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn formats_as_lowercase_hex() {
        assert_eq!(Rgb::new(255, 172, 140).to_string(), "#ffac8c");
        assert_eq!("#ABCDEF".parse::<Rgb>().unwrap().to_hex(), "#abcdef");
    }

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 100, 100));
        assert_eq!(a.lerp(b, 7.0), b);
    }

    #[test]
    fn channels_can_be_replaced() {
        let c = Rgb::new(1, 2, 3).with_channel(1, 200);
        assert_eq!(c, Rgb::new(1, 200, 3));
        assert_eq!(c.channel(0), 1);
        assert_eq!(c.channel(2), 3);
    }
}
