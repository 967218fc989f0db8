//! sRGB colors parsed from `#RRGGBB` hex strings.

use std::str::FromStr;

use crate::error::ConfigError;

/// An sRGB color with components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Build a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Convert to linear light for shader uniforms (sRGB render targets
    /// re-encode on write)
    pub fn to_linear(self) -> [f32; 3] {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [decode(self.r), decode(self.g), decode(self.b)]
    }

    /// Quantize to 8-bit sRGB bytes
    pub fn to_bytes(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let hex = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        Ok(Rgb::from_hex(hex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let orange: Rgb = "#FFA500".parse().unwrap();
        assert_eq!(orange.to_bytes(), [0xFF, 0xA5, 0x00]);

        let lower: Rgb = "#ff6347".parse().unwrap();
        assert_eq!(lower, Rgb::from_hex(0xFF6347));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["FFA500", "#FFA50", "#FFA5000", "#GGGGGG", "", "#"] {
            assert_eq!(
                bad.parse::<Rgb>(),
                Err(ConfigError::InvalidColor(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(Rgb::from_hex(0x000000).to_linear(), [0.0, 0.0, 0.0]);
        let white = Rgb::from_hex(0xFFFFFF).to_linear();
        for c in white {
            assert!((c - 1.0).abs() < 1e-5);
        }
    }
}
