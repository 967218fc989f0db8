//! Color wave field parameters and speed presets.

use std::str::FromStr;

use crate::color::Rgb;
use crate::error::ConfigError;

/// Phase increment presets (noise time units per rendered frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveSpeed {
    #[default]
    Slow,
    Fast,
}

impl WaveSpeed {
    /// Amount the shared phase accumulator advances every frame
    pub fn increment(self) -> f64 {
        match self {
            WaveSpeed::Slow => 0.0004,
            WaveSpeed::Fast => 0.0006,
        }
    }
}

impl FromStr for WaveSpeed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slow" => Ok(WaveSpeed::Slow),
            "fast" => Ok(WaveSpeed::Fast),
            other => Err(ConfigError::UnknownSpeed(other.to_string())),
        }
    }
}

/// Painterly wave canvas parameters
#[derive(Debug, Clone)]
pub struct WaveParams {
    /// Stroke colors, cycled when there are more strokes than colors
    pub colors: Vec<Rgb>,

    /// Number of strokes drawn per frame
    pub stroke_count: usize,

    /// Stroke line width (pixels)
    pub wave_width: f32,

    /// Translucent fill painted under the strokes every frame
    pub background_fill: Rgb,

    /// Blur radius applied to strokes (pixels)
    pub blur_px: f32,

    pub speed: WaveSpeed,

    /// Global alpha for fill and strokes (0-1)
    pub wave_opacity: f32,

    /// Horizontal sampling step (pixels)
    pub sample_step_px: usize,

    /// Pixels per noise unit along X
    pub noise_x_period_px: f64,

    /// Noise offset between consecutive strokes
    pub stroke_noise_offset: f64,

    /// Vertical displacement per unit of noise (pixels)
    pub amplitude_px: f32,

    /// Simplex noise seed
    pub noise_seed: u32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            // Orange, red-orange, tomato
            colors: vec![
                Rgb::from_hex(0xFFA500),
                Rgb::from_hex(0xFF4500),
                Rgb::from_hex(0xFF6347),
            ],
            stroke_count: 3,
            wave_width: 100.0,
            background_fill: Rgb::from_hex(0x000000),
            blur_px: 30.0,
            speed: WaveSpeed::Slow,
            wave_opacity: 0.3,
            sample_step_px: 5,
            noise_x_period_px: 400.0,
            stroke_noise_offset: 0.3,
            amplitude_px: 200.0,
            noise_seed: 42,
        }
    }
}

impl WaveParams {
    /// Reject configurations the canvas cannot draw
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if !(0.0..=1.0).contains(&self.wave_opacity) {
            return Err(ConfigError::OpacityOutOfRange(self.wave_opacity));
        }
        Ok(())
    }

    /// Palette color for stroke `index`
    pub fn stroke_color(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_presets() {
        assert_eq!(WaveSpeed::Slow.increment(), 0.0004);
        assert_eq!(WaveSpeed::Fast.increment(), 0.0006);
        assert_eq!("FAST".parse::<WaveSpeed>(), Ok(WaveSpeed::Fast));
        assert!("medium".parse::<WaveSpeed>().is_err());
    }

    #[test]
    fn test_palette_cycles() {
        let params = WaveParams {
            colors: vec![Rgb::from_hex(0x111111), Rgb::from_hex(0x222222)],
            ..Default::default()
        };
        assert_eq!(params.stroke_color(0), params.stroke_color(2));
        assert_ne!(params.stroke_color(0), params.stroke_color(1));
    }

    #[test]
    fn test_validate() {
        assert!(WaveParams::default().validate().is_ok());

        let empty = WaveParams {
            colors: Vec::new(),
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyPalette));

        let opaque = WaveParams {
            wave_opacity: 1.5,
            ..Default::default()
        };
        assert_eq!(opaque.validate(), Err(ConfigError::OpacityOutOfRange(1.5)));
    }
}
