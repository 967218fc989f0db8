//! Command-line argument parsing.

use clap::Parser;

use emberglow::background::{BackgroundConfig, BackgroundKind};
use emberglow::color::Rgb;
use emberglow::error::ConfigError;
use emberglow::params::{RecordingConfig, WaveSpeed};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Emberglow")]
#[command(about = "Animated ember-toned backgrounds", long_about = None)]
pub struct Args {
    /// Background to show: surface (default), cluster, wave
    #[arg(long, value_name = "KIND", default_value = "surface")]
    pub background: String,

    /// Wave field speed preset: slow (default), fast
    #[arg(long, value_name = "PRESET", default_value = "slow")]
    pub speed: String,

    /// Wave palette override, comma separated (e.g. "#FFA500,#FF4500")
    #[arg(long, value_name = "HEX,...", value_delimiter = ',')]
    pub colors: Vec<String>,

    /// Disable bloom on the sphere cluster
    #[arg(long)]
    pub no_bloom: bool,

    /// Disable the studio environment reflection on the sphere cluster
    #[arg(long)]
    pub no_env_map: bool,

    /// Record frames headlessly instead of opening a window (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Window or recording width in pixels
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Window or recording height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,
}

impl Args {
    /// Build the background configuration from the defaults and overrides
    pub fn background_config(&self) -> Result<BackgroundConfig, ConfigError> {
        let mut config = BackgroundConfig {
            kind: self.background.parse::<BackgroundKind>()?,
            ..Default::default()
        };

        if let Some(width) = self.width {
            config.render.window_width = width.max(1);
        }
        if let Some(height) = self.height {
            config.render.window_height = height.max(1);
        }

        config.wave.speed = self.speed.parse::<WaveSpeed>()?;
        if !self.colors.is_empty() {
            config.wave.colors = self
                .colors
                .iter()
                .map(|c| c.trim().parse::<Rgb>())
                .collect::<Result<_, _>>()?;
        }
        config.wave.validate()?;

        config.cluster.post.bloom = !self.no_bloom;
        config.cluster.post.env_map = !self.no_env_map;

        log::info!(
            "Background: {} ({}x{})",
            config.kind,
            config.render.window_width,
            config.render.window_height
        );
        Ok(config)
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> std::io::Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        let config = RecordingConfig::new(duration);

        // Create output directories
        std::fs::create_dir_all(config.frames_dir())?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["emberglow"]);
        let config = args.background_config().unwrap();
        assert_eq!(config.kind, BackgroundKind::Surface);
        assert_eq!(config.wave.speed, WaveSpeed::Slow);
        assert!(config.cluster.post.bloom);
        assert!(config.cluster.post.env_map);
        assert!(args.record.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "emberglow",
            "--background",
            "wave",
            "--speed",
            "fast",
            "--colors",
            "#112233,#445566",
            "--no-bloom",
            "--width",
            "640",
        ]);
        let config = args.background_config().unwrap();
        assert_eq!(config.kind, BackgroundKind::Wave);
        assert_eq!(config.wave.speed, WaveSpeed::Fast);
        assert_eq!(config.wave.colors.len(), 2);
        assert_eq!(config.wave.colors[1], Rgb::from_hex(0x445566));
        assert!(!config.cluster.post.bloom);
        assert_eq!(config.render.window_width, 640);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let args = Args::parse_from(["emberglow", "--colors", "#12345"]);
        assert!(matches!(
            args.background_config(),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_unknown_background_is_rejected() {
        let args = Args::parse_from(["emberglow", "--background", "ocean"]);
        assert!(matches!(
            args.background_config(),
            Err(ConfigError::UnknownBackground(_))
        ));
    }
}
