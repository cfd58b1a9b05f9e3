//! TOML configuration for the viewer.

use std::{fs, io, path::PathBuf};

use cardiac_culture_core::{
    AnimationSpeed, DayError, DayNumber, Metric, MetricParseError, MetricSelection, SpeedError,
};
use serde::Deserialize;
use thiserror::Error;

/// Viewer configuration exactly as written in the TOML file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ViewerConfig {
    /// Base seed for frame generation; a fresh seed is drawn when absent.
    pub seed: Option<u64>,
    /// Day shown when the viewer opens.
    pub start_day: u8,
    /// Whether auto-play starts immediately.
    pub auto_play: bool,
    /// Playback speed, 1 to 3.
    pub speed: u8,
    /// Metric names initially charted.
    pub metrics: Vec<String>,
    /// Window options.
    pub window: WindowConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            start_day: DayNumber::FIRST.get(),
            auto_play: false,
            speed: AnimationSpeed::default().get(),
            metrics: MetricSelection::default()
                .iter()
                .map(|metric| metric.key().to_string())
                .collect(),
            window: WindowConfig::default(),
        }
    }
}

/// `[window]` table of the configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    /// Initial window width in logical pixels.
    pub width: u32,
    /// Initial window height in logical pixels.
    pub height: u32,
    /// Whether presentation waits for the display refresh.
    pub vsync: bool,
    /// Whether frame timings are logged once per second.
    pub show_fps: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 860,
            vsync: true,
            show_fps: false,
        }
    }
}

/// Validated configuration used to start the viewer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ViewerSettings {
    pub seed: Option<u64>,
    pub start_day: DayNumber,
    pub auto_play: bool,
    pub speed: AnimationSpeed,
    pub metrics: MetricSelection,
    pub window: WindowConfig,
}

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
    #[error("invalid start_day")]
    Day(#[from] DayError),
    #[error("invalid speed")]
    Speed(#[from] SpeedError),
    #[error("invalid metric in selection")]
    Metric(#[from] MetricParseError),
    #[error("window size {width}x{height} must be positive")]
    WindowSize { width: u32, height: u32 },
}

impl ViewerConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path,
            source: Box::new(source),
        })
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Checks every value and converts it into domain types.
    pub(crate) fn validate(self) -> Result<ViewerSettings, ConfigError> {
        let start_day = DayNumber::new(self.start_day)?;
        let speed = AnimationSpeed::new(self.speed)?;
        let metrics = self
            .metrics
            .iter()
            .map(|name| name.parse::<Metric>())
            .collect::<Result<MetricSelection, _>>()?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.window.width,
                height: self.window.height,
            });
        }

        Ok(ViewerSettings {
            seed: self.seed,
            start_day,
            auto_play: self.auto_play,
            speed,
            metrics,
            window: self.window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = ViewerConfig::parse("").expect("empty config parses");

        assert_eq!(config, ViewerConfig::default());
        let settings = config.validate().expect("defaults are valid");
        assert_eq!(settings.start_day, DayNumber::FIRST);
        assert_eq!(settings.speed, AnimationSpeed::default());
        assert_eq!(settings.metrics, MetricSelection::default());
        assert!(settings.window.vsync);
    }

    #[test]
    fn values_are_converted_into_domain_types() {
        let config = ViewerConfig::parse(
            r#"
            seed = 42
            start_day = 6
            auto_play = true
            speed = 3
            metrics = ["debris", "Beat Strength"]

            [window]
            width = 1024
            show_fps = true
            "#,
        )
        .expect("config parses");

        let settings = config.validate().expect("config is valid");
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.start_day.get(), 6);
        assert!(settings.auto_play);
        assert_eq!(settings.speed.get(), 3);
        assert_eq!(
            settings.metrics.iter().collect::<Vec<_>>(),
            vec![Metric::BeatStrength, Metric::DebrisLevel]
        );
        assert_eq!(settings.window.width, 1024);
        assert_eq!(settings.window.height, 860);
        assert!(settings.window.show_fps);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ViewerConfig::parse("colour = \"red\"").is_err());
        assert!(ViewerConfig::parse("[window]\nfullscreen = true").is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let day = ViewerConfig {
            start_day: 9,
            ..ViewerConfig::default()
        };
        assert!(matches!(day.validate(), Err(ConfigError::Day(_))));

        let speed = ViewerConfig {
            speed: 0,
            ..ViewerConfig::default()
        };
        assert!(matches!(speed.validate(), Err(ConfigError::Speed(_))));

        let metric = ViewerConfig {
            metrics: vec!["heart rate".to_string()],
            ..ViewerConfig::default()
        };
        assert!(matches!(metric.validate(), Err(ConfigError::Metric(_))));

        let window = ViewerConfig {
            window: WindowConfig {
                width: 0,
                ..WindowConfig::default()
            },
            ..ViewerConfig::default()
        };
        assert!(matches!(
            window.validate(),
            Err(ConfigError::WindowSize { width: 0, .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = PathBuf::from("/nonexistent/cardiac-culture.toml");
        let error = ViewerConfig::load(path.clone()).expect_err("file is missing");

        assert!(matches!(error, ConfigError::Read { path: ref reported, .. } if *reported == path));
    }
}
