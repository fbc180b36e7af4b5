//! Engine Configuration
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables. Every section uses `#[serde(default)]`, so a
//! file only needs to mention what it changes:
//!
//! ```toml
//! [typing]
//! min_delay_ms = 15
//! max_delay_ms = 60
//!
//! [color]
//! palette = ["#427c44", "#66b65d", "#d85e42", "#f68835"]
//! ```
//!
//! # Environment Variables
//!
//! - `ZENORB_CONFIG`: Path to the TOML file
//! - `ZENORB_TYPING_MIN_MS` / `ZENORB_TYPING_MAX_MS`: Reveal delay bounds
//! - `ZENORB_COLOR_TRANSITION_MS`: Colour transition length
//! - `ZENORB_SEGMENTS`: Sphere tessellation

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::TypingSpeed;
use crate::color::{default_palette, Palette, Rgb};
use crate::render::MAX_SEGMENTS;
use crate::surface::SurfaceParameters;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`EngineConfig`]
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Values parsed but are inconsistent
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the active configuration came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults (no file found)
    Default,
    /// Loaded from this file
    File(PathBuf),
}

/// Character reveal cadence
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Shortest delay between characters
    pub min_delay_ms: u64,
    /// Longest delay between characters
    pub max_delay_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 20,
            max_delay_ms: 100,
        }
    }
}

impl TypingConfig {
    /// Delay bounds as a [`TypingSpeed`]
    #[must_use]
    pub fn speed(&self) -> TypingSpeed {
        TypingSpeed::new(
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

/// Breathing pulse shape
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathingConfig {
    /// Resting scale
    pub base_scale: f32,
    /// Extra scale at the top of a breath
    pub delta: f32,
    /// Length of each half of the breath
    pub duration_ms: u64,
    /// Sampling rate of the pulse
    pub fps: u32,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            base_scale: 1.0,
            delta: 0.05,
            duration_ms: 400,
            fps: 60,
        }
    }
}

impl BreathingConfig {
    /// Length of one half of the breath
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Palette and colour transition timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Length of a colour transition
    pub transition_ms: u64,
    /// Wait between the end of a reveal and the start of its colour change
    pub delay_after_typing_ms: u64,
    /// Starting palette
    pub palette: Palette,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            transition_ms: 10_000,
            delay_after_typing_ms: 2_000,
            palette: default_palette(),
        }
    }
}

impl ColorConfig {
    /// Length of a colour transition
    #[must_use]
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Wait before a colour change starts
    #[must_use]
    pub fn delay_after_typing(&self) -> Duration {
        Duration::from_millis(self.delay_after_typing_ms)
    }
}

/// Surface shape and raster settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Frequency of the colour noise fields
    pub noise_scale: f32,
    /// Amplitude of the displacement
    pub deform_strength: f32,
    /// Sphere segments around and top to bottom
    pub segments: u32,
    /// Background the translucent surface is composited over
    pub clear_color: Rgb,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            noise_scale: 3.0,
            deform_strength: 0.3,
            segments: 64,
            clear_color: Rgb::new(1.0, 1.0, 1.0),
        }
    }
}

/// Complete engine configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reveal cadence
    pub typing: TypingConfig,
    /// Breathing pulse
    pub breathing: BreathingConfig,
    /// Colour transitions
    pub color: ColorConfig,
    /// Surface and raster
    pub surface: SurfaceConfig,
}

impl EngineConfig {
    /// Defaults with environment overrides applied
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Apply `ZENORB_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parse<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
            let raw = raw?;
            match raw.trim().parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "Ignoring unparseable override");
                    None
                }
            }
        }

        if let Some(v) = parse("ZENORB_TYPING_MIN_MS", lookup("ZENORB_TYPING_MIN_MS")) {
            self.typing.min_delay_ms = v;
        }
        if let Some(v) = parse("ZENORB_TYPING_MAX_MS", lookup("ZENORB_TYPING_MAX_MS")) {
            self.typing.max_delay_ms = v;
        }
        if let Some(v) = parse(
            "ZENORB_COLOR_TRANSITION_MS",
            lookup("ZENORB_COLOR_TRANSITION_MS"),
        ) {
            self.color.transition_ms = v;
        }
        if let Some(v) = parse("ZENORB_SEGMENTS", lookup("ZENORB_SEGMENTS")) {
            self.surface.segments = v;
        }
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typing.min_delay_ms > self.typing.max_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "typing.min_delay_ms ({}) exceeds typing.max_delay_ms ({})",
                self.typing.min_delay_ms, self.typing.max_delay_ms
            )));
        }
        if self.breathing.fps == 0 {
            return Err(ConfigError::Invalid("breathing.fps must be positive".into()));
        }
        if self.breathing.duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "breathing.duration_ms must be positive".into(),
            ));
        }
        if self.color.transition_ms == 0 {
            return Err(ConfigError::Invalid(
                "color.transition_ms must be positive".into(),
            ));
        }
        if !(3..=MAX_SEGMENTS).contains(&self.surface.segments) {
            return Err(ConfigError::Invalid(format!(
                "surface.segments must be between 3 and {MAX_SEGMENTS}, got {}",
                self.surface.segments
            )));
        }
        Ok(())
    }

    /// Starting surface parameters
    #[must_use]
    pub fn surface_parameters(&self) -> SurfaceParameters {
        SurfaceParameters::new(
            self.color.palette,
            self.breathing.base_scale,
            self.surface.noise_scale,
            self.surface.deform_strength,
        )
    }
}

/// Default config file location
///
/// `ZENORB_CONFIG` wins; otherwise `<config dir>/zenorb/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("ZENORB_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("zenorb").join("config.toml"))
}

/// Load and validate a config file (no environment overrides)
///
/// # Errors
///
/// Fails when the file cannot be read, parsed, or validated.
pub fn load_config_from_path(path: &Path) -> Result<EngineConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EngineConfig = toml::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from the default location, then apply the environment
///
/// A missing file is not an error: defaults are used.
///
/// # Errors
///
/// Fails when an existing file is unreadable or invalid, or when the
/// environment overrides produce an invalid combination.
pub fn load_config() -> Result<(EngineConfig, ConfigSource), ConfigError> {
    let (mut config, source) = match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_config_from_path(&path)?;
            tracing::info!(path = ?path, "Loaded configuration");
            (config, ConfigSource::File(path))
        }
        _ => (EngineConfig::default(), ConfigSource::Default),
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok((config, source))
}
