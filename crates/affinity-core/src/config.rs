//! Configuration for affinity computation.
//!
//! Values are layered with `figment`: built-in defaults, then an optional
//! TOML file, then `AFFINITY_`-prefixed environment variables (nested keys
//! separated by `__`, e.g. `AFFINITY_SCORING__PROXY_EXPONENT=0.2`).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::scoring::ParetoThresholds;

/// Prefix of environment variables read by [`AffinityConfig::load`].
pub const ENV_PREFIX: &str = "AFFINITY_";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A provider could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// A value is out of range.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// Dotted key, e.g. `scoring.proxy_exponent`.
        key: String,
        /// What is wrong with the value.
        message: String,
    },

    /// The configuration could not be rendered.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityConfig {
    /// Traversal settings.
    pub traversal: TraversalConfig,
    /// Scoring constants.
    pub scoring: ScoringConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Traversal settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Use precomputed `PROXY_TRACKS` edges instead of the event detour.
    pub use_proxy_tracks: bool,
    /// Maximum number of partial paths evaluated per pair (unbounded if unset).
    pub step_budget: Option<usize>,
}

/// Constants of the score combination formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Lowest distance contribution (at zero distance).
    pub distance_floor: f64,
    /// Weight of the distance curve on top of the floor.
    pub distance_weight: f64,
    /// Exponent damping proxy-only evidence.
    pub proxy_exponent: f64,
    /// Exponent applied to the direct product for artists.
    pub artist_exponent: f64,
    /// Lowest popularity norm.
    pub popularity_base: f64,
    /// Range of the popularity norm above the base.
    pub popularity_span: f64,
    /// Distance curve in metres.
    pub distance: ParetoThresholds,
    /// Popularity curve of venues, in trackers.
    pub venue_popularity: ParetoThresholds,
    /// Popularity curve of artists, in trackers.
    pub artist_popularity: ParetoThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            distance_floor: 0.85,
            distance_weight: 0.15,
            proxy_exponent: 0.1,
            artist_exponent: 2.0,
            popularity_base: 0.99999,
            popularity_span: 0.00001,
            distance: ParetoThresholds::new(50_000.0, 200_000.0),
            venue_popularity: ParetoThresholds::new(2500.0, 25_000.0),
            artist_popularity: ParetoThresholds::new(5000.0, 50_000.0),
        }
    }
}

/// Logging settings used by [`crate::logging::init_tracing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Include the event target (module path) in output.
    pub with_target: bool,
    /// Emit ANSI colours.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: true,
            ansi: true,
        }
    }
}

impl AffinityConfig {
    /// Loads defaults, then `path` if given, then the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a provider fails and
    /// `ConfigError::InvalidValue` if validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(&figment)
    }

    /// Loads defaults overlaid with the environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Parses a TOML string over the defaults.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let figment =
            Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(toml_str));
        Self::extract(&figment)
    }

    fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.traversal.step_budget == Some(0) {
            return Err(invalid("traversal.step_budget", "must be at least 1"));
        }
        self.scoring.validate()
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

impl ScoringConfig {
    /// Checks every constant is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit("scoring.distance_floor", self.distance_floor)?;
        unit("scoring.distance_weight", self.distance_weight)?;
        if self.distance_floor + self.distance_weight > 1.0 + f64::EPSILON {
            return Err(invalid(
                "scoring.distance_weight",
                "distance_floor + distance_weight must not exceed 1",
            ));
        }
        positive("scoring.proxy_exponent", self.proxy_exponent)?;
        positive("scoring.artist_exponent", self.artist_exponent)?;
        unit("scoring.popularity_base", self.popularity_base)?;
        unit("scoring.popularity_span", self.popularity_span)?;
        if self.popularity_base + self.popularity_span > 1.0 + f64::EPSILON {
            return Err(invalid(
                "scoring.popularity_span",
                "popularity_base + popularity_span must not exceed 1",
            ));
        }
        thresholds("scoring.distance", &self.distance)?;
        thresholds("scoring.venue_popularity", &self.venue_popularity)?;
        thresholds("scoring.artist_popularity", &self.artist_popularity)
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn unit(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(key, "must be within [0, 1]"))
    }
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(key, "must be a positive number"))
    }
}

fn thresholds(key: &str, curve: &ParetoThresholds) -> Result<(), ConfigError> {
    positive(&format!("{key}.eighty_percent"), curve.eighty_percent)?;
    positive(&format!("{key}.maximum"), curve.maximum)
}
