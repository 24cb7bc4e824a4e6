//! Engine-wide configuration.

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use riskdeck_portfolio::AggregationConfig;
use riskdeck_risk::BacktestConfig;
use riskdeck_schema::DecodeOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Settings for every stage of the engine.
///
/// Every section and field has a default, so partial documents are valid:
///
/// ```toml
/// [backtest]
/// window = 250
/// quantiles = [95.0, 99.0]
///
/// [aggregation]
/// sector_factor_policy = "prefer_richer"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Record decoding.
    pub decode: DecodeOptions,

    /// Risk decomposition.
    pub aggregation: AggregationConfig,

    /// VaR backtesting.
    pub backtest: BacktestConfig,
}

impl EngineConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the decode options.
    #[must_use]
    pub fn with_decode(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    /// Sets the aggregation config.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: AggregationConfig) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Sets the backtest config.
    #[must_use]
    pub fn with_backtest(mut self, backtest: BacktestConfig) -> Self {
        self.backtest = backtest;
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a deserialization or validation error.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns a deserialization or validation error.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read,
    /// [`ConfigError::UnsupportedFormat`] for other extensions, or a
    /// deserialization or validation error.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> ConfigResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&text)?;
        debug!(path = %path.display(), "loaded engine configuration");
        Ok(config)
    }

    /// Serializes to a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Deserialization`] if a value has no TOML form.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Deserialization(e.to_string()))
    }
}

fn is_open_unit(value: f64) -> bool {
    value > 0.0 && value < 1.0
}

fn is_percentile(value: f64) -> bool {
    value > 0.0 && value < 100.0
}

impl Validate for BacktestConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.window == 0 {
            errors.push(ValidationError::with_rule(
                "window",
                "Window must be at least one observation",
                "positive_window",
            ));
        }

        for (field, value) in [
            ("green_amber_cutoff", self.green_amber_cutoff),
            ("amber_red_cutoff", self.amber_red_cutoff),
        ] {
            if !is_open_unit(value) {
                errors.push(ValidationError::with_rule(
                    field,
                    format!("Cutoff {value} must be between 0 and 1"),
                    "valid_probability",
                ));
            }
        }

        if self.amber_red_cutoff >= self.green_amber_cutoff {
            errors.push(ValidationError::with_rule(
                "amber_red_cutoff",
                "Amber/red cutoff must be below the green/amber cutoff",
                "ordered_cutoffs",
            ));
        }

        for q in self.quantiles.iter().filter(|q| !is_percentile(**q)) {
            errors.push(ValidationError::with_rule(
                "quantiles",
                format!("Quantile {q} must be between 0 and 100"),
                "valid_quantile",
            ));
        }

        errors
    }
}

impl Validate for DecodeOptions {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !is_percentile(self.legacy_breach_quantile) {
            errors.push(ValidationError::with_rule(
                "legacy_breach_quantile",
                format!(
                    "Quantile {} must be between 0 and 100",
                    self.legacy_breach_quantile
                ),
                "valid_quantile",
            ));
        }

        errors
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let decode = self.decode.validate().into_iter().map(|e| e.in_section("decode"));
        let backtest = self
            .backtest
            .validate()
            .into_iter()
            .map(|e| e.in_section("backtest"));
        decode.chain(backtest).collect()
    }
}
