//! Error types for canonical type construction.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for core type construction.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing canonical values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A sector path must have at least one level.
    #[error("Sector path must have at least one level")]
    EmptySectorPath,

    /// A quantile outside the open interval (0, 100).
    #[error("Quantile {value} is outside (0, 100)")]
    InvalidQuantile {
        /// The rejected quantile.
        value: f64,
    },

    /// A portfolio-level risk component below zero.
    #[error("Portfolio {measure} {component} must be non-negative, found {value}")]
    NegativePortfolioRisk {
        /// `volatility` or `variance`.
        measure: &'static str,
        /// The offending component.
        component: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A sector factor exposure grouped under a path other than its own.
    #[error("Sector factor exposure for {found} is grouped under {key}")]
    MisfiledSectorFactor {
        /// The grouping key.
        key: String,
        /// The exposure's own sector path.
        found: String,
    },

    /// A backtest breach dated on a day with no daily result.
    #[error("Breach on {date} has no matching daily result")]
    UnmatchedBreach {
        /// The breach date.
        date: NaiveDate,
    },
}
