//! Facade error type.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Any error raised while fetching, decoding or analysing records.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw record did not match any known layout.
    #[error(transparent)]
    Parse(#[from] riskdeck_schema::SchemaParseError),

    /// A record could not be fetched or decoded.
    #[error(transparent)]
    Fetch(#[from] riskdeck_schema::FetchError),

    /// The decomposition pivots disagree.
    #[error(transparent)]
    Portfolio(#[from] riskdeck_portfolio::PortfolioError),

    /// The backtest could not be run.
    #[error(transparent)]
    Risk(#[from] riskdeck_risk::RiskError),

    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] riskdeck_config::ConfigError),
}
