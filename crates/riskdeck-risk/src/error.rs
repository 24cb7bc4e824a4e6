//! Error types for VaR backtesting.

use thiserror::Error;

/// Result type for backtest operations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during backtest analysis.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RiskError {
    /// A requested quantile does not occur in the VaR results.
    #[error("unknown quantile {requested}; available: {available:?}")]
    UnknownQuantile {
        /// The requested quantile.
        requested: f64,
        /// Quantiles present in the results, ascending.
        available: Vec<f64>,
    },

    /// A quantile present in the results but left out of the monitored set.
    #[error("quantile {requested} is not monitored; monitored: {monitored:?}")]
    NotMonitored {
        /// The requested quantile.
        requested: f64,
        /// Quantiles the analysis backtests, in monitoring order.
        monitored: Vec<f64>,
    },

    /// Invalid input parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RiskError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RiskError::UnknownQuantile {
            requested: 97.5,
            available: vec![95.0, 99.0],
        };
        assert_eq!(err.to_string(), "unknown quantile 97.5; available: [95.0, 99.0]");

        let err = RiskError::NotMonitored {
            requested: 1.0,
            monitored: vec![99.0],
        };
        assert_eq!(err.to_string(), "quantile 1 is not monitored; monitored: [99.0]");

        let err = RiskError::invalid_input("window must be positive");
        assert!(err.to_string().contains("window must be positive"));
    }
}
