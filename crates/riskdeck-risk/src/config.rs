//! Configuration for VaR backtesting.

use serde::{Deserialize, Serialize};

/// Default rolling window, in observations.
pub const DEFAULT_WINDOW: usize = 365;

/// Configuration for a backtest analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Trailing window for rolling breach counts, and the number of trials
    /// of the traffic-light binomial test.
    pub window: usize,

    /// Tail probability below which a breach count leaves the green zone.
    pub green_amber_cutoff: f64,

    /// Tail probability below which a breach count enters the red zone.
    pub amber_red_cutoff: f64,

    /// Quantiles to monitor. Empty means every quantile in the results.
    pub quantiles: Vec<f64>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            green_amber_cutoff: 0.05,
            amber_red_cutoff: 0.0001,
            quantiles: Vec::new(),
        }
    }
}

impl BacktestConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rolling window.
    #[must_use]
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets both traffic-light cutoffs.
    #[must_use]
    pub fn with_cutoffs(mut self, green_amber: f64, amber_red: f64) -> Self {
        self.green_amber_cutoff = green_amber;
        self.amber_red_cutoff = amber_red;
        self
    }

    /// Sets the quantiles to monitor.
    #[must_use]
    pub fn with_quantiles(mut self, quantiles: impl Into<Vec<f64>>) -> Self {
        self.quantiles = quantiles.into();
        self
    }
}
