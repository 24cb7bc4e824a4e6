//! # Riskdeck Risk
//!
//! VaR backtesting over daily forecast histories.
//!
//! Given a decoded [`VaRBacktestResult`](riskdeck_core::VaRBacktestResult),
//! this crate derives the realized P&L from the baseline series, flags the
//! days on which each quantile's forecast was breached, counts breaches over
//! a trailing window and grades the counts with a binomial traffic-light
//! test.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use riskdeck_risk::prelude::*;
//!
//! let config = BacktestConfig::new().with_quantiles([99.0]);
//! let analysis = VaRBacktestAnalysis::new(&backtest, &config)?;
//! let q99 = analysis.quantile(99.0)?;
//! println!("{} breaches, zone {:?}", q99.breach_count(), q99.current_zone());
//! let summary = analysis.breaches_summary(99.0)?;
//! ```
//!
//! ## Conventions
//!
//! - Quantiles of 50 and above monitor losses; below 50, gains.
//! - The forecast of run date `t` is tested against
//!   `baseline[t + 1] - baseline[t]`, and the breach is reported on `t`.
//! - Days with no P&L or no forecast for a quantile are never breaches.
//!
//! ## Module Overview
//!
//! - [`backtest`] - The analysis and its series
//! - [`traffic_light`] - Binomial thresholds and zones
//! - [`tables`] - Flat table projections
//! - [`config`] - Window and cutoffs

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod backtest;
pub mod config;
pub mod error;
pub mod tables;
pub mod traffic_light;

pub use backtest::{BreachReconciliation, QuantileBacktest, TailDirection, VaRBacktestAnalysis};
pub use config::{BacktestConfig, DEFAULT_WINDOW};
pub use error::{RiskError, RiskResult};
pub use tables::{backtest_table, breaches_summary};
pub use traffic_light::{tail_probability, TrafficLight, TrafficLightThresholds};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::backtest::{
        BreachReconciliation, QuantileBacktest, TailDirection, VaRBacktestAnalysis,
    };
    pub use crate::config::BacktestConfig;
    pub use crate::error::{RiskError, RiskResult};
    pub use crate::tables::{backtest_table, breaches_summary};
    pub use crate::traffic_light::{TrafficLight, TrafficLightThresholds};
}
