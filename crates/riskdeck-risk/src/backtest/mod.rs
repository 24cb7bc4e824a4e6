//! VaR backtest analysis.
//!
//! Derives daily P&L from the baseline series of a
//! [`VaRBacktestResult`], tests each monitored quantile's forecast against
//! it, counts breaches over a trailing window and grades the counts with the
//! traffic-light test.
//!
//! A forecast made on run date `t` is tested against `pnl[t] =
//! baseline[t + 1] - baseline[t]`, so the breach is reported on `t`.

mod quantile;
mod reconcile;
mod series;

pub use quantile::QuantileBacktest;
pub use reconcile::BreachReconciliation;
pub use series::{is_breach, pnl_absolute, pnl_relative, rolling_count, TailDirection};

use crate::config::BacktestConfig;
use crate::error::{RiskError, RiskResult};
use crate::tables;
use crate::traffic_light::TrafficLightThresholds;
use chrono::NaiveDate;
use riskdeck_core::{quantiles_match, Table, VaRBacktestResult, VaRBreach};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Backtest series for a set of quantiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaRBacktestAnalysis {
    window: usize,
    run_dates: Vec<NaiveDate>,
    baselines: Vec<f64>,
    pnl_absolute: Vec<Option<f64>>,
    pnl_relative: Vec<Option<f64>>,
    available: Vec<f64>,
    quantiles: Vec<QuantileBacktest>,
}

impl VaRBacktestAnalysis {
    /// Runs the backtest.
    ///
    /// Monitors `config.quantiles`, or every quantile in the results when
    /// that list is empty. Empty results give empty series.
    ///
    /// # Errors
    ///
    /// - [`RiskError::UnknownQuantile`] if a configured quantile occurs in
    ///   none of the results
    /// - [`RiskError::InvalidInput`] if the window or cutoffs are unusable
    pub fn new(result: &VaRBacktestResult, config: &BacktestConfig) -> RiskResult<Self> {
        if config.window == 0 {
            return Err(RiskError::invalid_input("backtest window must be positive"));
        }

        let available = result.available_quantiles();
        let monitored = monitored_quantiles(result, config, &available)?;

        let results = result.results();
        let run_dates: Vec<NaiveDate> = results.iter().map(|r| r.run_date).collect();
        let baselines: Vec<f64> = results.iter().map(|r| r.baseline).collect();
        let pnl_abs = pnl_absolute(&baselines);
        let pnl_rel = pnl_relative(&baselines, &pnl_abs);

        let quantiles = monitored
            .into_iter()
            .map(|q| {
                let thresholds = TrafficLightThresholds::for_quantile(q, config)?;
                Ok(QuantileBacktest::build(
                    q,
                    results,
                    &pnl_abs,
                    config.window,
                    thresholds,
                ))
            })
            .collect::<RiskResult<Vec<_>>>()?;

        debug!(
            days = run_dates.len(),
            quantiles = quantiles.len(),
            window = config.window,
            "built backtest series"
        );

        Ok(Self {
            window: config.window,
            run_dates,
            baselines,
            pnl_absolute: pnl_abs,
            pnl_relative: pnl_rel,
            available,
            quantiles,
        })
    }

    /// Rolling window length.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Run dates, ascending.
    #[must_use]
    pub fn run_dates(&self) -> &[NaiveDate] {
        &self.run_dates
    }

    /// Portfolio baseline per run date.
    #[must_use]
    pub fn baselines(&self) -> &[f64] {
        &self.baselines
    }

    /// Absolute P&L per run date; the last day is `None`.
    #[must_use]
    pub fn pnl_absolute(&self) -> &[Option<f64>] {
        &self.pnl_absolute
    }

    /// Relative P&L per run date.
    #[must_use]
    pub fn pnl_relative(&self) -> &[Option<f64>] {
        &self.pnl_relative
    }

    /// Number of run dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.run_dates.len()
    }

    /// Returns true if there are no run dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.run_dates.is_empty()
    }

    /// Quantiles present anywhere in the results, ascending.
    #[must_use]
    pub fn available_quantiles(&self) -> &[f64] {
        &self.available
    }

    /// Backtests of every monitored quantile.
    #[must_use]
    pub fn quantiles(&self) -> &[QuantileBacktest] {
        &self.quantiles
    }

    /// Backtest of one monitored quantile.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::NotMonitored`] if `quantile` occurs in the
    /// results but is not monitored, and [`RiskError::UnknownQuantile`] if
    /// it does not occur at all.
    pub fn quantile(&self, quantile: f64) -> RiskResult<&QuantileBacktest> {
        if let Some(backtest) = self
            .quantiles
            .iter()
            .find(|q| quantiles_match(q.quantile, quantile))
        {
            return Ok(backtest);
        }
        if self.available.iter().any(|a| quantiles_match(*a, quantile)) {
            Err(RiskError::NotMonitored {
                requested: quantile,
                monitored: self.quantiles.iter().map(|q| q.quantile).collect(),
            })
        } else {
            Err(RiskError::UnknownQuantile {
                requested: quantile,
                available: self.available.clone(),
            })
        }
    }

    /// Run dates on which `quantile` was breached.
    ///
    /// # Errors
    ///
    /// Fails like [`VaRBacktestAnalysis::quantile`].
    pub fn breach_dates(&self, quantile: f64) -> RiskResult<Vec<NaiveDate>> {
        Ok(self
            .quantile(quantile)?
            .breach_dates(&self.run_dates)
            .collect())
    }

    /// One row per breach day of `quantile`.
    ///
    /// # Errors
    ///
    /// Fails like [`VaRBacktestAnalysis::quantile`].
    pub fn breaches_summary(&self, quantile: f64) -> RiskResult<Table> {
        tables::breaches_summary(self, quantile)
    }

    /// Full daily backtest table.
    #[must_use]
    pub fn backtest_table(&self) -> Table {
        tables::backtest_table(self)
    }

    /// Compares the derived breach days with `reported` breaches, per
    /// monitored quantile.
    #[must_use]
    pub fn reconcile_breaches(&self, reported: &[VaRBreach]) -> Vec<BreachReconciliation> {
        self.quantiles
            .iter()
            .map(|q| {
                let derived: BTreeSet<NaiveDate> = q.breach_dates(&self.run_dates).collect();
                let flagged: BTreeSet<NaiveDate> = reported
                    .iter()
                    .filter(|b| {
                        b.quantiles
                            .iter()
                            .any(|bq| quantiles_match(bq.quantile, q.quantile))
                    })
                    .map(|b| b.breach_date)
                    .collect();
                BreachReconciliation {
                    quantile: q.quantile,
                    derived_only: derived.difference(&flagged).copied().collect(),
                    reported_only: flagged.difference(&derived).copied().collect(),
                }
            })
            .collect()
    }
}

fn monitored_quantiles(
    result: &VaRBacktestResult,
    config: &BacktestConfig,
    available: &[f64],
) -> RiskResult<Vec<f64>> {
    if config.quantiles.is_empty() {
        return Ok(available.to_vec());
    }

    let mut monitored: Vec<f64> = Vec::with_capacity(config.quantiles.len());
    for &q in &config.quantiles {
        if !result.is_empty() && !available.iter().any(|a| quantiles_match(*a, q)) {
            return Err(RiskError::UnknownQuantile {
                requested: q,
                available: available.to_vec(),
            });
        }
        if !monitored.iter().any(|m| quantiles_match(*m, q)) {
            monitored.push(q);
        }
    }
    Ok(monitored)
}
