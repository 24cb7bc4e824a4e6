//! Per-quantile backtest series.

use super::series::{is_breach, rolling_count, TailDirection};
use crate::traffic_light::{TrafficLight, TrafficLightThresholds};
use chrono::NaiveDate;
use riskdeck_core::VaRAnalysisResult;
use serde::{Deserialize, Serialize};

/// Backtest of one quantile, aligned with the analysis run dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileBacktest {
    /// Monitored quantile.
    pub quantile: f64,

    /// Tail the quantile monitors.
    pub direction: TailDirection,

    /// Absolute VaR per day; `None` where the day has no forecast for the quantile.
    pub var_absolute: Vec<Option<f64>>,

    /// Relative VaR per day.
    pub var_relative: Vec<Option<f64>>,

    /// Breach flag per day.
    pub breaches: Vec<bool>,

    /// Trailing-window breach counts; `None` until the window is full.
    pub rolling_breaches: Vec<Option<u32>>,

    /// Traffic-light thresholds for the window.
    pub thresholds: TrafficLightThresholds,

    /// Zone of each rolling count.
    pub zones: Vec<Option<TrafficLight>>,
}

impl QuantileBacktest {
    pub(crate) fn build(
        quantile: f64,
        results: &[VaRAnalysisResult],
        pnl_absolute: &[Option<f64>],
        window: usize,
        thresholds: TrafficLightThresholds,
    ) -> Self {
        let direction = TailDirection::of(quantile);
        let (var_absolute, var_relative): (Vec<_>, Vec<_>) = results
            .iter()
            .map(|r| {
                r.quantile(quantile)
                    .map_or((None, None), |q| (Some(q.var_absolute), Some(q.var_relative)))
            })
            .unzip();

        let breaches: Vec<bool> = var_absolute
            .iter()
            .zip(pnl_absolute)
            .map(|(var, pnl)| match (var, pnl) {
                (Some(var), Some(pnl)) => is_breach(direction, *var, *pnl),
                _ => false,
            })
            .collect();
        let rolling_breaches = rolling_count(&breaches, window);
        let zones = rolling_breaches
            .iter()
            .map(|count| count.map(|c| thresholds.classify(u64::from(c))))
            .collect();

        Self {
            quantile,
            direction,
            var_absolute,
            var_relative,
            breaches,
            rolling_breaches,
            thresholds,
            zones,
        }
    }

    /// Number of breach days over the whole series.
    #[must_use]
    pub fn breach_count(&self) -> usize {
        self.breaches.iter().filter(|b| **b).count()
    }

    /// Indices of breach days.
    pub fn breach_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.breaches
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.then_some(i))
    }

    /// Zone of the latest full window, if any.
    #[must_use]
    pub fn current_zone(&self) -> Option<TrafficLight> {
        self.zones.last().copied().flatten()
    }

    pub(crate) fn breach_dates<'a>(
        &'a self,
        run_dates: &'a [NaiveDate],
    ) -> impl Iterator<Item = NaiveDate> + 'a {
        self.breach_indices().map(move |i| run_dates[i])
    }
}
