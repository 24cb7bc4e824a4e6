//! Value-at-Risk forecasts and backtest results.

use super::AssetId;
use crate::error::{CoreError, CoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const QUANTILE_TOLERANCE: f64 = 1e-9;

/// Returns true if two quantile values denote the same confidence level.
#[must_use]
pub fn quantiles_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= QUANTILE_TOLERANCE
}

/// One VaR forecast for one confidence level on one day.
///
/// Deserialization applies the same range check as [`VaRQuantile::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVaRQuantile")]
pub struct VaRQuantile {
    /// Confidence level in (0, 100), e.g. 99 for the 99th percentile.
    pub quantile: f64,

    /// Forecast loss in base currency.
    pub var_absolute: f64,

    /// Forecast loss relative to portfolio value.
    pub var_relative: f64,
}

impl VaRQuantile {
    /// Creates a forecast point.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQuantile`] unless `0 < quantile < 100`.
    pub fn new(quantile: f64, var_absolute: f64, var_relative: f64) -> CoreResult<Self> {
        if !(quantile > 0.0 && quantile < 100.0) {
            return Err(CoreError::InvalidQuantile { value: quantile });
        }
        Ok(Self {
            quantile,
            var_absolute,
            var_relative,
        })
    }

    /// Returns true for the gain tail (quantile below 50).
    ///
    /// Lower-tail forecasts bound gains and are breached by larger gains;
    /// quantiles of 50 and above form the loss tail.
    #[must_use]
    pub fn is_lower_tail(&self) -> bool {
        self.quantile < 50.0
    }
}

#[derive(Deserialize)]
struct RawVaRQuantile {
    quantile: f64,
    var_absolute: f64,
    var_relative: f64,
}

impl TryFrom<RawVaRQuantile> for VaRQuantile {
    type Error = CoreError;

    fn try_from(raw: RawVaRQuantile) -> CoreResult<Self> {
        Self::new(raw.quantile, raw.var_absolute, raw.var_relative)
    }
}

/// VaR model output for one run date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaRAnalysisResult {
    /// Date as-of which VaR was computed.
    pub run_date: NaiveDate,

    /// Previous close portfolio value.
    pub baseline: f64,

    /// Forecasts for every requested quantile.
    pub quantiles: Vec<VaRQuantile>,

    /// Assets left out of the calculation (e.g. missing data).
    pub excluded_assets: Vec<AssetId>,

    /// Model warnings.
    pub warnings: Vec<String>,
}

impl VaRAnalysisResult {
    /// Creates a result with no exclusions or warnings.
    #[must_use]
    pub fn new(run_date: NaiveDate, baseline: f64, quantiles: Vec<VaRQuantile>) -> Self {
        Self {
            run_date,
            baseline,
            quantiles,
            excluded_assets: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Looks up the forecast for a quantile.
    #[must_use]
    pub fn quantile(&self, quantile: f64) -> Option<&VaRQuantile> {
        self.quantiles
            .iter()
            .find(|q| quantiles_match(q.quantile, quantile))
    }
}

/// A day on which realized loss exceeded the prior day's forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaRBreach {
    /// Breach date.
    pub breach_date: NaiveDate,

    /// Realized loss in base currency.
    pub portfolio_loss_absolute: f64,

    /// Realized loss relative to portfolio value.
    pub portfolio_loss_relative: f64,

    /// Quantiles whose forecast was breached.
    pub quantiles: Vec<VaRQuantile>,
}

/// Output of a VaR backtest: one result per trading day plus breaches.
///
/// Deserialization goes through [`VaRBacktestResult::new`], so decoded
/// values are sorted and every breach matches a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVaRBacktestResult")]
pub struct VaRBacktestResult {
    results: Vec<VaRAnalysisResult>,
    breaches: Vec<VaRBreach>,
    warnings: Vec<String>,
}

#[derive(Deserialize)]
struct RawVaRBacktestResult {
    results: Vec<VaRAnalysisResult>,
    #[serde(default)]
    breaches: Vec<VaRBreach>,
    #[serde(default)]
    warnings: Vec<String>,
}

impl TryFrom<RawVaRBacktestResult> for VaRBacktestResult {
    type Error = CoreError;

    fn try_from(raw: RawVaRBacktestResult) -> CoreResult<Self> {
        Self::new(raw.results, raw.breaches, raw.warnings)
    }
}

impl VaRBacktestResult {
    /// Creates a backtest result.
    ///
    /// `results` are put into run-date order (stable for equal dates).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnmatchedBreach`] if a breach date has no
    /// corresponding entry in `results`.
    pub fn new(
        mut results: Vec<VaRAnalysisResult>,
        breaches: Vec<VaRBreach>,
        warnings: Vec<String>,
    ) -> CoreResult<Self> {
        results.sort_by_key(|r| r.run_date);
        let dates: BTreeSet<NaiveDate> = results.iter().map(|r| r.run_date).collect();
        if let Some(orphan) = breaches.iter().find(|b| !dates.contains(&b.breach_date)) {
            return Err(CoreError::UnmatchedBreach {
                date: orphan.breach_date,
            });
        }
        Ok(Self {
            results,
            breaches,
            warnings,
        })
    }

    /// Daily results in run-date order.
    #[must_use]
    pub fn results(&self) -> &[VaRAnalysisResult] {
        &self.results
    }

    /// Upstream-reported breaches.
    #[must_use]
    pub fn breaches(&self) -> &[VaRBreach] {
        &self.breaches
    }

    /// Backtest-level warnings.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Returns true if there are no daily results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Result for a run date, if any.
    #[must_use]
    pub fn result_on(&self, date: NaiveDate) -> Option<&VaRAnalysisResult> {
        self.results
            .binary_search_by_key(&date, |r| r.run_date)
            .ok()
            .map(|i| &self.results[i])
    }

    /// Distinct quantiles present anywhere in the daily results, ascending.
    #[must_use]
    pub fn available_quantiles(&self) -> Vec<f64> {
        let mut found: Vec<f64> = Vec::new();
        for q in self.results.iter().flat_map(|r| r.quantiles.iter()) {
            if !found.iter().any(|f| quantiles_match(*f, q.quantile)) {
                found.push(q.quantile);
            }
        }
        found.sort_by(f64::total_cmp);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, baseline: f64) -> VaRAnalysisResult {
        VaRAnalysisResult::new(
            NaiveDate::from_ymd_opt(2022, 3, d).unwrap(),
            baseline,
            vec![
                VaRQuantile::new(99.0, 150.0, 0.015).unwrap(),
                VaRQuantile::new(1.0, -140.0, -0.014).unwrap(),
            ],
        )
    }

    #[test]
    fn test_quantile_range() {
        assert!(VaRQuantile::new(0.0, 1.0, 0.1).is_err());
        assert!(VaRQuantile::new(100.0, 1.0, 0.1).is_err());
        assert!(VaRQuantile::new(97.5, 1.0, 0.1).is_ok());
        assert!(VaRQuantile::new(f64::NAN, 1.0, 0.1).is_err());
    }

    #[test]
    fn test_quantile_lookup() {
        let result = day(1, 1000.0);
        assert_eq!(result.quantile(99.0).unwrap().var_absolute, 150.0);
        assert!(result.quantile(95.0).is_none());
        assert!(result.quantile(1.0).unwrap().is_lower_tail());
    }

    #[test]
    fn test_results_sorted_and_available_quantiles() {
        let backtest =
            VaRBacktestResult::new(vec![day(3, 1.0), day(1, 1.0), day(2, 1.0)], vec![], vec![])
                .unwrap();
        let dates: Vec<u32> = backtest
            .results()
            .iter()
            .map(|r| chrono::Datelike::day(&r.run_date))
            .collect();
        assert_eq!(dates, vec![1, 2, 3]);
        assert_eq!(backtest.available_quantiles(), vec![1.0, 99.0]);
        assert!(backtest
            .result_on(NaiveDate::from_ymd_opt(2022, 3, 2).unwrap())
            .is_some());
    }

    #[test]
    fn test_breach_must_match_a_result() {
        let breach = VaRBreach {
            breach_date: NaiveDate::from_ymd_opt(2022, 3, 9).unwrap(),
            portfolio_loss_absolute: -200.0,
            portfolio_loss_relative: -0.02,
            quantiles: vec![],
        };
        let err = VaRBacktestResult::new(vec![day(1, 1.0)], vec![breach], vec![]).unwrap_err();
        assert!(matches!(err, CoreError::UnmatchedBreach { .. }));
    }

    #[test]
    fn test_deserialize_sorts_results() {
        let backtest = VaRBacktestResult::new(vec![day(1, 1.0), day(2, 1.0)], vec![], vec![])
            .unwrap();
        let mut value = serde_json::to_value(&backtest).unwrap();
        value["results"].as_array_mut().unwrap().reverse();

        let decoded: VaRBacktestResult = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, backtest);
    }

    #[test]
    fn test_deserialize_rejects_orphan_breach() {
        let value = serde_json::json!({
            "results": [serde_json::to_value(day(2, 1.0)).unwrap()],
            "breaches": [{
                "breach_date": "2030-01-01",
                "portfolio_loss_absolute": -200.0,
                "portfolio_loss_relative": -0.02,
                "quantiles": []
            }],
            "warnings": []
        });
        let err = serde_json::from_value::<VaRBacktestResult>(value).unwrap_err();
        assert!(err.to_string().contains("2030-01-01"));
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_quantile() {
        let value = serde_json::json!({"quantile": 150.0, "var_absolute": 1.0, "var_relative": 0.1});
        assert!(serde_json::from_value::<VaRQuantile>(value).is_err());

        let mut result = serde_json::to_value(day(1, 1.0)).unwrap();
        result["quantiles"][0]["quantile"] = serde_json::json!(0.0);
        assert!(serde_json::from_value::<VaRAnalysisResult>(result).is_err());

        let ok = serde_json::json!({"quantile": 97.5, "var_absolute": 1.0, "var_relative": 0.1});
        let q: VaRQuantile = serde_json::from_value(ok).unwrap();
        assert_eq!(q.quantile, 97.5);
    }

    #[test]
    fn test_empty_backtest() {
        let backtest = VaRBacktestResult::new(vec![], vec![], vec![]).unwrap();
        assert!(backtest.is_empty());
        assert!(backtest.available_quantiles().is_empty());
    }
}
