//! Table projections of a [`VaRBacktestAnalysis`].

use crate::backtest::VaRBacktestAnalysis;
use crate::error::RiskResult;
use riskdeck_core::{Cell, Table};

/// One row per breach day of `quantile`.
///
/// Columns: `Run Date`, `Baseline ($)`, `{q}% VaR ($)`, `{q}% VaR (Relative)`,
/// `P&L`, `Breach`.
///
/// # Errors
///
/// Returns [`RiskError::NotMonitored`](crate::RiskError::NotMonitored) for a
/// quantile left out of the monitored set and
/// [`RiskError::UnknownQuantile`](crate::RiskError::UnknownQuantile) for one
/// absent from the results.
pub fn breaches_summary(analysis: &VaRBacktestAnalysis, quantile: f64) -> RiskResult<Table> {
    let backtest = analysis.quantile(quantile)?;
    let q = backtest.quantile;
    let mut table = Table::new(
        [
            "Run Date".to_string(),
            "Baseline ($)".to_string(),
            format!("{q}% VaR ($)"),
            format!("{q}% VaR (Relative)"),
            "P&L".to_string(),
            "Breach".to_string(),
        ],
        1,
    );
    for t in backtest.breach_indices() {
        table.push_row(vec![
            analysis.run_dates()[t].into(),
            analysis.baselines()[t].into(),
            backtest.var_absolute[t].into(),
            backtest.var_relative[t].into(),
            analysis.pnl_absolute()[t].into(),
            true.into(),
        ]);
    }
    Ok(table)
}

/// Every run date with P&L and, per monitored quantile, VaR, breach flag,
/// rolling count and zone.
///
/// Quantile columns are prefixed `q{quantile}`, e.g. `q99VarAbsolute`,
/// `q99Breach`, `q99RollingBreaches`, `q99Zone`.
#[must_use]
pub fn backtest_table(analysis: &VaRBacktestAnalysis) -> Table {
    let mut columns: Vec<String> = ["runDate", "baseline", "pnlAbsolute", "pnlRelative"]
        .map(String::from)
        .into();
    for backtest in analysis.quantiles() {
        let q = backtest.quantile;
        columns.extend([
            format!("q{q}VarAbsolute"),
            format!("q{q}VarRelative"),
            format!("q{q}Breach"),
            format!("q{q}RollingBreaches"),
            format!("q{q}Zone"),
        ]);
    }

    let mut table = Table::new(columns, 1);
    for t in 0..analysis.len() {
        let mut row: Vec<Cell> = vec![
            analysis.run_dates()[t].into(),
            analysis.baselines()[t].into(),
            analysis.pnl_absolute()[t].into(),
            analysis.pnl_relative()[t].into(),
        ];
        for backtest in analysis.quantiles() {
            row.extend([
                Cell::from(backtest.var_absolute[t]),
                backtest.var_relative[t].into(),
                backtest.breaches[t].into(),
                backtest.rolling_breaches[t].map(f64::from).into(),
                backtest.zones[t].map_or(Cell::Missing, |z| z.to_string().into()),
            ]);
        }
        table.push_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BacktestConfig;
    use chrono::NaiveDate;
    use riskdeck_core::{VaRAnalysisResult, VaRBacktestResult, VaRQuantile};

    fn analysis() -> VaRBacktestAnalysis {
        let start = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        let results = [1000.0, 900.0, 950.0]
            .iter()
            .enumerate()
            .map(|(i, &b)| {
                VaRAnalysisResult::new(
                    start + chrono::Days::new(i as u64),
                    b,
                    vec![VaRQuantile::new(99.0, 50.0, 0.05).unwrap()],
                )
            })
            .collect();
        let result = VaRBacktestResult::new(results, Vec::new(), Vec::new()).unwrap();
        VaRBacktestAnalysis::new(&result, &BacktestConfig::new().with_window(2)).unwrap()
    }

    #[test]
    fn test_breaches_summary_columns() {
        let table = breaches_summary(&analysis(), 99.0).unwrap();
        assert_eq!(
            table.columns(),
            &[
                "Run Date",
                "Baseline ($)",
                "99% VaR ($)",
                "99% VaR (Relative)",
                "P&L",
                "Breach"
            ]
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "P&L").unwrap().as_f64(), Some(-100.0));
        assert_eq!(table.get(0, "Breach").unwrap().as_flag(), Some(true));
        assert!(breaches_summary(&analysis(), 95.0).is_err());
    }

    #[test]
    fn test_backtest_table() {
        let table = backtest_table(&analysis());
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns().len(), 9);
        assert!(table.get(0, "q99RollingBreaches").unwrap().is_missing());
        assert_eq!(table.get(1, "q99RollingBreaches").unwrap().as_f64(), Some(1.0));
        assert!(table.get(2, "pnlAbsolute").unwrap().is_missing());
        // one breach in a two-day window at p = 0.01 is already amber
        assert_eq!(table.get(2, "q99Zone").unwrap().as_str(), Some("amber"));
    }
}
