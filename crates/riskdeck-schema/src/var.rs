//! VaR result decoding.
//!
//! Breach records come in two generations: newer ones list every breached
//! quantile, legacy ones carry a single `varLevelAbsolute`/`varLevelRelative`
//! pair whose quantile is implied by [`DecodeOptions::legacy_breach_quantile`].

use crate::error::SchemaResult;
use crate::options::DecodeOptions;
use crate::record::{parse_asset_id, Record};
use riskdeck_core::{CoreError, VaRAnalysisResult, VaRBacktestResult, VaRBreach, VaRQuantile};
use serde_json::Value;
use tracing::debug;

fn decode_quantile(record: &Record<'_>) -> SchemaResult<VaRQuantile> {
    let quantile = record.f64("quantile")?;
    VaRQuantile::new(
        quantile,
        record.f64("varAbsolute")?,
        record.f64("varRelative")?,
    )
    .map_err(|e| record.error("quantile", e.to_string()))
}

fn decode_quantiles(record: &Record<'_>) -> SchemaResult<Vec<VaRQuantile>> {
    record.list("quantiles")?.iter().map(decode_quantile).collect()
}

/// Decodes one day of VaR model output.
///
/// # Errors
///
/// Returns [`SchemaParseError`](crate::SchemaParseError) if `runDate`,
/// `baseline` or `quantiles` is missing or malformed.
pub fn decode_var_analysis(raw: &Value) -> SchemaResult<VaRAnalysisResult> {
    analysis(&Record::root(raw))
}

fn analysis(record: &Record<'_>) -> SchemaResult<VaRAnalysisResult> {
    let mut result = VaRAnalysisResult::new(
        record.date("runDate")?,
        record.f64("baseline")?,
        decode_quantiles(record)?,
    );

    if let Some(items) = record.opt_list("excludedAssetIds")? {
        result.excluded_assets = items
            .iter()
            .map(|item| {
                let raw = item
                    .value()
                    .as_str()
                    .ok_or_else(|| item.error_here("expected a string asset id"))?;
                parse_asset_id(raw).map_err(|reason| item.error_here(reason))
            })
            .collect::<SchemaResult<_>>()?;
    }
    result.warnings = record.strings("warnings")?;
    Ok(result)
}

/// Decodes one breach record.
///
/// # Errors
///
/// Returns [`SchemaParseError`](crate::SchemaParseError) if the record has
/// neither a `quantiles` list nor a legacy `varLevelAbsolute`/`varLevelRelative`
/// pair, or if a required field is malformed.
pub fn decode_var_breach(raw: &Value, options: &DecodeOptions) -> SchemaResult<VaRBreach> {
    breach(&Record::root(raw), options)
}

fn breach(record: &Record<'_>, options: &DecodeOptions) -> SchemaResult<VaRBreach> {
    let quantiles = if record.has("quantiles") {
        decode_quantiles(record)?
    } else if record.has("varLevelAbsolute") || record.has("varLevelRelative") {
        debug!(
            quantile = options.legacy_breach_quantile,
            "legacy single-level breach record"
        );
        let q = VaRQuantile::new(
            options.legacy_breach_quantile,
            record.f64("varLevelAbsolute")?,
            record.f64("varLevelRelative")?,
        )
        .map_err(|e| record.error_here(e.to_string()))?;
        vec![q]
    } else {
        return Err(record.error(
            "quantiles",
            "missing required field (neither quantiles nor varLevelAbsolute/varLevelRelative present)",
        ));
    };

    Ok(VaRBreach {
        breach_date: record.date("breachDate")?,
        portfolio_loss_absolute: record.f64("portfolioLossAbsolute")?,
        portfolio_loss_relative: record.f64("portfolioLossRelative")?,
        quantiles,
    })
}

/// Decodes a full backtest response.
///
/// Daily results are put into run-date order.
///
/// # Errors
///
/// Returns [`SchemaParseError`](crate::SchemaParseError) if `results` is
/// missing, any entry is malformed, or a breach is dated on a day that has
/// no daily result.
///
/// # Example
///
/// ```rust
/// use riskdeck_schema::{decode_var_backtest, DecodeOptions};
/// use serde_json::json;
///
/// let day = |date: &str, baseline: f64| json!({
///     "runDate": date,
///     "baseline": baseline,
///     "quantiles": [{"quantile": 99.0, "varAbsolute": 1500.0, "varRelative": 0.015}],
/// });
/// let raw = json!({"results": [day("2022-03-02", 101_000.0), day("2022-03-01", 100_000.0)]});
///
/// let backtest = decode_var_backtest(&raw, &DecodeOptions::default()).unwrap();
/// assert_eq!(backtest.results()[0].baseline, 100_000.0);
/// assert!(backtest.breaches().is_empty());
/// ```
pub fn decode_var_backtest(
    raw: &Value,
    options: &DecodeOptions,
) -> SchemaResult<VaRBacktestResult> {
    let root = Record::root(raw);
    if !raw.is_object() {
        return Err(root.error_here("expected an object"));
    }

    let items = root.list("results")?;
    let results = items.iter().map(analysis).collect::<SchemaResult<Vec<_>>>()?;
    if results.windows(2).any(|w| w[0].run_date > w[1].run_date) {
        debug!(days = results.len(), "reordering backtest results by run date");
    }

    let breach_items = root.opt_list("breaches")?.unwrap_or_default();
    let breaches = breach_items
        .iter()
        .map(|item| breach(item, options))
        .collect::<SchemaResult<Vec<_>>>()?;
    let warnings = root.strings("warnings")?;

    debug!(
        days = results.len(),
        breaches = breaches.len(),
        "decoded VaR backtest"
    );

    VaRBacktestResult::new(results, breaches, warnings).map_err(|e| match e {
        CoreError::UnmatchedBreach { date } => breach_items
            .iter()
            .find(|item| item.date("breachDate").ok() == Some(date))
            .map_or_else(
                || root.error("breaches", e.to_string()),
                |item| item.error("breachDate", e.to_string()),
            ),
        other => root.error_here(other.to_string()),
    })
}
