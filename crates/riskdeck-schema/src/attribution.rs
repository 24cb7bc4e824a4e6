//! Risk attribution decoding.
//!
//! One entry point, [`decode_risk_attribution`], handles every known upstream
//! generation:
//!
//! | Field | Legacy | Levelled | Flat |
//! |---|---|---|---|
//! | `bySector` keys | `parentSector` + `sector` | `sectorLevels` | `sectorLevels` |
//! | `sectorFactorExposure` (nested) | exposures only | exposures + optional risks | may still be present |
//! | `sectorFactorExposures` (flat) | - | - | preferred |
//!
//! Optional breakdowns (`bySector`, sector factor exposures) decode to empty
//! collections when absent; required fields fail the whole record.

use crate::error::SchemaResult;
use crate::options::DecodeOptions;
use crate::record::Record;
use crate::shape::detect_shape;
use riskdeck_core::{
    FactorExposureValue, Risk, RiskAttributionResult, RiskAttributionResultBuilder,
    SectorFactorExposure, TotalFactorRisk,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Decodes a raw risk attribution payload.
///
/// # Errors
///
/// Returns [`SchemaParseError`](crate::SchemaParseError) naming the first
/// missing or malformed required field.
///
/// # Example
///
/// ```rust
/// use riskdeck_schema::{decode_risk_attribution, DecodeOptions};
/// use serde_json::json;
///
/// let risk = json!({"factorRisk": 0.8, "specificRisk": 0.2, "totalRisk": 0.85});
/// let raw = json!({
///     "totalRisk": {"volatility": risk, "variance": risk},
///     "factorRisk": [],
///     "assetMarginalRisk": [],
///     "absoluteContributionRisk": {"byAsset": []},
///     "relativeContributionRisk": {"byAsset": []},
/// });
///
/// let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
/// assert_eq!(result.portfolio_volatility().total_risk, 0.85);
/// assert!(result.sector_factor_exposures().is_empty());
/// ```
pub fn decode_risk_attribution(
    raw: &Value,
    options: &DecodeOptions,
) -> SchemaResult<RiskAttributionResult> {
    let root = Record::root(raw);
    if !raw.is_object() {
        return Err(root.error_here("expected an object"));
    }

    let shape = detect_shape(raw);
    debug!(%shape, "decoding risk attribution payload");

    let total = root.field("totalRisk")?;
    let volatility = decode_portfolio_risk(&total.field("volatility")?)?;
    let variance = decode_portfolio_risk(&total.field("variance")?)?;
    let mut builder = RiskAttributionResultBuilder::new(shape, volatility, variance);

    for item in root.list("factorRisk")? {
        let factor_risk = decode_total_factor_risk(&item)?;
        if let Some(previous) = builder.insert_factor_risk(factor_risk) {
            warn!(factor = %previous.factor, "duplicate factor in factorRisk; keeping the later entry");
        }
    }

    for item in root.list("assetMarginalRisk")? {
        let asset = item.asset_id("assetId")?;
        if builder.insert_marginal_asset(asset, decode_risk(&item)?).is_some() {
            warn!(%asset, "duplicate asset in assetMarginalRisk; keeping the later entry");
        }
    }

    decode_contribution(&root, "absoluteContributionRisk", &mut builder, Pivot::Absolute)?;
    decode_contribution(&root, "relativeContributionRisk", &mut builder, Pivot::Relative)?;

    for exposure in decode_sector_factor_exposures(&root, options)? {
        builder.push_sector_factor_exposure(exposure);
    }

    let result = builder.build();
    debug!(
        %shape,
        assets = result.absolute_risk_by_asset().len(),
        sectors = result.absolute_risk_by_sector().len(),
        factors = result.portfolio_risk_by_factor().len(),
        sector_factor_exposures = result.sector_factor_exposure_count(),
        "decoded risk attribution"
    );
    Ok(result)
}

#[derive(Debug, Clone, Copy)]
enum Pivot {
    Absolute,
    Relative,
}

fn decode_contribution(
    root: &Record<'_>,
    key: &str,
    builder: &mut RiskAttributionResultBuilder,
    pivot: Pivot,
) -> SchemaResult<()> {
    let contribution = root.field(key)?;

    for item in contribution.list("byAsset")? {
        let asset = item.asset_id("assetId")?;
        let risk = decode_risk(&item)?;
        let replaced = match pivot {
            Pivot::Absolute => builder.insert_absolute_asset(asset, risk),
            Pivot::Relative => builder.insert_relative_asset(asset, risk),
        };
        if replaced.is_some() {
            warn!(%asset, pivot = key, "duplicate asset; keeping the later entry");
        }
    }

    let Some(by_sector) = contribution.opt_list("bySector")? else {
        debug!(pivot = key, "no bySector breakdown");
        return Ok(());
    };
    for item in by_sector {
        let path = item.sector_path()?;
        let risk = decode_risk(&item)?;
        let replaced = match pivot {
            Pivot::Absolute => builder.insert_absolute_sector(path.clone(), risk),
            Pivot::Relative => builder.insert_relative_sector(path.clone(), risk),
        };
        if replaced.is_some() {
            warn!(sector = %path, pivot = key, "duplicate sector path; keeping the later entry");
        }
    }
    Ok(())
}

/// Decodes a `{factorRisk, specificRisk, totalRisk}` object.
pub(crate) fn decode_risk(record: &Record<'_>) -> SchemaResult<Risk> {
    Ok(Risk::new(
        record.f64("factorRisk")?,
        record.f64("specificRisk")?,
        record.f64("totalRisk")?,
    ))
}

/// Portfolio-level risk, whose components can never be negative.
fn decode_portfolio_risk(record: &Record<'_>) -> SchemaResult<Risk> {
    let risk = decode_risk(record)?;
    for (key, value) in [
        ("factorRisk", risk.factor_risk),
        ("specificRisk", risk.specific_risk),
        ("totalRisk", risk.total_risk),
    ] {
        if value < 0.0 {
            return Err(record.error(key, format!("portfolio risk must be non-negative, found {value}")));
        }
    }
    Ok(risk)
}

/// Decodes a factor exposure given either as a nested `factorExposure`
/// object or inlined into `record` itself.
pub(crate) fn decode_factor_exposure(record: &Record<'_>) -> SchemaResult<FactorExposureValue> {
    let nested = record.field("factorExposure")?;
    let source = if nested.value().is_object() {
        nested
    } else {
        record.clone()
    };
    Ok(FactorExposureValue::new(
        source.f64("factorExposure")?,
        source.opt_f64("factorExposureBaseCcy")?.unwrap_or(0.0),
    ))
}

fn decode_total_factor_risk(record: &Record<'_>) -> SchemaResult<TotalFactorRisk> {
    Ok(TotalFactorRisk::new(
        record.str("factor")?,
        decode_factor_exposure(record)?,
        record.f64("absoluteContribution")?,
        record.f64("relativeContribution")?,
        record.f64("marginalContribution")?,
    ))
}

/// Sector factor exposures, preferring the flat list over the nested one.
fn decode_sector_factor_exposures(
    root: &Record<'_>,
    options: &DecodeOptions,
) -> SchemaResult<Vec<SectorFactorExposure>> {
    let flat = root.opt_list("sectorFactorExposures")?.unwrap_or_default();
    let nested = root.opt_list("sectorFactorExposure")?.unwrap_or_default();

    let mut exposures = Vec::new();
    if flat.is_empty() {
        if !nested.is_empty() {
            debug!("no flat sectorFactorExposures; falling back to nested sectorFactorExposure");
        }
    } else {
        for item in &flat {
            exposures.push(decode_flat_sector_factor(item)?);
        }
        if nested.is_empty() || !options.retain_legacy_sector_factors {
            return Ok(exposures);
        }
        debug!(
            nested = nested.len(),
            "retaining nested sectorFactorExposure alongside flat list"
        );
    }

    for sector in &nested {
        exposures.extend(decode_nested_sector_factors(sector)?);
    }
    Ok(exposures)
}

fn decode_flat_sector_factor(record: &Record<'_>) -> SchemaResult<SectorFactorExposure> {
    Ok(SectorFactorExposure {
        factor: record.str("factor")?.to_string(),
        sector_path: record.sector_path()?,
        absolute_risk: record.opt_f64("absoluteRisk")?,
        relative_risk: record.opt_f64("relativeRisk")?,
        marginal_risk: record.opt_f64("marginalRisk")?,
        factor_exposure: decode_factor_exposure(record)?,
    })
}

/// One nested sector entry: a sector path plus a per-factor list, read from
/// `factorExposure` or, in the oldest payloads, `factorRisk`.
fn decode_nested_sector_factors(sector: &Record<'_>) -> SchemaResult<Vec<SectorFactorExposure>> {
    let path = sector.sector_path()?;
    let inner_key = if sector.get("factorExposure").is_some_and(Value::is_array) {
        "factorExposure"
    } else {
        "factorRisk"
    };
    let Some(factors) = sector.opt_list(inner_key)? else {
        return Ok(Vec::new());
    };

    factors
        .iter()
        .map(|item| {
            Ok(SectorFactorExposure {
                factor: item.str("factor")?.to_string(),
                sector_path: path.clone(),
                absolute_risk: item.opt_f64("absoluteRisk")?,
                relative_risk: item.opt_f64("relativeRisk")?,
                marginal_risk: item.opt_f64("marginalRisk")?,
                factor_exposure: decode_factor_exposure(item)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use riskdeck_core::{SchemaShape, SectorPath};
    use serde_json::json;

    const ASSET_A: &str = "0b5bbd31-6d4b-4f5a-9a44-2f0f7d9c1a01";
    const ASSET_B: &str = "0b5bbd31-6d4b-4f5a-9a44-2f0f7d9c1a02";

    fn risk(f: f64, s: f64, t: f64) -> Value {
        json!({"factorRisk": f, "specificRisk": s, "totalRisk": t})
    }

    fn asset_risk(id: &str, t: f64) -> Value {
        json!({"assetId": id, "factorRisk": t * 0.8, "specificRisk": t * 0.2, "totalRisk": t})
    }

    fn minimal() -> Value {
        json!({
            "totalRisk": {"volatility": risk(1.015, 0.356, 1.076), "variance": risk(1.030, 0.127, 1.157)},
            "factorRisk": [{
                "factor": "Market",
                "absoluteContribution": 0.9,
                "relativeContribution": 0.84,
                "marginalContribution": 0.7,
                "factorExposure": 1.2,
                "factorExposureBaseCcy": 120000.0
            }],
            "assetMarginalRisk": [asset_risk(ASSET_A, 0.3), asset_risk(ASSET_B, 0.2)],
            "absoluteContributionRisk": {"byAsset": [asset_risk(ASSET_A, 0.6), asset_risk(ASSET_B, 0.4)]},
            "relativeContributionRisk": {"byAsset": [asset_risk(ASSET_A, 0.55), asset_risk(ASSET_B, 0.45)]}
        })
    }

    #[test]
    fn test_minimal_payload() {
        let result = decode_risk_attribution(&minimal(), &DecodeOptions::default()).unwrap();
        assert_relative_eq!(result.portfolio_volatility().factor_risk, 1.015);
        assert_relative_eq!(result.portfolio_variance().total_risk, 1.157);
        assert_eq!(result.absolute_risk_by_asset().len(), 2);
        assert_eq!(result.marginal_risk_by_asset().len(), 2);
        assert!(result.absolute_risk_by_sector().is_empty());
        assert!(result.sector_factor_exposures().is_empty());
    }

    #[test]
    fn test_inline_and_nested_factor_exposure_agree() {
        let inline = minimal();
        let mut nested = minimal();
        nested["factorRisk"][0]["factorExposure"] =
            json!({"factorExposure": 1.2, "factorExposureBaseCcy": 120000.0});
        nested["factorRisk"][0]
            .as_object_mut()
            .unwrap()
            .remove("factorExposureBaseCcy");

        let a = decode_risk_attribution(&inline, &DecodeOptions::default()).unwrap();
        let b = decode_risk_attribution(&nested, &DecodeOptions::default()).unwrap();
        assert_eq!(
            a.portfolio_risk_by_factor()["Market"].factor_exposure,
            b.portfolio_risk_by_factor()["Market"].factor_exposure
        );
    }

    #[test]
    fn test_base_ccy_defaults_to_zero() {
        let mut raw = minimal();
        raw["factorRisk"][0]
            .as_object_mut()
            .unwrap()
            .remove("factorExposureBaseCcy");
        let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
        let market = &result.portfolio_risk_by_factor()["Market"];
        assert_relative_eq!(market.factor_exposure.factor_exposure_base_ccy, 0.0);
    }

    #[test]
    fn test_missing_asset_id_is_fatal() {
        let mut raw = minimal();
        raw["absoluteContributionRisk"]["byAsset"][1]
            .as_object_mut()
            .unwrap()
            .remove("assetId");
        let err = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.field, "absoluteContributionRisk.byAsset[1].assetId");
        assert!(err.fragment.contains("totalRisk"));
    }

    #[test]
    fn test_missing_factor_is_fatal() {
        let mut raw = minimal();
        raw["factorRisk"][0].as_object_mut().unwrap().remove("factor");
        let err = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.field, "factorRisk[0].factor");
    }

    #[test]
    fn test_missing_total_risk_is_fatal() {
        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("totalRisk");
        let err = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.field, "totalRisk");
    }

    #[test]
    fn test_negative_portfolio_risk_rejected() {
        let mut raw = minimal();
        raw["totalRisk"]["variance"]["specificRisk"] = json!(-0.1);
        let err = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.field, "totalRisk.variance.specificRisk");
    }

    #[test]
    fn test_negative_contributions_accepted() {
        let mut raw = minimal();
        raw["absoluteContributionRisk"]["byAsset"][1] = asset_risk(ASSET_B, -0.2);
        raw["factorRisk"][0]["absoluteContribution"] = json!(-0.3);
        let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
        let hedge = result.absolute_risk_by_asset().values().find(|r| r.total_risk < 0.0);
        assert!(hedge.is_some());
        assert_relative_eq!(
            result.portfolio_risk_by_factor()["Market"].absolute_risk_contribution,
            -0.3
        );
    }

    #[test]
    fn test_not_an_object() {
        let err = decode_risk_attribution(&json!([1, 2]), &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.field, "$");
    }

    #[test]
    fn test_legacy_nested_exposures_have_no_risks() {
        let mut raw = minimal();
        raw["sectorFactorExposure"] = json!([{
            "parentSector": "Currency",
            "sector": "BaaS",
            "factorRisk": [
                {"factor": "Market", "factorExposure": 0.4},
                {"factor": "Liquidity", "factorExposure": 0.1, "factorExposureBaseCcy": 10.0}
            ]
        }]);
        let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
        assert_eq!(result.shape(), SchemaShape::Legacy);

        let path = SectorPath::from_parent_and_sector("Currency", "BaaS");
        let entries = &result.sector_factor_exposures()[&path];
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.absolute_risk.is_none()));
        assert_relative_eq!(entries[1].factor_exposure.factor_exposure_base_ccy, 10.0);
    }

    #[test]
    fn test_flat_list_preferred_over_nested() {
        let mut raw = minimal();
        raw["sectorFactorExposure"] = json!([{
            "sectorLevels": ["Currency"],
            "factorExposure": [{"factor": "Market", "factorExposure": 0.4}]
        }]);
        raw["sectorFactorExposures"] = json!([{
            "factor": "Market",
            "sectorLevels": ["Currency"],
            "absoluteRisk": 0.2,
            "relativeRisk": 0.1,
            "marginalRisk": 0.05,
            "factorExposure": {"factorExposure": 0.4, "factorExposureBaseCcy": 40.0}
        }]);

        let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
        assert_eq!(result.shape(), SchemaShape::Flat);
        assert_eq!(result.sector_factor_exposure_count(), 1);

        let retained = decode_risk_attribution(
            &raw,
            &DecodeOptions::default().with_retain_legacy_sector_factors(true),
        )
        .unwrap();
        let entries = &retained.sector_factor_exposures()[&SectorPath::new(["Currency"]).unwrap()];
        assert_eq!(entries.len(), 2);
        assert!(entries[0].has_risk_fields());
        assert!(!entries[1].has_risk_fields());
    }

    #[test]
    fn test_empty_flat_list_falls_back_to_nested() {
        let mut raw = minimal();
        raw["sectorFactorExposures"] = json!([]);
        raw["sectorFactorExposure"] = json!([{
            "sectorLevels": ["Currency", "Transparent"],
            "factorExposure": [{
                "factor": "Market",
                "factorExposure": 0.4,
                "absoluteRisk": 0.2,
                "relativeRisk": 0.1,
                "marginalRisk": 0.05
            }]
        }]);
        let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
        assert_eq!(result.sector_factor_exposure_count(), 1);
        let entry = result.sector_factor_exposures().values().next().unwrap();
        assert_eq!(entry[0].absolute_risk, Some(0.2));
    }

    #[test]
    fn test_malformed_optional_breakdown_still_fails() {
        let mut raw = minimal();
        raw["absoluteContributionRisk"]["bySector"] = json!([{"sectorLevels": ["Currency"], "factorRisk": 1.0}]);
        let err = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.field, "absoluteContributionRisk.bySector[0].specificRisk");
    }

    #[test]
    fn test_duplicate_asset_keeps_later_entry() {
        let mut raw = minimal();
        raw["assetMarginalRisk"] = json!([asset_risk(ASSET_A, 0.3), asset_risk(ASSET_A, 0.9)]);
        let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
        let id = riskdeck_core::AssetId::parse_str(ASSET_A).unwrap();
        assert_relative_eq!(result.marginal_risk_by_asset()[&id].total_risk, 0.9);
    }
}
