//! Decoding of recorded payloads from every upstream generation.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use riskdeck_schema::prelude::*;
use riskdeck_schema::detect_shape;
use riskdeck_core::{SchemaShape, SectorPath};
use serde_json::Value;

const LEGACY: &str = include_str!("fixtures/risk_attribution_legacy.json");
const LEVELLED: &str = include_str!("fixtures/risk_attribution_levelled.json");
const FLAT: &str = include_str!("fixtures/risk_attribution_flat.json");
const BACKTEST: &str = include_str!("fixtures/var_backtest.json");
const BACKTEST_LEGACY: &str = include_str!("fixtures/var_backtest_legacy.json");

fn load(text: &str) -> Value {
    JsonCodec::new().decode_str(text).unwrap()
}

fn path(levels: &[&str]) -> SectorPath {
    SectorPath::new(levels.iter().copied()).unwrap()
}

#[test]
fn legacy_payload_decodes_to_two_level_paths() {
    let raw = load(LEGACY);
    assert_eq!(detect_shape(&raw), SchemaShape::Legacy);

    let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
    assert_eq!(result.shape(), SchemaShape::Legacy);
    assert_relative_eq!(result.portfolio_volatility().factor_risk, 1.015);
    assert_relative_eq!(result.portfolio_volatility().specific_risk, 0.356);
    assert_relative_eq!(result.portfolio_volatility().total_risk, 1.076);
    assert_relative_eq!(result.portfolio_variance().total_risk, 1.157);

    assert_eq!(result.absolute_risk_by_asset().len(), 7);
    assert_eq!(result.relative_risk_by_asset().len(), 7);
    assert_eq!(result.marginal_risk_by_asset().len(), 7);
    assert_eq!(result.absolute_risk_by_sector().len(), 10);

    assert!(result.absolute_risk_by_sector().keys().all(|p| p.depth() == 2));
    assert!(result
        .absolute_risk_by_sector()
        .contains_key(&path(&["Currency", "Currency"])));
    assert!(result
        .absolute_risk_by_sector()
        .contains_key(&path(&["DeFi", "Lending"])));

    assert_eq!(result.sector_factor_exposures().len(), 10);
    assert_eq!(result.sector_factor_exposure_count(), 30);
    for entry in result.sector_factor_exposures().values().flatten() {
        assert_eq!(entry.absolute_risk, None);
        assert_eq!(entry.relative_risk, None);
        assert_eq!(entry.marginal_risk, None);
        assert_relative_eq!(entry.factor_exposure.factor_exposure_base_ccy, 0.0);
    }
}

#[test]
fn levelled_payload_keeps_partial_risk_fields() {
    let raw = load(LEVELLED);
    assert_eq!(detect_shape(&raw), SchemaShape::Levelled);

    let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
    assert_eq!(result.absolute_risk_by_sector().len(), 5);
    assert_eq!(result.relative_risk_by_sector().len(), 4);

    let market = &result.portfolio_risk_by_factor()["Market"];
    assert_relative_eq!(market.factor_exposure.factor_exposure, 1.12);
    assert_relative_eq!(market.factor_exposure.factor_exposure_base_ccy, 1_250_000.0);

    let currency = &result.sector_factor_exposures()[&path(&["Currency"])];
    assert!(currency.iter().all(|e| e.has_risk_fields()));
    let transparent = &result.sector_factor_exposures()[&path(&["Currency", "Transparent"])];
    assert!(transparent.iter().all(|e| e.risk_field_count() == 0));
}

#[test]
fn flat_payload_prefers_flat_list() {
    let raw = load(FLAT);
    assert_eq!(detect_shape(&raw), SchemaShape::Flat);

    let result = decode_risk_attribution(&raw, &DecodeOptions::default()).unwrap();
    let max_depth = result
        .absolute_risk_by_sector()
        .keys()
        .map(SectorPath::depth)
        .max();
    assert_eq!(max_depth, Some(3));

    let exposures = result.sector_factor_exposures();
    assert_eq!(exposures.len(), 4);
    assert!(exposures.contains_key(&path(&[
        "Currency",
        "Transparent",
        "Transparent DeFi Currency"
    ])));
    assert!(exposures.contains_key(&path(&[
        "Smart Contract Platform",
        "Multi-Chain / Parachain",
        "Multi-Chain / Parachain"
    ])));
    for entries in exposures.values() {
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.has_risk_fields()));
    }
}

#[test]
fn flat_payload_can_retain_nested_entries() {
    let raw = load(FLAT);
    let options = DecodeOptions::default().with_retain_legacy_sector_factors(true);
    let result = decode_risk_attribution(&raw, &options).unwrap();

    // Two nested sectors carry three exposure-only entries each.
    assert_eq!(result.sector_factor_exposure_count(), 12 + 6);
    let currency = &result.sector_factor_exposures()[&path(&["Currency"])];
    assert_eq!(currency.len(), 6);
    assert_eq!(currency.iter().filter(|e| e.has_risk_fields()).count(), 3);
}

#[test]
fn backtest_shapes_agree() {
    let options = DecodeOptions::default();
    let newer = decode_var_backtest(&load(BACKTEST), &options).unwrap();
    let legacy = decode_var_backtest(&load(BACKTEST_LEGACY), &options).unwrap();

    assert_eq!(newer.results(), legacy.results());
    assert_eq!(newer.results().len(), 10);
    assert_eq!(
        newer.results()[0].run_date,
        NaiveDate::from_ymd_opt(2022, 3, 1).unwrap()
    );
    assert_eq!(newer.results()[0].excluded_assets.len(), 1);
    assert_eq!(newer.available_quantiles(), vec![1.0, 5.0, 95.0, 99.0]);

    assert_eq!(newer.breaches().len(), 1);
    assert_eq!(legacy.breaches().len(), 1);
    assert_eq!(newer.breaches()[0].breach_date, legacy.breaches()[0].breach_date);
    assert_eq!(newer.breaches()[0].quantiles.len(), 2);
    assert_relative_eq!(legacy.breaches()[0].quantiles[0].quantile, 99.0);
    assert_relative_eq!(legacy.breaches()[0].quantiles[0].var_absolute, 2500.0);
}

#[test]
fn batch_decodes_every_generation() {
    let records = vec![load(LEGACY), load(LEVELLED), load(FLAT)];
    let decoded = decode_many(&records, &DecodeOptions::default(), decode_risk_attribution);
    let shapes: Vec<SchemaShape> = decoded.iter().map(|r| r.as_ref().unwrap().shape()).collect();
    assert_eq!(
        shapes,
        vec![SchemaShape::Legacy, SchemaShape::Levelled, SchemaShape::Flat]
    );
}
