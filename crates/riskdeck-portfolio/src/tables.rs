//! Table projections of a [`RiskDecomposition`].
//!
//! Mechanical reshaping only. Column names match what upstream dashboards
//! use: risk triples are prefixed with their pivot (`absoluteFactorRisk`,
//! `relativeTotalRisk`, ...) and sector paths spread over
//! `sectorLevel1..sectorLevelN`, where N is the deepest path in the table.

use crate::decomposition::RiskDecomposition;
use riskdeck_core::{AssetId, Cell, Risk, SectorPath, Table};
use std::collections::{BTreeMap, HashMap};

const RISK_PARTS: [&str; 3] = ["FactorRisk", "SpecificRisk", "TotalRisk"];

/// Maps asset ids to display symbols.
pub trait SymbolResolver {
    /// Display symbol of `asset`, if known.
    fn symbol(&self, asset: &AssetId) -> Option<String>;
}

impl SymbolResolver for HashMap<AssetId, String> {
    fn symbol(&self, asset: &AssetId) -> Option<String> {
        self.get(asset).cloned()
    }
}

impl SymbolResolver for BTreeMap<AssetId, String> {
    fn symbol(&self, asset: &AssetId) -> Option<String> {
        self.get(asset).cloned()
    }
}

fn risk_columns(prefix: &str) -> impl Iterator<Item = String> + '_ {
    RISK_PARTS.iter().map(move |part| format!("{prefix}{part}"))
}

fn risk_cells(risk: &Risk) -> [Cell; 3] {
    [
        risk.factor_risk.into(),
        risk.specific_risk.into(),
        risk.total_risk.into(),
    ]
}

fn optional_risk_cells(risk: Option<&Risk>) -> [Cell; 3] {
    risk.map_or([Cell::Missing, Cell::Missing, Cell::Missing], risk_cells)
}

fn sector_level_columns(depth: usize) -> impl Iterator<Item = String> {
    (1..=depth).map(|n| format!("sectorLevel{n}"))
}

fn sector_level_cells(path: &SectorPath, depth: usize) -> impl Iterator<Item = Cell> + '_ {
    (0..depth).map(move |i| path.level(i).map_or(Cell::Missing, Cell::from))
}

/// Portfolio factor, specific and total risk, one row per measure
/// (`volatility`, `variance`).
#[must_use]
pub fn total_risk_table(decomposition: &RiskDecomposition) -> Table {
    let mut table = Table::new(["measure", "factorRisk", "specificRisk", "totalRisk"], 1);
    for (measure, risk) in [
        ("volatility", decomposition.portfolio_volatility()),
        ("variance", decomposition.portfolio_variance()),
    ] {
        let mut row = vec![Cell::from(measure)];
        row.extend(risk_cells(risk));
        table.push_row(row);
    }
    table
}

/// Absolute, relative and marginal risk per asset.
///
/// With a resolver, an `assetSymbol` column follows `assetId` and rows are
/// ordered by symbol (unknown symbols last); otherwise rows are ordered by
/// asset id.
#[must_use]
pub fn by_asset_table(
    decomposition: &RiskDecomposition,
    resolver: Option<&dyn SymbolResolver>,
) -> Table {
    let mut columns = vec!["assetId".to_string()];
    let index_columns = if resolver.is_some() {
        columns.push("assetSymbol".to_string());
        2
    } else {
        1
    };
    columns.extend(risk_columns("absolute"));
    columns.extend(risk_columns("relative"));
    columns.extend(risk_columns("marginal"));

    let mut assets: Vec<(Option<String>, _)> = decomposition
        .by_asset()
        .iter()
        .map(|a| (resolver.and_then(|r| r.symbol(&a.asset_id)), a))
        .collect();
    if resolver.is_some() {
        assets.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    let mut table = Table::new(columns, index_columns);
    for (symbol, asset) in assets {
        let mut row = vec![Cell::from(asset.asset_id.to_string())];
        if resolver.is_some() {
            row.push(symbol.map_or(Cell::Missing, Cell::from));
        }
        row.extend(risk_cells(&asset.absolute));
        row.extend(risk_cells(&asset.relative));
        row.extend(risk_cells(&asset.marginal));
        table.push_row(row);
    }
    table
}

/// Absolute and relative risk per reported sector, ordered by path.
///
/// A side upstream did not report for a path is [`Cell::Missing`].
#[must_use]
pub fn by_sector_table(decomposition: &RiskDecomposition) -> Table {
    let depth = decomposition.max_depth();
    let mut columns: Vec<String> = sector_level_columns(depth).collect();
    columns.extend(risk_columns("absolute"));
    columns.extend(risk_columns("relative"));

    let mut table = Table::new(columns, depth);
    for sector in decomposition.by_sector() {
        let mut row: Vec<Cell> = sector_level_cells(&sector.sector_path, depth).collect();
        row.extend(optional_risk_cells(sector.absolute.as_ref()));
        row.extend(optional_risk_cells(sector.relative.as_ref()));
        table.push_row(row);
    }
    table
}

/// Portfolio risk contribution and exposure per factor, ordered by name.
#[must_use]
pub fn by_factor_table(decomposition: &RiskDecomposition) -> Table {
    let mut table = Table::new(
        [
            "factor",
            "absoluteRiskContribution",
            "relativeRiskContribution",
            "marginalRiskContribution",
            "factorExposure",
            "factorExposureBaseCcy",
        ],
        1,
    );
    for factor in decomposition.by_factor() {
        table.push_row(vec![
            factor.factor.as_str().into(),
            factor.absolute_risk_contribution.into(),
            factor.relative_risk_contribution.into(),
            factor.marginal_risk_contribution.into(),
            factor.factor_exposure.factor_exposure.into(),
            factor.factor_exposure.factor_exposure_base_ccy.into(),
        ]);
    }
    table
}

/// One row per sector factor exposure, in sector order then upstream order.
///
/// Risk fields upstream did not report are [`Cell::Missing`].
#[must_use]
pub fn sector_factor_table(decomposition: &RiskDecomposition) -> Table {
    let depth = decomposition
        .sector_factor()
        .keys()
        .map(SectorPath::depth)
        .max()
        .unwrap_or(0);
    let mut columns: Vec<String> = sector_level_columns(depth).collect();
    columns.extend(
        [
            "factor",
            "absoluteRisk",
            "relativeRisk",
            "marginalRisk",
            "factorExposure",
            "factorExposureBaseCcy",
        ]
        .map(String::from),
    );

    let mut table = Table::new(columns, depth + 1);
    for exposure in decomposition.sector_factor().values().flatten() {
        let mut row: Vec<Cell> = sector_level_cells(&exposure.sector_path, depth).collect();
        row.extend([
            Cell::from(exposure.factor.as_str()),
            exposure.absolute_risk.into(),
            exposure.relative_risk.into(),
            exposure.marginal_risk.into(),
            exposure.factor_exposure.factor_exposure.into(),
            exposure.factor_exposure.factor_exposure_base_ccy.into(),
        ]);
        table.push_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AggregationConfig;
    use riskdeck_core::{
        FactorExposureValue, RiskAttributionResultBuilder, SchemaShape, SectorFactorExposure,
        TotalFactorRisk,
    };

    fn path(levels: &[&str]) -> SectorPath {
        SectorPath::new(levels.iter().copied()).unwrap()
    }

    fn decomposition() -> RiskDecomposition {
        let mut builder = RiskAttributionResultBuilder::new(
            SchemaShape::Flat,
            Risk::new(1.015, 0.356, 1.076),
            Risk::new(1.030, 0.127, 1.157),
        );
        builder.insert_factor_risk(TotalFactorRisk::new(
            "Market",
            FactorExposureValue::new(1.12, 1_250_000.0),
            0.82,
            0.8,
            0.95,
        ));
        for id in [1u128, 2] {
            let asset = AssetId::from_u128(id);
            builder.insert_absolute_asset(asset, Risk::new(0.3, 0.1, 0.4));
            builder.insert_relative_asset(asset, Risk::new(0.5, 0.1, 0.6));
            builder.insert_marginal_asset(asset, Risk::new(0.2, 0.1, 0.3));
        }
        builder.insert_absolute_sector(path(&["Currency"]), Risk::new(0.3, 0.1, 0.4));
        builder.insert_absolute_sector(
            path(&["Currency", "Transparent", "Transparent DeFi Currency"]),
            Risk::new(0.2, 0.1, 0.3),
        );
        builder.insert_relative_sector(path(&["Currency"]), Risk::new(0.6, 0.1, 0.7));
        builder.push_sector_factor_exposure(SectorFactorExposure::exposure_only(
            "Market",
            path(&["Currency", "Transparent"]),
            FactorExposureValue::native_only(0.4),
        ));
        RiskDecomposition::new(&builder.build(), &AggregationConfig::default()).unwrap()
    }

    #[test]
    fn test_total_risk_table() {
        let table = total_risk_table(&decomposition());
        assert_eq!(table.index_columns(), &["measure".to_string()]);
        assert_eq!(table.get(0, "measure").unwrap().as_str(), Some("volatility"));
        assert_eq!(table.get(1, "totalRisk").unwrap().as_f64(), Some(1.157));
    }

    #[test]
    fn test_by_asset_table_with_resolver() {
        let d = decomposition();
        let plain = by_asset_table(&d, None);
        assert_eq!(plain.columns().len(), 10);
        assert!(plain.column_index("assetSymbol").is_none());

        let symbols: HashMap<AssetId, String> =
            [(AssetId::from_u128(2), "BTC".to_string())].into_iter().collect();
        let table = by_asset_table(&d, Some(&symbols));
        assert_eq!(table.columns()[1], "assetSymbol");
        assert_eq!(table.get(0, "assetSymbol").unwrap().as_str(), Some("BTC"));
        assert!(table.get(1, "assetSymbol").unwrap().is_missing());
        assert_eq!(table.get(0, "marginalTotalRisk").unwrap().as_f64(), Some(0.3));
    }

    #[test]
    fn test_by_sector_table_pads_levels() {
        let table = by_sector_table(&decomposition());
        assert_eq!(
            &table.columns()[..4],
            &["sectorLevel1", "sectorLevel2", "sectorLevel3", "absoluteFactorRisk"]
        );
        assert_eq!(table.index_columns().len(), 3);
        assert_eq!(table.len(), 2);
        assert!(table.get(0, "sectorLevel2").unwrap().is_missing());
        assert_eq!(table.get(0, "relativeTotalRisk").unwrap().as_f64(), Some(0.7));
        assert!(table.get(1, "relativeTotalRisk").unwrap().is_missing());
        assert_eq!(
            table.get(1, "sectorLevel3").unwrap().as_str(),
            Some("Transparent DeFi Currency")
        );
    }

    #[test]
    fn test_by_factor_table() {
        let table = by_factor_table(&decomposition());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "factorExposureBaseCcy").unwrap().as_f64(), Some(1_250_000.0));
    }

    #[test]
    fn test_sector_factor_table_missing_risks() {
        let table = sector_factor_table(&decomposition());
        assert_eq!(table.index_columns().len(), 3);
        assert_eq!(table.columns()[2], "factor");
        assert!(table.get(0, "absoluteRisk").unwrap().is_missing());
        assert_eq!(table.get(0, "factorExposure").unwrap().as_f64(), Some(0.4));
    }
}
