//! Risk decomposition by asset, sector and factor.
//!
//! # Example
//!
//! ```rust,ignore
//! use riskdeck_portfolio::{AggregationConfig, RiskDecomposition};
//!
//! let decomposition = RiskDecomposition::new(&result, &AggregationConfig::default())?;
//! for factor in decomposition.top_factors(3) {
//!     println!("{}: {:.4}", factor.factor, factor.absolute_risk_contribution);
//! }
//! ```

mod asset;
mod sector;
mod sector_factor;

pub use asset::AssetRisk;
pub use sector::SectorRisk;

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::AggregationConfig;
use riskdeck_core::{
    AssetId, Risk, RiskAttributionResult, SchemaShape, SectorFactorExposure, SectorPath,
    TotalFactorRisk,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One risk attribution pivoted into asset, sector and factor views.
///
/// Immutable once built; every view is precomputed. Deserialization
/// rejects views that are not strictly ordered by key, since lookups
/// binary-search them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRiskDecomposition")]
pub struct RiskDecomposition {
    shape: SchemaShape,
    volatility: Risk,
    variance: Risk,
    by_asset: Vec<AssetRisk>,
    by_sector: Vec<SectorRisk>,
    by_factor: Vec<TotalFactorRisk>,
    #[serde(with = "sector_entries")]
    sector_factor: BTreeMap<SectorPath, Vec<SectorFactorExposure>>,
}

impl RiskDecomposition {
    /// Builds the decomposition of `result`.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::InconsistentPivot`](crate::PortfolioError::InconsistentPivot)
    /// if the absolute, relative and marginal by-asset maps do not share one
    /// key set. The maps are never silently intersected or unioned.
    pub fn new(result: &RiskAttributionResult, config: &AggregationConfig) -> PortfolioResult<Self> {
        let by_asset = asset::join_assets(
            result.absolute_risk_by_asset(),
            result.relative_risk_by_asset(),
            result.marginal_risk_by_asset(),
        )?;
        let by_sector = sector::join_sectors(
            result.absolute_risk_by_sector(),
            result.relative_risk_by_sector(),
        );
        // BTreeMap iteration already yields factors by name.
        let by_factor: Vec<TotalFactorRisk> =
            result.portfolio_risk_by_factor().values().cloned().collect();
        let sector_factor = sector_factor::merge_sector_factors(
            result.sector_factor_exposures(),
            config.sector_factor_policy,
        );

        debug!(
            shape = %result.shape(),
            policy = %config.sector_factor_policy,
            assets = by_asset.len(),
            sectors = by_sector.len(),
            factors = by_factor.len(),
            sector_factor_groups = sector_factor.len(),
            "built risk decomposition"
        );

        Ok(Self {
            shape: result.shape(),
            volatility: *result.portfolio_volatility(),
            variance: *result.portfolio_variance(),
            by_asset,
            by_sector,
            by_factor,
            sector_factor,
        })
    }

    /// Upstream generation of the source payload.
    #[must_use]
    pub fn shape(&self) -> SchemaShape {
        self.shape
    }

    /// Portfolio volatility split into factor and specific parts.
    #[must_use]
    pub fn portfolio_volatility(&self) -> &Risk {
        &self.volatility
    }

    /// Portfolio variance split into factor and specific parts.
    #[must_use]
    pub fn portfolio_variance(&self) -> &Risk {
        &self.variance
    }

    // =========================================================================
    // By asset
    // =========================================================================

    /// Per-asset risk, ordered by asset id.
    #[must_use]
    pub fn by_asset(&self) -> &[AssetRisk] {
        &self.by_asset
    }

    /// Risk of one asset.
    #[must_use]
    pub fn asset(&self, asset_id: &AssetId) -> Option<&AssetRisk> {
        self.by_asset
            .binary_search_by_key(asset_id, |a| a.asset_id)
            .ok()
            .map(|i| &self.by_asset[i])
    }

    // =========================================================================
    // By sector
    // =========================================================================

    /// Per-sector risk, ordered by path (parents before their children).
    #[must_use]
    pub fn by_sector(&self) -> &[SectorRisk] {
        &self.by_sector
    }

    /// Risk of one sector, if upstream reported it.
    #[must_use]
    pub fn sector(&self, path: &SectorPath) -> Option<&SectorRisk> {
        self.by_sector
            .binary_search_by(|s| s.sector_path.cmp(path))
            .ok()
            .map(|i| &self.by_sector[i])
    }

    /// Sectors whose path has exactly `depth` levels.
    #[must_use]
    pub fn sectors_at_depth(&self, depth: usize) -> Vec<&SectorRisk> {
        self.by_sector
            .iter()
            .filter(|s| s.sector_path.depth() == depth)
            .collect()
    }

    /// Reported sectors one level below `path`.
    #[must_use]
    pub fn children(&self, path: &SectorPath) -> Vec<&SectorRisk> {
        self.by_sector
            .iter()
            .filter(|s| path.is_parent_of(&s.sector_path))
            .collect()
    }

    /// Depth of the deepest reported sector, 0 when there are none.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.by_sector
            .iter()
            .map(|s| s.sector_path.depth())
            .max()
            .unwrap_or(0)
    }

    // =========================================================================
    // By factor
    // =========================================================================

    /// Portfolio risk per factor, ordered by factor name.
    #[must_use]
    pub fn by_factor(&self) -> &[TotalFactorRisk] {
        &self.by_factor
    }

    /// Portfolio risk of one factor.
    #[must_use]
    pub fn factor(&self, name: &str) -> Option<&TotalFactorRisk> {
        self.by_factor.iter().find(|f| f.factor == name)
    }

    /// The `n` factors with the largest absolute contribution magnitude.
    ///
    /// Ties keep factor-name order.
    #[must_use]
    pub fn top_factors(&self, n: usize) -> Vec<&TotalFactorRisk> {
        let mut ranked: Vec<&TotalFactorRisk> = self.by_factor.iter().collect();
        ranked.sort_by(|a, b| {
            b.absolute_risk_contribution
                .abs()
                .total_cmp(&a.absolute_risk_contribution.abs())
        });
        ranked.truncate(n);
        ranked
    }

    // =========================================================================
    // Sector x factor
    // =========================================================================

    /// Sector factor exposures after the configured merge policy.
    #[must_use]
    pub fn sector_factor(&self) -> &BTreeMap<SectorPath, Vec<SectorFactorExposure>> {
        &self.sector_factor
    }

    /// Exposures of one sector, empty if none were reported.
    #[must_use]
    pub fn sector_factor_exposures(&self, path: &SectorPath) -> &[SectorFactorExposure] {
        self.sector_factor.get(path).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Deserialize)]
struct RawRiskDecomposition {
    shape: SchemaShape,
    volatility: Risk,
    variance: Risk,
    by_asset: Vec<AssetRisk>,
    by_sector: Vec<SectorRisk>,
    by_factor: Vec<TotalFactorRisk>,
    #[serde(with = "sector_entries")]
    sector_factor: BTreeMap<SectorPath, Vec<SectorFactorExposure>>,
}

impl TryFrom<RawRiskDecomposition> for RiskDecomposition {
    type Error = PortfolioError;

    fn try_from(raw: RawRiskDecomposition) -> PortfolioResult<Self> {
        if !raw.by_asset.windows(2).all(|w| w[0].asset_id < w[1].asset_id) {
            return Err(PortfolioError::UnorderedView { view: "asset" });
        }
        if !raw.by_sector.windows(2).all(|w| w[0].sector_path < w[1].sector_path) {
            return Err(PortfolioError::UnorderedView { view: "sector" });
        }
        if !raw.by_factor.windows(2).all(|w| w[0].factor < w[1].factor) {
            return Err(PortfolioError::UnorderedView { view: "factor" });
        }
        Ok(Self {
            shape: raw.shape,
            volatility: raw.volatility,
            variance: raw.variance,
            by_asset: raw.by_asset,
            by_sector: raw.by_sector,
            by_factor: raw.by_factor,
            sector_factor: raw.sector_factor,
        })
    }
}

/// Serializes the sector-keyed map as `[path, entries]` pairs.
mod sector_entries {
    use riskdeck_core::{SectorFactorExposure, SectorPath};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    type Entries = BTreeMap<SectorPath, Vec<SectorFactorExposure>>;

    pub fn serialize<S: Serializer>(map: &Entries, serializer: S) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(&SectorPath, &Vec<SectorFactorExposure>)> = map.iter().collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Entries, D::Error> {
        let pairs: Vec<(SectorPath, Vec<SectorFactorExposure>)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
