//! The risk attribution aggregate root.

use super::{AssetId, Risk, SectorFactorExposure, SectorPath, TotalFactorRisk};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Upstream payload generation, detected from the payload's structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaShape {
    /// Two-level `parentSector`/`sector` paths, exposure-only sector factors.
    Legacy,
    /// Arbitrary-depth `sectorLevels`, nested sector factor exposures.
    Levelled,
    /// Flat `sectorFactorExposures` list.
    Flat,
}

impl fmt::Display for SchemaShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaShape::Legacy => "legacy",
            SchemaShape::Levelled => "levelled",
            SchemaShape::Flat => "flat",
        };
        write!(f, "{name}")
    }
}

/// Decoded output of one risk attribution run.
///
/// Holds every pivot the upstream service reports. By-sector maps contain
/// an entry for each level upstream supplied (`[L1]`, `[L1, L2]`, ...), not
/// only leaves. Built once through [`RiskAttributionResultBuilder`] and
/// read-only afterwards.
///
/// Deserialization rejects negative portfolio-level risk components and
/// sector factor exposures grouped under a path other than their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRiskAttributionResult")]
pub struct RiskAttributionResult {
    shape: SchemaShape,
    portfolio_volatility: Risk,
    portfolio_variance: Risk,
    portfolio_risk_by_factor: BTreeMap<String, TotalFactorRisk>,
    absolute_risk_by_asset: BTreeMap<AssetId, Risk>,
    relative_risk_by_asset: BTreeMap<AssetId, Risk>,
    marginal_risk_by_asset: BTreeMap<AssetId, Risk>,
    #[serde(with = "sector_map")]
    absolute_risk_by_sector: BTreeMap<SectorPath, Risk>,
    #[serde(with = "sector_map")]
    relative_risk_by_sector: BTreeMap<SectorPath, Risk>,
    #[serde(with = "sector_map")]
    sector_factor_exposures: BTreeMap<SectorPath, Vec<SectorFactorExposure>>,
}

impl RiskAttributionResult {
    /// Upstream generation this result was decoded from.
    #[must_use]
    pub fn shape(&self) -> SchemaShape {
        self.shape
    }

    /// Portfolio risk expressed as volatility.
    #[must_use]
    pub fn portfolio_volatility(&self) -> &Risk {
        &self.portfolio_volatility
    }

    /// Portfolio risk expressed as variance.
    #[must_use]
    pub fn portfolio_variance(&self) -> &Risk {
        &self.portfolio_variance
    }

    /// Per-factor portfolio risk, keyed by factor name.
    #[must_use]
    pub fn portfolio_risk_by_factor(&self) -> &BTreeMap<String, TotalFactorRisk> {
        &self.portfolio_risk_by_factor
    }

    /// Absolute risk contribution per asset.
    #[must_use]
    pub fn absolute_risk_by_asset(&self) -> &BTreeMap<AssetId, Risk> {
        &self.absolute_risk_by_asset
    }

    /// Relative risk contribution per asset.
    #[must_use]
    pub fn relative_risk_by_asset(&self) -> &BTreeMap<AssetId, Risk> {
        &self.relative_risk_by_asset
    }

    /// Marginal risk per asset.
    #[must_use]
    pub fn marginal_risk_by_asset(&self) -> &BTreeMap<AssetId, Risk> {
        &self.marginal_risk_by_asset
    }

    /// Absolute risk contribution per sector path, at every reported level.
    #[must_use]
    pub fn absolute_risk_by_sector(&self) -> &BTreeMap<SectorPath, Risk> {
        &self.absolute_risk_by_sector
    }

    /// Relative risk contribution per sector path, at every reported level.
    #[must_use]
    pub fn relative_risk_by_sector(&self) -> &BTreeMap<SectorPath, Risk> {
        &self.relative_risk_by_sector
    }

    /// Sector factor exposures grouped by sector path, in upstream order.
    #[must_use]
    pub fn sector_factor_exposures(&self) -> &BTreeMap<SectorPath, Vec<SectorFactorExposure>> {
        &self.sector_factor_exposures
    }

    /// Total number of sector factor exposure entries across all paths.
    #[must_use]
    pub fn sector_factor_exposure_count(&self) -> usize {
        self.sector_factor_exposures.values().map(Vec::len).sum()
    }
}

#[derive(Deserialize)]
struct RawRiskAttributionResult {
    shape: SchemaShape,
    portfolio_volatility: Risk,
    portfolio_variance: Risk,
    #[serde(default)]
    portfolio_risk_by_factor: BTreeMap<String, TotalFactorRisk>,
    #[serde(default)]
    absolute_risk_by_asset: BTreeMap<AssetId, Risk>,
    #[serde(default)]
    relative_risk_by_asset: BTreeMap<AssetId, Risk>,
    #[serde(default)]
    marginal_risk_by_asset: BTreeMap<AssetId, Risk>,
    #[serde(default, with = "sector_map")]
    absolute_risk_by_sector: BTreeMap<SectorPath, Risk>,
    #[serde(default, with = "sector_map")]
    relative_risk_by_sector: BTreeMap<SectorPath, Risk>,
    #[serde(default, with = "sector_map")]
    sector_factor_exposures: BTreeMap<SectorPath, Vec<SectorFactorExposure>>,
}

impl TryFrom<RawRiskAttributionResult> for RiskAttributionResult {
    type Error = CoreError;

    fn try_from(raw: RawRiskAttributionResult) -> CoreResult<Self> {
        for (measure, risk) in [
            ("volatility", &raw.portfolio_volatility),
            ("variance", &raw.portfolio_variance),
        ] {
            check_non_negative(measure, risk)?;
        }
        for (key, exposures) in &raw.sector_factor_exposures {
            if let Some(stray) = exposures.iter().find(|e| &e.sector_path != key) {
                return Err(CoreError::MisfiledSectorFactor {
                    key: key.to_string(),
                    found: stray.sector_path.to_string(),
                });
            }
        }
        Ok(Self {
            shape: raw.shape,
            portfolio_volatility: raw.portfolio_volatility,
            portfolio_variance: raw.portfolio_variance,
            portfolio_risk_by_factor: raw.portfolio_risk_by_factor,
            absolute_risk_by_asset: raw.absolute_risk_by_asset,
            relative_risk_by_asset: raw.relative_risk_by_asset,
            marginal_risk_by_asset: raw.marginal_risk_by_asset,
            absolute_risk_by_sector: raw.absolute_risk_by_sector,
            relative_risk_by_sector: raw.relative_risk_by_sector,
            sector_factor_exposures: raw.sector_factor_exposures,
        })
    }
}

fn check_non_negative(measure: &'static str, risk: &Risk) -> CoreResult<()> {
    for (component, value) in [
        ("factor_risk", risk.factor_risk),
        ("specific_risk", risk.specific_risk),
        ("total_risk", risk.total_risk),
    ] {
        if value < 0.0 {
            return Err(CoreError::NegativePortfolioRisk {
                measure,
                component,
                value,
            });
        }
    }
    Ok(())
}

/// Builder for [`RiskAttributionResult`].
///
/// Insert methods return the value they replaced so callers can report
/// duplicate keys.
#[derive(Debug, Clone)]
pub struct RiskAttributionResultBuilder {
    result: RiskAttributionResult,
}

impl RiskAttributionResultBuilder {
    /// Starts a result with its portfolio-level risks.
    #[must_use]
    pub fn new(shape: SchemaShape, volatility: Risk, variance: Risk) -> Self {
        Self {
            result: RiskAttributionResult {
                shape,
                portfolio_volatility: volatility,
                portfolio_variance: variance,
                portfolio_risk_by_factor: BTreeMap::new(),
                absolute_risk_by_asset: BTreeMap::new(),
                relative_risk_by_asset: BTreeMap::new(),
                marginal_risk_by_asset: BTreeMap::new(),
                absolute_risk_by_sector: BTreeMap::new(),
                relative_risk_by_sector: BTreeMap::new(),
                sector_factor_exposures: BTreeMap::new(),
            },
        }
    }

    /// Adds a per-factor portfolio risk.
    pub fn insert_factor_risk(&mut self, risk: TotalFactorRisk) -> Option<TotalFactorRisk> {
        self.result
            .portfolio_risk_by_factor
            .insert(risk.factor.clone(), risk)
    }

    /// Adds an absolute per-asset risk.
    pub fn insert_absolute_asset(&mut self, asset: AssetId, risk: Risk) -> Option<Risk> {
        self.result.absolute_risk_by_asset.insert(asset, risk)
    }

    /// Adds a relative per-asset risk.
    pub fn insert_relative_asset(&mut self, asset: AssetId, risk: Risk) -> Option<Risk> {
        self.result.relative_risk_by_asset.insert(asset, risk)
    }

    /// Adds a marginal per-asset risk.
    pub fn insert_marginal_asset(&mut self, asset: AssetId, risk: Risk) -> Option<Risk> {
        self.result.marginal_risk_by_asset.insert(asset, risk)
    }

    /// Adds an absolute per-sector risk.
    pub fn insert_absolute_sector(&mut self, path: SectorPath, risk: Risk) -> Option<Risk> {
        self.result.absolute_risk_by_sector.insert(path, risk)
    }

    /// Adds a relative per-sector risk.
    pub fn insert_relative_sector(&mut self, path: SectorPath, risk: Risk) -> Option<Risk> {
        self.result.relative_risk_by_sector.insert(path, risk)
    }

    /// Appends a sector factor exposure under its own path.
    pub fn push_sector_factor_exposure(&mut self, exposure: SectorFactorExposure) {
        self.result
            .sector_factor_exposures
            .entry(exposure.sector_path.clone())
            .or_default()
            .push(exposure);
    }

    /// Finishes the result.
    #[must_use]
    pub fn build(self) -> RiskAttributionResult {
        self.result
    }
}

/// Serializes sector-keyed maps as `[path, value]` pairs.
///
/// JSON object keys must be strings and a path's `/`-joined rendering is not
/// reversible (levels may contain `/`).
mod sector_map {
    use super::SectorPath;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S, V>(map: &BTreeMap<SectorPath, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<SectorPath, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let entries: Vec<(SectorPath, V)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
