//! Factor-level risk contributions.

use super::{FactorExposureValue, SectorPath};
use serde::{Deserialize, Serialize};

/// Portfolio-level risk attributed to one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalFactorRisk {
    /// Factor name.
    pub factor: String,

    /// Portfolio exposure to the factor.
    pub factor_exposure: FactorExposureValue,

    /// Absolute contribution to portfolio risk.
    pub absolute_risk_contribution: f64,

    /// Contribution as a fraction of portfolio risk.
    pub relative_risk_contribution: f64,

    /// Marginal contribution to portfolio risk.
    pub marginal_risk_contribution: f64,
}

impl TotalFactorRisk {
    /// Creates a new factor risk entry.
    #[must_use]
    pub fn new(
        factor: impl Into<String>,
        factor_exposure: FactorExposureValue,
        absolute_risk_contribution: f64,
        relative_risk_contribution: f64,
        marginal_risk_contribution: f64,
    ) -> Self {
        Self {
            factor: factor.into(),
            factor_exposure,
            absolute_risk_contribution,
            relative_risk_contribution,
            marginal_risk_contribution,
        }
    }
}

/// Exposure of one sector to one factor, with risk contributions when the
/// upstream generation supplies them.
///
/// Legacy payloads report only the exposure. The three risk fields are then
/// `None`: zero is a legitimate contribution and must stay distinguishable
/// from "not reported".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorFactorExposure {
    /// Factor name.
    pub factor: String,

    /// Sector the exposure belongs to.
    pub sector_path: SectorPath,

    /// Absolute risk contribution, if reported.
    pub absolute_risk: Option<f64>,

    /// Relative risk contribution, if reported.
    pub relative_risk: Option<f64>,

    /// Marginal risk contribution, if reported.
    pub marginal_risk: Option<f64>,

    /// Sector exposure to the factor.
    pub factor_exposure: FactorExposureValue,
}

impl SectorFactorExposure {
    /// Creates an exposure-only entry (no risk contributions).
    #[must_use]
    pub fn exposure_only(
        factor: impl Into<String>,
        sector_path: SectorPath,
        factor_exposure: FactorExposureValue,
    ) -> Self {
        Self {
            factor: factor.into(),
            sector_path,
            absolute_risk: None,
            relative_risk: None,
            marginal_risk: None,
            factor_exposure,
        }
    }

    /// Adds risk contributions.
    #[must_use]
    pub fn with_risks(mut self, absolute: f64, relative: f64, marginal: f64) -> Self {
        self.absolute_risk = Some(absolute);
        self.relative_risk = Some(relative);
        self.marginal_risk = Some(marginal);
        self
    }

    /// Number of risk fields populated (0 to 3).
    #[must_use]
    pub fn risk_field_count(&self) -> usize {
        [self.absolute_risk, self.relative_risk, self.marginal_risk]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }

    /// Returns true if any risk contribution is populated.
    #[must_use]
    pub fn has_risk_fields(&self) -> bool {
        self.risk_field_count() > 0
    }
}
