//! Risk measurements and factor exposures.

use serde::{Deserialize, Serialize};

/// A single risk measurement split into its factor and specific parts.
///
/// `total_risk` is whatever the upstream model reported. It is not
/// re-derived from the two components because the combination rule (plain
/// sum for variance, quadrature for volatility, ...) depends on the measure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Risk {
    /// Portion of risk explained by common factors.
    pub factor_risk: f64,

    /// Idiosyncratic portion of risk.
    pub specific_risk: f64,

    /// Model-reported total.
    pub total_risk: f64,
}

impl Risk {
    /// Creates a new risk measurement.
    #[must_use]
    pub fn new(factor_risk: f64, specific_risk: f64, total_risk: f64) -> Self {
        Self {
            factor_risk,
            specific_risk,
            total_risk,
        }
    }

    /// Share of the total explained by factors, or `None` for a zero total.
    #[must_use]
    pub fn factor_share(&self) -> Option<f64> {
        if self.total_risk.abs() < f64::EPSILON {
            None
        } else {
            Some(self.factor_risk / self.total_risk)
        }
    }
}

/// Exposure to one factor, in the factor's native unit and in base currency.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorExposureValue {
    /// Exposure in the factor's native unit.
    pub factor_exposure: f64,

    /// Exposure in base currency; 0 when upstream omits it.
    pub factor_exposure_base_ccy: f64,
}

impl FactorExposureValue {
    /// Creates a new exposure value.
    #[must_use]
    pub fn new(factor_exposure: f64, factor_exposure_base_ccy: f64) -> Self {
        Self {
            factor_exposure,
            factor_exposure_base_ccy,
        }
    }

    /// Creates an exposure with no base-currency figure.
    #[must_use]
    pub fn native_only(factor_exposure: f64) -> Self {
        Self::new(factor_exposure, 0.0)
    }
}
