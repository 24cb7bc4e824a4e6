//! Configuration for risk decomposition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How sector factor exposures sharing one `(sector, factor)` key are merged.
///
/// Payloads in transition between upstream generations can report the same
/// sector and factor twice: once with risk contributions, once with the
/// exposure alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorFactorPolicy {
    /// Keep every entry in upstream order.
    #[default]
    RetainAll,

    /// Keep only the entries carrying the most risk fields for their key;
    /// entries of equal richness are all kept.
    PreferRicher,
}

impl fmt::Display for SectorFactorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorFactorPolicy::RetainAll => write!(f, "retain_all"),
            SectorFactorPolicy::PreferRicher => write!(f, "prefer_richer"),
        }
    }
}

/// Configuration for building a [`RiskDecomposition`](crate::RiskDecomposition).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Merge policy for duplicate sector factor exposures.
    pub sector_factor_policy: SectorFactorPolicy,
}

impl AggregationConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sector factor merge policy.
    #[must_use]
    pub fn with_sector_factor_policy(mut self, policy: SectorFactorPolicy) -> Self {
        self.sector_factor_policy = policy;
        self
    }
}
