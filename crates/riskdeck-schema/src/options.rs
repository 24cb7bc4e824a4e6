//! Decoding options.

use serde::{Deserialize, Serialize};

/// Options controlling how raw records are decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// When a payload carries both the flat `sectorFactorExposures` list and
    /// the older nested `sectorFactorExposure` list, also emit the nested
    /// entries instead of ignoring them. The aggregator's merge policy then
    /// decides what to keep.
    pub retain_legacy_sector_factors: bool,

    /// Implicit quantile of legacy breach records, which carry a single
    /// `varLevelAbsolute`/`varLevelRelative` pair instead of a quantile list.
    pub legacy_breach_quantile: f64,

    /// Enable parallel batch decoding (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum batch size to trigger parallel decoding.
    pub parallel_threshold: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            retain_legacy_sector_factors: false,
            legacy_breach_quantile: 99.0,
            parallel: true,
            parallel_threshold: 16,
        }
    }
}

impl DecodeOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether nested sector factor entries are kept next to flat ones.
    #[must_use]
    pub fn with_retain_legacy_sector_factors(mut self, retain: bool) -> Self {
        self.retain_legacy_sector_factors = retain;
        self
    }

    /// Sets the implicit quantile of legacy breach records.
    #[must_use]
    pub fn with_legacy_breach_quantile(mut self, quantile: f64) -> Self {
        self.legacy_breach_quantile = quantile;
        self
    }

    /// Sets whether to use parallel decoding.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel decoding.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel decoding should be used for the given batch size.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}
