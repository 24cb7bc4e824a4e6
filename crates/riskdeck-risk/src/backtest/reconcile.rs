//! Comparison of derived breaches with upstream-reported ones.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Breach dates for one quantile that only one side flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreachReconciliation {
    /// Quantile compared.
    pub quantile: f64,

    /// Dates flagged by the baseline series but not reported upstream.
    pub derived_only: Vec<NaiveDate>,

    /// Dates reported upstream but not flagged by the baseline series.
    pub reported_only: Vec<NaiveDate>,
}

impl BreachReconciliation {
    /// Returns true if both sides flag the same dates.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.derived_only.is_empty() && self.reported_only.is_empty()
    }
}
