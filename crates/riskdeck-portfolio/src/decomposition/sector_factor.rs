//! Sector x factor exposures and their merge policy.

use crate::types::SectorFactorPolicy;
use riskdeck_core::{SectorFactorExposure, SectorPath};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Applies `policy` to every sector's entries, keeping upstream order.
pub(crate) fn merge_sector_factors(
    exposures: &BTreeMap<SectorPath, Vec<SectorFactorExposure>>,
    policy: SectorFactorPolicy,
) -> BTreeMap<SectorPath, Vec<SectorFactorExposure>> {
    match policy {
        SectorFactorPolicy::RetainAll => exposures.clone(),
        SectorFactorPolicy::PreferRicher => exposures
            .iter()
            .map(|(path, entries)| (path.clone(), prefer_richer(path, entries)))
            .collect(),
    }
}

fn prefer_richer(path: &SectorPath, entries: &[SectorFactorExposure]) -> Vec<SectorFactorExposure> {
    let mut richest: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        let best = richest.entry(entry.factor.as_str()).or_default();
        *best = (*best).max(entry.risk_field_count());
    }

    let kept: Vec<SectorFactorExposure> = entries
        .iter()
        .filter(|e| e.risk_field_count() == richest[e.factor.as_str()])
        .cloned()
        .collect();
    if kept.len() < entries.len() {
        debug!(
            sector = %path,
            dropped = entries.len() - kept.len(),
            "dropped sector factor entries with fewer risk fields"
        );
    }
    kept
}
