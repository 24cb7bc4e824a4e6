//! By-sector pivot.

use riskdeck_core::{Risk, SectorPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Absolute and relative risk of one sector.
///
/// The two upstream maps may cover different paths, so either side can be
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRisk {
    /// Sector location.
    pub sector_path: SectorPath,

    /// Absolute contribution, if reported.
    pub absolute: Option<Risk>,

    /// Relative contribution, if reported.
    pub relative: Option<Risk>,
}

/// Outer join of the absolute and relative by-sector maps.
///
/// Only paths present upstream appear; intermediate levels are never
/// synthesized.
pub(crate) fn join_sectors(
    absolute: &BTreeMap<SectorPath, Risk>,
    relative: &BTreeMap<SectorPath, Risk>,
) -> Vec<SectorRisk> {
    let mut joined: BTreeMap<&SectorPath, SectorRisk> = BTreeMap::new();
    for (path, risk) in absolute {
        joined.entry(path).or_insert_with(|| empty(path)).absolute = Some(*risk);
    }
    for (path, risk) in relative {
        joined.entry(path).or_insert_with(|| empty(path)).relative = Some(*risk);
    }
    joined.into_values().collect()
}

fn empty(path: &SectorPath) -> SectorRisk {
    SectorRisk {
        sector_path: path.clone(),
        absolute: None,
        relative: None,
    }
}
