//! By-asset pivot.

use crate::error::{PortfolioError, PortfolioResult};
use riskdeck_core::{AssetId, Risk};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Absolute, relative and marginal risk of one asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetRisk {
    /// Asset identifier.
    pub asset_id: AssetId,

    /// Absolute contribution to portfolio risk.
    pub absolute: Risk,

    /// Contribution as a fraction of portfolio risk.
    pub relative: Risk,

    /// Marginal contribution to portfolio risk.
    pub marginal: Risk,
}

/// Joins the three by-asset maps, requiring identical key sets.
pub(crate) fn join_assets(
    absolute: &BTreeMap<AssetId, Risk>,
    relative: &BTreeMap<AssetId, Risk>,
    marginal: &BTreeMap<AssetId, Risk>,
) -> PortfolioResult<Vec<AssetRisk>> {
    let all: BTreeSet<AssetId> = absolute
        .keys()
        .chain(relative.keys())
        .chain(marginal.keys())
        .copied()
        .collect();
    let missing = |map: &BTreeMap<AssetId, Risk>| -> Vec<AssetId> {
        all.iter().filter(|id| !map.contains_key(*id)).copied().collect()
    };

    let missing_in_absolute = missing(absolute);
    let missing_in_relative = missing(relative);
    let missing_in_marginal = missing(marginal);
    if !(missing_in_absolute.is_empty()
        && missing_in_relative.is_empty()
        && missing_in_marginal.is_empty())
    {
        return Err(PortfolioError::InconsistentPivot {
            missing_in_absolute,
            missing_in_relative,
            missing_in_marginal,
        });
    }

    Ok(absolute
        .iter()
        .map(|(asset_id, abs)| AssetRisk {
            asset_id: *asset_id,
            absolute: *abs,
            relative: relative[asset_id],
            marginal: marginal[asset_id],
        })
        .collect())
}
