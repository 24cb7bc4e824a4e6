//! Error types for risk decomposition.

use riskdeck_core::AssetId;
use thiserror::Error;

/// Result type for decomposition operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that can occur while building a decomposition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// The absolute, relative and marginal by-asset maps do not cover the
    /// same assets.
    ///
    /// Each list names the assets present in at least one of the other two
    /// maps but absent from this one, in ascending order.
    #[error(
        "Inconsistent by-asset pivot: missing in absolute [{}], relative [{}], marginal [{}]",
        join_ids(.missing_in_absolute),
        join_ids(.missing_in_relative),
        join_ids(.missing_in_marginal)
    )]
    InconsistentPivot {
        /// Assets absent from the absolute contribution map.
        missing_in_absolute: Vec<AssetId>,
        /// Assets absent from the relative contribution map.
        missing_in_relative: Vec<AssetId>,
        /// Assets absent from the marginal risk map.
        missing_in_marginal: Vec<AssetId>,
    },

    /// A decomposition view is out of key order or repeats a key.
    #[error("Decomposition {view} view is not strictly ordered by key")]
    UnorderedView {
        /// `asset`, `sector` or `factor`.
        view: &'static str,
    },
}

impl PortfolioError {
    /// All divergent assets, ascending and without repeats.
    ///
    /// Empty for errors that do not concern the by-asset pivot.
    #[must_use]
    pub fn divergent_assets(&self) -> Vec<AssetId> {
        match self {
            PortfolioError::InconsistentPivot {
                missing_in_absolute,
                missing_in_relative,
                missing_in_marginal,
            } => {
                let mut ids: Vec<AssetId> = missing_in_absolute
                    .iter()
                    .chain(missing_in_relative)
                    .chain(missing_in_marginal)
                    .copied()
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            }
            PortfolioError::UnorderedView { .. } => Vec::new(),
        }
    }
}

fn join_ids(ids: &[AssetId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = AssetId::from_u128(7);
        let err = PortfolioError::InconsistentPivot {
            missing_in_absolute: vec![],
            missing_in_relative: vec![id],
            missing_in_marginal: vec![id],
        };
        let msg = err.to_string();
        assert!(msg.contains("relative [00000000-0000-0000-0000-000000000007]"));
        assert!(msg.contains("absolute []"));
        assert_eq!(err.divergent_assets(), vec![id]);

        let err = PortfolioError::UnorderedView { view: "asset" };
        assert_eq!(err.to_string(), "Decomposition asset view is not strictly ordered by key");
        assert!(err.divergent_assets().is_empty());
    }
}
