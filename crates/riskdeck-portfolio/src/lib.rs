//! # Riskdeck Portfolio
//!
//! Risk decomposition for factor-model attribution results.
//!
//! Takes one decoded [`RiskAttributionResult`](riskdeck_core::RiskAttributionResult)
//! and pivots it into the views analysts browse: per asset, per sector at
//! every level of the taxonomy, per factor, and per sector and factor.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: All calculations are stateless with explicit inputs
//! - **No invented data**: pivots that disagree are an error, missing sector
//!   levels are never synthesized and unreported risks stay `None`
//! - **Explicit merge policy**: duplicate sector factor entries are resolved
//!   by [`SectorFactorPolicy`], never implicitly
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use riskdeck_portfolio::prelude::*;
//!
//! let decomposition = RiskDecomposition::new(&result, &AggregationConfig::default())?;
//! let deepest = decomposition.max_depth();
//! let table = by_sector_table(&decomposition);
//! ```
//!
//! ## Module Overview
//!
//! - [`decomposition`] - The decomposition and its queries
//! - [`tables`] - Flat table projections
//! - [`types`] - Configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod decomposition;
pub mod error;
pub mod tables;
pub mod types;

pub use decomposition::{AssetRisk, RiskDecomposition, SectorRisk};
pub use error::{PortfolioError, PortfolioResult};
pub use tables::{
    by_asset_table, by_factor_table, by_sector_table, sector_factor_table, total_risk_table,
    SymbolResolver,
};
pub use types::{AggregationConfig, SectorFactorPolicy};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::decomposition::{AssetRisk, RiskDecomposition, SectorRisk};
    pub use crate::error::{PortfolioError, PortfolioResult};
    pub use crate::tables::{
        by_asset_table, by_factor_table, by_sector_table, sector_factor_table, total_risk_table,
        SymbolResolver,
    };
    pub use crate::types::{AggregationConfig, SectorFactorPolicy};
}
