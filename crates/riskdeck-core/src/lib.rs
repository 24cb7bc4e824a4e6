//! # Riskdeck Core
//!
//! Canonical types shared by every Riskdeck crate.
//!
//! Upstream risk services have shipped several incompatible JSON shapes over
//! time. This crate holds the single type family they are all normalized
//! into:
//!
//! - **Risk attribution**: [`Risk`], [`SectorPath`], [`FactorExposureValue`],
//!   [`TotalFactorRisk`], [`SectorFactorExposure`] and the aggregate root
//!   [`RiskAttributionResult`]
//! - **VaR backtesting**: [`VaRQuantile`], [`VaRAnalysisResult`],
//!   [`VaRBreach`], [`VaRBacktestResult`]
//! - **Tables**: [`Table`] and [`Cell`], the flat row/column shape handed to
//!   rendering layers
//!
//! ## Design Philosophy
//!
//! - **Value objects**: no behavior beyond construction and lookup
//! - **Structural keys**: [`SectorPath`] compares, hashes and orders by its
//!   level sequence so it can key ordered and hashed maps alike
//! - **Explicit gaps**: risk fields that an upstream generation never supplied
//!   are `None`, never zero
//!
//! ## Example
//!
//! ```rust
//! use riskdeck_core::prelude::*;
//!
//! let path = SectorPath::new(["Currency", "Transparent"]).unwrap();
//! assert_eq!(path.depth(), 2);
//! assert_eq!(path.to_string(), "Currency/Transparent");
//! assert_eq!(path.parent(), Some(SectorPath::new(["Currency"]).unwrap()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod table;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use table::{Cell, Table};
pub use types::{
    quantiles_match, AssetId, FactorExposureValue, Risk, RiskAttributionResult,
    RiskAttributionResultBuilder, SchemaShape, SectorFactorExposure, SectorPath, TotalFactorRisk,
    VaRAnalysisResult, VaRBacktestResult, VaRBreach, VaRQuantile,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::table::{Cell, Table};
    pub use crate::types::{
        AssetId, FactorExposureValue, Risk, RiskAttributionResult, RiskAttributionResultBuilder,
        SchemaShape, SectorFactorExposure, SectorPath, TotalFactorRisk, VaRAnalysisResult,
        VaRBacktestResult, VaRBreach, VaRQuantile,
    };
}
