//! # Riskdeck
//!
//! Risk decomposition and VaR backtest analytics for factor-model outputs.
//!
//! This crate re-exports the workspace crates and adds [`Engine`], which
//! runs raw records through decoding, decomposition and backtesting under
//! one [`EngineConfig`](config::EngineConfig).
//!
//! ## Architecture
//!
//! ```text
//! raw record ─> schema (decode, any generation) ─┬─> portfolio ─> RiskDecomposition ─> tables
//!                                                │
//!                                                └─> risk ─> VaRBacktestAnalysis ─> tables
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use riskdeck::prelude::*;
//!
//! let engine = Engine::new(EngineConfig::load("riskdeck.toml")?)?;
//! let decomposition = engine.decompose(&attribution_record)?;
//! let by_sector = by_sector_table(&decomposition);
//!
//! let analysis = engine.backtest(&backtest_record)?;
//! let breaches = analysis.breaches_summary(99.0)?;
//! ```
//!
//! ## Crates
//!
//! - [`schema`] - Decoding raw records of every upstream generation
//! - [`portfolio`] - Risk decomposition by asset, sector and factor
//! - [`risk`] - VaR backtesting and traffic-light thresholds
//! - [`config`] - Engine configuration
//!
//! Canonical types from `riskdeck-core` are re-exported at the root.
//!
//! ## Feature Flags
//!
//! - `parallel`: decode record batches on a rayon pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod engine;
mod error;

pub use engine::Engine;
pub use error::{Error, Result};

pub use riskdeck_config as config;
pub use riskdeck_portfolio as portfolio;
pub use riskdeck_risk as risk;
pub use riskdeck_schema as schema;

pub use riskdeck_core::{
    table, types, AssetId, Cell, CoreError, CoreResult, FactorExposureValue, Risk,
    RiskAttributionResult, RiskAttributionResultBuilder, SchemaShape, SectorFactorExposure,
    SectorPath, Table, TotalFactorRisk, VaRAnalysisResult, VaRBacktestResult, VaRBreach,
    VaRQuantile,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{Engine, Error, Result};
    pub use riskdeck_config::{EngineConfig, Validate};
    pub use riskdeck_core::prelude::*;
    pub use riskdeck_portfolio::prelude::*;
    pub use riskdeck_risk::prelude::*;
    pub use riskdeck_schema::prelude::*;
}
