//! Canonical domain types.

mod attribution;
mod factor;
mod risk;
mod sector;
mod var;

pub use attribution::{RiskAttributionResult, RiskAttributionResultBuilder, SchemaShape};
pub use factor::{SectorFactorExposure, TotalFactorRisk};
pub use risk::{FactorExposureValue, Risk};
pub use sector::SectorPath;
pub use var::{quantiles_match, VaRAnalysisResult, VaRBacktestResult, VaRBreach, VaRQuantile};

/// Upstream asset identifier.
pub type AssetId = uuid::Uuid;
