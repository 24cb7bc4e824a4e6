//! Configuration types for risk decomposition.

mod config;

pub use config::{AggregationConfig, SectorFactorPolicy};
