//! Riskdeck Configuration Layer
//!
//! One document configures every stage of the engine: record decoding,
//! risk decomposition and VaR backtesting. Each stage's settings type lives
//! in its own crate; this crate gathers them into [`EngineConfig`], loads it
//! from TOML or JSON and validates it.
//!
//! # Example
//!
//! ```rust
//! use riskdeck_config::{EngineConfig, Validate};
//!
//! let config = EngineConfig::from_toml_str(
//!     r#"
//!     [backtest]
//!     window = 250
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.backtest.window, 250);
//! assert!(config.is_valid());
//! ```
//!
//! # Validation Rules
//!
//! - `backtest.window` is at least one observation
//! - both traffic-light cutoffs lie in (0, 1), amber/red below green/amber
//! - `backtest.quantiles` and `decode.legacy_breach_quantile` lie in (0, 100)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod engine;
mod error;

pub use engine::EngineConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
