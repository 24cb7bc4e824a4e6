//! # Riskdeck Schema
//!
//! Version-tolerant decoding of upstream risk payloads into the canonical
//! types of [`riskdeck_core`].
//!
//! Upstream has changed its wire format several times without a version
//! tag. Every generation is decoded by one adapter that detects the shape
//! structurally, so consumers only ever see one type family.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: decoders take a raw record and options, nothing else
//! - **Newest first**: the newest field names win; older nested shapes are the
//!   fallback
//! - **Soft optional, hard required**: an absent optional breakdown decodes to
//!   an empty collection, a missing required field fails the record with its
//!   full dotted path
//!
//! ## Quick Start
//!
//! ```rust
//! use riskdeck_schema::prelude::*;
//!
//! let codec = JsonCodec::new();
//! let raw = codec
//!     .decode_str(r#"{"results": [{"runDate": "2022-03-01", "baseline": 1e5,
//!         "quantiles": [{"quantile": 99, "varAbsolute": 1500, "varRelative": 0.015}]}]}"#)
//!     .unwrap();
//!
//! let backtest = decode_var_backtest(&raw, &DecodeOptions::default()).unwrap();
//! assert_eq!(backtest.available_quantiles(), vec![99.0]);
//! ```
//!
//! ## Module Overview
//!
//! - [`attribution`] - Risk attribution decoding
//! - [`var`] - VaR analysis and backtest decoding
//! - [`shape`] - Structural shape detection
//! - [`batch`] - Batch decoding
//! - [`codec`] - JSON codec
//! - [`source`] - Record source seam for external transports
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel batch decoding

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod attribution;
pub mod batch;
pub mod codec;
pub mod error;
pub mod options;
pub mod shape;
pub mod source;
pub mod var;

mod record;

pub use attribution::decode_risk_attribution;
pub use batch::decode_many;
pub use codec::JsonCodec;
pub use error::{FetchError, SchemaParseError, SchemaResult, SourceError};
pub use options::DecodeOptions;
pub use shape::detect_shape;
pub use source::{
    fetch_risk_attribution, fetch_var_analysis, fetch_var_backtest, RecordKind, RecordRequest,
    RecordSource,
};
pub use var::{decode_var_analysis, decode_var_backtest, decode_var_breach};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::attribution::decode_risk_attribution;
    pub use crate::batch::decode_many;
    pub use crate::codec::JsonCodec;
    pub use crate::error::{FetchError, SchemaParseError, SchemaResult, SourceError};
    pub use crate::options::DecodeOptions;
    pub use crate::source::{RecordKind, RecordRequest, RecordSource};
    pub use crate::var::{decode_var_analysis, decode_var_backtest, decode_var_breach};
}
