//! Record source seam.
//!
//! Riskdeck does not talk to the network. A [`RecordSource`] is whatever
//! delivers raw records: an HTTP client, a file cache, a test double. The
//! `fetch_*` helpers combine fetching with decoding.

use crate::attribution::decode_risk_attribution;
use crate::error::{FetchError, SourceError};
use crate::options::DecodeOptions;
use crate::var::{decode_var_analysis, decode_var_backtest};
use riskdeck_core::{RiskAttributionResult, VaRAnalysisResult, VaRBacktestResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// =============================================================================
// REQUESTS
// =============================================================================

/// Kind of record requested from upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Factor risk attribution of a portfolio.
    RiskAttribution,
    /// Single-day VaR computation.
    VarCompute,
    /// Historical VaR backtest.
    VarBacktest,
}

impl RecordKind {
    /// Upstream endpoint serving this kind of record.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            RecordKind::RiskAttribution => "/market/factor/attribution",
            RecordKind::VarCompute => "/var/compute",
            RecordKind::VarBacktest => "/var/backtest",
        }
    }
}

/// A request for one raw record.
///
/// The body is passed through untouched; building it (portfolio, model
/// configuration, dates) is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRequest {
    /// What is being requested.
    pub kind: RecordKind,

    /// Request body.
    pub body: Value,
}

impl RecordRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(kind: RecordKind, body: Value) -> Self {
        Self { kind, body }
    }

    /// Upstream endpoint for this request.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        self.kind.endpoint()
    }
}

// =============================================================================
// SOURCE
// =============================================================================

/// Delivers raw records for requests.
pub trait RecordSource: Send + Sync {
    /// Fetches the raw record answering `request`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the record could not be delivered.
    fn fetch(&self, request: &RecordRequest) -> Result<Value, SourceError>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn fetch(&self, request: &RecordRequest) -> Result<Value, SourceError> {
        (**self).fetch(request)
    }
}

fn fetch_raw<S: RecordSource + ?Sized>(
    source: &S,
    kind: RecordKind,
    body: Value,
) -> Result<Value, SourceError> {
    let request = RecordRequest::new(kind, body);
    debug!(endpoint = request.endpoint(), "fetching record");
    source.fetch(&request)
}

/// Fetches and decodes a risk attribution.
///
/// # Errors
///
/// Returns [`FetchError::Source`] if fetching fails and
/// [`FetchError::Parse`] if the record cannot be decoded.
pub fn fetch_risk_attribution<S: RecordSource + ?Sized>(
    source: &S,
    body: Value,
    options: &DecodeOptions,
) -> Result<RiskAttributionResult, FetchError> {
    let raw = fetch_raw(source, RecordKind::RiskAttribution, body)?;
    Ok(decode_risk_attribution(&raw, options)?)
}

/// Fetches and decodes a single-day VaR computation.
///
/// # Errors
///
/// Returns [`FetchError::Source`] if fetching fails and
/// [`FetchError::Parse`] if the record cannot be decoded.
pub fn fetch_var_analysis<S: RecordSource + ?Sized>(
    source: &S,
    body: Value,
) -> Result<VaRAnalysisResult, FetchError> {
    let raw = fetch_raw(source, RecordKind::VarCompute, body)?;
    Ok(decode_var_analysis(&raw)?)
}

/// Fetches and decodes a VaR backtest.
///
/// # Errors
///
/// Returns [`FetchError::Source`] if fetching fails and
/// [`FetchError::Parse`] if the record cannot be decoded.
pub fn fetch_var_backtest<S: RecordSource + ?Sized>(
    source: &S,
    body: Value,
    options: &DecodeOptions,
) -> Result<VaRBacktestResult, FetchError> {
    let raw = fetch_raw(source, RecordKind::VarBacktest, body)?;
    Ok(decode_var_backtest(&raw, options)?)
}
