//! Error types for schema decoding.

use thiserror::Error;

/// Result type for decoding operations.
pub type SchemaResult<T> = Result<T, SchemaParseError>;

/// Longest record fragment carried by an error, in characters.
const MAX_FRAGMENT_CHARS: usize = 240;

/// A required field was missing or had the wrong shape.
///
/// Carries the dotted path of the field (e.g.
/// `absoluteContributionRisk.byAsset[3].assetId`) and a truncated rendering
/// of the record that contained it, so failures can be diagnosed without
/// the original payload.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Schema parse error at '{field}': {reason} (record: {fragment})")]
pub struct SchemaParseError {
    /// Dotted path of the offending field.
    pub field: String,

    /// What was wrong with it.
    pub reason: String,

    /// Truncated JSON of the enclosing record.
    pub fragment: String,
}

impl SchemaParseError {
    /// Creates a parse error, truncating the fragment.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        reason: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
            fragment: truncate_fragment(fragment.into()),
        }
    }

    /// Creates a parse error rendering `record` as the fragment.
    #[must_use]
    pub fn in_record(
        field: impl Into<String>,
        reason: impl Into<String>,
        record: &serde_json::Value,
    ) -> Self {
        Self::new(field, reason, record.to_string())
    }
}

/// Failure reported by a [`RecordSource`](crate::RecordSource).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The transport could not complete the request.
    #[error("Transport error calling {endpoint}: {message}")]
    Transport {
        /// Endpoint that was called.
        endpoint: String,
        /// Transport-level description.
        message: String,
    },

    /// The upstream service answered with a failure status.
    #[error("{endpoint} returned status {status}: {message}")]
    Status {
        /// Endpoint that was called.
        endpoint: String,
        /// Status code reported by the service.
        status: u16,
        /// Response message.
        message: String,
    },
}

impl SourceError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }
}

/// Error from fetching and then decoding a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The source failed to deliver the record.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The record was delivered but could not be decoded.
    #[error(transparent)]
    Parse(#[from] SchemaParseError),
}

fn truncate_fragment(fragment: String) -> String {
    match fragment.char_indices().nth(MAX_FRAGMENT_CHARS) {
        Some((cut, _)) => format!("{}...", &fragment[..cut]),
        None => fragment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = SchemaParseError::in_record(
            "factorRisk[0].factor",
            "missing required field",
            &json!({"absoluteContribution": 0.1}),
        );
        let msg = err.to_string();
        assert!(msg.contains("factorRisk[0].factor"));
        assert!(msg.contains("missing required field"));
        assert!(msg.contains("absoluteContribution"));
    }

    #[test]
    fn test_fetch_error_from() {
        let err: FetchError = SourceError::status("/var/backtest", 503, "unavailable").into();
        assert!(err.to_string().contains("503"));

        let err: FetchError = SchemaParseError::new("results", "missing required field", "{}").into();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_fragment_truncated() {
        let long = "x".repeat(1_000);
        let err = SchemaParseError::new("f", "r", long);
        assert_eq!(err.fragment.chars().count(), MAX_FRAGMENT_CHARS + 3);
        assert!(err.fragment.ends_with("..."));
    }

    #[test]
    fn test_fragment_truncation_respects_char_boundaries() {
        let long = "é".repeat(500);
        let err = SchemaParseError::new("f", "r", long);
        assert!(err.fragment.starts_with('é'));
    }
}
