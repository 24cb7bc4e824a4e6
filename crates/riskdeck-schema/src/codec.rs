//! JSON codec for raw records and canonical results.

use crate::error::{SchemaParseError, SchemaResult};
use serde::Serialize;
use serde_json::Value;

/// JSON codec using serde_json.
///
/// Decoding produces the untyped raw record consumed by the decoders; any
/// syntax error is reported as a [`SchemaParseError`] on the root (`$`).
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Create a new JSON codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec that pretty-prints on encode (for debugging).
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Parses JSON bytes into a raw record.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaParseError`] if `bytes` is not valid JSON.
    pub fn decode(&self, bytes: &[u8]) -> SchemaResult<Value> {
        serde_json::from_slice(bytes).map_err(|e| {
            SchemaParseError::new("$", e.to_string(), String::from_utf8_lossy(bytes))
        })
    }

    /// Parses JSON text into a raw record.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaParseError`] if `text` is not valid JSON.
    pub fn decode_str(&self, text: &str) -> SchemaResult<Value> {
        self.decode(text.as_bytes())
    }

    /// Serializes a canonical value for downstream consumers.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaParseError`] if the value cannot be represented as JSON.
    pub fn encode<T: Serialize>(&self, value: &T) -> SchemaResult<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map_err(|e| SchemaParseError::new("$", e.to_string(), ""))
    }

    /// MIME type of the encoded form.
    pub fn content_type(&self) -> &'static str {
        "application/json"
    }
}
