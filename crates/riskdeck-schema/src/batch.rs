//! Batch decoding of independent records.
//!
//! Uses rayon when the `parallel` feature is enabled and the batch is large
//! enough; see [`DecodeOptions::should_parallelize`].

use crate::error::SchemaResult;
use crate::options::DecodeOptions;
use serde_json::Value;
use tracing::debug;

/// Decodes every record with `decode`, conditionally in parallel.
///
/// Records are independent: one failure does not stop the others, and the
/// output keeps input order.
///
/// # Example
///
/// ```rust
/// use riskdeck_schema::{decode_many, decode_var_backtest, DecodeOptions};
/// use serde_json::json;
///
/// let records = vec![json!({"results": []}), json!({"breaches": []})];
/// let decoded = decode_many(&records, &DecodeOptions::default(), decode_var_backtest);
/// assert!(decoded[0].is_ok());
/// assert!(decoded[1].is_err());
/// ```
pub fn decode_many<T, F>(records: &[Value], options: &DecodeOptions, decode: F) -> Vec<SchemaResult<T>>
where
    T: Send,
    F: Fn(&Value, &DecodeOptions) -> SchemaResult<T> + Sync + Send,
{
    debug!(
        records = records.len(),
        parallel = options.should_parallelize(records.len()),
        "decoding batch"
    );

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if options.should_parallelize(records.len()) {
            return records.par_iter().map(|raw| decode(raw, options)).collect();
        }
    }

    records.iter().map(|raw| decode(raw, options)).collect()
}
