//! Structural detection of the upstream payload generation.
//!
//! Upstream does not reliably tag payloads with a version, so the shape is
//! inferred from which fields are present. Individual entries are still
//! decoded by their own keys; the detected shape is informational.

use riskdeck_core::SchemaShape;
use serde_json::Value;

const CONTRIBUTION_KEYS: [&str; 2] = ["absoluteContributionRisk", "relativeContributionRisk"];

/// Detects which upstream generation produced a risk attribution payload.
///
/// - [`SchemaShape::Flat`] if a `sectorFactorExposures` list is present
/// - [`SchemaShape::Levelled`] if any sector entry carries `sectorLevels`
/// - [`SchemaShape::Legacy`] if any sector entry carries `parentSector`
///
/// A payload with no sector data at all is reported as levelled.
#[must_use]
pub fn detect_shape(raw: &Value) -> SchemaShape {
    if raw.get("sectorFactorExposures").is_some_and(Value::is_array) {
        return SchemaShape::Flat;
    }

    let sector_entries = CONTRIBUTION_KEYS
        .iter()
        .filter_map(|key| raw.get(key).and_then(|c| c.get("bySector")))
        .chain(raw.get("sectorFactorExposure"))
        .filter_map(Value::as_array)
        .flatten();

    let mut legacy = false;
    for entry in sector_entries {
        if entry.get("sectorLevels").is_some_and(|v| !v.is_null()) {
            return SchemaShape::Levelled;
        }
        if entry.get("parentSector").is_some_and(|v| !v.is_null()) {
            legacy = true;
        }
    }

    if legacy {
        SchemaShape::Legacy
    } else {
        SchemaShape::Levelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat() {
        let raw = json!({"sectorFactorExposures": [], "sectorFactorExposure": []});
        assert_eq!(detect_shape(&raw), SchemaShape::Flat);
    }

    #[test]
    fn test_levelled_from_by_sector() {
        let raw = json!({
            "absoluteContributionRisk": {"bySector": [{"sectorLevels": ["Currency"]}]}
        });
        assert_eq!(detect_shape(&raw), SchemaShape::Levelled);
    }

    #[test]
    fn test_legacy_from_exposures() {
        let raw = json!({
            "sectorFactorExposure": [{"parentSector": "Currency", "sector": "BaaS"}]
        });
        assert_eq!(detect_shape(&raw), SchemaShape::Legacy);
    }

    #[test]
    fn test_no_sector_data() {
        assert_eq!(detect_shape(&json!({})), SchemaShape::Levelled);
    }
}
