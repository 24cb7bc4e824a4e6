//! Path-tracking accessors over raw JSON records.
//!
//! Every accessor reports failures as [`SchemaParseError`] carrying the full
//! dotted path of the field and the enclosing record. JSON `null` is treated
//! as absent.

use crate::error::{SchemaParseError, SchemaResult};
use chrono::NaiveDate;
use riskdeck_core::{AssetId, SectorPath};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A JSON node together with its path from the payload root.
#[derive(Debug, Clone)]
pub(crate) struct Record<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Record<'a> {
    /// Wraps the payload root.
    pub(crate) fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: String::new(),
        }
    }

    pub(crate) fn value(&self) -> &'a Value {
        self.value
    }

    pub(crate) fn path(&self) -> &str {
        if self.path.is_empty() {
            "$"
        } else {
            &self.path
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Error about `key` within this record.
    pub(crate) fn error(&self, key: &str, reason: impl Into<String>) -> SchemaParseError {
        SchemaParseError::in_record(self.child_path(key), reason, self.value)
    }

    /// Error about this record as a whole.
    pub(crate) fn error_here(&self, reason: impl Into<String>) -> SchemaParseError {
        SchemaParseError::in_record(self.path(), reason, self.value)
    }

    /// Raw value of `key`, `None` if absent or null.
    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.value.get(key).filter(|v| !v.is_null())
    }

    /// Returns true if `key` is present and not null.
    pub(crate) fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Required child record.
    pub(crate) fn field(&self, key: &str) -> SchemaResult<Record<'a>> {
        self.opt_field(key)
            .ok_or_else(|| self.error(key, "missing required field"))
    }

    /// Optional child record.
    pub(crate) fn opt_field(&self, key: &str) -> Option<Record<'a>> {
        self.get(key).map(|value| Record {
            value,
            path: self.child_path(key),
        })
    }

    /// Required number.
    pub(crate) fn f64(&self, key: &str) -> SchemaResult<f64> {
        self.opt_f64(key)?
            .ok_or_else(|| self.error(key, "missing required field"))
    }

    /// Optional number; present but non-numeric is still an error.
    pub(crate) fn opt_f64(&self, key: &str) -> SchemaResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.error(key, format!("expected a number, found {}", kind(v)))),
        }
    }

    /// Required string.
    pub(crate) fn str(&self, key: &str) -> SchemaResult<&'a str> {
        match self.get(key) {
            None => Err(self.error(key, "missing required field")),
            Some(v) => v
                .as_str()
                .ok_or_else(|| self.error(key, format!("expected a string, found {}", kind(v)))),
        }
    }

    /// Required asset identifier.
    pub(crate) fn asset_id(&self, key: &str) -> SchemaResult<AssetId> {
        let raw = self.str(key)?;
        parse_asset_id(raw).map_err(|reason| self.error(key, reason))
    }

    /// Required `YYYY-MM-DD` date; a longer ISO timestamp is read by its date prefix.
    pub(crate) fn date(&self, key: &str) -> SchemaResult<NaiveDate> {
        let raw = self.str(key)?;
        parse_date(raw).ok_or_else(|| self.error(key, format!("invalid date '{raw}'")))
    }

    /// Required list of records.
    pub(crate) fn list(&self, key: &str) -> SchemaResult<Vec<Record<'a>>> {
        self.opt_list(key)?
            .ok_or_else(|| self.error(key, "missing required field"))
    }

    /// Optional list of records; present but not an array is still an error.
    pub(crate) fn opt_list(&self, key: &str) -> SchemaResult<Option<Vec<Record<'a>>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.error(key, format!("expected a list, found {}", kind(value))))?;
        let base = self.child_path(key);
        Ok(Some(
            items
                .iter()
                .enumerate()
                .map(|(i, value)| Record {
                    value,
                    path: format!("{base}[{i}]"),
                })
                .collect(),
        ))
    }

    /// Optional list of strings, empty when absent.
    pub(crate) fn strings(&self, key: &str) -> SchemaResult<Vec<String>> {
        let Some(items) = self.opt_list(key)? else {
            return Ok(Vec::new());
        };
        items
            .iter()
            .map(|item| {
                item.value
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| item.error_here(format!("expected a string, found {}", kind(item.value))))
            })
            .collect()
    }

    /// Sector path from either `sectorLevels` or a legacy `parentSector`/`sector` pair.
    pub(crate) fn sector_path(&self) -> SchemaResult<SectorPath> {
        if self.has("sectorLevels") {
            let levels = self.strings("sectorLevels")?;
            return SectorPath::new(levels)
                .map_err(|e| self.error("sectorLevels", e.to_string()));
        }
        if self.has("parentSector") || self.has("sector") {
            let parent = self.str("parentSector")?;
            let sector = self.str("sector")?;
            return Ok(SectorPath::from_parent_and_sector(parent, sector));
        }
        Err(self.error(
            "sectorLevels",
            "missing required field (neither sectorLevels nor parentSector/sector present)",
        ))
    }
}

pub(crate) fn parse_asset_id(raw: &str) -> Result<AssetId, String> {
    AssetId::parse_str(raw).map_err(|e| format!("invalid asset id '{raw}': {e}"))
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
        raw.get(..10)
            .filter(|_| raw.len() > 10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
