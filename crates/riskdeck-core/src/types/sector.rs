//! Hierarchical sector keys.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered list of taxonomy levels locating a sector in a hierarchy.
///
/// Levels run from most general to most specific, e.g.
/// `Currency → Transparent → Transparent DeFi Currency`. Equality, hashing
/// and ordering are structural over the level sequence, so a path keys both
/// `HashMap` and `BTreeMap`. Depth is not fixed: legacy payloads always carry
/// two levels, newer ones any number.
///
/// # Examples
///
/// ```
/// use riskdeck_core::SectorPath;
///
/// let leaf = SectorPath::new(["Currency", "Transparent", "Transparent DeFi Currency"]).unwrap();
/// let ancestors: Vec<String> = leaf.ancestors().iter().map(ToString::to_string).collect();
/// assert_eq!(ancestors, vec!["Currency", "Currency/Transparent"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SectorPath {
    levels: Vec<String>,
}

impl SectorPath {
    /// Creates a path from its levels.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySectorPath`] when no levels are given.
    pub fn new<I, S>(levels: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels: Vec<String> = levels.into_iter().map(Into::into).collect();
        if levels.is_empty() {
            return Err(CoreError::EmptySectorPath);
        }
        Ok(Self { levels })
    }

    /// Creates the two-level `[parent, sector]` path used by legacy payloads.
    ///
    /// Top-level sectors repeat themselves (`[Currency, Currency]`); that
    /// duplication is kept as-is.
    #[must_use]
    pub fn from_parent_and_sector(parent: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            levels: vec![parent.into(), sector.into()],
        }
    }

    /// Number of levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// All levels, most general first.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Level at `index` (0-based).
    #[must_use]
    pub fn level(&self, index: usize) -> Option<&str> {
        self.levels.get(index).map(String::as_str)
    }

    /// Most specific level.
    #[must_use]
    pub fn leaf(&self) -> &str {
        // non-empty by construction
        self.levels.last().map_or("", String::as_str)
    }

    /// Path with the last level removed, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<SectorPath> {
        if self.levels.len() < 2 {
            return None;
        }
        Some(Self {
            levels: self.levels[..self.levels.len() - 1].to_vec(),
        })
    }

    /// Every proper prefix, shortest first.
    #[must_use]
    pub fn ancestors(&self) -> Vec<SectorPath> {
        (1..self.levels.len())
            .map(|n| Self {
                levels: self.levels[..n].to_vec(),
            })
            .collect()
    }

    /// Returns true if `self` is a proper prefix of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &SectorPath) -> bool {
        self.levels.len() < other.levels.len() && other.levels.starts_with(&self.levels)
    }

    /// Returns true if `other` sits exactly one level below `self`.
    #[must_use]
    pub fn is_parent_of(&self, other: &SectorPath) -> bool {
        other.levels.len() == self.levels.len() + 1 && self.is_ancestor_of(other)
    }
}

impl TryFrom<Vec<String>> for SectorPath {
    type Error = CoreError;

    fn try_from(levels: Vec<String>) -> CoreResult<Self> {
        Self::new(levels)
    }
}

impl From<SectorPath> for Vec<String> {
    fn from(path: SectorPath) -> Self {
        path.levels
    }
}

impl fmt::Display for SectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.levels.join("/"))
    }
}
