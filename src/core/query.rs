//! IX-008: Inventory filtering, sorting, and selection.
//!
//! The operator narrows an inventory before synthesizing commands: free-text
//! search over name/id/publisher, a provenance filter, and an
//! upgrades-only switch. Sorting is stable and case-insensitive.

use super::types::AppRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Provenance filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceFilter {
    #[default]
    All,
    /// Records with no source tag
    Unknown,
    /// Records whose tag matches, case-insensitively
    Tag(String),
}

impl SourceFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Self::All
        } else if value.eq_ignore_ascii_case("unknown") {
            Self::Unknown
        } else {
            Self::Tag(value.to_string())
        }
    }

    pub fn matches(&self, record: &AppRecord) -> bool {
        match self {
            Self::All => true,
            Self::Unknown => record.source().is_none(),
            Self::Tag(tag) => record
                .source()
                .is_some_and(|s| s.as_str().eq_ignore_ascii_case(tag)),
        }
    }
}

/// Combined filter; the default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub search: String,
    pub source: SourceFilter,
    pub only_upgradeable: bool,
}

impl InventoryFilter {
    pub fn matches(&self, record: &AppRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || [Some(record.name()), Some(record.id()), record.publisher()]
                .into_iter()
                .flatten()
                .any(|v| v.to_lowercase().contains(&needle));

        matches_search
            && self.source.matches(record)
            && (!self.only_upgradeable || record.is_upgrade_available())
    }
}

/// Records matching `filter`, in inventory order.
pub fn filter_records(records: &[AppRecord], filter: &InventoryFilter) -> Vec<AppRecord> {
    records.iter().filter(|r| filter.matches(r)).cloned().collect()
}

/// Records whose id is in `ids`, in inventory order. Duplicate ids in the
/// inventory are all selected.
pub fn select_by_ids(records: &[AppRecord], ids: &[String]) -> Vec<AppRecord> {
    records
        .iter()
        .filter(|r| ids.iter().any(|id| id == r.id()))
        .cloned()
        .collect()
}

/// Column to sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Publisher,
    Version,
    Available,
}

impl SortKey {
    fn value(self, record: &AppRecord) -> String {
        let value = match self {
            Self::Name => record.name(),
            Self::Publisher => record.publisher().unwrap_or_default(),
            Self::Version => record.version(),
            Self::Available => record.available_version().unwrap_or_default(),
        };
        value.to_lowercase()
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "publisher" => Ok(Self::Publisher),
            "version" => Ok(Self::Version),
            "available" => Ok(Self::Available),
            other => Err(format!(
                "unknown sort key '{}' (expected name, publisher, version, or available)",
                other
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Publisher => write!(f, "publisher"),
            Self::Version => write!(f, "version"),
            Self::Available => write!(f, "available"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Stable, case-insensitive sort. Missing values sort as empty strings.
pub fn sort_records(records: &mut [AppRecord], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ord: Ordering = key.value(a).cmp(&key.value(b));
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}
