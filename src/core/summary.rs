//! IX-009: Inventory summary and content fingerprint.
//!
//! The fingerprint is BLAKE3 over every record field in order, so two
//! inventories with identical content (and order) share a fingerprint
//! regardless of the format they were parsed from.

use super::types::AppRecord;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Where the boundary obtained the inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexOrigin {
    /// Captured from a live package-manager or registry query
    Live,
    /// Bundled sample data used because the live query returned nothing
    Fallback,
    /// Supplied by the operator as a file
    #[default]
    Upload,
}

impl fmt::Display for IndexOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Fallback => write!(f, "fallback"),
            Self::Upload => write!(f, "upload"),
        }
    }
}

impl FromStr for IndexOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "fallback" => Ok(Self::Fallback),
            "upload" => Ok(Self::Upload),
            other => Err(format!("unknown origin '{}' (expected live, fallback, or upload)", other)),
        }
    }
}

/// Counts and fingerprint for one inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub origin: IndexOrigin,
    pub total: usize,
    pub upgradeable: usize,
    /// Records per source tag (`unknown` when untagged), first-seen order
    pub by_source: IndexMap<String, usize>,
    /// `"blake3:{hex}"`
    pub fingerprint: String,
}

/// Summarize an inventory.
pub fn summarize(records: &[AppRecord], origin: IndexOrigin) -> InventorySummary {
    let mut by_source: IndexMap<String, usize> = IndexMap::new();
    for r in records {
        let tag = r.source().map_or("unknown", |s| s.as_str());
        *by_source.entry(tag.to_string()).or_insert(0) += 1;
    }

    InventorySummary {
        origin,
        total: records.len(),
        upgradeable: records.iter().filter(|r| r.is_upgrade_available()).count(),
        by_source,
        fingerprint: fingerprint(records),
    }
}

/// Hash records field by field. Returns `"blake3:{hex}"`.
pub fn fingerprint(records: &[AppRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for r in records {
        for field in [
            r.id(),
            r.name(),
            r.version(),
            r.available_version().unwrap_or_default(),
            r.publisher().unwrap_or_default(),
            r.source().map_or("", |s| s.as_str()),
        ] {
            hasher.update(field.as_bytes());
            hasher.update(b"\0");
        }
        hasher.update(b"\n");
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_inventory;
    use crate::core::types::Source;

    fn inventory() -> Vec<AppRecord> {
        vec![
            AppRecord::new("Git.Git", "Git", "2.43.0")
                .with_available_version(Some("2.44.0".to_string()))
                .with_source(Some(Source::Winget)),
            AppRecord::new("9WZDNCRFJ3TJ", "Netflix", "").with_source(Some(Source::MsStore)),
            AppRecord::new("Mozilla.Firefox", "Firefox", "124.0").with_source(Some(Source::Winget)),
            AppRecord::new("registry-3-Tool", "Tool", "1.0"),
        ]
    }

    #[test]
    fn test_ix009_counts() {
        let s = summarize(&inventory(), IndexOrigin::Live);
        assert_eq!(s.total, 4);
        assert_eq!(s.upgradeable, 1);
        let order: Vec<_> = s.by_source.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(order, vec![("winget", 2), ("msstore", 1), ("unknown", 1)]);
    }

    #[test]
    fn test_ix009_fingerprint_format() {
        let fp = fingerprint(&inventory());
        assert!(fp.starts_with("blake3:"));
        assert_eq!(fp.len(), 7 + 64);
    }

    #[test]
    fn test_ix009_fingerprint_is_content_addressed() {
        let json = r#"[{"Id":"npp.install","Name":"Notepad++","Version":"8.5"}]"#;
        let table = "Name       Id           Version\nNotepad++  npp.install  8.5\n";
        let a = parse_inventory(json).unwrap();
        let b = parse_inventory(table).unwrap();
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_ix009_fingerprint_order_sensitive() {
        let inv = inventory();
        let mut reversed = inv.clone();
        reversed.reverse();
        assert_ne!(fingerprint(&inv), fingerprint(&reversed));
    }

    #[test]
    fn test_ix009_field_boundaries() {
        let a = vec![AppRecord::new("ab", "c", "")];
        let b = vec![AppRecord::new("a", "bc", "")];
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_ix009_fingerprint_covers_every_stored_field() {
        let base = AppRecord::new("a.b", "AB", "1.0");
        let variants = [
            AppRecord::new("a.c", "AB", "1.0"),
            AppRecord::new("a.b", "AC", "1.0"),
            AppRecord::new("a.b", "AB", "1.1"),
            base.clone().with_available_version(Some("2.0".to_string())),
            base.clone().with_publisher(Some("Acme".to_string())),
            base.clone().with_source(Some(Source::Winget)),
        ];
        let reference = fingerprint(std::slice::from_ref(&base));
        for v in variants {
            assert_ne!(fingerprint(&[v]), reference);
        }
    }

    #[test]
    fn test_ix009_origin_parse_display() {
        assert_eq!("LIVE".parse::<IndexOrigin>().unwrap(), IndexOrigin::Live);
        assert_eq!(IndexOrigin::Fallback.to_string(), "fallback");
        assert!("cache".parse::<IndexOrigin>().is_err());
    }

    #[test]
    fn test_ix009_serializes() {
        let json = serde_json::to_string(&summarize(&[], IndexOrigin::Upload)).unwrap();
        assert!(json.contains("\"origin\":\"upload\""));
        assert!(json.contains("\"total\":0"));
    }
}
