//! IX-007: Manifest export for the `import` action.
//!
//! Emits a JSON array with one `{id, version, source}` object per record.
//! Key order is fixed by field order so repeated exports diff cleanly.

use crate::core::error::BuildError;
use crate::core::types::{AppRecord, Source};
use serde::Serialize;

/// Source tag written for records without provenance.
const DEFAULT_SOURCE: &str = "winget";

/// One manifest entry.
#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    source: &'a str,
}

impl<'a> From<&'a AppRecord> for ManifestEntry<'a> {
    fn from(record: &'a AppRecord) -> Self {
        Self {
            id: record.id(),
            version: Some(record.version()).filter(|v| !v.is_empty()),
            source: record.source().map_or(DEFAULT_SOURCE, Source::as_str),
        }
    }
}

/// Serialize records into a pretty-printed manifest. Empty input gives `[]`.
pub fn export(records: &[AppRecord]) -> Result<String, BuildError> {
    let entries: Vec<ManifestEntry<'_>> = records.iter().map(ManifestEntry::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
