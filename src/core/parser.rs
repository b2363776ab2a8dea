//! IX-002: Inventory parsing and normalization.
//!
//! Accepts the raw text a boundary captured (winget JSON output, a registry
//! export, an uploaded file, or a column-aligned `winget list` table) and
//! returns canonical [`AppRecord`]s in parse order:
//! - JSON is tried first; on decode failure the table grammar runs
//! - Empty text is zero records, not an error
//! - `isUpgradeAvailable` is always recomputed, never read from the input

use super::columns::{self, TableHeader};
use super::error::ParseError;
use super::types::{AppRecord, Source};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::LazyLock;

/// Keys tried, in order, when a JSON object wraps its record array.
const WRAPPER_KEYS: &[&str] = &["apps", "packages", "data", "items", "records"];

static FOOTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+ (upgrades?|packages?) available\.?|the following packages .*:)$")
        .expect("static regex")
});

/// Shape of a raw inventory, decided before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    /// Top-level array of objects
    JsonArray,
    /// Object with a field holding the record array
    JsonWrapped,
    /// Column-aligned text table with a header row
    Table,
    /// Blank input
    Empty,
    /// Non-empty input matching no grammar
    Unrecognized,
}

/// Canonical field a JSON key or table column maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Name,
    Version,
    Available,
    Publisher,
    Source,
}

/// Alias table shared by JSON keys and table headers (case-insensitive).
fn field_for(key: &str) -> Option<Field> {
    match key.to_ascii_lowercase().as_str() {
        "id" | "packageidentifier" => Some(Field::Id),
        "name" | "displayname" | "packagename" => Some(Field::Name),
        "version" | "displayversion" => Some(Field::Version),
        "available" | "availableversion" => Some(Field::Available),
        "publisher" => Some(Field::Publisher),
        "source" => Some(Field::Source),
        _ => None,
    }
}

/// Keys whose presence marks package-manager provenance.
fn is_package_key(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "id" | "packageidentifier" | "source"
    )
}

/// Keys whose presence marks a registry (uninstall-key) export.
fn is_registry_key(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "displayname" | "displayversion"
    )
}

/// Header words recognized when locating a table's header row.
fn is_header_word(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "name"
            | "id"
            | "version"
            | "available"
            | "availableversion"
            | "source"
            | "publisher"
            | "displayname"
            | "displayversion"
    )
}

// ============================================================================
// Detection
// ============================================================================

/// Detection result carrying what extraction needs, so JSON is decoded once.
enum Detected {
    Empty,
    JsonArray(Vec<Value>),
    JsonWrapped(Vec<Value>),
    Table(Vec<String>),
    Unrecognized(String),
}

impl Detected {
    fn format(&self) -> InventoryFormat {
        match self {
            Self::Empty => InventoryFormat::Empty,
            Self::JsonArray(_) => InventoryFormat::JsonArray,
            Self::JsonWrapped(_) => InventoryFormat::JsonWrapped,
            Self::Table(_) => InventoryFormat::Table,
            Self::Unrecognized(_) => InventoryFormat::Unrecognized,
        }
    }
}

/// Classify raw inventory text without extracting records.
pub fn detect_format(raw: &str) -> InventoryFormat {
    sniff(raw).format()
}

fn sniff(raw: &str) -> Detected {
    let text = raw.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return Detected::Empty;
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => {
            if items.is_empty() || items.iter().any(Value::is_object) {
                Detected::JsonArray(items)
            } else {
                Detected::Unrecognized("JSON array holds no objects".to_string())
            }
        }
        Ok(Value::Object(map)) => match unwrap_records(map) {
            Some(items) => Detected::JsonWrapped(items),
            None => Detected::Unrecognized("JSON object has no array of records".to_string()),
        },
        Ok(other) => Detected::Unrecognized(format!("JSON {} is not an inventory", json_kind(&other))),
        Err(e) => {
            tracing::debug!("not JSON ({}), trying table grammar", e);
            let lines: Vec<String> = text.lines().map(clean_line).collect();
            if lines.iter().any(|l| TableHeader::detect(l, is_header_word).is_some()) {
                Detected::Table(lines)
            } else {
                Detected::Unrecognized("neither JSON nor a table with a recognizable header".to_string())
            }
        }
    }
}

/// Terminal semantics for a captured line: a bare `\r` returns the cursor,
/// so only the text after the last one is visible (winget's progress spinner).
fn clean_line(line: &str) -> String {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.rsplit('\r').next().unwrap_or_default().to_string()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn holds_records(v: &Value) -> bool {
    match v {
        Value::Array(items) => items.is_empty() || items.iter().any(Value::is_object),
        _ => false,
    }
}

/// Find the record array inside a wrapping object.
///
/// winget's export document (`Sources[].Packages[]`) is flattened, each
/// package inheriting its source's name. Otherwise well-known wrapper keys
/// are preferred, then the first field holding an array of objects.
fn unwrap_records(mut map: Map<String, Value>) -> Option<Vec<Value>> {
    if let Some(packages) = flatten_export_sources(&map) {
        return Some(packages);
    }

    let key = WRAPPER_KEYS
        .iter()
        .find_map(|want| {
            map.iter()
                .find(|(k, v)| k.eq_ignore_ascii_case(want) && holds_records(v))
                .map(|(k, _)| k.clone())
        })
        .or_else(|| map.iter().find(|(_, v)| holds_records(v)).map(|(k, _)| k.clone()))?;

    match map.remove(&key) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn flatten_export_sources(map: &Map<String, Value>) -> Option<Vec<Value>> {
    let sources = map
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("sources"))
        .and_then(|(_, v)| v.as_array())?;

    let mut packages = Vec::new();
    let mut found = false;
    for entry in sources.iter().filter_map(Value::as_object) {
        let Some(list) = get_ci(entry, "packages").and_then(Value::as_array) else {
            continue;
        };
        found = true;
        let source_name = get_ci(entry, "sourcedetails")
            .and_then(Value::as_object)
            .and_then(|d| get_ci(d, "name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        for pkg in list.iter().filter_map(Value::as_object) {
            let mut pkg = pkg.clone();
            if let Some(name) = &source_name {
                if get_ci(&pkg, "source").is_none() {
                    pkg.insert("Source".to_string(), Value::String(name.clone()));
                }
            }
            packages.push(Value::Object(pkg));
        }
    }
    found.then_some(packages)
}

fn get_ci<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

// ============================================================================
// Extraction
// ============================================================================

/// Fields collected for one record before normalization.
#[derive(Debug, Default)]
struct Draft {
    id: Option<String>,
    name: Option<String>,
    version: Option<String>,
    available: Option<String>,
    publisher: Option<String>,
    source: Option<String>,
    /// An explicit `null` source: keep the record untagged
    untagged: bool,
}

impl Draft {
    /// Set a field unless an earlier alias already filled it.
    fn set(&mut self, field: Field, value: String) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let slot = match field {
            Field::Id => &mut self.id,
            Field::Name => &mut self.name,
            Field::Version => &mut self.version,
            Field::Available => &mut self.available,
            Field::Publisher => &mut self.publisher,
            Field::Source => &mut self.source,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    fn is_blank(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }
}

/// Provenance implied by the input as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    PackageManager,
    Registry,
    Unknown,
}

impl Shape {
    fn from_keys<'a>(mut keys: impl Iterator<Item = &'a str> + Clone) -> Self {
        if keys.clone().any(is_package_key) {
            Self::PackageManager
        } else if keys.any(is_registry_key) {
            Self::Registry
        } else {
            Self::Unknown
        }
    }

    fn default_source(self) -> Option<Source> {
        match self {
            Self::PackageManager => Some(Source::Winget),
            Self::Registry => Some(Source::Registry),
            Self::Unknown => None,
        }
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn extract_json(items: &[Value]) -> Vec<AppRecord> {
    let objects: Vec<&Map<String, Value>> = items.iter().filter_map(Value::as_object).collect();
    let shape = Shape::from_keys(objects.iter().flat_map(|o| o.keys().map(String::as_str)));

    let drafts = objects.iter().map(|obj| {
        let mut draft = Draft::default();
        for (key, value) in obj.iter() {
            match (field_for(key), scalar_to_string(value)) {
                (Some(field), Some(text)) => draft.set(field, text),
                (Some(Field::Source), None) if value.is_null() => draft.untagged = true,
                _ => {}
            }
        }
        draft
    });

    finish(drafts, shape)
}

fn extract_table(lines: &[String]) -> Vec<AppRecord> {
    let mut drafts = Vec::new();
    let mut shape = Shape::Unknown;
    let mut header: Option<TableHeader> = None;
    let mut after_header = false;
    let grammars = columns::default_grammars();

    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);

    for line in &lines[..end] {
        if let Some(found) = TableHeader::detect(line, is_header_word) {
            tracing::debug!(columns = found.columns.len(), "table header found");
            let section = Shape::from_keys(found.columns.iter().map(|c| c.label.as_str()));
            if shape != Shape::PackageManager {
                shape = section;
            }
            header = Some(found);
            after_header = true;
            continue;
        }
        let Some(layout) = &header else {
            continue;
        };
        if after_header && columns::is_separator(line) {
            after_header = false;
            continue;
        }
        after_header = false;

        let trimmed = line.trim();
        if trimmed.is_empty() || FOOTER.is_match(trimmed) {
            continue;
        }
        let Some(cells) = columns::split_row(line, layout, &grammars) else {
            tracing::debug!(line = %line, "skipping wrapped line");
            continue;
        };

        let mut draft = Draft::default();
        for (col, cell) in layout.columns.iter().zip(cells) {
            if let Some(field) = field_for(&col.label) {
                draft.set(field, cell);
            }
        }
        drafts.push(draft);
    }

    finish(drafts.into_iter(), shape)
}

/// Normalize drafts into records: drop blanks, synthesize ids, default source.
fn finish(drafts: impl Iterator<Item = Draft>, shape: Shape) -> Vec<AppRecord> {
    let default_source = shape.default_source();
    let mut dropped = 0usize;

    let records: Vec<AppRecord> = drafts
        .filter(|d| {
            let keep = !d.is_blank();
            if !keep {
                dropped += 1;
            }
            keep
        })
        .enumerate()
        .map(|(ordinal, d)| {
            let name = d.name.unwrap_or_default();
            let id = d
                .id
                .unwrap_or_else(|| format!("registry-{}-{}", ordinal, name));
            let fallback = if d.untagged { None } else { default_source.clone() };
            let source = d.source.map(|s| Source::parse(&s)).or(fallback);
            AppRecord::new(id, name, d.version.unwrap_or_default())
                .with_available_version(d.available)
                .with_publisher(d.publisher)
                .with_source(source)
        })
        .collect();

    if dropped > 0 {
        tracing::debug!(dropped, "dropped entries with neither name nor id");
    }
    records
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse raw inventory text into canonical records.
pub fn parse_inventory(raw: &str) -> Result<Vec<AppRecord>, ParseError> {
    let detected = sniff(raw);
    tracing::debug!(format = ?detected.format(), "inventory format detected");

    match detected {
        Detected::Empty => Ok(Vec::new()),
        Detected::JsonArray(items) | Detected::JsonWrapped(items) => Ok(extract_json(&items)),
        Detected::Table(lines) => Ok(extract_table(&lines)),
        Detected::Unrecognized(reason) => Err(ParseError::malformed(reason)),
    }
}

/// Read an inventory file from disk and parse it.
pub fn parse_inventory_file(path: &Path) -> Result<Vec<AppRecord>, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_inventory(&content)
}
