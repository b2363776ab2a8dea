//! IX-001: Canonical inventory and command types.
//!
//! `AppRecord` is the one shape every inventory format normalizes into.
//! Records are built once and never mutated; the derived upgrade flag is
//! recomputed on every construction step so a source-supplied value can
//! never leak through.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::BuildError;

// ============================================================================
// Provenance
// ============================================================================

/// Which listing mechanism produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Winget,
    MsStore,
    Registry,
    Other(String),
}

impl Source {
    /// Parse a provenance tag. Matching is case-insensitive.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        match tag.to_ascii_lowercase().as_str() {
            "winget" => Self::Winget,
            "msstore" | "microsoft store" => Self::MsStore,
            "registry" => Self::Registry,
            _ => Self::Other(tag.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Winget => "winget",
            Self::MsStore => "msstore",
            Self::Registry => "registry",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Source> for String {
    fn from(s: Source) -> Self {
        s.as_str().to_string()
    }
}

// ============================================================================
// AppRecord
// ============================================================================

/// One installed application, normalized.
///
/// Serializes with camelCase keys; absent optionals are omitted, except
/// `source`, which is written as `null` so re-parsing keeps the record
/// untagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    id: String,
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publisher: Option<String>,
    source: Option<Source>,
    is_upgrade_available: bool,
}

impl AppRecord {
    /// Create a record. An empty `name` falls back to `id`.
    ///
    /// Records are only built by the parser, which never yields a blank id.
    pub(crate) fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        let id = id.into();
        debug_assert!(!id.trim().is_empty(), "record id must not be blank");
        let mut name = name.into();
        if name.is_empty() {
            name.clone_from(&id);
        }
        Self {
            id,
            name,
            version: version.into(),
            available_version: None,
            publisher: None,
            source: None,
            is_upgrade_available: false,
        }
    }

    /// Set the latest known version. Empty strings mean "no upgrade data".
    pub fn with_available_version(mut self, available: Option<String>) -> Self {
        self.available_version = available.filter(|v| !v.is_empty());
        self.is_upgrade_available = upgrade_available(&self.version, self.available_version.as_deref());
        self
    }

    pub fn with_publisher(mut self, publisher: Option<String>) -> Self {
        self.publisher = publisher.filter(|p| !p.is_empty());
        self
    }

    pub fn with_source(mut self, source: Option<Source>) -> Self {
        self.source = source;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn available_version(&self) -> Option<&str> {
        self.available_version.as_deref()
    }

    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn is_upgrade_available(&self) -> bool {
        self.is_upgrade_available
    }
}

/// The upgrade flag derivation: a newer version is known and differs.
pub fn upgrade_available(version: &str, available: Option<&str>) -> bool {
    matches!(available, Some(a) if !a.is_empty() && a != version)
}

// ============================================================================
// Command synthesis
// ============================================================================

/// Package-manager action to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Install,
    Upgrade,
    Uninstall,
    /// Manifest export, replayable with `winget import`
    Import,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Upgrade => write!(f, "upgrade"),
            Self::Uninstall => write!(f, "uninstall"),
            Self::Import => write!(f, "import"),
        }
    }
}

impl FromStr for Action {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "install" => Ok(Self::Install),
            "upgrade" => Ok(Self::Upgrade),
            "uninstall" => Ok(Self::Uninstall),
            "import" | "export" | "manifest" => Ok(Self::Import),
            _ => Err(BuildError::UnsupportedAction(s.to_string())),
        }
    }
}

/// How per-record commands are joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One command per line
    #[default]
    Multiline,
    /// Commands joined with ` ; ` into one line
    Powershell,
}

/// Options controlling command synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandOptions {
    /// Append `--silent`
    pub include_silent: bool,

    /// Append `--force`
    pub use_force: bool,

    pub output_format: OutputFormat,
}

// ============================================================================
// Tests
// ============================================================================
