//! IX-003: Error types for parsing, synthesis, and configuration.

use std::path::PathBuf;
use thiserror::Error;

use super::types::Action;

/// Errors from the inventory parser.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Non-empty text that is neither JSON with records nor a recognizable table
    #[error("malformed inventory: {reason}")]
    MalformedInput { reason: String },

    /// Inventory file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}

/// Errors from the command synthesizer.
#[derive(Error, Debug)]
pub enum BuildError {
    /// install/upgrade/uninstall requested with no records selected
    #[error("no applications selected for {action}")]
    EmptySelection { action: Action },

    /// Action name outside install/upgrade/uninstall/import
    #[error("unsupported action '{0}' (expected install, upgrade, uninstall, or import)")]
    UnsupportedAction(String),

    /// Manifest serialization failed
    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Errors from loading a YAML configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
