//! IX-010: YAML configuration for the command-line boundary.
//!
//! Holds the operator's default command options and inventory sort order.
//! Every field defaults, so an empty file is a valid config.

use super::error::ConfigError;
use super::query::{SortDirection, SortKey};
use super::types::CommandOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conventional config file name, written by `init`.
pub const CONFIG_FILE_NAME: &str = "winget-indexer.yaml";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Default synthesis options
    pub options: CommandOptions,

    /// Default listing order
    pub sort: SortConfig,
}

/// Sort order for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Parse a config from YAML text. Blank text is the default config.
pub fn parse_config(yaml: &str) -> Result<IndexerConfig, serde_yaml_ng::Error> {
    if yaml.trim().is_empty() {
        return Ok(IndexerConfig::default());
    }
    serde_yaml_ng::from_str(yaml)
}

/// Load a config file from disk.
pub fn load_config(path: &Path) -> Result<IndexerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Template written by `init`.
pub fn default_config_yaml() -> &'static str {
    r#"# winget-indexer configuration
options:
  include_silent: false
  use_force: false
  # multiline | powershell
  output_format: multiline

sort:
  # name | publisher | version | available
  key: name
  # asc | desc
  direction: asc
"#
}
