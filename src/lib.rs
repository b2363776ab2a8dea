//! winget-indexer — installed-application inventories to reproducible winget commands.
//!
//! Two pure entry points: [`parse_inventory`] normalizes raw JSON or
//! `winget list` text into [`AppRecord`]s, and [`build_command`] renders a
//! selection of records as install/upgrade/uninstall commands or an import
//! manifest.

pub mod actions;
pub mod cli;
pub mod core;

pub use crate::core::codegen::{build_command, build_command_named};
pub use crate::core::error::{BuildError, ConfigError, ParseError};
pub use crate::core::parser::{detect_format, parse_inventory, parse_inventory_file, InventoryFormat};
pub use crate::core::types::{Action, AppRecord, CommandOptions, OutputFormat, Source};
