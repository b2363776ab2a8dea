//! IX-006: winget command lines for install, upgrade, and uninstall.

use crate::core::types::{AppRecord, CommandOptions};

/// Quote a value for the command line.
///
/// Always wraps in double quotes; an embedded `"` is doubled. Ids may contain
/// spaces and shell metacharacters, so nothing is passed through bare.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// `winget install --id <id> [--version <version>] --exact`
pub fn install_line(record: &AppRecord, options: &CommandOptions) -> String {
    let mut parts = vec![
        "winget install".to_string(),
        format!("--id {}", quote(record.id())),
    ];
    if !record.version().is_empty() {
        parts.push(format!("--version {}", quote(record.version())));
    }
    finish(parts, options)
}

/// `winget upgrade --id <id> --exact`. Never pins a version.
pub fn upgrade_line(record: &AppRecord, options: &CommandOptions) -> String {
    let parts = vec![
        "winget upgrade".to_string(),
        format!("--id {}", quote(record.id())),
    ];
    finish(parts, options)
}

/// `winget uninstall --id <id> --exact`
pub fn uninstall_line(record: &AppRecord, options: &CommandOptions) -> String {
    let parts = vec![
        "winget uninstall".to_string(),
        format!("--id {}", quote(record.id())),
    ];
    finish(parts, options)
}

fn finish(mut parts: Vec<String>, options: &CommandOptions) -> String {
    parts.push("--exact".to_string());
    if options.include_silent {
        parts.push("--silent".to_string());
    }
    if options.use_force {
        parts.push("--force".to_string());
    }
    parts.join(" ")
}
