//! IX-011: CLI subcommands — init, parse, build, summary.
//!
//! The only layer that touches files, stdin, and stdout. Inventories are read
//! from a path or `-` for stdin, parsed, narrowed, and handed to the core.

use crate::core::config::{self, IndexerConfig};
use crate::core::query::{self, InventoryFilter, SortDirection, SortKey, SourceFilter};
use crate::core::summary::{self, IndexOrigin, InventorySummary};
use crate::core::types::{Action, AppRecord, CommandOptions, OutputFormat};
use crate::core::{codegen, parser};
use clap::{Args, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default winget-indexer.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Parse an inventory and list its applications
    Parse {
        /// Inventory file (JSON or `winget list` output), or `-` for stdin
        input: PathBuf,

        /// Emit canonical JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filter: FilterArgs,

        /// Sort column (name, publisher, version, available)
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Synthesize winget commands for selected applications
    Build {
        /// Inventory file, or `-` for stdin
        input: PathBuf,

        /// install, upgrade, uninstall, or import
        #[arg(short, long)]
        action: Action,

        /// Select by id (repeatable); default selects every listed application
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Append --silent
        #[arg(long)]
        silent: bool,

        /// Append --force
        #[arg(long)]
        force: bool,

        /// Join commands into one PowerShell line
        #[arg(long)]
        powershell: bool,

        #[command(flatten)]
        filter: FilterArgs,

        /// Config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show counts and a content fingerprint for an inventory
    Summary {
        /// Inventory file, or `-` for stdin
        input: PathBuf,

        /// How the inventory was obtained (live, fallback, upload)
        #[arg(long, default_value = "upload")]
        origin: IndexOrigin,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

/// Inventory narrowing flags shared by `parse` and `build`.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Match name, id, or publisher (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// all, unknown, or a source tag (winget, msstore, registry)
    #[arg(long)]
    pub source: Option<String>,

    /// Only applications with an upgrade available
    #[arg(long)]
    pub upgrades_only: bool,
}

impl FilterArgs {
    fn to_filter(&self) -> InventoryFilter {
        InventoryFilter {
            search: self.search.clone().unwrap_or_default(),
            source: self
                .source
                .as_deref()
                .map(SourceFilter::parse)
                .unwrap_or_default(),
            only_upgradeable: self.upgrades_only,
        }
    }
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Parse {
            input,
            json,
            filter,
            sort,
            desc,
            config,
        } => cmd_parse(&input, json, &filter, sort, desc, config.as_deref()),
        Commands::Build {
            input,
            action,
            ids,
            silent,
            force,
            powershell,
            filter,
            config,
        } => {
            let flags = BuildFlags {
                silent,
                force,
                powershell,
            };
            cmd_build(&input, action, &ids, flags, &filter, config.as_deref())
        }
        Commands::Summary {
            input,
            origin,
            json,
        } => cmd_summary(&input, origin, json),
    }
}

/// Option switches from the command line; each can only turn an option on.
#[derive(Debug, Clone, Copy, Default)]
struct BuildFlags {
    silent: bool,
    force: bool,
    powershell: bool,
}

fn cmd_init(path: &Path) -> Result<(), String> {
    let config_path = path.join(config::CONFIG_FILE_NAME);
    if config_path.exists() {
        return Err(format!("{} already exists", config_path.display()));
    }
    std::fs::create_dir_all(path).map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    std::fs::write(&config_path, config::default_config_yaml())
        .map_err(|e| format!("cannot write {}: {}", config_path.display(), e))?;

    println!("Created {}", config_path.display());
    Ok(())
}

fn cmd_parse(
    input: &Path,
    json: bool,
    filter: &FilterArgs,
    sort: Option<SortKey>,
    desc: bool,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let config = load_config(config_path)?;
    let records = load_inventory(input)?;
    if records.is_empty() {
        println!("No applications found.");
        return Ok(());
    }

    let mut shown = query::filter_records(&records, &filter.to_filter());
    let key = sort.unwrap_or(config.sort.key);
    let direction = if desc {
        SortDirection::Desc
    } else {
        config.sort.direction
    };
    query::sort_records(&mut shown, key, direction);

    if json {
        let out = serde_json::to_string_pretty(&shown).map_err(|e| format!("serialize error: {}", e))?;
        println!("{}", out);
    } else {
        print!("{}", render_listing(&shown));
        println!();
        println!("{} of {} applications shown.", shown.len(), records.len());
    }
    Ok(())
}

fn cmd_build(
    input: &Path,
    action: Action,
    ids: &[String],
    flags: BuildFlags,
    filter: &FilterArgs,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let config = load_config(config_path)?;
    let records = load_inventory(input)?;
    let listed = query::filter_records(&records, &filter.to_filter());
    let selected = if ids.is_empty() {
        listed
    } else {
        query::select_by_ids(&listed, ids)
    };
    tracing::info!(action = %action, selected = selected.len(), "building commands");

    let options = merge_options(&config, flags);
    let text = codegen::build_command(action, &selected, &options).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn cmd_summary(input: &Path, origin: IndexOrigin, json: bool) -> Result<(), String> {
    let records = load_inventory(input)?;
    let summary = summary::summarize(&records, origin);

    if json {
        let out = serde_json::to_string_pretty(&summary).map_err(|e| format!("serialize error: {}", e))?;
        println!("{}", out);
    } else if records.is_empty() {
        println!("No applications found.");
    } else {
        print!("{}", render_summary(&summary));
    }
    Ok(())
}

/// Config options with command-line switches applied on top.
fn merge_options(config: &IndexerConfig, flags: BuildFlags) -> CommandOptions {
    let mut options = config.options.clone();
    options.include_silent |= flags.silent;
    options.use_force |= flags.force;
    if flags.powershell {
        options.output_format = OutputFormat::Powershell;
    }
    options
}

fn load_config(path: Option<&Path>) -> Result<IndexerConfig, String> {
    match path {
        Some(p) => config::load_config(p).map_err(|e| e.to_string()),
        None => Ok(IndexerConfig::default()),
    }
}

/// Read and parse an inventory from a file, or stdin for `-`.
fn load_inventory(input: &Path) -> Result<Vec<AppRecord>, String> {
    let records = if input == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|e| format!("cannot read stdin: {}", e))?;
        parser::parse_inventory(&raw)
    } else {
        parser::parse_inventory_file(input)
    }
    .map_err(|e| e.to_string())?;

    tracing::debug!(count = records.len(), input = %input.display(), "inventory loaded");
    Ok(records)
}

/// Column-aligned listing. The output is itself a parseable table.
fn render_listing(records: &[AppRecord]) -> String {
    let headers = ["Name", "Id", "Version", "Available", "Source"];
    let rows: Vec<[&str; 5]> = records
        .iter()
        .map(|r| {
            [
                r.name(),
                r.id(),
                r.version(),
                r.available_version().unwrap_or_default(),
                r.source().map_or("", |s| s.as_str()),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[&str; 5]| -> String {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = w))
            .collect();
        line.join("  ").trim_end().to_string()
    };

    let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let mut out = String::new();
    out.push_str(&format_row(&headers));
    out.push('\n');
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

fn render_summary(summary: &InventorySummary) -> String {
    let mut out = format!(
        "Inventory ({}): {} applications, {} upgradeable\n",
        summary.origin, summary.total, summary.upgradeable
    );
    for (source, count) in &summary.by_source {
        out.push_str(&format!("  {}: {}\n", source, count));
    }
    out.push_str(&format!("  Fingerprint: {}\n", summary.fingerprint));
    out
}
