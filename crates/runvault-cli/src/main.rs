//! runvault CLI
//!
//! The `runvault` command manages a directory of saved game runs.
//!
//! ## Commands
//!
//! - `analyze`: Validate a code and print its breakdown
//! - `find`: Search active runs
//! - `view`: Show one run or one of its past saves
//! - `discard`: Move a run into the ended directory
//! - `save`: Store a code as a new run, folding in an earlier save

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use runvault_core::{
    compile_key_value_pairs, compile_numeric_op, telemetry, Category, ModeParser, NumericOp,
    QueryError, QueryOptions, RecordStore, Region, RunRecord, SaveEntry, Settings,
    TableModeParser, VaultConfig,
};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "runvault")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Archive and search saved game runs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Store root holding one directory per category
    #[arg(long, global = true, env = "RUNVAULT_ROOT")]
    root: Option<PathBuf>,

    /// Settings document updated on save
    #[arg(long, global = true, env = "RUNVAULT_SETTINGS")]
    settings: Option<PathBuf>,

    /// JSON mode table used to read the gamemode field
    #[arg(long, global = true, env = "RUNVAULT_MODES")]
    modes: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a code and print its breakdown
    Analyze {
        /// Record code, with or without the surrounding parentheses
        code: String,

        /// Hide the safety token behind spoiler bars
        #[arg(long)]
        blur: bool,
    },

    /// Search active runs
    Find {
        /// Number operation on the screenshot count, e.g. `2` or `<2`
        #[arg(long)]
        screenshots: Option<String>,

        /// Category to keep (repeatable)
        #[arg(long = "category")]
        categories: Vec<Category>,

        /// Number operation on the number of past saves
        #[arg(long)]
        history: Option<String>,

        /// Server region
        #[arg(long)]
        region: Option<Region>,

        /// Field pairs, e.g. `[score;>=1000000],[tank;Falcon]`
        #[arg(long = "match")]
        pairs: Option<String>,
    },

    /// Show one run or one of its past saves
    View {
        /// Run id
        id: String,

        /// 1-based index into the run's past saves, oldest first
        #[arg(long)]
        history: Option<usize>,
    },

    /// Move a run into the ended directory
    Discard {
        /// Run id
        id: String,
    },

    /// Store a code as a new run
    Save {
        /// Record code
        code: String,

        /// Leave an earlier save with the same id where it is
        #[arg(long)]
        no_restore: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    telemetry::init_tracing(cli.json, level);

    let config = resolve_config(cli.root, cli.settings, cli.modes);
    debug!(root = %config.root.display(), "resolved vault config");

    match cli.command {
        Commands::Analyze { code, blur } => cmd_analyze(&config, &code, blur),
        Commands::Find {
            screenshots,
            categories,
            history,
            region,
            pairs,
        } => {
            let parser = load_modes(&config)?;
            let options = build_query(
                screenshots.as_deref(),
                categories,
                history.as_deref(),
                region,
                pairs.as_deref(),
                parser.as_ref(),
            )?;
            cmd_find(&config, parser, &options)
        }
        Commands::View { id, history } => cmd_view(&config, &id, history),
        Commands::Discard { id } => cmd_discard(&config, &id),
        Commands::Save { code, no_restore } => cmd_save(&config, &code, !no_restore),
    }
}

fn resolve_config(
    root: Option<PathBuf>,
    settings: Option<PathBuf>,
    modes: Option<PathBuf>,
) -> VaultConfig {
    let mut config = match root {
        Some(root) => VaultConfig::new(root),
        None => VaultConfig::from_env(),
    };
    if let Some(path) = settings {
        config = config.with_settings(path);
    }
    if let Some(path) = modes {
        config = config.with_modes(path);
    }
    config
}

fn load_modes(config: &VaultConfig) -> Result<Arc<dyn ModeParser>> {
    let table = TableModeParser::from_json_file(&config.modes_path)
        .with_context(|| format!("Failed to load mode table {:?}", config.modes_path))?;
    debug!(modes = table.len(), "loaded mode table");
    Ok(Arc::new(table))
}

fn open_store(config: &VaultConfig) -> Result<RecordStore> {
    let parser = load_modes(config)?;
    RecordStore::open(&config.root, parser)
        .with_context(|| format!("Failed to open store at {:?}", config.root))
}

fn numeric_arg(expr: &str) -> Result<NumericOp> {
    compile_numeric_op(expr).ok_or_else(|| {
        QueryError::Syntax {
            expr: expr.to_string(),
        }
        .into()
    })
}

fn build_query(
    screenshots: Option<&str>,
    categories: Vec<Category>,
    history: Option<&str>,
    region: Option<Region>,
    pairs: Option<&str>,
    parser: &dyn ModeParser,
) -> Result<QueryOptions> {
    let mut options = QueryOptions::default();
    if let Some(expr) = screenshots {
        options = options.with_screenshots(numeric_arg(expr)?);
    }
    if !categories.is_empty() {
        options = options.with_categories(categories);
    }
    if let Some(expr) = history {
        options = options.with_history(numeric_arg(expr)?);
    }
    if let Some(region) = region {
        options = options.with_region(region);
    }
    if let Some(expr) = pairs {
        options = options.with_fields(compile_key_value_pairs(expr, parser)?);
    }
    Ok(options)
}

/// Validate a code and print its breakdown
fn cmd_analyze(config: &VaultConfig, code: &str, blur: bool) -> Result<()> {
    let parser = load_modes(config)?;
    let record = RunRecord::parse(code.trim(), parser.as_ref())?;
    println!("{}", record.summary(blur));
    Ok(())
}

/// Search active runs
fn cmd_find(config: &VaultConfig, parser: Arc<dyn ModeParser>, options: &QueryOptions) -> Result<()> {
    let store = RecordStore::open(&config.root, parser)
        .with_context(|| format!("Failed to open store at {:?}", config.root))?;
    let found = store.query(options);

    if found.is_empty() {
        println!("No runs found.");
        return Ok(());
    }

    println!("Found {} of {} runs:", found.len(), store.len());
    for run in found {
        let record = run.record();
        let score = record
            .formatted_score()
            .unwrap_or_else(|_| record.score().to_string());
        println!(
            "  {}  {:<12} {:>7}  {}",
            record.id(),
            record.category().dir_name(),
            score,
            record.tank_class()
        );
    }
    Ok(())
}

fn print_entry(entry: &SaveEntry) {
    println!("{}", entry.record.summary(false));
    println!("Path: {}", entry.path.display());
    if let Some(shot) = &entry.windowed {
        println!("Windowed: {}", shot.display());
    }
    if let Some(shot) = &entry.fullscreen {
        println!("Fullscreen: {}", shot.display());
    }
}

/// Show one run or one of its past saves
fn cmd_view(config: &VaultConfig, id: &str, history: Option<usize>) -> Result<()> {
    let store = open_store(config)?;
    let entry = store.view(id, history)?;
    print_entry(entry);

    if history.is_none() {
        if let Some(run) = store.get(id) {
            println!("Past saves: {}", run.history.len());
        }
    }
    Ok(())
}

/// Move a run into the ended directory
fn cmd_discard(config: &VaultConfig, id: &str) -> Result<()> {
    let mut store = open_store(config)?;
    let run = store.discard(id)?;
    println!("Successfully discarded {}!", display_name(run.path()));
    Ok(())
}

/// Store a code as a new run
fn cmd_save(config: &VaultConfig, code: &str, restore: bool) -> Result<()> {
    let mut settings = Settings::load(&config.settings_path)
        .with_context(|| format!("Failed to read settings {:?}", config.settings_path))?;
    let mut store = open_store(config)?;

    let run = store.save(code, restore, &mut settings, Utc::now())?;
    println!("Saved {} to {}", run.id(), run.path().display());
    if !run.history.is_empty() {
        println!("Restored {} earlier save(s):", run.history.len());
        for past in &run.history {
            println!("  {}", past.path.display());
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use runvault_core::{ModeEntry, CODE_FILE};
    use std::fs;

    const CODE: &str = "(6e2121d4:#ef:w33oldscdreadnoughts2:Auto-Tri-Angle:8/8/9/9/9/9/9/7/1/0:10083590:2720:9:3:0:536:9:1728507182:5lZqbl5uVQDOddyJ)";

    fn vault() -> (tempfile::TempDir, VaultConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::new(dir.path());
        let table = TableModeParser::new().with_mode(
            "w33oldscdreadnoughts2",
            ModeEntry::default().with_custom_word("old"),
        );
        fs::write(&config.modes_path, serde_json::to_string(&table).unwrap()).unwrap();
        fs::write(&config.settings_path, r#"{"unclaimed":{}}"#).unwrap();
        (dir, config)
    }

    #[test]
    fn test_resolve_config_overrides() {
        let config = resolve_config(
            Some(PathBuf::from("/srv/vault")),
            None,
            Some(PathBuf::from("/etc/modes.json")),
        );
        assert_eq!(config.root, PathBuf::from("/srv/vault"));
        assert_eq!(config.settings_path, PathBuf::from("/srv/vault/settings.json"));
        assert_eq!(config.modes_path, PathBuf::from("/etc/modes.json"));
    }

    #[test]
    fn test_build_query_rejects_bad_number_operation() {
        let parser = TableModeParser::new();
        let err = build_query(Some("lots"), vec![], None, None, None, &parser).unwrap_err();
        assert!(format!("{err:#}").contains("lots"), "unexpected error: {err:#}");
    }

    #[test]
    fn test_save_then_discard() {
        let (_dir, config) = vault();
        cmd_save(&config, CODE, true).unwrap();

        let store = open_store(&config).unwrap();
        let run = store.get("6e2121d4").unwrap();
        assert!(run.path().join(CODE_FILE).is_file());

        cmd_discard(&config, "6e2121d4").unwrap();
        let store = open_store(&config).unwrap();
        assert!(store.is_empty());

        let err = cmd_discard(&config, "6e2121d4").unwrap_err();
        assert!(format!("{err:#}").contains("6e2121d4"));
    }

    #[test]
    fn test_missing_mode_table_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::new(dir.path());
        let err = cmd_analyze(&config, CODE, false).unwrap_err();
        assert!(
            format!("{err:#}").contains("Failed to load mode table"),
            "unexpected error: {err:#}"
        );
    }
}
