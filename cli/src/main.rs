use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use launcher_sync_core::{
    ConfigStore, LoadState, MergeOptions, MergeOutcome, merge_records, resolve_config_path,
};
use launcher_sync_discovery::locate::{RootLocator, SystemLocator};
use launcher_sync_discovery::output::{OutputFormat, format_report};
use launcher_sync_discovery::{ScanConfig, ScanOutcome, scan};
use tracing_subscriber::EnvFilter;

const RULE_WIDTH: usize = 60;

/// Log filter used with `--verbose` when `RUST_LOG` is unset.
const VERBOSE_FILTER: &str = "warn,launcher_sync_core=debug,launcher_sync_discovery=debug";

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Table,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "launcher-sync")]
#[command(about = "Scan installed Steam games and add them to Apollo/Sunshine")]
struct Cli {
    /// Print per-manifest diagnostics and skipped entries.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Discover installed games and append missing ones to apps.json.
    Sync(SyncArgs),
    /// Discover installed games and print a report without writing anything.
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct LibraryArgs {
    /// Custom Steam library path(s). Replaces auto-detection entirely.
    #[arg(long = "steam-path", value_name = "PATH", num_args = 1..)]
    steam_paths: Vec<PathBuf>,
    /// Steam install root. Skips the registry lookup.
    #[arg(long, value_name = "PATH")]
    steam_root: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SyncArgs {
    #[command(flatten)]
    library: LibraryArgs,
    /// Apollo/Sunshine apps.json path, or the directory containing it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Do not mark added games with `virtual-display`.
    #[arg(long)]
    no_virtual_display: bool,
}

#[derive(Debug, Args)]
struct ScanArgs {
    #[command(flatten)]
    library: LibraryArgs,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Sync(args) => run_sync(args, cli.verbose),
        Command::Scan(args) => run_scan(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { "warn" }
}

/// Builds the scan inputs. Explicit library paths win over any root; an
/// explicit root wins over the locator.
fn scan_config(args: &LibraryArgs, locator: &impl RootLocator) -> ScanConfig {
    if !args.steam_paths.is_empty() {
        return ScanConfig {
            root: None,
            explicit_libraries: args.steam_paths.clone(),
        };
    }
    ScanConfig {
        root: args.steam_root.clone().or_else(|| locator.locate()),
        explicit_libraries: Vec::new(),
    }
}

fn run_sync(args: SyncArgs, verbose: bool) -> Result<(), String> {
    print_rule();
    println!("Steam to Apollo Game Scanner");
    print_rule();
    println!();

    let config = scan_config(&args.library, &SystemLocator);
    if config.explicit_libraries.is_empty() && config.root.is_none() {
        println!("Could not find Steam installation");
        println!("Use --steam-path to specify custom Steam library locations");
        return Ok(());
    }

    let outcome = scan(&config);
    print_library_selection(&config, &outcome);

    println!("\nFound {} library folder(s)", outcome.library_count());
    if outcome.library_count() == 0 {
        println!("\nNo Steam library folders found!");
        println!("Use --steam-path to specify custom locations");
        return Ok(());
    }

    println!("\nScanning for games...");
    if verbose {
        print_scan_details(&outcome);
    }
    let records = &outcome.extraction.records;
    println!("Found {} installed game(s)\n", records.len());
    if records.is_empty() {
        println!("No games found in the specified locations");
        return Ok(());
    }

    let virtual_display = !args.no_virtual_display;
    println!("Adding games to Apollo...");
    if virtual_display {
        println!("Virtual display will be enabled for added games\n");
    } else {
        println!("Virtual display is disabled\n");
    }

    let store = ConfigStore::new(resolve_config_path(args.config.as_deref()));
    println!("Apollo config path: {}", store.path().display());
    let loaded = store.load();
    match &loaded.state {
        LoadState::Loaded => {
            println!("Loaded existing config with {} apps", loaded.config.app_count());
        }
        LoadState::Missing => println!("No existing config found, will create new one"),
        LoadState::Corrupt(reason) => {
            println!("Error loading config: {reason}");
            println!("Starting from an empty config");
        }
    }

    let merged = merge_records(loaded.config, records, MergeOptions { virtual_display });
    print_merge(&merged, virtual_display, verbose);

    if !merged.has_changes() {
        println!("No new games to add (all games already in config)");
        return Ok(());
    }

    store.save(&merged.config).map_err(|err| {
        format!(
            "Failed to save config '{}': {err}",
            store.path().display()
        )
    })?;
    println!("\nConfiguration saved to {}", store.path().display());
    println!("Total apps in config: {}", merged.config.app_count());

    println!();
    print_rule();
    println!("Total games added: {}", merged.added_count());
    println!(
        "Virtual display: {}",
        if virtual_display { "Enabled" } else { "Disabled" }
    );
    print_rule();
    println!("Restart Apollo/Sunshine for changes to take effect.");
    Ok(())
}

fn run_scan(args: ScanArgs) -> Result<(), String> {
    let config = scan_config(&args.library, &SystemLocator);
    let outcome = scan(&config);
    let rendered = format_report(&outcome.report(), args.format.into())?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn print_rule() {
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn print_library_selection(config: &ScanConfig, outcome: &ScanOutcome) {
    if let Some(root) = &config.root {
        println!("Steam path: {}", root.display());
        return;
    }
    println!("Using custom Steam library paths:");
    for path in &config.explicit_libraries {
        println!("  {}", library_status_line(path, &outcome.resolution.missing));
    }
}

fn library_status_line(path: &Path, missing: &[PathBuf]) -> String {
    if missing.iter().any(|m| m == path) {
        format!("[missing] {} (not found)", path.display())
    } else {
        format!("[ok] {}", path.display())
    }
}

fn print_scan_details(outcome: &ScanOutcome) {
    for library in &outcome.extraction.libraries_without_steamapps {
        println!("  {}: steamapps folder not found", library.display());
    }
    for skipped in &outcome.extraction.skipped {
        println!("  Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
}

fn print_merge(merged: &MergeOutcome, virtual_display: bool, verbose: bool) {
    let suffix = if virtual_display {
        " [Virtual Display Enabled]"
    } else {
        ""
    };
    for name in &merged.added {
        println!("Added: {name}{suffix}");
    }
    if verbose {
        for name in &merged.skipped {
            println!("Skipped (already exists): {name}");
        }
    }
}
