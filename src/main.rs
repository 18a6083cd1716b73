//! listing-qa: Marketplace-aware listing quality CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use listing_qa::analyzer::{AuditEngine, AuditJob};
use listing_qa::config::{build_ignore_set, is_ignored, load_config, starter_config, Config, CONFIG_FILENAME};
use listing_qa::history::{
    append_run, find_project_root, format_delta, load_history, previous_score, save_history,
    HISTORY_FILENAME,
};
use listing_qa::marketplace::ProfileRegistry;
use listing_qa::reporter::{ConsoleReporter, JsonReporter};
use listing_qa::{AuditedListing, ListingRequest};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

/// listing-qa: score product listings against marketplace rules
#[derive(Parser, Debug)]
#[command(name = "listing-qa")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Listing JSON file or directory to audit (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Marketplace id to audit against (overrides the listing and config)
    #[arg(long, short)]
    marketplace: Option<String>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .listingqarc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Audit listings in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Do not read or write score history
    #[arg(long)]
    no_history: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run MCP server (stdio JSON-RPC)
    Mcp {
        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List registered marketplaces with their fields and weights
    Marketplaces {
        /// Include disabled marketplaces
        #[arg(long)]
        all: bool,

        /// Output format as JSON
        #[arg(long)]
        json: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create .listingqarc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Default marketplace for listings that do not name one
        #[arg(long)]
        marketplace: Option<String>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::new().filter_or("LISTING_QA_LOG", default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(cmd) = args.command {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        return match cmd {
            Commands::Mcp { config } => {
                let registry = load_config(&cwd, config.as_deref())?.build_registry()?;
                listing_qa::mcp::run_mcp_server(&registry)?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Marketplaces { all, json, config } => {
                let registry = load_config(&cwd, config.as_deref())?.build_registry()?;
                run_marketplaces(&registry, all, json)
            }
            Commands::Init {
                threshold,
                marketplace,
                dir,
            } => run_init(threshold, marketplace.as_deref(), dir.as_deref().unwrap_or(cwd.as_path())),
        };
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("A listing file or directory is required");
    };

    // Resolve work directory for config search
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    // Load config (CLI flags override config file)
    let config = load_config(work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.marketplace.as_deref());
    let registry = config.build_registry()?;

    if let Some(ref id) = args.marketplace {
        // Fail fast instead of reporting the same error per file
        registry.get_marketplace_profile(id)?;
    }

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let listing_files = collect_listing_files(&path, ignore_set.as_ref())?;
    if listing_files.is_empty() {
        eprintln!("{}: No listing files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    // Set up parallel processing
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let (paths, jobs, mut had_errors) =
        load_jobs(&listing_files, &config, args.marketplace.as_deref(), args.quiet);

    let engine = AuditEngine::new(&registry);
    let use_parallel = args.parallel || jobs.len() > 10;
    let outcomes = if use_parallel {
        engine.analyze_parallel(&jobs)
    } else {
        engine.analyze_many(&jobs)
    };

    let mut audited = Vec::with_capacity(outcomes.len());
    for (path, outcome) in paths.into_iter().zip(outcomes) {
        match outcome {
            Ok(result) => audited.push(AuditedListing { path, result }),
            Err(e) => {
                had_errors = true;
                if !args.quiet {
                    eprintln!("{}: {}: {}", "Error".red(), path.display(), e);
                }
            }
        }
    }

    if audited.is_empty() {
        eprintln!("{}: All listings failed to audit", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let results: Vec<_> = audited.iter().map(|a| a.result.clone()).collect();
    let stats = AuditEngine::aggregate_stats(&results);

    let project_root = if args.no_history {
        None
    } else {
        find_project_root(work_dir)
    };
    let mut history = project_root.as_deref().map(load_history);

    // Output results
    if args.json {
        let reporter = JsonReporter::new().pretty();
        if audited.len() == 1 {
            println!("{}", reporter.report(&audited[0]));
        } else {
            println!("{}", reporter.report_with_summary(&audited, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new(&registry);
        for listing in &audited {
            let delta = history
                .as_ref()
                .map(|h| {
                    let previous = previous_score(h, &listing.path, &listing.result.marketplace);
                    format_delta(previous, listing.result.score)
                })
                .unwrap_or_default();
            reporter.report_quiet(listing, &delta);
        }
    } else {
        let mut reporter = ConsoleReporter::new(&registry);
        if args.verbose {
            reporter = reporter.verbose();
        }

        if audited.len() == 1 {
            reporter.report(&audited[0]);
        } else {
            reporter.report_many(&audited, &stats);
        }
    }

    // Persist trend history
    if let (Some(root), Some(h)) = (project_root.as_ref(), history.as_mut()) {
        append_run(h, &audited, None);
        if let Err(e) = save_history(root, h) {
            log::warn!("Failed to save score history: {}", e);
        }
    }

    // Check threshold (CLI, then per-path override, then config)
    let below: Vec<(&AuditedListing, u8)> = audited
        .iter()
        .filter_map(|listing| {
            let threshold = args
                .threshold
                .or(config.effective_for_file(&listing.path).threshold)?;
            (listing.result.score < threshold).then_some((listing, threshold))
        })
        .collect();

    if !below.is_empty() {
        if !args.quiet && !args.json {
            for (listing, threshold) in &below {
                eprintln!(
                    "{}: {} scored {}, below threshold {}",
                    "Failed".red().bold(),
                    listing.path.display(),
                    listing.result.score,
                    threshold
                );
            }
        }
        return Ok(ExitCode::from(1));
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Read and parse each listing, resolving its marketplace.
///
/// Marketplace precedence: CLI flag, the listing's own field, then config.
fn load_jobs(
    files: &[PathBuf],
    config: &Config,
    cli_marketplace: Option<&str>,
    quiet: bool,
) -> (Vec<PathBuf>, Vec<AuditJob>, bool) {
    let mut paths = Vec::new();
    let mut jobs = Vec::new();
    let mut had_errors = false;

    for file in files {
        match read_listing(file) {
            Ok(request) => {
                let marketplace = cli_marketplace
                    .map(str::to_string)
                    .or(request.marketplace)
                    .or_else(|| config.effective_for_file(file).marketplace);
                match marketplace {
                    Some(marketplace) => {
                        paths.push(file.clone());
                        jobs.push(AuditJob::new(request.content, marketplace));
                    }
                    None => {
                        had_errors = true;
                        if !quiet {
                            eprintln!(
                                "{}: {}: no marketplace given (use --marketplace, a \"marketplace\" field, or defaultMarketplace in {})",
                                "Error".red(),
                                file.display(),
                                CONFIG_FILENAME
                            );
                        }
                    }
                }
            }
            Err(e) => {
                had_errors = true;
                if !quiet {
                    eprintln!("{}: {:#}", "Error".red(), e);
                }
            }
        }
    }

    (paths, jobs, had_errors)
}

fn read_listing(file: &Path) -> Result<ListingRequest> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid listing JSON in {}", file.display()))
}

/// Collect listing files from a file or directory path
fn collect_listing_files(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if is_listing_file(file_path) {
            if let Some(set) = ignore_set {
                if is_ignored(file_path, set) {
                    continue;
                }
            }
            files.push(file_path.to_path_buf());
        }
    }

    // Sort for consistent output
    files.sort();

    Ok(files)
}

fn is_listing_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.is_file()
        && name.ends_with(".json")
        && name != CONFIG_FILENAME
        && name != HISTORY_FILENAME
}

fn run_marketplaces(registry: &ProfileRegistry, all: bool, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", JsonReporter::new().pretty().report_marketplaces(registry, all));
    } else {
        ConsoleReporter::new(registry).report_marketplaces(all);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(threshold: Option<u8>, marketplace: Option<&str>, dir: &Path) -> Result<ExitCode> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(id) = marketplace {
        ProfileRegistry::builtin()?
            .get_marketplace_profile(id)
            .with_context(|| format!("Cannot default to marketplace '{}'", id))?;
    }

    let config = starter_config(threshold.unwrap_or(70), marketplace);
    let json = serde_json::to_string_pretty(&config)?;

    std::fs::write(&config_path, format!("{}\n", json))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}, defaultMarketplace={}",
        "Done".green().bold(),
        config_path.display(),
        config.threshold.unwrap_or_default(),
        config.default_marketplace.as_deref().unwrap_or_default()
    );
    Ok(ExitCode::SUCCESS)
}
