//! CrawlCraft main entry point
//!
//! This is the command-line interface for the CrawlCraft crawler.

use anyhow::Context;
use clap::Parser;
use crawlcraft::config::{compute_config_hash, parse_config, validate, Config};
use crawlcraft::crawler::crawl;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// CrawlCraft: a polite breadth-first web crawler
///
/// CrawlCraft starts from a seed URL, stores the title, meta description,
/// headings, images and paragraphs of every page it fetches, and follows
/// links breadth-first up to a maximum depth.
#[derive(Parser, Debug)]
#[command(name = "crawlcraft")]
#[command(version)]
#[command(about = "A polite breadth-first web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the seed URL from the config file
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Override the storage path from the config file
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Override the maximum crawl depth from the config file
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Append logs to this file (overrides `log-path` in the config)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_effective_config(&cli)?;

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.output.log_path.as_ref().map(PathBuf::from));
    setup_logging(cli.verbose, cli.quiet, log_file.as_deref())?;

    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, &config_hash).await
}

/// Loads the config file, applies command-line overrides, then validates
///
/// Validation runs once on the final values, so an override can replace
/// an invalid value from the file.
fn load_effective_config(cli: &Cli) -> anyhow::Result<(Config, String)> {
    let load_context = || format!("Failed to load configuration from {}", cli.config.display());

    let mut config = parse_config(&cli.config).with_context(load_context)?;
    let config_hash = compute_config_hash(&cli.config).with_context(load_context)?;

    apply_overrides(&mut config, cli);
    validate(&config).context("Invalid configuration")?;

    Ok((config, config_hash))
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(seed) = &cli.seed {
        config.crawler.seed_url = seed.clone();
    }
    if let Some(output) = &cli.output {
        config.output.storage_path = output.clone();
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// With a log file, every event is written both to stdout and appended to
/// the file.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawlcraft=info,warn"),
            1 => EnvFilter::new("crawlcraft=debug,info"),
            2 => EnvFilter::new("crawlcraft=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            builder
                .with_ansi(false)
                .with_writer(std::io::stdout.and(Mutex::new(file)))
                .init();
        }
        None => builder.init(),
    }

    Ok(())
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== CrawlCraft Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Rate limit: {:?}", config.crawler.min_interval());

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Attempts per URL: {}", config.fetcher.retry_count);
    println!("  Retry delay: {:?}", config.fetcher.retry_delay());
    println!("  Timeout: {}s", config.fetcher.timeout);

    println!("\nOutput:");
    println!("  Storage: {} ({:?})", config.output.storage_path, config.output.format);
    if let Some(log_path) = &config.output.log_path {
        println!("  Log file: {}", log_path);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling from {} (max depth {})",
        config.crawler.seed_url,
        config.crawler.max_depth
    );

    match crawl(config, config_hash).await {
        Ok(stats) => {
            tracing::info!(
                "Crawl completed successfully: {} pages stored in {}",
                stats.pages_stored,
                config.output.storage_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
