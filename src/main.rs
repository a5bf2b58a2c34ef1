//! Catalog-Crawler main entry point
//!
//! This is the command-line interface for the Catalog-Crawler harvester.

use anyhow::Context;
use catalog_crawler::config::{load_config_with_hash, validate, Config};
use catalog_crawler::crawler::{run_crawl, StopSignal};
use catalog_crawler::output::{load_statistics, print_report, print_statistics};
use catalog_crawler::url::listing_url;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Number of genres listed by --stats
const TOP_GENRES: usize = 10;

/// Catalog-Crawler: a polite paginated catalog harvester
///
/// Walks the listing pages of a catalog, scrapes every item's detail page
/// and keeps a JSON snapshot of all records collected so far.
#[derive(Parser, Debug)]
#[command(name = "catalog-crawler")]
#[command(version)]
#[command(about = "A polite paginated catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the catalog listing URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Override the output file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Stop after this many listing pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of an existing output file and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_crawler=info,warn"),
            1 => EnvFilter::new("catalog_crawler=debug,info"),
            2 => EnvFilter::new("catalog_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(base_url) = &cli.base_url {
        config.crawler.base_url = base_url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let crawler = &config.crawler;

    println!("=== Catalog-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", crawler.base_url);
    println!("  Page parameter: {}", crawler.page_param);
    match crawler.page_limit() {
        Some(limit) => println!("  Max pages: {}", limit),
        None => println!("  Max pages: unlimited (stops on first empty page)"),
    }
    println!("  Listing delay: {}ms", crawler.listing_delay_ms);
    println!("  Detail delay: {}ms", crawler.detail_delay_ms);
    println!("  Request timeout: {}ms", crawler.request_timeout_ms);
    println!("  Detail concurrency: {}", crawler.detail_concurrency);
    println!("  Max retries: {}", crawler.max_retries);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  {}", config.output.path);

    println!("\nSelectors:");
    for (key, selector) in config.selectors.entries() {
        println!("  {}: {}", key, selector);
    }

    println!("\nFirst listing pages:");
    for page in 1..=3 {
        println!(
            "  {}",
            listing_url(&crawler.base_url, &crawler.page_param, page)?
        );
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: statistics of the configured output file
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = PathBuf::from(&config.output.path);
    println!("Output file: {}\n", path.display());

    let stats = load_statistics(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    print_statistics(&stats, TOP_GENRES);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let stop = StopSignal::new();

    let interrupt = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight items before stopping");
            interrupt.trigger();
        }
    });

    tracing::info!("Output file: {}", config.output.path);

    match run_crawl(config, stop).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
