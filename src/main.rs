//! Harvest main entry point
//!
//! This is the command-line interface for the Harvest crawler and its
//! article text extraction stage.

use clap::{Parser, Subcommand};
use harvest::config::{load_config_with_hash, Config};
use harvest::crawler::run_batch;
use harvest::extract::run_extraction;
use harvest::output::{print_batch_summary, print_extraction_summary};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Harvest: collect in-scope URLs from seed pages and extract their article text
///
/// `crawl` follows filtered links from every seed in a file and appends the
/// URLs found to one file per seed host. `extract` turns such a URL list into
/// plain text files.
#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(version)]
#[command(about = "Collect in-scope URLs and extract article text", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every seed listed in a newline-delimited file
    Crawl {
        #[arg(value_name = "SEEDS")]
        seeds: PathBuf,
    },

    /// Extract article text from every URL listed in a file
    Extract {
        #[arg(value_name = "URLS")]
        urls: PathBuf,
    },

    /// Validate the configuration and print it without crawling
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Crawl { seeds } => handle_crawl(config, seeds).await?,
        Command::Extract { urls } => handle_extract(&config, urls).await?,
        Command::Check => handle_check(&config),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("harvest=info,warn"),
            1 => EnvFilter::new("harvest=debug,info"),
            2 => EnvFilter::new("harvest=trace,debug"),
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

/// Handles the `check` command: prints the effective configuration
fn handle_check(config: &Config) {
    println!("=== Harvest Configuration ===\n");

    println!("Crawler:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Admission limit: {}", config.crawler.limit);
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay_ms);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);

    println!("\nFilter:");
    match &config.filter.allowed_schemes {
        Some(schemes) => println!("  Schemes: {}", schemes.join(", ")),
        None => println!("  Schemes: default"),
    }
    match &config.filter.allowed_filetypes {
        Some(types) => println!("  Filetypes: {:?}", types),
        None => println!("  Filetypes: default"),
    }
    match &config.filter.denylist {
        Some(list) => println!("  Denylist: {} entries", list.len()),
        None => println!("  Denylist: default"),
    }

    println!("\nUser Agent: {}/{}", config.user_agent.name, config.user_agent.version);

    println!("\nOutput:");
    println!("  URL lists: {}", config.output.directory);
    println!("  Texts: {}", config.extract.output_directory);
    println!("  Minimum text length: {}", config.extract.min_length);
    println!("  Extraction workers: {}", config.extract.workers);

    println!("\n✓ Configuration is valid");
}

/// Handles the `crawl` command
async fn handle_crawl(config: Config, seeds: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling with {} workers, limit {}",
        config.crawler.workers,
        config.crawler.limit
    );

    match run_batch(config, &seeds).await {
        Ok(reports) => {
            print_batch_summary(&reports);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the `extract` command
async fn handle_extract(config: &Config, urls: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match run_extraction(config, &urls).await {
        Ok(summary) => {
            print_extraction_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Extraction failed: {}", e);
            Err(e.into())
        }
    }
}
