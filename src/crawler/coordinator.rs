//! Crawler coordinator - per-seed crawl orchestration
//!
//! This module wires one filter, one frontier and one worker pool per seed:
//! - Admitting the seed to a fresh frontier
//! - Running the worker pool until the frontier drains
//! - Cancelling the workers once every item is acknowledged
//! - Collecting the sorted set of every URL seen
//!
//! Seeds in a batch are crawled strictly one after another; nothing is
//! shared between two runs.

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::crawler::frontier::Frontier;
use crate::crawler::pool::{PoolConfig, WorkerPool};
use crate::output::{append_url_list, read_url_list};
use crate::url::{host_stem, parse_seed, FilterConfig, UrlFilter};
use crate::{HarvestError, UrlError};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of crawling one seed
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed as given
    pub seed: String,
    /// Seed host without `www.`, names the output file
    pub host: String,
    /// Every URL seen during the run, sorted lexicographically
    pub urls: Vec<String>,
    /// Pages fetched and parsed successfully
    pub crawled: usize,
    /// Pages whose fetch or extraction failed
    pub errors: usize,
    /// New URLs refused because the admission ceiling was reached
    pub dropped: usize,
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
}

impl Coordinator {
    /// Creates a coordinator with an HTTP client built from the configuration
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a coordinator that fetches through `client`
    pub fn with_client(config: Config, client: Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls everything reachable from `seed` and returns the sorted result
    ///
    /// The run builds its filter with the seed's host as allowed domain
    /// (recorded, not enforced), admits the seed, starts the worker pool,
    /// waits for the frontier to drain and then cancels the workers.
    pub async fn run(&self, seed: &str) -> Result<CrawlReport, HarvestError> {
        let start = Instant::now();
        let seed_url = parse_seed(seed)?;
        let host =
            host_stem(&seed_url).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;

        tracing::info!("Crawling {} (host {})", seed_url, host);

        let filter = Arc::new(UrlFilter::new(FilterConfig::from_section(
            &self.config.filter,
            &host,
        )));
        let frontier = Arc::new(Frontier::new(self.config.crawler.limit));
        frontier.admit([seed_url.to_string()]);

        let pool = WorkerPool::start(
            frontier.clone(),
            filter,
            self.client.clone(),
            PoolConfig {
                workers: self.config.crawler.workers,
                politeness_delay: Duration::from_millis(self.config.crawler.politeness_delay_ms),
            },
        );

        frontier.join().await;
        let summary = pool.shutdown().await;

        if summary.panicked > 0 {
            tracing::warn!("{} panics during the crawl of {}", summary.panicked, seed);
        }

        let stats = frontier.stats();
        let report = CrawlReport {
            seed: seed.trim().to_string(),
            host,
            urls: frontier.seen_sorted(),
            crawled: stats.done,
            errors: summary.errors,
            dropped: stats.dropped,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "Finished {}: {} crawled, {} found, {} errors, {} over limit in {:.2?}",
            report.seed,
            report.crawled,
            report.urls.len(),
            report.errors,
            report.dropped,
            report.elapsed
        );

        Ok(report)
    }

    /// Crawls one seed and appends its URL list to the output directory
    pub async fn run_and_save(&self, seed: &str) -> Result<(CrawlReport, PathBuf), HarvestError> {
        let report = self.run(seed).await?;
        let path = append_url_list(
            Path::new(&self.config.output.directory),
            &report.host,
            &report.urls,
        )?;
        tracing::info!("Appended {} URLs to {}", report.urls.len(), path.display());
        Ok((report, path))
    }
}

/// Reads a newline-delimited seed file, skipping blank lines
pub fn read_seeds(path: &Path) -> Result<Vec<String>, HarvestError> {
    Ok(read_url_list(path)?)
}

/// Runs one crawl per seed in `seeds_path`, sequentially
///
/// A seed that cannot be crawled (malformed URL, unwritable output) is
/// logged and skipped; the remaining seeds still run.
///
/// # Example
///
/// ```no_run
/// use harvest::config::load_config;
/// use harvest::crawler::run_batch;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let reports = run_batch(config, Path::new("seeds.txt")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_batch(config: Config, seeds_path: &Path) -> Result<Vec<CrawlReport>, HarvestError> {
    let seeds = read_seeds(seeds_path)?;
    tracing::info!("Loaded {} seeds from {}", seeds.len(), seeds_path.display());

    let coordinator = Coordinator::new(config)?;
    let mut reports = Vec::with_capacity(seeds.len());

    for seed in &seeds {
        match coordinator.run_and_save(seed).await {
            Ok((report, _)) => reports.push(report),
            Err(e) => tracing::error!("Crawl of {} failed: {}", seed, e),
        }
    }

    Ok(reports)
}
