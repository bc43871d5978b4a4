//! Article text extraction stage
//!
//! Consumes a URL list produced by the crawler, fetches every page, strips
//! boilerplate and writes one text file per page whose extracted text is
//! longer than the configured minimum. Pages are processed concurrently and
//! independently; the only shared state is an atomic progress counter.
//!
//! Output files are named after the SHA-256 of their source URL, so a page
//! always maps to the same file and re-runs overwrite instead of piling up.

mod stoplist;
mod text;

pub use stoplist::DEFAULT_STOPWORDS;
pub use text::{ClassifierParams, Paragraph, ParagraphClass, TextExtractor};

use crate::config::Config;
use crate::crawler::{build_http_client, fetch_page};
use crate::output::read_url_list;
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Outcome counts of an extraction batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub processed: usize,
    pub written: usize,
    pub too_short: usize,
    pub failed: usize,
}

enum ItemOutcome {
    Written,
    TooShort,
    Failed,
}

/// Deterministic output file name for `url`
///
/// # Examples
///
/// ```
/// use harvest::extract::article_file_name;
///
/// let name = article_file_name("http://example.com/a");
/// assert_eq!(name, article_file_name("http://example.com/a"));
/// assert!(name.ends_with(".txt"));
/// ```
pub fn article_file_name(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{}.txt", hex::encode(hasher.finalize()))
}

/// Writes `text` to the output directory if it is longer than `min_length`
///
/// Length is measured in characters. Returns the written path, or `None`
/// when the text was too short.
pub fn write_article(
    directory: &Path,
    url: &str,
    text: &str,
    min_length: usize,
) -> std::io::Result<Option<PathBuf>> {
    if text.chars().count() <= min_length {
        return Ok(None);
    }

    let path = directory.join(article_file_name(url));
    std::fs::write(&path, text)?;
    Ok(Some(path))
}

/// Builds the text extractor described by the configuration
pub fn extractor_from_config(config: &Config) -> TextExtractor {
    match &config.extract.stopwords {
        Some(words) => TextExtractor::new(words),
        None => TextExtractor::default(),
    }
}

/// Runs the extraction stage over the URL list at `urls_path`
///
/// # Example
///
/// ```no_run
/// use harvest::config::load_config;
/// use harvest::extract::run_extraction;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_extraction(&config, Path::new("out/example.com.txt")).await?;
/// println!("{} files written", summary.written);
/// # Ok(())
/// # }
/// ```
pub async fn run_extraction(
    config: &Config,
    urls_path: &Path,
) -> Result<ExtractionSummary, HarvestError> {
    let urls = read_url_list(urls_path)?;
    tracing::info!("Loaded {} URLs from {}", urls.len(), urls_path.display());

    let client = build_http_client(&config.user_agent, &config.crawler)?;
    extract_urls(&client, config, urls).await
}

/// Fetches, extracts and writes every URL with bounded concurrency
pub async fn extract_urls(
    client: &Client,
    config: &Config,
    urls: Vec<String>,
) -> Result<ExtractionSummary, HarvestError> {
    let directory = PathBuf::from(&config.extract.output_directory);
    std::fs::create_dir_all(&directory)?;

    let extractor = Arc::new(extractor_from_config(config));
    let progress = Arc::new(AtomicUsize::new(0));
    let total = urls.len();
    let min_length = config.extract.min_length;

    let outcomes: Vec<ItemOutcome> = stream::iter(urls)
        .map(|url| {
            let extractor = extractor.clone();
            let progress = progress.clone();
            let directory = directory.clone();
            async move {
                process_item(client, &extractor, &directory, &url, min_length, &progress, total)
                    .await
            }
        })
        .buffer_unordered(config.extract.workers)
        .collect()
        .await;

    let mut summary = ExtractionSummary {
        processed: outcomes.len(),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            ItemOutcome::Written => summary.written += 1,
            ItemOutcome::TooShort => summary.too_short += 1,
            ItemOutcome::Failed => summary.failed += 1,
        }
    }

    tracing::info!(
        "Extraction finished: {} written, {} too short, {} failed",
        summary.written,
        summary.too_short,
        summary.failed
    );

    Ok(summary)
}

async fn process_item(
    client: &Client,
    extractor: &TextExtractor,
    directory: &Path,
    url: &str,
    min_length: usize,
    progress: &AtomicUsize,
    total: usize,
) -> ItemOutcome {
    let page = match fetch_page(client, url).await {
        Ok(page) => Some(page),
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            None
        }
    };

    let text = page.map(|page| extractor.extract(&page.body));

    let done = progress.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::info!(
        "Processing file: {}, {}/{}, {:.2}%",
        url,
        done,
        total,
        done as f64 / total.max(1) as f64 * 100.0
    );

    let Some(text) = text else {
        return ItemOutcome::Failed;
    };

    match write_article(directory, url, &text, min_length) {
        Ok(Some(path)) => {
            tracing::debug!("Wrote {} characters to {}", text.chars().count(), path.display());
            ItemOutcome::Written
        }
        Ok(None) => ItemOutcome::TooShort,
        Err(e) => {
            tracing::error!("Failed to write text for {}: {}", url, e);
            ItemOutcome::Failed
        }
    }
}
