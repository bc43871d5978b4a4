//! Output module for crawl results
//!
//! This module handles:
//! - Appending each crawl's sorted URL list to a per-host file
//! - Summarising crawl and extraction runs for the terminal

pub mod stats;

pub use stats::{print_batch_summary, print_extraction_summary, CrawlStatistics};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Returns the crawl output path for `host` inside `directory`
///
/// Characters that are not portable in file names (such as the `:` of a
/// port) are replaced with `_`.
pub fn url_list_path(directory: &Path, host: &str) -> PathBuf {
    let stem: String = host
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    directory.join(format!("{}.txt", stem))
}

/// Appends `urls`, one per line, to the host's output file
///
/// The file and its directory are created when missing. Existing content is
/// kept, so repeated runs accumulate without deduplication.
pub fn append_url_list(
    directory: &Path,
    host: &str,
    urls: &[String],
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(directory)?;
    let path = url_list_path(directory, host);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    let mut content = urls.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    file.write_all(content.as_bytes())?;

    Ok(path)
}

/// Reads a newline-delimited URL list, skipping blank lines
pub fn read_url_list(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
