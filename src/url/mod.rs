//! URL handling module for Harvest
//!
//! This module provides the link filter that decides which discovered URLs
//! are admitted to the crawl, plus host helpers used to name output files.

mod domain;
mod filter;

pub use domain::{extract_domain, host_stem};
pub use filter::{
    path_suffix, FilterConfig, UrlFilter, AUTH_PATTERNS, DEFAULT_DENYLIST, DEFAULT_FILETYPES,
    DEFAULT_SCHEMES,
};

use crate::UrlError;
use url::Url;

/// Parses a seed URL, requiring a host
///
/// # Examples
///
/// ```
/// use harvest::url::parse_seed;
///
/// assert!(parse_seed(" https://example.com/ ").is_ok());
/// assert!(parse_seed("not a url").is_err());
/// ```
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(seed.to_string()));
    }
    Ok(url)
}
