//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The bounded, deduplicating frontier and its termination detector
//! - HTTP fetching with redirects and per-fetch timeouts
//! - HTML link extraction
//! - The worker pool and the per-seed coordinator
//!
//! [`run_batch`] is the entry point: it crawls every seed of a file in
//! turn and appends each sorted URL list to `<output>/<host>.txt`.

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod pool;

pub use coordinator::{read_seeds, run_batch, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_page, FetchedPage, MAX_REDIRECTS};
pub use frontier::{Frontier, FrontierStats, MAX_URL_LENGTH};
pub use parser::extract_links;
pub use pool::{PoolConfig, PoolCounters, PoolSummary, WorkerPool};
