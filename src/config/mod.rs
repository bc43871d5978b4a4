//! Configuration module for Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All settings are fixed at process start and passed explicitly to the
//! filter, frontier, worker pool and extraction stage.
//!
//! # Example
//!
//! ```no_run
//! use harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractConfig, FilterSection, OutputConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
