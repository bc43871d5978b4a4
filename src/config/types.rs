use serde::Deserialize;

/// Main configuration structure for Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub filter: FilterSection,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent fetch loops per seed
    pub workers: usize,

    /// Hard ceiling on the number of URLs ever enqueued in one run
    pub limit: usize,

    /// Fixed pause before every fetch (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_delay")]
    pub politeness_delay_ms: u64,

    /// Upper bound on a single fetch, redirects included (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

/// Link admission rules; every field falls back to the built-in defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSection {
    #[serde(rename = "allowed-schemes")]
    pub allowed_schemes: Option<Vec<String>>,

    /// Path suffixes such as ".html"; "" admits extension-less paths
    #[serde(rename = "allowed-filetypes")]
    pub allowed_filetypes: Option<Vec<String>>,

    /// Substrings that reject a URL wherever they appear
    pub denylist: Option<Vec<String>>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    pub name: String,
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Crawl output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one `<host>.txt` URL list per seed host
    pub directory: String,
}

/// Article text extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Number of pages processed concurrently
    #[serde(default = "default_extract_workers")]
    pub workers: usize,

    /// Extracted text must be strictly longer than this (characters)
    #[serde(rename = "min-length", default = "default_min_length")]
    pub min_length: usize,

    /// Directory receiving the extracted `.txt` files
    #[serde(rename = "output-directory", default = "default_extract_output")]
    pub output_directory: String,

    /// Stoplist used for stopword density; built-in list when absent
    pub stopwords: Option<Vec<String>>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            workers: default_extract_workers(),
            min_length: default_min_length(),
            output_directory: default_extract_output(),
            stopwords: None,
        }
    }
}

fn default_politeness_delay() -> u64 {
    100
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_extract_workers() -> usize {
    3
}

fn default_min_length() -> usize {
    2000
}

fn default_extract_output() -> String {
    "./texts".to_string()
}
