//! Site-Integrity: a budget-bounded website integrity crawler
//!
//! This crate walks a site breadth-first from a seed URL, probing pages, internal links
//! and clickable controls, and reports error pages, broken links, blank destinations and
//! broken buttons as a structured issue list.

pub mod config;
pub mod crawler;
pub mod output;
pub mod server;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Integrity operations
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Browser session error: {0}")]
    Session(#[from] crawler::SessionError),

    #[error("Crawler timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
///
/// Only seed coercion can fail; normalization of discovered URLs never does.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Site-Integrity operations
pub type Result<T> = std::result::Result<T, SiteError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, BrowserSession, Coordinator, HttpSession};
pub use output::{CrawlFailure, CrawlOutcome, CrawlReport};
pub use state::{CrawlState, Issue, IssueType, RunPhase, Severity};
pub use crate::url::{coerce_seed_url, normalize_url, NormalizedUrl};
