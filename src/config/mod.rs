//! Configuration module for Site-Integrity
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a missing file or an empty one is a valid setup.
//!
//! # Example
//!
//! ```no_run
//! use site_integrity::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-integrity.toml")).unwrap();
//! println!("Page budget: {}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HeuristicsConfig, ServerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, MAX_BUTTONS_PER_PAGE, MAX_LINKS_PER_PAGE};
