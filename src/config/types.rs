use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Integrity
///
/// Every section is optional; `Config::default()` is a complete, valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub heuristics: HeuristicsConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub server: ServerConfig,
}

/// Crawl budget and timing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of full-page crawl passes per run
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Number of internal links tested per healthy page
    #[serde(rename = "max-links-per-page")]
    pub max_links_per_page: usize,

    /// Number of buttons clicked per healthy page
    #[serde(rename = "max-buttons-per-page")]
    pub max_buttons_per_page: usize,

    /// Body text length a page must exceed to count as non-blank
    #[serde(rename = "content-threshold")]
    pub content_threshold: usize,

    /// Hard wall-clock limit for one crawl run (seconds)
    #[serde(rename = "run-timeout-secs")]
    pub run_timeout_secs: u64,

    /// Per-request timeout for the HTTP session (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Wait after loading a page before reading it (milliseconds)
    #[serde(rename = "page-settle-ms")]
    pub page_settle_ms: u64,

    /// Wait after loading a link destination (milliseconds)
    #[serde(rename = "link-settle-ms")]
    pub link_settle_ms: u64,

    /// Wait after clicking a button (milliseconds)
    #[serde(rename = "button-settle-ms")]
    pub button_settle_ms: u64,
}

impl CrawlerConfig {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn link_settle(&self) -> Duration {
        Duration::from_millis(self.link_settle_ms)
    }

    pub fn button_settle(&self) -> Duration {
        Duration::from_millis(self.button_settle_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 10,
            max_links_per_page: 30,
            max_buttons_per_page: 5,
            content_threshold: 100,
            run_timeout_secs: 60,
            request_timeout_secs: 15,
            page_settle_ms: 200,
            link_settle_ms: 100,
            button_settle_ms: 100,
        }
    }
}

/// Keyword lists for the error-page heuristic
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Matched against the lowercased page title
    #[serde(rename = "title-error-keywords")]
    pub title_error_keywords: Vec<String>,

    /// Matched against the lowercased body text
    #[serde(rename = "body-error-keywords")]
    pub body_error_keywords: Vec<String>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            title_error_keywords: vec!["404".to_string(), "error".to_string()],
            body_error_keywords: vec![
                "404 not found".to_string(),
                "page not found".to_string(),
                "not found".to_string(),
            ],
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SiteIntegrity".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/site-integrity".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the server binds to
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}
