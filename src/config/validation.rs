use crate::config::types::{
    Config, CrawlerConfig, HeuristicsConfig, ServerConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Upper bound on links tested per page; the page snapshot never samples more.
pub const MAX_LINKS_PER_PAGE: usize = 30;

/// Upper bound on buttons clicked per page; the page snapshot never samples more.
pub const MAX_BUTTONS_PER_PAGE: usize = 8;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_heuristics_config(&config.heuristics)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates crawl budget and timing values
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > 1000 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and 1000, got {}",
            config.max_pages
        )));
    }

    if config.max_links_per_page < 1 || config.max_links_per_page > MAX_LINKS_PER_PAGE {
        return Err(ConfigError::Validation(format!(
            "max_links_per_page must be between 1 and {}, got {}",
            MAX_LINKS_PER_PAGE, config.max_links_per_page
        )));
    }

    if config.max_buttons_per_page > MAX_BUTTONS_PER_PAGE {
        return Err(ConfigError::Validation(format!(
            "max_buttons_per_page must be at most {}, got {}",
            MAX_BUTTONS_PER_PAGE, config.max_buttons_per_page
        )));
    }

    if config.run_timeout_secs < 1 || config.run_timeout_secs > 3600 {
        return Err(ConfigError::Validation(format!(
            "run_timeout_secs must be between 1 and 3600, got {}",
            config.run_timeout_secs
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.request_timeout_secs > config.run_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs ({}) cannot exceed run_timeout_secs ({})",
            config.request_timeout_secs, config.run_timeout_secs
        )));
    }

    Ok(())
}

/// Rejects blank keywords, which would match every page
fn validate_heuristics_config(config: &HeuristicsConfig) -> Result<(), ConfigError> {
    let all = config
        .title_error_keywords
        .iter()
        .chain(config.body_error_keywords.iter());

    for keyword in all {
        if keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "error keywords cannot be empty strings".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid server bind address '{}': {}", config.bind, e))
    })?;
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
