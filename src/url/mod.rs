//! URL handling module for Site-Integrity
//!
//! This module provides the deduplication key used across a crawl run, origin
//! helpers for the same-origin rule, and coercion of user-supplied seed URLs.

mod domain;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{extract_origin, is_same_origin};
pub use normalize::{normalize_url, NormalizedUrl};

/// Coerces a user-supplied seed into an absolute HTTP(S) URL
///
/// Seeds without a scheme (for example `localhost:3001` or `example.com/docs`)
/// are treated as `http://` URLs.
///
/// # Examples
///
/// ```
/// use site_integrity::url::coerce_seed_url;
///
/// let url = coerce_seed_url("localhost:3001").unwrap();
/// assert_eq!(url.as_str(), "http://localhost:3001/");
/// assert!(coerce_seed_url("ftp://example.com").is_err());
/// ```
pub fn coerce_seed_url(raw: &str) -> Result<Url, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
