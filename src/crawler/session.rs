//! The rendering session every probe runs against
//!
//! One session is owned by the coordinator for the lifetime of a run and lent to
//! each probe by `&mut`. Every navigation or click replaces the session's current
//! page, so callers must never assume where the session is after a probe.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A page the session has finished loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    /// URL after redirects
    pub final_url: Url,
    /// Transport status code of the final response
    pub status_code: u16,
    /// Document markup
    pub html: String,
}

/// Errors raised by a rendering session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to start browser session: {0}")]
    Launch(String),

    #[error("{message}")]
    Navigation { url: String, message: String },

    #[error("No page is loaded in the session")]
    NoPage,
}

/// A stateful browsing session that can load pages and invoke controls
#[async_trait]
pub trait BrowserSession: Send {
    /// Loads `url` and makes it the current page
    ///
    /// HTTP error statuses are not errors here; they come back in
    /// `LoadedPage::status_code`. Only transport failures return `Err`.
    async fn navigate(&mut self, url: &str) -> Result<LoadedPage, SessionError>;

    /// Invokes the first control on the current page whose label matches `label`
    ///
    /// Returns `Ok(None)` when no control matches. Otherwise returns the page the
    /// session is on after the click.
    async fn click(&mut self, label: &str) -> Result<Option<LoadedPage>, SessionError>;

    /// The page the session is currently on
    fn current_page(&self) -> Option<&LoadedPage>;

    /// Releases the session's resources
    async fn close(&mut self) -> Result<(), SessionError>;
}
