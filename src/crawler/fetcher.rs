//! HTTP rendering session
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Loading pages and following redirects
//! - Submitting forms when a submit control is clicked
//! - Error classification

use crate::config::Config;
use crate::crawler::parser::{resolve_click, ClickTarget, FormMethod, FormSubmission};
use crate::crawler::session::{BrowserSession, LoadedPage, SessionError};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, RequestBuilder};
use std::time::Duration;

/// Maximum redirect hops followed for one navigation
pub const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use site_integrity::config::Config;
/// use site_integrity::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let request_timeout = config.crawler.request_timeout();

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(request_timeout)
        .connect_timeout(request_timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A session that renders pages by fetching their static HTML
///
/// Scripts are never executed. Clicking a submit control submits its form; any
/// other control leaves the session where it is.
pub struct HttpSession {
    client: Client,
    current: Option<LoadedPage>,
}

impl HttpSession {
    /// Opens a session using the configured user agent and timeouts
    pub fn new(config: &Config) -> Result<Self, SessionError> {
        let client =
            build_http_client(config).map_err(|e| SessionError::Launch(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    /// Sends a request and makes the response the current page
    async fn load(&mut self, request: RequestBuilder, url: &str) -> Result<LoadedPage, SessionError> {
        let response = request.send().await.map_err(|e| navigation_error(url, &e))?;

        let final_url = response.url().clone();
        let status_code = response.status().as_u16();
        let html = response.text().await.map_err(|e| navigation_error(url, &e))?;

        tracing::trace!("Loaded {} (HTTP {}, {} bytes)", final_url, status_code, html.len());

        let page = LoadedPage {
            final_url,
            status_code,
            html,
        };
        self.current = Some(page.clone());
        Ok(page)
    }

    async fn submit(&mut self, submission: FormSubmission) -> Result<LoadedPage, SessionError> {
        let url = submission.action.to_string();
        tracing::debug!("Submitting {:?} form to {}", submission.method, url);

        let request = match submission.method {
            FormMethod::Get => {
                let mut action = submission.action;
                action
                    .query_pairs_mut()
                    .clear()
                    .extend_pairs(submission.fields.iter());
                self.client.get(action)
            }
            FormMethod::Post => self.client.post(submission.action).form(&submission.fields),
        };

        self.load(request, &url).await
    }
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<LoadedPage, SessionError> {
        let request = self.client.get(url);
        self.load(request, url).await
    }

    async fn click(&mut self, label: &str) -> Result<Option<LoadedPage>, SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoPage)?;

        match resolve_click(&current.html, &current.final_url, label) {
            None => Ok(None),
            Some(ClickTarget::Inert) => Ok(Some(current.clone())),
            Some(ClickTarget::Submit(submission)) => self.submit(submission).await.map(Some),
        }
    }

    fn current_page(&self) -> Option<&LoadedPage> {
        self.current.as_ref()
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.current = None;
        Ok(())
    }
}

/// Classifies a transport failure into a short navigation message
fn navigation_error(url: &str, error: &reqwest::Error) -> SessionError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else if error.is_redirect() {
        format!("Too many redirects (more than {})", MAX_REDIRECTS)
    } else {
        error.to_string()
    };

    SessionError::Navigation {
        url: url.to_string(),
        message,
    }
}
