//! Page classification
//!
//! Heuristic error and blank detection lives behind `ClassificationPolicy` so it
//! can be swapped or tested without any navigation. The page and link paths fold
//! the transport status in on top of the policy; button results do not, since a
//! click is not a navigation request.

use crate::config::Config;
use crate::crawler::parser::{PageButton, PageLink, ParsedPage};
use url::Url;

/// Everything a probe learned about one loaded page
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub title: String,
    pub final_url: Url,
    pub status_code: u16,
    pub links: Vec<PageLink>,
    pub buttons: Vec<PageButton>,
    /// Body text is longer than the content threshold
    pub has_content: bool,
    /// Title or body text matched an error keyword
    pub is_error_page_heuristic: bool,
}

impl PageSnapshot {
    /// Builds a snapshot from parsed markup, evaluating the policy's signals
    pub fn from_parsed(
        parsed: ParsedPage,
        final_url: Url,
        status_code: u16,
        policy: &dyn ClassificationPolicy,
    ) -> Self {
        Self {
            has_content: policy.has_content(&parsed.body_text),
            is_error_page_heuristic: policy.looks_like_error(&parsed.title, &parsed.body_text),
            title: parsed.title,
            final_url,
            status_code,
            links: parsed.links,
            buttons: parsed.buttons,
        }
    }

    pub fn is_http_error(&self) -> bool {
        self.status_code >= 400
    }
}

/// Outcome of classifying one loaded page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Error,
    Blank,
    Healthy,
}

/// Decides whether a page is an error page, blank or healthy
pub trait ClassificationPolicy: Send + Sync {
    /// True when the body text counts as real content
    fn has_content(&self, body_text: &str) -> bool;

    /// True when the title or body reads like an error page
    fn looks_like_error(&self, title: &str, body_text: &str) -> bool;

    /// Classifies a snapshot from its content signals alone
    ///
    /// Error wins over blank.
    fn verdict(&self, snapshot: &PageSnapshot) -> Verdict {
        if snapshot.is_error_page_heuristic {
            Verdict::Error
        } else if !snapshot.has_content {
            Verdict::Blank
        } else {
            Verdict::Healthy
        }
    }
}

/// Classifies a page or link destination, treating HTTP >= 400 as an error
pub fn classify_navigation(policy: &dyn ClassificationPolicy, snapshot: &PageSnapshot) -> Verdict {
    if snapshot.is_http_error() {
        Verdict::Error
    } else {
        policy.verdict(snapshot)
    }
}

/// Keyword and length based policy
#[derive(Debug, Clone)]
pub struct HeuristicPolicy {
    title_keywords: Vec<String>,
    body_keywords: Vec<String>,
    content_threshold: usize,
}

impl HeuristicPolicy {
    pub fn new(
        title_keywords: Vec<String>,
        body_keywords: Vec<String>,
        content_threshold: usize,
    ) -> Self {
        Self {
            title_keywords: title_keywords.iter().map(|k| k.to_lowercase()).collect(),
            body_keywords: body_keywords.iter().map(|k| k.to_lowercase()).collect(),
            content_threshold,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.heuristics.title_error_keywords.clone(),
            config.heuristics.body_error_keywords.clone(),
            config.crawler.content_threshold,
        )
    }
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ClassificationPolicy for HeuristicPolicy {
    fn has_content(&self, body_text: &str) -> bool {
        body_text.chars().count() > self.content_threshold
    }

    fn looks_like_error(&self, title: &str, body_text: &str) -> bool {
        let title = title.to_lowercase();
        if self.title_keywords.iter().any(|k| title.contains(k.as_str())) {
            return true;
        }

        let body = body_text.to_lowercase();
        self.body_keywords.iter().any(|k| body.contains(k.as_str()))
    }
}
