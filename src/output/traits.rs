//! Collaborator traits and types
//!
//! This module defines the seams between a finished crawl and the services
//! that turn its report into prose: a message summarizer and an issue drafter.

use crate::state::Issue;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A bug-tracker issue ready to be filed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDraft {
    /// One-line title
    pub title: String,

    /// Markdown body
    pub body: String,

    pub labels: Vec<String>,
}

/// Condenses a report message before it is shown to a user
///
/// Implementations may call out to a language model or any other service.
/// Failures are never fatal; callers fall back to truncating the text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Returns a shorter rendition of `text`
    async fn summarize(&self, text: &str) -> OutputResult<String>;
}

/// Turns the issues of a run into an issue draft
#[async_trait]
pub trait IssueDrafter: Send + Sync {
    /// Drafts one issue covering every bug found while crawling `seed_url`
    async fn draft(&self, bugs: &[Issue], seed_url: &str) -> OutputResult<IssueDraft>;
}
