//! Output module for crawl reports and the prose built from them
//!
//! This module handles:
//! - Assembling the final report from a finished crawl
//! - Rendering reports and issue drafts as markdown
//! - Summarizing and drafting through pluggable collaborators
//! - Tallying issue statistics

mod issue_draft;
mod markdown;
mod report;
pub mod stats;
mod summary;
mod traits;

pub use issue_draft::{draft_issue, fallback_issue_draft, TemplateIssueDrafter, MAX_TITLE_CHARS};
pub use markdown::{
    format_issue_draft, format_markdown_report, generate_markdown_report, write_issue_draft,
};
pub use report::{CrawlFailure, CrawlOutcome, CrawlReport};
pub use stats::{print_statistics, IssueStatistics};
pub use summary::{
    format_outcome_message, format_report_message, summarize_message, SUMMARY_FALLBACK_CHARS,
};
pub use traits::{IssueDraft, IssueDrafter, OutputError, OutputResult, Summarizer};
