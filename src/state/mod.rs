//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the per-run aggregate of visited pages, tested links, blacklisted
//!   destinations, the frontier and the issue list
//! - `RunPhase`: the lifecycle of one crawl run
//! - `Issue`: one recorded problem with its type and severity

mod crawl_state;
mod issue;
mod run_phase;

// Re-export main types
pub use crawl_state::{Admission, CrawlResults, CrawlState, Enqueue};
pub use issue::{Issue, IssueType, Severity};
pub use run_phase::RunPhase;
