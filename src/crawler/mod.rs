//! Crawler module for probing pages, links and buttons
//!
//! This module contains the core crawling logic, including:
//! - The browser session abstraction and its HTTP implementation
//! - HTML parsing into links, buttons and form submissions
//! - Page classification through a pluggable policy
//! - Link and button testing against the shared crawl state
//! - Overall crawl coordination under a run timeout

mod button_tester;
mod classifier;
mod coordinator;
mod fetcher;
mod link_tester;
mod parser;
mod prober;
mod session;

#[cfg(test)]
mod testing;

pub use button_tester::{test_buttons, ButtonTestReport, ButtonTiming};
pub use classifier::{
    classify_navigation, ClassificationPolicy, HeuristicPolicy, PageSnapshot, Verdict,
};
pub use coordinator::{run_crawl, run_with_session, Coordinator};
pub use fetcher::{build_http_client, HttpSession, MAX_REDIRECTS};
pub use link_tester::{test_links, LinkTestSummary};
pub use parser::{
    parse_html, resolve_click, ClickTarget, FormMethod, FormSubmission, PageButton, PageLink,
    ParsedPage, DEFAULT_BUTTON_LABEL,
};
pub use prober::{wait_for_settle, Prober};
pub use session::{BrowserSession, LoadedPage, SessionError};
