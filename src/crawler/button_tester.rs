//! Button tester: clicks a page's controls and checks where they lead
//!
//! Purely diagnostic. It only produces issues and never touches the frontier or
//! the deduplication sets, which is why it takes no `CrawlState`.

use crate::crawler::classifier::Verdict;
use crate::crawler::parser::PageButton;
use crate::crawler::prober::{wait_for_settle, Prober};
use crate::crawler::session::BrowserSession;
use crate::state::Issue;
use crate::url::{normalize_url, NormalizedUrl};
use std::time::Duration;

/// Result of testing one page's controls
#[derive(Debug, Clone, Default)]
pub struct ButtonTestReport {
    pub clicked: usize,
    pub failed_clicks: usize,
    pub issues: Vec<Issue>,
}

/// Timing for the button pass
#[derive(Debug, Clone, Copy)]
pub struct ButtonTiming {
    /// Wait after returning to the source page
    pub page_settle: Duration,
    /// Wait after the click
    pub click_settle: Duration,
}

/// Clicks the first `max_buttons` controls of `page`, one at a time
///
/// Before every click the session returns to `page`. Controls that cannot be
/// found or clicked are logged and skipped. The page reached after a click is
/// classified by content alone.
pub async fn test_buttons(
    prober: &Prober,
    session: &mut dyn BrowserSession,
    page: &NormalizedUrl,
    buttons: &[PageButton],
    max_buttons: usize,
    timing: ButtonTiming,
) -> ButtonTestReport {
    let mut report = ButtonTestReport::default();
    let total = buttons.len().min(max_buttons);

    for (i, button) in buttons.iter().take(max_buttons).enumerate() {
        tracing::info!("   [{}/{}] Testing button: \"{}\"", i + 1, total, button.text);

        if let Err(e) = session.navigate(page.as_str()).await {
            tracing::warn!("      Button click failed: {}", e);
            report.failed_clicks += 1;
            continue;
        }
        wait_for_settle(timing.page_settle).await;

        let clicked = match session.click(&button.text).await {
            Ok(Some(loaded)) => loaded,
            Ok(None) => {
                tracing::warn!("      Button click failed: no control labelled \"{}\"", button.text);
                report.failed_clicks += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!("      Button click failed: {}", e);
                report.failed_clicks += 1;
                continue;
            }
        };
        wait_for_settle(timing.click_settle).await;
        report.clicked += 1;

        let landed_page = session.current_page().cloned().unwrap_or(clicked);
        let snapshot = prober.snapshot(&landed_page);
        let landed = normalize_url(snapshot.final_url.as_str(), None);
        tracing::debug!("      -> {}", landed);

        match prober.policy().verdict(&snapshot) {
            Verdict::Error => {
                tracing::warn!("      BUTTON ERROR \"{}\" -> {}", button.text, landed);
                report
                    .issues
                    .push(Issue::button_error(page.clone(), &button.text, landed));
            }
            Verdict::Blank => {
                tracing::warn!("      BUTTON BLANK \"{}\" -> {}", button.text, landed);
                report
                    .issues
                    .push(Issue::button_blank(page.clone(), &button.text, landed));
            }
            Verdict::Healthy => tracing::debug!("      Button working"),
        }
    }

    report
}
