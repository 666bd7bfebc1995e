//! Page prober: one navigation plus content extraction against the shared session

use crate::config::Config;
use crate::crawler::classifier::{ClassificationPolicy, PageSnapshot};
use crate::crawler::parser::parse_html;
use crate::crawler::session::{BrowserSession, LoadedPage, SessionError};
use std::sync::Arc;
use std::time::Duration;

/// Loads pages in a session and turns them into snapshots
#[derive(Clone)]
pub struct Prober {
    policy: Arc<dyn ClassificationPolicy>,
    max_links: usize,
    max_buttons: usize,
}

impl Prober {
    pub fn new(policy: Arc<dyn ClassificationPolicy>, max_links: usize, max_buttons: usize) -> Self {
        Self {
            policy,
            max_links,
            max_buttons,
        }
    }

    /// Builds a prober whose sample caps come from `[crawler]`
    ///
    /// Eight controls are always sampled so the snapshot reports what the page
    /// offers, even when fewer are clicked.
    pub fn from_config(config: &Config, policy: Arc<dyn ClassificationPolicy>) -> Self {
        Self::new(
            policy,
            config.crawler.max_links_per_page,
            crate::config::MAX_BUTTONS_PER_PAGE,
        )
    }

    pub fn policy(&self) -> &dyn ClassificationPolicy {
        self.policy.as_ref()
    }

    /// Navigates to `url`, waits `settle`, and snapshots the loaded page
    ///
    /// The session's current page is replaced whether or not this succeeds.
    pub async fn probe(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        settle: Duration,
    ) -> Result<PageSnapshot, SessionError> {
        let page = session.navigate(url).await?;
        wait_for_settle(settle).await;
        Ok(self.snapshot(&page))
    }

    /// Extracts a snapshot from a page the session already holds
    pub fn snapshot(&self, page: &LoadedPage) -> PageSnapshot {
        let parsed = parse_html(&page.html, &page.final_url, self.max_links, self.max_buttons);
        PageSnapshot::from_parsed(
            parsed,
            page.final_url.clone(),
            page.status_code,
            self.policy.as_ref(),
        )
    }
}

/// Gives the rendered page time to settle before it is read
pub async fn wait_for_settle(settle: Duration) {
    if !settle.is_zero() {
        tokio::time::sleep(settle).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::classifier::HeuristicPolicy;
    use url::Url;

    fn prober(max_links: usize) -> Prober {
        Prober::new(Arc::new(HeuristicPolicy::default()), max_links, 8)
    }

    fn page(html: &str, status_code: u16) -> LoadedPage {
        LoadedPage {
            final_url: Url::parse("https://a.com/start").unwrap(),
            status_code,
            html: html.to_string(),
        }
    }

    #[test]
    fn test_snapshot_signals() {
        let body = "Useful words about the product. ".repeat(5);
        let html = format!(
            "<html><head><title>Start</title></head><body><p>{}</p><a href=\"/next\">Next</a><button>Go</button></body></html>",
            body
        );
        let snap = prober(30).snapshot(&page(&html, 200));

        assert_eq!(snap.title, "Start");
        assert_eq!(snap.status_code, 200);
        assert!(snap.has_content);
        assert!(!snap.is_error_page_heuristic);
        assert_eq!(snap.links.len(), 1);
        assert_eq!(snap.buttons.len(), 1);
    }

    #[test]
    fn test_snapshot_respects_link_cap() {
        let html: String = (0..10)
            .map(|i| format!("<a href=\"/p{}\">P{}</a>", i, i))
            .collect();
        let snap = prober(3).snapshot(&page(&html, 200));
        assert_eq!(snap.links.len(), 3);
    }

    #[test]
    fn test_snapshot_error_heuristic() {
        let html = "<html><head><title>Page Not Found</title></head><body>Sorry, page not found</body></html>";
        let snap = prober(30).snapshot(&page(html, 200));
        assert!(snap.is_error_page_heuristic);
        assert!(!snap.has_content);
    }
}
