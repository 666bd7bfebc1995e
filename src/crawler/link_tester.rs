//! Link tester: probes each internal link of a healthy page once per run

use crate::crawler::classifier::{classify_navigation, Verdict};
use crate::crawler::parser::PageLink;
use crate::crawler::prober::Prober;
use crate::crawler::session::BrowserSession;
use crate::state::{CrawlState, Enqueue, Issue};
use crate::url::{normalize_url, NormalizedUrl};
use std::time::Duration;

/// Counts of what happened to one page's links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTestSummary {
    pub tested: usize,
    pub skipped: usize,
    pub healthy: usize,
    pub broken: usize,
    pub blank: usize,
    pub navigation_errors: usize,
    pub enqueued: usize,
    /// Redirects that landed on a destination tested earlier in the run
    pub redirect_duplicates: usize,
}

/// Tests the links found on `page` in discovery order
///
/// Self links and destinations already tested anywhere in the run are skipped.
/// A redirect marks its landing URL as tested too, so a link landing on a
/// destination tested earlier is not classified or reported again.
/// Broken and blank destinations are blacklisted and pulled from the frontier;
/// healthy ones are offered to the frontier. A navigation failure is reported but
/// never blacklists the destination.
pub async fn test_links(
    prober: &Prober,
    session: &mut dyn BrowserSession,
    state: &mut CrawlState,
    page: &NormalizedUrl,
    links: &[PageLink],
    settle: Duration,
) -> LinkTestSummary {
    let mut summary = LinkTestSummary::default();
    let total = links.len();

    for (i, link) in links.iter().enumerate() {
        let destination = &link.destination;

        if destination == page {
            tracing::debug!("   [{}/{}] Skipping \"{}\" (same page)", i + 1, total, link.text);
            summary.skipped += 1;
            continue;
        }

        if !state.mark_link_tested(destination) {
            tracing::debug!(
                "   [{}/{}] Skipping \"{}\" -> {} (already tested)",
                i + 1,
                total,
                link.text,
                destination
            );
            summary.skipped += 1;
            continue;
        }

        tracing::info!("   [{}/{}] Testing link: \"{}\"", i + 1, total, link.text);
        summary.tested += 1;

        let snapshot = match prober.probe(session, link.href.as_str(), settle).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("      Navigation failed for \"{}\": {}", link.text, e);
                state.record_issue(Issue::navigation_error(
                    page.clone(),
                    &link.text,
                    destination.clone(),
                    &e.to_string(),
                ));
                summary.navigation_errors += 1;
                continue;
            }
        };

        let landed = normalize_url(snapshot.final_url.as_str(), None);
        tracing::debug!("      -> {} (Status: {})", landed, snapshot.status_code);

        if landed != *destination && !state.mark_link_tested(&landed) {
            tracing::debug!("      Redirect target already tested: {}", landed);
            if state.is_link_healthy(&landed) {
                state.mark_link_healthy(destination);
            }
            summary.redirect_duplicates += 1;
            continue;
        }

        match classify_navigation(prober.policy(), &snapshot) {
            Verdict::Error => {
                tracing::warn!(
                    "      BROKEN LINK \"{}\" -> {} (HTTP {})",
                    link.text,
                    landed,
                    snapshot.status_code
                );
                state.record_issue(Issue::broken_link(
                    page.clone(),
                    &link.text,
                    landed.clone(),
                    snapshot.status_code,
                ));
                if state.mark_problematic(&landed) {
                    tracing::info!("      Removed from crawl queue: {}", landed);
                }
                summary.broken += 1;
            }
            Verdict::Blank => {
                tracing::warn!("      BLANK DESTINATION \"{}\" -> {}", link.text, landed);
                state.record_issue(Issue::blank_destination(
                    page.clone(),
                    &link.text,
                    landed.clone(),
                ));
                if state.mark_blank_destination(&landed) {
                    tracing::info!("      Removed from crawl queue: {}", landed);
                }
                summary.blank += 1;
            }
            Verdict::Healthy => {
                state.mark_link_healthy(destination);
                state.mark_link_healthy(&landed);
                summary.healthy += 1;

                match state.enqueue(landed.clone()) {
                    Enqueue::Added => {
                        tracing::info!("      Queued for crawling: {}", landed);
                        summary.enqueued += 1;
                    }
                    Enqueue::AlreadyVisited => {
                        tracing::debug!("      Already visited: {}", landed)
                    }
                    Enqueue::AlreadyQueued => tracing::debug!("      Already in queue: {}", landed),
                    Enqueue::Problematic => {
                        tracing::debug!("      Skipping queue (problematic): {}", landed)
                    }
                }
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::classifier::HeuristicPolicy;
    use crate::crawler::testing::ScriptedSession;
    use crate::state::IssueType;
    use std::sync::Arc;
    use url::Url;

    const SEED: &str = "https://site.test";

    fn prober() -> Prober {
        Prober::new(Arc::new(HeuristicPolicy::default()), 30, 8)
    }

    fn link(text: &str, href: &str) -> PageLink {
        let href = Url::parse(href).unwrap();
        PageLink {
            text: text.to_string(),
            destination: normalize_url(href.as_str(), None),
            href,
            is_internal: true,
        }
    }

    fn seed_state() -> (CrawlState, NormalizedUrl) {
        let seed = normalize_url(SEED, None);
        let mut state = CrawlState::new(seed.clone(), 10);
        state.pop_next();
        state.admit(&seed);
        (state, seed)
    }

    #[tokio::test]
    async fn test_self_link_skipped() {
        let mut session = ScriptedSession::new();
        let (mut state, seed) = seed_state();
        let links = vec![link("Home", "https://site.test/#top")];

        let summary = test_links(&prober(), &mut session, &mut state, &seed, &links, Duration::ZERO).await;

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.tested, 0);
        assert!(session.navigations().is_empty());
        assert_eq!(state.queue_len(), 0);
    }

    #[tokio::test]
    async fn test_healthy_link_enqueued_once() {
        let mut session = ScriptedSession::new().healthy("https://site.test/about", "About");
        let (mut state, seed) = seed_state();
        let links = vec![
            link("About", "https://site.test/about"),
            link("About us", "https://site.test/about/"),
        ];

        let summary = test_links(&prober(), &mut session, &mut state, &seed, &links, Duration::ZERO).await;

        assert_eq!(summary.tested, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.enqueued, 1);
        assert_eq!(session.navigations().len(), 1);
        assert!(state.is_queued(&normalize_url("https://site.test/about", None)));
    }

    #[tokio::test]
    async fn test_broken_link_blacklisted() {
        let mut session = ScriptedSession::new().status("https://site.test/gone", 404, "Gone");
        let (mut state, seed) = seed_state();
        let gone = normalize_url("https://site.test/gone", None);
        state.enqueue(gone.clone());

        let links = vec![link("Gone", "https://site.test/gone")];
        let summary = test_links(&prober(), &mut session, &mut state, &seed, &links, Duration::ZERO).await;

        assert_eq!(summary.broken, 1);
        assert!(state.is_problematic(&gone));
        assert!(!state.is_queued(&gone));

        let issue = &state.issues()[0];
        assert_eq!(issue.kind, IssueType::BrokenLink);
        assert_eq!(issue.destination, Some(gone));
        assert_eq!(issue.status_code, Some(404));
    }

    #[tokio::test]
    async fn test_blank_destination() {
        let mut session = ScriptedSession::new().blank("https://site.test/empty");
        let (mut state, seed) = seed_state();
        let empty = normalize_url("https://site.test/empty", None);

        let links = vec![link("Empty", "https://site.test/empty")];
        test_links(&prober(), &mut session, &mut state, &seed, &links, Duration::ZERO).await;

        assert_eq!(state.issues()[0].kind, IssueType::BlankDestination);
        assert!(state.is_problematic(&empty));
        assert!(state.was_reported_blank(&empty));
    }

    #[tokio::test]
    async fn test_navigation_error_not_blacklisted() {
        let mut session = ScriptedSession::new().unreachable("https://site.test/flaky");
        let (mut state, seed) = seed_state();
        let flaky = normalize_url("https://site.test/flaky", None);

        let links = vec![link("Flaky", "https://site.test/flaky")];
        let summary = test_links(&prober(), &mut session, &mut state, &seed, &links, Duration::ZERO).await;

        assert_eq!(summary.navigation_errors, 1);
        assert!(!state.is_problematic(&flaky));
        assert!(state.is_link_tested(&flaky));

        let issue = &state.issues()[0];
        assert_eq!(issue.kind, IssueType::NavigationError);
        assert!(issue.issue.starts_with("Failed to navigate to \"Flaky\": "));
    }

    #[tokio::test]
    async fn test_redirect_to_tested_destination_not_retested() {
        let mut session = ScriptedSession::new()
            .redirect("https://site.test/old", "https://site.test/gone")
            .status("https://site.test/gone", 404, "Gone");
        let (mut state, seed) = seed_state();
        let gone = normalize_url("https://site.test/gone", None);

        let links = vec![
            link("Old", "https://site.test/old"),
            link("Gone", "https://site.test/gone"),
        ];
        let summary = test_links(&prober(), &mut session, &mut state, &seed, &links, Duration::ZERO).await;

        assert_eq!(summary.broken, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(session.navigations().len(), 1);

        let broken: Vec<_> = state
            .issues()
            .iter()
            .filter(|issue| issue.kind == IssueType::BrokenLink)
            .collect();
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].destination, Some(gone.clone()));
        assert!(state.is_problematic(&gone));
    }

    #[tokio::test]
    async fn test_direct_link_then_redirect_reported_once() {
        let mut session = ScriptedSession::new()
            .redirect("https://site.test/old", "https://site.test/gone")
            .status("https://site.test/gone", 404, "Gone");
        let (mut state, seed) = seed_state();

        let links = vec![
            link("Gone", "https://site.test/gone"),
            link("Old", "https://site.test/old"),
        ];
        let summary = test_links(&prober(), &mut session, &mut state, &seed, &links, Duration::ZERO).await;

        assert_eq!(summary.tested, 2);
        assert_eq!(summary.broken, 1);
        assert_eq!(summary.redirect_duplicates, 1);
        assert_eq!(state.issues().len(), 1);
    }

    #[tokio::test]
    async fn test_redirect_keys_split_between_href_and_landing() {
        let mut session = ScriptedSession::new()
            .redirect("https://site.test/moved", "https://site.test/gone")
            .status("https://site.test/gone", 410, "Gone");
        let (mut state, seed) = seed_state();
        let moved = normalize_url("https://site.test/moved", None);
        let gone = normalize_url("https://site.test/gone", None);

        let links = vec![link("Moved", "https://site.test/moved")];
        test_links(&prober(), &mut session, &mut state, &seed, &links, Duration::ZERO).await;

        assert!(state.is_link_tested(&moved));
        assert!(state.is_link_tested(&gone));
        assert!(state.is_problematic(&gone));
        assert!(!state.is_problematic(&moved));
        assert_eq!(state.issues()[0].destination, Some(gone));
    }

    #[tokio::test]
    async fn test_redirect_to_healthy_page_marks_both_keys_healthy() {
        let mut session = ScriptedSession::new()
            .redirect("https://site.test/old-about", "https://site.test/about")
            .healthy("https://site.test/about", "About");
        let (mut state, seed) = seed_state();
        let old = normalize_url("https://site.test/old-about", None);
        let about = normalize_url("https://site.test/about", None);

        let links = vec![
            link("About", "https://site.test/about"),
            link("Old about", "https://site.test/old-about"),
        ];
        let summary = test_links(&prober(), &mut session, &mut state, &seed, &links, Duration::ZERO).await;

        assert_eq!(summary.healthy, 1);
        assert_eq!(summary.enqueued, 1);
        assert_eq!(summary.redirect_duplicates, 1);
        assert!(state.is_link_healthy(&old));
        assert!(state.is_queued(&about));
        assert!(!state.is_queued(&old));
    }
}
