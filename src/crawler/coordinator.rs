//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates one run:
//! - Owning the rendering session and the crawl state
//! - Admitting frontier entries against the page budget
//! - Probing and classifying each admitted page
//! - Running the link and button passes on healthy pages
//! - Enforcing the run timeout and turning setup failures into a failed outcome

use crate::config::Config;
use crate::crawler::button_tester::{test_buttons, ButtonTiming};
use crate::crawler::classifier::{classify_navigation, ClassificationPolicy, HeuristicPolicy, Verdict};
use crate::crawler::fetcher::HttpSession;
use crate::crawler::link_tester::test_links;
use crate::crawler::prober::Prober;
use crate::crawler::session::BrowserSession;
use crate::output::{CrawlFailure, CrawlOutcome, CrawlReport};
use crate::state::{Admission, CrawlState, Issue, RunPhase};
use crate::url::{coerce_seed_url, normalize_url, NormalizedUrl};
use crate::SiteError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Main crawler coordinator structure
///
/// Owns the session for the whole run; every probe borrows it in turn.
pub struct Coordinator<S: BrowserSession> {
    config: Arc<Config>,
    session: S,
    prober: Prober,
    state: CrawlState,
    phase: RunPhase,
    seed: Url,
}

impl<S: BrowserSession> Coordinator<S> {
    /// Creates a coordinator that classifies with the configured heuristics
    pub fn new(config: Arc<Config>, seed: Url, session: S) -> Self {
        let policy = Arc::new(HeuristicPolicy::from_config(&config));
        Self::with_policy(config, seed, session, policy)
    }

    /// Creates a coordinator with a custom classification policy
    pub fn with_policy(
        config: Arc<Config>,
        seed: Url,
        session: S,
        policy: Arc<dyn ClassificationPolicy>,
    ) -> Self {
        let prober = Prober::from_config(&config, policy);
        let state = CrawlState::new(normalize_url(seed.as_str(), None), config.crawler.max_pages);

        Self {
            config,
            session,
            prober,
            state,
            phase: RunPhase::Ready,
            seed,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Runs the crawl loop to completion and builds the report
    ///
    /// The session is closed before the report is built.
    pub async fn run(mut self) -> CrawlReport {
        let started_at = Utc::now();
        let clock = Instant::now();

        self.set_phase(RunPhase::Running);
        tracing::info!("Starting crawl from: {}", self.seed);
        tracing::info!("Max pages limit: {}", self.state.max_pages());

        while let Some(next) = self.state.pop_next() {
            match self.state.admit(&next) {
                Admission::Admitted => {
                    tracing::info!("Queue status: {} URLs remaining", self.state.queue_len());
                    self.crawl_page(&next).await;
                }
                Admission::Problematic | Admission::UnconfirmedLink => {
                    tracing::info!("Skipping {} (already tested or problematic)", next);
                }
                Admission::AlreadyVisited => {
                    tracing::debug!("Skipping {} (already visited)", next);
                }
                Admission::BudgetExhausted => {
                    tracing::info!("Page budget of {} reached", self.state.max_pages());
                    break;
                }
            }
        }

        let phase = if self.state.queue_len() == 0 {
            RunPhase::Completed
        } else {
            RunPhase::BudgetExhausted
        };
        self.set_phase(phase);

        if let Err(e) = self.session.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }

        let elapsed = clock.elapsed();
        let report = CrawlReport::build(
            self.seed.as_str(),
            phase,
            started_at,
            elapsed,
            self.state.finish(),
        );

        tracing::info!(
            "Crawl {}: {} pages tested, {} issues found in {:.1}s",
            phase,
            report.pages_visited,
            report.issues_found,
            report.duration
        );
        if !report.remaining_urls.is_empty() {
            tracing::info!("Remaining URLs: {}", report.remaining_urls.len());
        }

        report
    }

    /// Full crawl pass over one admitted page
    async fn crawl_page(&mut self, url: &NormalizedUrl) {
        let crawler = &self.config.crawler;
        tracing::info!("[{}] Testing: {}", self.state.page_count(), url);

        let snapshot = match self
            .prober
            .probe(&mut self.session, url.as_str(), crawler.page_settle())
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Failed to test page {}: {}", url, e);
                self.state
                    .record_issue(Issue::page_load_error(url.clone(), &e.to_string()));
                return;
            }
        };

        tracing::info!(
            "   \"{}\" (Status: {}), {} internal links, {} buttons",
            snapshot.title,
            snapshot.status_code,
            snapshot.links.len(),
            snapshot.buttons.len()
        );

        match classify_navigation(self.prober.policy(), &snapshot) {
            Verdict::Error => {
                tracing::warn!("   ERROR PAGE DETECTED (HTTP {})", snapshot.status_code);
                self.state.record_issue(Issue::error_page(
                    url.clone(),
                    &snapshot.title,
                    snapshot.status_code,
                ));
                return;
            }
            Verdict::Blank => {
                // Blank link destinations are blacklisted, so admit never returns one here
                self.state.mark_reported_blank(url);
                tracing::warn!("   LOW CONTENT WARNING");
                self.state.record_issue(Issue::blank_page(url.clone()));
                return;
            }
            Verdict::Healthy => {}
        }

        let links = test_links(
            &self.prober,
            &mut self.session,
            &mut self.state,
            url,
            &snapshot.links,
            crawler.link_settle(),
        )
        .await;
        tracing::debug!("   Links for {}: {:?}", url, links);

        let timing = ButtonTiming {
            page_settle: crawler.page_settle(),
            click_settle: crawler.button_settle(),
        };
        let buttons = test_buttons(
            &self.prober,
            &mut self.session,
            url,
            &snapshot.buttons,
            crawler.max_buttons_per_page,
            timing,
        )
        .await;

        for issue in buttons.issues {
            self.state.record_issue(issue);
        }
    }

    fn set_phase(&mut self, next: RunPhase) {
        if !self.phase.can_transition_to(next) {
            tracing::warn!("Unexpected run phase change {} -> {}", self.phase, next);
        }
        tracing::debug!("Run phase: {} -> {}", self.phase, next);
        self.phase = next;
    }
}

/// Runs one crawl of `seed` over HTTP under the configured run timeout
///
/// Never fails: setup errors and timeouts come back as a failed outcome.
///
/// # Example
///
/// ```no_run
/// use site_integrity::config::Config;
/// use site_integrity::crawler::run_crawl;
///
/// # async fn example() {
/// let outcome = run_crawl(&Config::default(), "localhost:3001").await;
/// println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
/// # }
/// ```
pub async fn run_crawl(config: &Config, seed: &str) -> CrawlOutcome {
    let seed_url = match coerce_seed_url(seed) {
        Ok(url) => url,
        Err(e) => return setup_failure(seed, SiteError::from(e)),
    };

    let session = match HttpSession::new(config) {
        Ok(session) => session,
        Err(e) => return setup_failure(seed, SiteError::from(e)),
    };

    run_with_session(config, seed_url, session).await
}

/// Runs one crawl with an already opened session under the run timeout
///
/// If the timeout fires the run is dropped, session included, and no partial
/// report is produced.
pub async fn run_with_session<S: BrowserSession>(
    config: &Config,
    seed: Url,
    session: S,
) -> CrawlOutcome {
    let limit = config.crawler.run_timeout();
    let coordinator = Coordinator::new(Arc::new(config.clone()), seed.clone(), session);

    match tokio::time::timeout(limit, coordinator.run()).await {
        Ok(report) => CrawlOutcome::Report(report),
        Err(_) => {
            let error = SiteError::Timeout {
                seconds: limit.as_secs(),
            };
            tracing::error!("Crawl of {} abandoned: {}", seed, error);
            CrawlOutcome::Failure(CrawlFailure::new(seed.as_str(), error.to_string()))
        }
    }
}

fn setup_failure(seed: &str, error: SiteError) -> CrawlOutcome {
    tracing::error!("Crawler failed to start for {}: {}", seed, error);
    CrawlOutcome::Failure(CrawlFailure::new(seed, error.to_string()))
}
