//! The per-run crawl aggregate
//!
//! Keeps the four deduplication sets, the frontier and the issue list behind one
//! type so the cross-set invariants are enforced in a single place:
//!
//! - every set only grows during a run
//! - a problematic URL is never queued again and never admitted as a page
//! - the page counter never exceeds the page budget

use crate::state::Issue;
use crate::url::NormalizedUrl;
use std::collections::{HashSet, VecDeque};

/// Why a URL popped from the frontier was or was not crawled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The URL was counted against the budget and marked visited
    Admitted,
    /// Link testing proved the URL broken or blank
    Problematic,
    /// Link testing tried the URL and could not confirm it as healthy
    UnconfirmedLink,
    /// The URL already had a full crawl pass
    AlreadyVisited,
    /// The page budget is spent; the URL went back to the front of the frontier
    BudgetExhausted,
}

/// What happened when a healthy link destination was offered to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    Added,
    AlreadyVisited,
    AlreadyQueued,
    Problematic,
}

/// Mutable state of one crawl run
#[derive(Debug)]
pub struct CrawlState {
    visited: HashSet<NormalizedUrl>,
    visit_order: Vec<NormalizedUrl>,
    tested_links: HashSet<NormalizedUrl>,
    healthy_links: HashSet<NormalizedUrl>,
    problematic: HashSet<NormalizedUrl>,
    reported_blank: HashSet<NormalizedUrl>,
    queue: VecDeque<NormalizedUrl>,
    page_count: u32,
    max_pages: u32,
    issues: Vec<Issue>,
}

/// Everything a finished run hands to the report builder
#[derive(Debug, Clone)]
pub struct CrawlResults {
    pub crawled_urls: Vec<NormalizedUrl>,
    pub remaining_urls: Vec<NormalizedUrl>,
    pub issues: Vec<Issue>,
    pub page_count: u32,
}

impl CrawlState {
    /// Creates the state for a new run with the seed pre-queued
    pub fn new(seed: NormalizedUrl, max_pages: u32) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(seed);

        Self {
            visited: HashSet::new(),
            visit_order: Vec::new(),
            tested_links: HashSet::new(),
            healthy_links: HashSet::new(),
            problematic: HashSet::new(),
            reported_blank: HashSet::new(),
            queue,
            page_count: 0,
            max_pages,
            issues: Vec::new(),
        }
    }

    // ===== Frontier =====

    pub fn has_budget(&self) -> bool {
        self.page_count < self.max_pages
    }

    pub fn pop_next(&mut self) -> Option<NormalizedUrl> {
        self.queue.pop_front()
    }

    /// Decides whether a popped URL gets a full crawl pass
    ///
    /// Only `Admitted` increments the page counter and marks the URL visited.
    /// Once the budget is spent the URL goes back to the front of the frontier
    /// untouched, so it shows up among the remaining URLs.
    pub fn admit(&mut self, url: &NormalizedUrl) -> Admission {
        if !self.has_budget() {
            self.queue.push_front(url.clone());
            return Admission::BudgetExhausted;
        }
        if self.problematic.contains(url) {
            return Admission::Problematic;
        }
        if self.tested_links.contains(url) && !self.healthy_links.contains(url) {
            return Admission::UnconfirmedLink;
        }
        if self.visited.contains(url) {
            return Admission::AlreadyVisited;
        }

        self.page_count += 1;
        self.visited.insert(url.clone());
        self.visit_order.push(url.clone());
        Admission::Admitted
    }

    /// Appends a healthy link destination to the frontier when it is new
    pub fn enqueue(&mut self, url: NormalizedUrl) -> Enqueue {
        if self.visited.contains(&url) {
            return Enqueue::AlreadyVisited;
        }
        if self.problematic.contains(&url) {
            return Enqueue::Problematic;
        }
        if self.queue.contains(&url) {
            return Enqueue::AlreadyQueued;
        }
        self.queue.push_back(url);
        Enqueue::Added
    }

    pub fn is_queued(&self, url: &NormalizedUrl) -> bool {
        self.queue.contains(url)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    // ===== Visited pages =====

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.visited.contains(url)
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    // ===== Link testing =====

    pub fn is_link_tested(&self, url: &NormalizedUrl) -> bool {
        self.tested_links.contains(url)
    }

    /// Records that a destination is about to be tested
    ///
    /// Returns false if it was already tested earlier in the run.
    pub fn mark_link_tested(&mut self, url: &NormalizedUrl) -> bool {
        self.tested_links.insert(url.clone())
    }

    /// Records that a tested destination passed classification
    pub fn mark_link_healthy(&mut self, url: &NormalizedUrl) {
        self.healthy_links.insert(url.clone());
    }

    pub fn is_link_healthy(&self, url: &NormalizedUrl) -> bool {
        self.healthy_links.contains(url)
    }

    pub fn tested_link_count(&self) -> usize {
        self.tested_links.len()
    }

    // ===== Problematic destinations =====

    pub fn is_problematic(&self, url: &NormalizedUrl) -> bool {
        self.problematic.contains(url)
    }

    /// Blacklists a destination for the rest of the run
    ///
    /// Returns true if the URL was pulled out of the frontier.
    pub fn mark_problematic(&mut self, url: &NormalizedUrl) -> bool {
        self.problematic.insert(url.clone());
        let before = self.queue.len();
        self.queue.retain(|queued| queued != url);
        self.queue.len() != before
    }

    /// Blacklists a blank destination and remembers it was reported
    ///
    /// Returns true if the URL was pulled out of the frontier.
    pub fn mark_blank_destination(&mut self, url: &NormalizedUrl) -> bool {
        self.reported_blank.insert(url.clone());
        self.mark_problematic(url)
    }

    pub fn was_reported_blank(&self, url: &NormalizedUrl) -> bool {
        self.reported_blank.contains(url)
    }

    /// Remembers that a blank page has been reported
    ///
    /// Returns false if it was already reported.
    pub fn mark_reported_blank(&mut self, url: &NormalizedUrl) -> bool {
        self.reported_blank.insert(url.clone())
    }

    // ===== Issues =====

    pub fn record_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consumes the state into the values the report is built from
    pub fn finish(self) -> CrawlResults {
        CrawlResults {
            crawled_urls: self.visit_order,
            remaining_urls: self.queue.into_iter().collect(),
            issues: self.issues,
            page_count: self.page_count,
        }
    }
}
