//! Report builder and the outcome handed to callers

use crate::state::{CrawlResults, Issue, RunPhase};
use crate::url::NormalizedUrl;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Result of a crawl that ran to a terminal phase
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    pub success: bool,

    /// Seed URL the run started from
    pub url: String,

    pub status: RunPhase,

    pub started_at: DateTime<Utc>,

    /// Wall-clock seconds, one decimal
    pub duration: f64,

    pub pages_visited: usize,

    pub issues_found: usize,

    /// Every issue, in discovery order
    pub bugs: Vec<Issue>,

    pub crawled_urls: Vec<NormalizedUrl>,

    /// Frontier left over when the run stopped
    pub remaining_urls: Vec<NormalizedUrl>,
}

impl CrawlReport {
    /// Assembles the report from the final crawl state
    pub fn build(
        url: &str,
        status: RunPhase,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        results: CrawlResults,
    ) -> Self {
        Self {
            success: status.is_success(),
            url: url.to_string(),
            status,
            started_at,
            duration: round_tenths(elapsed.as_secs_f64()),
            pages_visited: results.crawled_urls.len(),
            issues_found: results.issues.len(),
            bugs: results.issues,
            crawled_urls: results.crawled_urls,
            remaining_urls: results.remaining_urls,
        }
    }

    /// Number of recorded issues of one type
    pub fn count_of(&self, kind: crate::state::IssueType) -> usize {
        self.bugs.iter().filter(|issue| issue.kind == kind).count()
    }
}

/// Result of a run that never produced a report
#[derive(Debug, Clone, Serialize)]
pub struct CrawlFailure {
    pub success: bool,
    pub error: String,
    pub url: String,
}

impl CrawlFailure {
    pub fn new(url: &str, error: String) -> Self {
        Self {
            success: false,
            error,
            url: url.to_string(),
        }
    }
}

/// What every crawl invocation returns
///
/// Serializes as the bare report or failure object, both of which carry a
/// `success` flag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CrawlOutcome {
    Report(CrawlReport),
    Failure(CrawlFailure),
}

impl CrawlOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            Self::Report(report) => report.success,
            Self::Failure(_) => false,
        }
    }

    pub fn report(&self) -> Option<&CrawlReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Failure(_) => None,
        }
    }

    pub fn into_report(self) -> Option<CrawlReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Failure(_) => None,
        }
    }

    /// Seed URL the outcome belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::Report(report) => &report.url,
            Self::Failure(failure) => &failure.url,
        }
    }
}

fn round_tenths(seconds: f64) -> f64 {
    (seconds * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::IssueType;
    use crate::url::normalize_url;

    fn results() -> CrawlResults {
        let home = normalize_url("https://a.com", None);
        CrawlResults {
            crawled_urls: vec![home.clone()],
            remaining_urls: vec![normalize_url("https://a.com/next", None)],
            issues: vec![
                Issue::blank_page(home.clone()),
                Issue::broken_link(
                    home,
                    "Gone",
                    normalize_url("https://a.com/gone", None),
                    404,
                ),
            ],
            page_count: 1,
        }
    }

    #[test]
    fn test_build_counts_and_rounding() {
        let report = CrawlReport::build(
            "https://a.com",
            RunPhase::BudgetExhausted,
            Utc::now(),
            Duration::from_millis(2_345),
            results(),
        );

        assert!(report.success);
        assert_eq!(report.pages_visited, 1);
        assert_eq!(report.issues_found, 2);
        assert_eq!(report.duration, 2.3);
        assert_eq!(report.count_of(IssueType::BrokenLink), 1);
        assert_eq!(report.remaining_urls.len(), 1);
    }

    #[test]
    fn test_report_json_shape() {
        let report = CrawlReport::build(
            "https://a.com",
            RunPhase::Completed,
            Utc::now(),
            Duration::from_secs(1),
            results(),
        );
        let json = serde_json::to_value(CrawlOutcome::Report(report)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["pagesVisited"], 1);
        assert_eq!(json["issuesFound"], 2);
        assert_eq!(json["crawledUrls"][0], "https://a.com");
        assert_eq!(json["remainingUrls"][0], "https://a.com/next");
        assert_eq!(json["bugs"][1]["type"], "BROKEN_LINK");
        assert_eq!(json["bugs"][1]["statusCode"], 404);
        assert_eq!(json["bugs"][1]["severity"], "high");
    }

    #[test]
    fn test_failure_json_shape() {
        let outcome = CrawlOutcome::Failure(CrawlFailure::new(
            "https://a.com",
            "Crawler timed out after 60 seconds".to_string(),
        ));
        assert!(!outcome.is_success());
        assert!(outcome.report().is_none());

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Crawler timed out after 60 seconds");
        assert_eq!(json["url"], "https://a.com");
        assert!(json.get("bugs").is_none());
    }
}
