//! Issue statistics for a finished crawl
//!
//! This module tallies a report's issues by type and severity and prints them
//! to stdout for the command-line front end.

use crate::output::report::CrawlReport;
use crate::state::{Issue, IssueType, Severity};
use std::collections::BTreeMap;

/// Issue counts for one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueStatistics {
    /// Number of pages that got a full crawl pass
    pub pages_visited: usize,

    /// Frontier entries left unvisited
    pub pages_remaining: usize,

    /// Total number of issues
    pub total_issues: usize,

    /// Count of issues by type, only types that occurred
    pub by_type: BTreeMap<IssueType, usize>,

    /// Count of issues by severity, only severities that occurred
    pub by_severity: BTreeMap<Severity, usize>,

    /// Pages with at least one issue, most affected first
    pub pages_with_issues: Vec<(String, usize)>,
}

impl IssueStatistics {
    /// Tallies the issues of a finished report
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut stats = Self::from_issues(&report.bugs);
        stats.pages_visited = report.pages_visited;
        stats.pages_remaining = report.remaining_urls.len();
        stats
    }

    /// Tallies a bare issue list
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut by_type = BTreeMap::new();
        let mut by_severity = BTreeMap::new();
        let mut by_page: BTreeMap<&str, usize> = BTreeMap::new();

        for issue in issues {
            *by_type.entry(issue.kind).or_insert(0) += 1;
            *by_severity.entry(issue.severity).or_insert(0) += 1;
            *by_page.entry(issue.page.as_str()).or_insert(0) += 1;
        }

        let mut pages_with_issues: Vec<(String, usize)> = by_page
            .into_iter()
            .map(|(page, count)| (page.to_string(), count))
            .collect();
        // Stable sort keeps URL order among equal counts
        pages_with_issues.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            pages_visited: 0,
            pages_remaining: 0,
            total_issues: issues.len(),
            by_type,
            by_severity,
            pages_with_issues,
        }
    }

    pub fn count_of(&self, kind: IssueType) -> usize {
        self.by_type.get(&kind).copied().unwrap_or(0)
    }

    pub fn count_of_severity(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    /// Issues per visited page
    pub fn issue_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            return 0.0;
        }
        self.total_issues as f64 / self.pages_visited as f64
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &IssueStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Pages remaining in queue: {}", stats.pages_remaining);
    println!("  Issues found: {}", stats.total_issues);
    println!();

    if stats.total_issues == 0 {
        println!("No issues found.");
        return;
    }

    println!("Issues by Type:");
    let mut type_counts: Vec<_> = stats.by_type.iter().collect();
    type_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (kind, count) in type_counts {
        let percentage = (*count as f64 / stats.total_issues as f64) * 100.0;
        println!("  {}: {} ({:.1}%)", kind, count, percentage);
    }
    println!();

    println!("Issues by Severity:");
    for (severity, count) in &stats.by_severity {
        println!("  {}: {}", severity, count);
    }
    println!();

    println!("Most Affected Pages:");
    for (page, count) in stats.pages_with_issues.iter().take(10) {
        println!("  - {} ({})", page, count);
    }
    println!();

    println!("Issue Rate: {:.2} issues per visited page", stats.issue_rate());
}
