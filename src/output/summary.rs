//! Human-readable messages built from a crawl outcome

use crate::output::report::{CrawlOutcome, CrawlReport};
use crate::output::traits::Summarizer;
use crate::state::IssueType;

/// Longest fallback summary, in characters, before the ellipsis
pub const SUMMARY_FALLBACK_CHARS: usize = 200;

/// Issues listed per category in a report message
const ISSUES_PER_CATEGORY: usize = 3;

/// Categories called out in a report message, in display order
const MESSAGE_CATEGORIES: [(IssueType, &str); 4] = [
    (IssueType::ErrorPage, "Error Pages"),
    (IssueType::BrokenLink, "Broken Links"),
    (IssueType::BlankDestination, "Blank Pages"),
    (IssueType::NavigationError, "Navigation Errors"),
];

/// Runs `text` through the summarizer, if there is one
///
/// Without a summarizer the text comes back unchanged. If the summarizer fails
/// or answers with nothing, the first 200 characters are returned with a
/// trailing `...` when the text was longer.
pub async fn summarize_message(summarizer: Option<&dyn Summarizer>, text: &str) -> String {
    let Some(summarizer) = summarizer else {
        return text.to_string();
    };

    match summarizer.summarize(text).await {
        Ok(summary) if !summary.trim().is_empty() => summary.trim().to_string(),
        Ok(_) => {
            tracing::warn!("Summarizer returned an empty answer, truncating instead");
            truncate_summary(text)
        }
        Err(e) => {
            tracing::warn!("Summarizer failed: {}", e);
            truncate_summary(text)
        }
    }
}

/// Builds the message shown to a user after a crawl
pub fn format_outcome_message(outcome: &CrawlOutcome) -> String {
    match outcome {
        CrawlOutcome::Report(report) => format_report_message(report),
        CrawlOutcome::Failure(failure) => {
            format!("Failed to analyze {}: {}", failure.url, failure.error)
        }
    }
}

/// Builds the counts message for a finished crawl
pub fn format_report_message(report: &CrawlReport) -> String {
    let mut message = String::new();

    if report.bugs.is_empty() {
        message.push_str(&format!(
            "**Great news!** No issues found on {}\n\n",
            report.url
        ));
        push_counts(&mut message, report);
        message.push_str("- All tested links and pages are working correctly!");
        return message;
    }

    message.push_str("**Website Analysis Complete!**\n\n");
    push_counts(&mut message, report);
    message.push_str(&format!("- Issues found: {}\n", report.issues_found));

    for (kind, heading) in MESSAGE_CATEGORIES {
        let matching: Vec<_> = report.bugs.iter().filter(|bug| bug.kind == kind).collect();
        if matching.is_empty() {
            continue;
        }

        message.push_str(&format!("\n**{} ({}):**\n", heading, matching.len()));
        for bug in matching.iter().take(ISSUES_PER_CATEGORY) {
            message.push_str(&format!("- {}\n", bug.issue));
        }
    }

    message.push_str("\nFull details available in the report data.");
    message
}

fn push_counts(message: &mut String, report: &CrawlReport) {
    message.push_str("**Summary:**\n");
    message.push_str(&format!("- Pages visited: {}\n", report.pages_visited));
    message.push_str(&format!("- Duration: {}s\n", report.duration));
}

fn truncate_summary(text: &str) -> String {
    if text.chars().count() > SUMMARY_FALLBACK_CHARS {
        let head: String = text.chars().take(SUMMARY_FALLBACK_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
