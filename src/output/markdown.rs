//! Markdown rendering of crawl reports and issue drafts
//!
//! This module generates human-readable markdown files: a full crawl report
//! and an issue draft ready to paste into a bug tracker.

use crate::output::report::CrawlReport;
use crate::output::stats::IssueStatistics;
use crate::output::traits::{IssueDraft, OutputResult};
use crate::state::IssueType;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// URLs listed per section before the remainder is elided
const MAX_LISTED_URLS: usize = 50;

/// Writes a markdown report to `output_path`
///
/// # Arguments
///
/// * `report` - The finished crawl report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    write_file(output_path, &format_markdown_report(report))
}

/// Writes an issue draft to `output_path`
pub fn write_issue_draft(draft: &IssueDraft, output_path: &Path) -> OutputResult<()> {
    write_file(output_path, &format_issue_draft(draft))
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The finished crawl report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let stats = IssueStatistics::from_report(report);
    let mut md = String::new();

    // Title
    md.push_str("# Site Integrity Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **URL**: {}\n", report.url));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {:.1} seconds\n", report.duration));
    md.push_str(&format!("- **Status**: {}\n\n", report.status));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", report.pages_visited));
    md.push_str(&format!("- **Issues Found**: {}\n", report.issues_found));
    md.push_str(&format!(
        "- **Pages Remaining**: {}\n\n",
        report.remaining_urls.len()
    ));

    // Type breakdown
    if stats.total_issues > 0 {
        md.push_str("## Issue Breakdown\n\n");
        md.push_str("| Type | Severity | Count |\n");
        md.push_str("|------|----------|-------|\n");
        for kind in IssueType::all() {
            let count = stats.count_of(kind);
            if count > 0 {
                md.push_str(&format!("| {} | {} | {} |\n", kind, kind.severity(), count));
            }
        }
        md.push('\n');

        md.push_str("## Issues\n\n");
        md.push_str("| # | Type | Page | Description |\n");
        md.push_str("|---|------|------|-------------|\n");
        for (i, bug) in report.bugs.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                i + 1,
                bug.kind,
                bug.page,
                escape_cell(&bug.issue)
            ));
        }
        md.push('\n');
    }

    push_url_list(&mut md, "Crawled URLs", &report.crawled_urls);
    push_url_list(&mut md, "Remaining URLs", &report.remaining_urls);

    md
}

/// Formats an issue draft as markdown with its title and labels
pub fn format_issue_draft(draft: &IssueDraft) -> String {
    let mut md = String::new();
    md.push_str(&format!("# {}\n\n", draft.title));
    if !draft.labels.is_empty() {
        md.push_str(&format!("**Labels**: {}\n\n", draft.labels.join(", ")));
    }
    md.push_str(&draft.body);
    if !draft.body.ends_with('\n') {
        md.push('\n');
    }
    md
}

fn push_url_list<T: std::fmt::Display>(md: &mut String, heading: &str, urls: &[T]) {
    if urls.is_empty() {
        return;
    }

    md.push_str(&format!("## {}\n\n", heading));
    for url in urls.iter().take(MAX_LISTED_URLS) {
        md.push_str(&format!("- {}\n", url));
    }
    if urls.len() > MAX_LISTED_URLS {
        md.push_str(&format!("\n... and {} more\n", urls.len() - MAX_LISTED_URLS));
    }
    md.push('\n');
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn write_file(path: &Path, contents: &str) -> OutputResult<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}
