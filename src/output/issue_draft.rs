//! Issue drafting for bug trackers
//!
//! A run's issues are condensed into one draft with a title, a markdown body and
//! labels. Drafting never fails from the caller's point of view: any drafter
//! error falls back to a minimal draft.

use crate::output::traits::{IssueDraft, IssueDrafter, OutputResult};
use crate::state::{Issue, IssueType};
use async_trait::async_trait;

/// Longest title a draft may carry
pub const MAX_TITLE_CHARS: usize = 100;

/// Issues listed per type in a template body
const ISSUES_PER_SECTION: usize = 10;

const DEFAULT_LABELS: [&str; 2] = ["bug", "test-failure"];
const TEMPLATE_LABELS: [&str; 3] = ["bug", "test-failure", "website"];

/// Drafts an issue for the bugs of one run
///
/// Uses the template drafter when no drafter is given. A failing drafter is
/// replaced by [`fallback_issue_draft`]; an empty title or label list in a
/// successful draft is filled in from the same fallback.
pub async fn draft_issue(
    drafter: Option<&dyn IssueDrafter>,
    bugs: &[Issue],
    seed_url: &str,
) -> IssueDraft {
    let template = TemplateIssueDrafter;
    let drafter = drafter.unwrap_or(&template);

    match drafter.draft(bugs, seed_url).await {
        Ok(mut draft) => {
            let fallback = fallback_issue_draft(bugs, seed_url);
            if draft.title.trim().is_empty() {
                draft.title = fallback.title;
            }
            if draft.labels.is_empty() {
                draft.labels = fallback.labels;
            }
            draft
        }
        Err(e) => {
            tracing::warn!("Issue drafting failed: {}", e);
            fallback_issue_draft(bugs, seed_url)
        }
    }
}

/// Minimal draft used when drafting fails
pub fn fallback_issue_draft(bugs: &[Issue], seed_url: &str) -> IssueDraft {
    IssueDraft {
        title: format!("Website Issues Found on {}", seed_url),
        body: format!(
            "Found {} issues during website testing of {}.",
            bugs.len(),
            seed_url
        ),
        labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
    }
}

/// Renders a markdown issue body locally, without any external service
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateIssueDrafter;

#[async_trait]
impl IssueDrafter for TemplateIssueDrafter {
    async fn draft(&self, bugs: &[Issue], seed_url: &str) -> OutputResult<IssueDraft> {
        Ok(IssueDraft {
            title: template_title(bugs, seed_url),
            body: template_body(bugs, seed_url),
            labels: TEMPLATE_LABELS.iter().map(|l| l.to_string()).collect(),
        })
    }
}

fn template_title(bugs: &[Issue], seed_url: &str) -> String {
    let title = match bugs.len() {
        0 => format!("No Website Issues Found on {}", seed_url),
        1 => format!("1 Website Issue Found on {}", seed_url),
        n => format!("{} Website Issues Found on {}", n, seed_url),
    };

    if title.chars().count() > MAX_TITLE_CHARS {
        let head: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        title
    }
}

fn template_body(bugs: &[Issue], seed_url: &str) -> String {
    let mut md = String::new();

    md.push_str("## Website Testing Results\n\n");
    md.push_str(&format!("- **URL**: {}\n", seed_url));
    md.push_str(&format!("- **Issues Found**: {}\n", bugs.len()));

    let high = bugs
        .iter()
        .filter(|bug| bug.severity == crate::state::Severity::High)
        .count();
    md.push_str(&format!("- **High Severity**: {}\n", high));
    md.push_str(&format!("- **Medium Severity**: {}\n\n", bugs.len() - high));

    for kind in IssueType::all() {
        let matching: Vec<&Issue> = bugs.iter().filter(|bug| bug.kind == kind).collect();
        if matching.is_empty() {
            continue;
        }

        md.push_str(&format!(
            "### {} ({}, {} severity)\n\n",
            kind.heading(),
            matching.len(),
            kind.severity()
        ));
        for bug in matching.iter().take(ISSUES_PER_SECTION) {
            md.push_str(&format!("- {}", bug.issue));
            md.push_str(&format!(" (Page: {})", bug.page));
            if let Some(destination) = &bug.destination {
                md.push_str(&format!(" (Destination: {})", destination));
            }
            md.push('\n');
        }
        if matching.len() > ISSUES_PER_SECTION {
            md.push_str(&format!(
                "- ... and {} more\n",
                matching.len() - ISSUES_PER_SECTION
            ));
        }
        md.push('\n');
    }

    md.push_str("### Recommendations\n\n");
    for recommendation in recommendations(bugs) {
        md.push_str(&format!("- {}\n", recommendation));
    }

    md
}

fn recommendations(bugs: &[Issue]) -> Vec<&'static str> {
    let has = |kinds: &[IssueType]| bugs.iter().any(|bug| kinds.contains(&bug.kind));
    let mut out = Vec::new();

    if has(&[IssueType::BrokenLink, IssueType::NavigationError]) {
        out.push("Review and fix broken links");
    }
    if has(&[IssueType::ErrorPage, IssueType::PageLoadError, IssueType::ButtonError]) {
        out.push("Check error pages and the routes that serve them");
    }
    if has(&[
        IssueType::BlankPage,
        IssueType::BlankDestination,
        IssueType::ButtonBlank,
    ]) {
        out.push("Ensure all pages have proper content");
    }
    if out.is_empty() {
        out.push("No action needed");
    }
    out
}
