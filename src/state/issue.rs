//! Issue records produced by page, link and button classification

use crate::url::NormalizedUrl;
use serde::Serialize;
use std::fmt;

/// Longest navigation error detail kept in an issue message
const MAX_ERROR_DETAIL_CHARS: usize = 100;

/// Kind of problem found during a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    /// Crawled page answered with HTTP >= 400 or looks like an error page
    ErrorPage,
    /// Crawled page has too little text
    BlankPage,
    /// Link destination answered with HTTP >= 400 or looks like an error page
    BrokenLink,
    /// Link destination has too little text
    BlankDestination,
    /// Navigating to a link destination failed outright
    NavigationError,
    /// Clicking a button led to an error page
    ButtonError,
    /// Clicking a button led to a blank page
    ButtonBlank,
    /// Loading a page for a full crawl pass failed outright
    PageLoadError,
}

impl IssueType {
    /// Severity attached to every issue of this type
    pub fn severity(&self) -> Severity {
        match self {
            Self::ErrorPage | Self::BrokenLink | Self::ButtonError | Self::PageLoadError => {
                Severity::High
            }
            Self::BlankPage | Self::BlankDestination | Self::NavigationError | Self::ButtonBlank => {
                Severity::Medium
            }
        }
    }

    /// Wire name, as serialized in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ErrorPage => "ERROR_PAGE",
            Self::BlankPage => "BLANK_PAGE",
            Self::BrokenLink => "BROKEN_LINK",
            Self::BlankDestination => "BLANK_DESTINATION",
            Self::NavigationError => "NAVIGATION_ERROR",
            Self::ButtonError => "BUTTON_ERROR",
            Self::ButtonBlank => "BUTTON_BLANK",
            Self::PageLoadError => "PAGE_LOAD_ERROR",
        }
    }

    /// Human-readable heading for grouped output
    pub fn heading(&self) -> &'static str {
        match self {
            Self::ErrorPage => "Error Pages",
            Self::BlankPage => "Blank Pages",
            Self::BrokenLink => "Broken Links",
            Self::BlankDestination => "Blank Destinations",
            Self::NavigationError => "Navigation Errors",
            Self::ButtonError => "Button Errors",
            Self::ButtonBlank => "Blank Button Results",
            Self::PageLoadError => "Page Load Errors",
        }
    }

    pub fn all() -> [Self; 8] {
        [
            Self::ErrorPage,
            Self::BlankPage,
            Self::BrokenLink,
            Self::BlankDestination,
            Self::NavigationError,
            Self::ButtonError,
            Self::ButtonBlank,
            Self::PageLoadError,
        ]
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found during a crawl
///
/// Issues are immutable once recorded; build them with the typed constructors so the
/// message and severity always match the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueType,

    /// The page on which the problem was found
    pub page: NormalizedUrl,

    /// Label of the link that was followed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Label of the button that was clicked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<NormalizedUrl>,

    /// Human-readable description
    pub issue: String,

    pub severity: Severity,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl Issue {
    fn new(kind: IssueType, page: NormalizedUrl, issue: String) -> Self {
        Self {
            kind,
            page,
            link: None,
            button: None,
            destination: None,
            issue,
            severity: kind.severity(),
            status_code: None,
        }
    }

    pub fn error_page(page: NormalizedUrl, title: &str, status_code: u16) -> Self {
        let mut issue = Self::new(
            IssueType::ErrorPage,
            page,
            format!("Error page detected: {} (HTTP {})", title, status_code),
        );
        issue.status_code = Some(status_code);
        issue
    }

    pub fn blank_page(page: NormalizedUrl) -> Self {
        Self::new(
            IssueType::BlankPage,
            page,
            "Page appears to be blank or has very little content".to_string(),
        )
    }

    pub fn page_load_error(page: NormalizedUrl, error: &str) -> Self {
        Self::new(
            IssueType::PageLoadError,
            page,
            format!("Failed to load page: {}", error),
        )
    }

    pub fn broken_link(
        page: NormalizedUrl,
        link: &str,
        destination: NormalizedUrl,
        status_code: u16,
    ) -> Self {
        let mut issue = Self::new(
            IssueType::BrokenLink,
            page,
            format!(
                "Link \"{}\" leads to error page (HTTP {})",
                link, status_code
            ),
        );
        issue.link = Some(link.to_string());
        issue.destination = Some(destination);
        issue.status_code = Some(status_code);
        issue
    }

    pub fn blank_destination(page: NormalizedUrl, link: &str, destination: NormalizedUrl) -> Self {
        let mut issue = Self::new(
            IssueType::BlankDestination,
            page,
            format!("Link \"{}\" leads to blank page", link),
        );
        issue.link = Some(link.to_string());
        issue.destination = Some(destination);
        issue
    }

    pub fn navigation_error(
        page: NormalizedUrl,
        link: &str,
        destination: NormalizedUrl,
        error: &str,
    ) -> Self {
        let detail: String = error.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
        let mut issue = Self::new(
            IssueType::NavigationError,
            page,
            format!("Failed to navigate to \"{}\": {}", link, detail),
        );
        issue.link = Some(link.to_string());
        issue.destination = Some(destination);
        issue
    }

    pub fn button_error(page: NormalizedUrl, button: &str, destination: NormalizedUrl) -> Self {
        let mut issue = Self::new(
            IssueType::ButtonError,
            page,
            format!("Button \"{}\" leads to error page", button),
        );
        issue.button = Some(button.to_string());
        issue.destination = Some(destination);
        issue
    }

    pub fn button_blank(page: NormalizedUrl, button: &str, destination: NormalizedUrl) -> Self {
        let mut issue = Self::new(
            IssueType::ButtonBlank,
            page,
            format!("Button \"{}\" leads to blank page", button),
        );
        issue.button = Some(button.to_string());
        issue.destination = Some(destination);
        issue
    }
}
