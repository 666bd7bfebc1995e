//! HTML parser for extracting page signals
//!
//! This module handles parsing rendered markup to extract:
//! - The page title and body text used by the classification heuristics
//! - Internal links to test (from `<a href>` tags with visible text)
//! - Clickable controls (buttons and button-like inputs)
//! - The form submission a control would trigger

use crate::url::{is_same_origin, normalize_url, NormalizedUrl};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Label used for controls that carry no text, value or aria-label
pub const DEFAULT_BUTTON_LABEL: &str = "Button";

const BUTTON_SELECTOR: &str = r#"button, input[type="button"], input[type="submit"]"#;

/// A link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Trimmed visible text
    pub text: String,
    /// Absolute target, resolved against the page URL
    pub href: Url,
    /// Deduplication key of the target
    pub destination: NormalizedUrl,
    /// True when the target shares the page's origin
    pub is_internal: bool,
}

/// A clickable control found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    /// Label the control is found by when clicking
    pub text: String,
    /// `type` attribute (`submit`, `button`, `reset`)
    pub kind: String,
}

/// Raw signals extracted from one document
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub title: String,
    pub body_text: String,
    pub links: Vec<PageLink>,
    pub buttons: Vec<PageButton>,
}

/// HTTP method of a form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// The request a submit control would send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub method: FormMethod,
    pub action: Url,
    pub fields: Vec<(String, String)>,
}

/// What clicking a control does in a static document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// The control submits its form
    Submit(FormSubmission),
    /// The control exists but has no effect without script execution
    Inert,
}

/// Parses a document and extracts its title, body text, links and controls
///
/// # Extraction Rules
///
/// - Links: `a[href]` with non-empty trimmed text whose target shares the page
///   origin, in document order, at most `max_links`
/// - Controls: `button`, `input[type=button]`, `input[type=submit]`, in document
///   order, at most `max_buttons`
/// - Body text: every text node under `<body>`, untrimmed
///
/// # Example
///
/// ```
/// use site_integrity::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url, 30, 8);
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links[0].destination.as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base_url: &Url, max_links: usize, max_buttons: usize) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        body_text: extract_body_text(&document),
        links: extract_links(&document, base_url, max_links),
        buttons: extract_buttons(&document, max_buttons),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_body_text(document: &Html) -> String {
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };

    document
        .select(&body_selector)
        .next()
        .map(|body| body.text().collect())
        .unwrap_or_default()
}

/// Extracts internal links with visible text from the HTML document
fn extract_links(document: &Html, base_url: &Url, max_links: usize) -> Vec<PageLink> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| {
            let text = element.text().collect::<String>().trim().to_string();
            if text.is_empty() {
                return None;
            }

            let href = element.value().attr("href")?.trim();
            let target = base_url.join(href).ok()?;
            let is_internal = is_same_origin(&target, base_url);

            Some(PageLink {
                text,
                destination: normalize_url(target.as_str(), None),
                href: target,
                is_internal,
            })
        })
        .filter(|link| link.is_internal)
        .take(max_links)
        .collect()
}

fn extract_buttons(document: &Html, max_buttons: usize) -> Vec<PageButton> {
    let Ok(selector) = Selector::parse(BUTTON_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| PageButton {
            text: button_label(&element),
            kind: button_kind(&element),
        })
        .take(max_buttons)
        .collect()
}

/// Label of a control: text, else `value`, else `aria-label`, else a placeholder
fn button_label(element: &ElementRef) -> String {
    let text = element.text().collect::<String>().trim().to_string();
    if !text.is_empty() {
        return text;
    }

    ["value", "aria-label"]
        .iter()
        .filter_map(|attr| element.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_BUTTON_LABEL)
        .to_string()
}

fn button_kind(element: &ElementRef) -> String {
    element
        .value()
        .attr("type")
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "submit".to_string())
}

/// Finds the first control labelled `label` and works out what clicking it does
///
/// Returns `None` when no control on the page carries that label.
pub fn resolve_click(html: &str, base_url: &Url, label: &str) -> Option<ClickTarget> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(BUTTON_SELECTOR).ok()?;
    let label = label.trim();

    let control = document
        .select(&selector)
        .find(|element| button_label(element) == label)?;

    if button_kind(&control) != "submit" {
        return Some(ClickTarget::Inert);
    }

    let form = control
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "form");

    Some(match form {
        Some(form) => ClickTarget::Submit(form_submission(&form, &control, base_url)),
        None => ClickTarget::Inert,
    })
}

/// Builds the submission for `form` as sent by clicking `submitter`
fn form_submission(form: &ElementRef, submitter: &ElementRef, base_url: &Url) -> FormSubmission {
    let method = match form.value().attr("method") {
        Some(m) if m.trim().eq_ignore_ascii_case("post") => FormMethod::Post,
        _ => FormMethod::Get,
    };

    let action = form
        .value()
        .attr("action")
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .and_then(|a| base_url.join(a).ok())
        .unwrap_or_else(|| base_url.clone());

    let mut fields = collect_fields(form);

    if let Some(name) = submitter.value().attr("name").filter(|n| !n.is_empty()) {
        let value = submitter.value().attr("value").unwrap_or_default();
        fields.push((name.to_string(), value.to_string()));
    }

    FormSubmission {
        method,
        action,
        fields,
    }
}

/// Collects the successful controls of a form, in document order
fn collect_fields(form: &ElementRef) -> Vec<(String, String)> {
    let Ok(selector) = Selector::parse("input[name], select[name], textarea[name]") else {
        return Vec::new();
    };

    let mut fields = Vec::new();

    for element in form.select(&selector) {
        let el = element.value();
        if el.attr("disabled").is_some() {
            continue;
        }
        let Some(name) = el.attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };

        let value = match el.name() {
            "input" => {
                let kind = el.attr("type").unwrap_or("text").to_ascii_lowercase();
                match kind.as_str() {
                    "submit" | "button" | "image" | "reset" | "file" => continue,
                    "checkbox" | "radio" => {
                        if el.attr("checked").is_none() {
                            continue;
                        }
                        el.attr("value").unwrap_or("on").to_string()
                    }
                    _ => el.attr("value").unwrap_or_default().to_string(),
                }
            }
            "select" => selected_option(&element),
            _ => element.text().collect(),
        };

        fields.push((name.to_string(), value));
    }

    fields
}

/// Value of the selected option, or the first option when none is selected
fn selected_option(select: &ElementRef) -> String {
    let Ok(selector) = Selector::parse("option") else {
        return String::new();
    };

    let options: Vec<ElementRef> = select.select(&selector).collect();
    options
        .iter()
        .find(|option| option.value().attr("selected").is_some())
        .or_else(|| options.first())
        .map(|option| {
            option
                .value()
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| option.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default()
}
