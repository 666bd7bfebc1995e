use crate::url::extract_origin;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use url::Url;

/// Canonical key used to deduplicate pages and link destinations
///
/// Always the URL's origin (scheme, host and non-default port) followed by its path
/// with every trailing slash removed. Query string and fragment are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedUrl {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Normalizes a URL into its deduplication key
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` when one is given, otherwise parse it as absolute
/// 2. Keep the origin (`scheme://host[:port]`) and the path
/// 3. Strip all trailing slashes from the path (the root path becomes empty)
/// 4. Drop the query string and fragment
///
/// Input that cannot be parsed, or that has no network origin (`mailto:`, `data:`, ...),
/// degrades to the trimmed raw string with trailing slashes removed. This function
/// never fails, and applying it to its own output returns the same key.
///
/// # Examples
///
/// ```
/// use site_integrity::url::normalize_url;
///
/// let key = normalize_url("https://Example.com/docs/?page=2#intro", None);
/// assert_eq!(key.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> NormalizedUrl {
    let raw = raw.trim();

    let parsed = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };

    let origin_and_path = parsed
        .ok()
        .and_then(|url| extract_origin(&url).map(|origin| (origin, url)));

    match origin_and_path {
        Some((origin, url)) => NormalizedUrl(format!(
            "{}{}",
            origin,
            url.path().trim_end_matches('/')
        )),
        None => NormalizedUrl(raw.trim_end_matches('/').to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> String {
        normalize_url(raw, None).into_string()
    }

    #[test]
    fn test_remove_trailing_slash() {
        assert_eq!(norm("https://a.com/x/"), norm("https://a.com/x"));
        assert_eq!(norm("https://a.com/x/"), "https://a.com/x");
    }

    #[test]
    fn test_remove_repeated_trailing_slashes() {
        assert_eq!(norm("https://a.com/x///"), "https://a.com/x");
    }

    #[test]
    fn test_root_path_becomes_origin() {
        assert_eq!(norm("https://a.com/"), "https://a.com");
        assert_eq!(norm("https://a.com"), "https://a.com");
    }

    #[test]
    fn test_drop_query_and_fragment() {
        assert_eq!(norm("https://a.com/x?q=1"), norm("https://a.com/x"));
        assert_eq!(norm("https://a.com/x#top"), "https://a.com/x");
        assert_eq!(norm("https://a.com/x/?q=1#top"), "https://a.com/x");
    }

    #[test]
    fn test_keeps_non_default_port() {
        assert_eq!(norm("http://localhost:3001/about/"), "http://localhost:3001/about");
        assert_eq!(norm("https://a.com:443/x"), "https://a.com/x");
    }

    #[test]
    fn test_lowercases_scheme_and_host() {
        assert_eq!(norm("HTTPS://A.COM/Path"), "https://a.com/Path");
    }

    #[test]
    fn test_resolves_dot_segments() {
        assert_eq!(norm("https://a.com/a/../b/./c"), "https://a.com/b/c");
    }

    #[test]
    fn test_relative_against_base() {
        let base = Url::parse("https://a.com/docs/intro").unwrap();
        assert_eq!(
            normalize_url("../pricing/", Some(&base)).as_str(),
            "https://a.com/pricing"
        );
        assert_eq!(
            normalize_url("guide?x=1", Some(&base)).as_str(),
            "https://a.com/docs/guide"
        );
    }

    #[test]
    fn test_fragment_only_link_is_self() {
        let base = Url::parse("https://a.com/docs/").unwrap();
        assert_eq!(
            normalize_url("#", Some(&base)).into_string(),
            norm("https://a.com/docs")
        );
    }

    #[test]
    fn test_malformed_input_falls_back() {
        assert_eq!(norm("not a url/"), "not a url");
        assert_eq!(norm("  /relative/path//  "), "/relative/path");
    }

    #[test]
    fn test_opaque_scheme_falls_back() {
        assert_eq!(norm("mailto:someone@a.com/"), "mailto:someone@a.com");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "https://a.com/x/",
            "https://a.com/x?q=1#f",
            "https://a.com/",
            "https://a.com",
            "http://localhost:3001/a/../b//",
            "https://a.com/with space/",
            "HTTPS://Example.COM:8443/Path/",
            "not a url//",
            "mailto:x@y.z/",
            "",
            "/",
        ];

        for sample in samples {
            let once = normalize_url(sample, None);
            let twice = normalize_url(once.as_str(), None);
            assert_eq!(once, twice, "normalization not idempotent for {:?}", sample);
        }
    }
}
