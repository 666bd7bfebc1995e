use url::Url;

/// Extracts the serialized origin (`scheme://host[:port]`) from a URL
///
/// Returns `None` for URLs without a network origin such as `mailto:` or `data:`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_integrity::url::extract_origin;
///
/// let url = Url::parse("https://EXAMPLE.com:8443/path").unwrap();
/// assert_eq!(extract_origin(&url), Some("https://example.com:8443".to_string()));
///
/// let url = Url::parse("mailto:admin@example.com").unwrap();
/// assert_eq!(extract_origin(&url), None);
/// ```
pub fn extract_origin(url: &Url) -> Option<String> {
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Returns true when both URLs share scheme, host and port
pub fn is_same_origin(a: &Url, b: &Url) -> bool {
    let origin = a.origin();
    origin.is_tuple() && origin == b.origin()
}
