//! Utility functions and helpers.

pub mod http;
pub mod text;

use url::Url;

/// Rewrite a protocol-relative URL (`//host/path`) to `https://host/path`.
pub fn absolutize_protocol_relative(href: &str) -> String {
    match href.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_string(),
    }
}

/// Extract the lowercase host from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}

/// True when both URLs parse and point at the same host.
pub fn same_host(a: &str, b: &str) -> bool {
    matches!((get_domain(a), get_domain(b)), (Some(x), Some(y)) if x == y)
}

/// Read the `page` query parameter from a pagination URL.
pub fn page_from_url(url_str: &str) -> Option<u32> {
    let parsed = Url::parse(url_str).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
