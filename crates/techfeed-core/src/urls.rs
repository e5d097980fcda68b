//! URL canonicalization for post deduplication.

use percent_encoding::percent_decode_str;
use url::Url;

/// Normalize a post URL into its dedup key.
///
/// Host and path are lower-cased, the path is percent-decoded, a trailing
/// slash is removed, and query string, fragment, and credentials are
/// dropped. Default ports disappear with parsing; explicit non-default ports
/// are kept. Input that does not parse as an absolute URL falls back to the
/// same rules applied textually, so every URL yields a key.
#[must_use]
pub fn canonicalize(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) if url.has_host() => canonicalize_parsed(&url),
        _ => canonicalize_text(trimmed),
    }
}

fn canonicalize_parsed(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    let path = normalize_path(url.path());
    format!("{}://{host}{port}{path}", url.scheme())
}

fn canonicalize_text(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    normalize_path(&raw[..end])
}

fn normalize_path(path: &str) -> String {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    decoded.to_lowercase().trim_end_matches('/').to_string()
}
