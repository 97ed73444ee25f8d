/// Domain extraction and normalization for ChainChat
use url::Url;

/// Extract the normalized domain from a tab URL
///
/// Algorithm:
/// 1. Parse the URL and take its hostname
/// 2. Lowercase it
/// 3. Strip a single leading "www." prefix
/// 4. Reject anything without a "." or shorter than 3 characters
///
/// Examples:
/// - https://www.Example.com/page → example.com
/// - https://docs.example.com/guide → docs.example.com
/// - chrome://newtab, about:blank, "" → None
pub fn extract_domain(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        return None;
    }

    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    normalize_domain(&host)
}

/// Normalize an already-extracted hostname with the same rules as
/// `extract_domain`. Used for user-supplied domains (blacklist adds) so
/// membership tests line up with monitor-extracted domains.
pub fn normalize_domain(host: &str) -> Option<String> {
    let host = host.trim().to_lowercase();
    let domain = host.strip_prefix("www.").unwrap_or(&host);

    if !domain.contains('.') || domain.len() < 3 {
        return None;
    }

    Some(domain.to_string())
}
