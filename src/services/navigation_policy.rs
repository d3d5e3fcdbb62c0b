//! Navigation policy for in-session link handling.
//!
//! Decides whether a navigation requested inside a session stays in-app or is
//! handed to the external URL opener.

use url::Url;

/// Host component of `url`, lowercased. Malformed or host-less URLs yield "".
pub fn extract_host(url: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Returns `true` when `target_url` must leave the app.
///
/// - Empty whitelist: any navigation between two different non-empty hosts
///   leaves the app.
/// - Non-empty whitelist: a target with a non-empty host leaves the app unless
///   it ends with one of the whitelist entries (`example.com` also admits
///   `m.example.com`).
///
/// Hosts and entries are compared case-insensitively. An empty target host
/// never opens externally.
pub fn should_open_externally(current_url: &str, target_url: &str, whitelist: &[String]) -> bool {
    let target_host = extract_host(target_url);
    if target_host.is_empty() {
        return false;
    }

    let entries: Vec<String> = whitelist
        .iter()
        .map(|d| d.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .collect();

    if entries.is_empty() {
        let current_host = extract_host(current_url);
        return !current_host.is_empty() && current_host != target_host;
    }

    !entries.iter().any(|entry| target_host.ends_with(entry.as_str()))
}
