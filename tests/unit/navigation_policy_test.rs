//! Unit tests for the navigation whitelist evaluator.

use rstest::rstest;
use weblauncher::services::navigation_policy::{extract_host, should_open_externally};

fn list(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|e| e.to_string()).collect()
}

#[rstest]
#[case::same_host_no_whitelist("https://a.com/x", "https://a.com/y", &[], false)]
#[case::other_host_no_whitelist("https://a.com/x", "https://b.com/", &[], true)]
#[case::subdomain_whitelisted("https://example.com/", "https://shop.example.com/", &["example.com"], false)]
#[case::foreign_host_whitelisted("https://example.com/", "https://evil.com/", &["example.com"], true)]
#[case::exact_whitelist_host("https://a.com/", "https://example.com/login", &["example.com"], false)]
#[case::any_entry_matches("https://a.com/", "https://docs.rs/", &["example.com", "docs.rs"], false)]
#[case::case_insensitive("https://a.com/", "https://Shop.EXAMPLE.com/", &["Example.Com"], false)]
#[case::malformed_target("https://a.com/", "::not a url::", &[], false)]
#[case::malformed_target_whitelisted("https://a.com/", "::not a url::", &["example.com"], false)]
#[case::hostless_target("https://a.com/", "mailto:me@b.com", &[], false)]
#[case::blank_current("", "https://b.com/", &[], false)]
#[case::blank_current_whitelisted("", "https://b.com/", &["example.com"], true)]
fn test_should_open_externally(
    #[case] current: &str,
    #[case] target: &str,
    #[case] whitelist: &[&str],
    #[case] expected: bool,
) {
    assert_eq!(should_open_externally(current, target, &list(whitelist)), expected);
}

#[test]
fn test_suffix_match_is_plain_suffix() {
    // "notexample.com" ends with "example.com".
    assert!(!should_open_externally(
        "https://a.com/",
        "https://notexample.com/",
        &list(&["example.com"])
    ));
}

#[rstest]
#[case("https://A.com:8443/path?q=1#frag", "a.com")]
#[case("http://127.0.0.1/", "127.0.0.1")]
#[case("file:///etc/hosts", "")]
#[case("", "")]
fn test_extract_host(#[case] url: &str, #[case] host: &str) {
    assert_eq!(extract_host(url), host);
}
