//! Shared types used across bannerscan.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Table key for selectors checked on every page.
pub const GLOBAL_KEY: &str = "__global__";

/// Table key for selectors used when a page's domain has no entry.
pub const UNKNOWN_KEY: &str = "__unknown__";

/// Normalized page domain used for banner list lookups.
///
/// Normalization trims surrounding whitespace and reduces the input to its
/// lower-cased host: a URL (`scheme://...`) loses everything but the host,
/// and scheme-less input loses any port or path (`nu.nl:443/x` is `nu.nl`).
/// Internationalized names are stored in their ASCII (punycode) form.
/// Nothing else is stripped: `www.example.com` and `example.com` are
/// different domains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Domain(String);

impl Domain {
    /// Normalize a bare host name or page URL into a `Domain`.
    ///
    /// Never fails; input that cannot be interpreted yields an empty domain,
    /// which matches no table entry.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Self::default();
        }

        if trimmed.contains("://") {
            return match Url::parse(trimmed) {
                Ok(url) => Self(url.host_str().unwrap_or_default().to_lowercase()),
                Err(e) => {
                    tracing::debug!(input = %trimmed, error = %e, "unparseable page URL");
                    Self::default()
                }
            };
        }

        match Url::parse(&format!("http://{trimmed}")) {
            Ok(url) => Self(url.host_str().unwrap_or_default().to_lowercase()),
            Err(_) => Self(bare_host(trimmed).to_lowercase()),
        }
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the domain is empty (no lookup can match).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Host part of scheme-less input the URL parser rejects.
fn bare_host(input: &str) -> &str {
    input
        .split(['/', ':', '?', '#'])
        .next()
        .unwrap_or_default()
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Domain {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_lowercases_and_trims() {
        assert_eq!(Domain::parse("  Motorola.DE ").as_str(), "motorola.de");
    }

    #[test]
    fn test_domain_from_url_uses_host() {
        assert_eq!(Domain::parse("http://tudelft.nl").as_str(), "tudelft.nl");
        assert_eq!(
            Domain::parse("https://www.Google.nl/search?q=x").as_str(),
            "www.google.nl"
        );
    }

    #[test]
    fn test_schemeless_input_drops_port_and_path() {
        assert_eq!(Domain::parse("tudelft.nl/en").as_str(), "tudelft.nl");
        assert_eq!(Domain::parse("nu.nl:443").as_str(), "nu.nl");
        assert_eq!(Domain::parse("Motorola.de:8080/de/privacy?x=1").as_str(), "motorola.de");
        assert_eq!(Domain::parse("nu.nl:443"), Domain::parse("https://nu.nl/"));
    }

    #[test]
    fn test_internationalized_host_uses_ascii_form() {
        assert_eq!(Domain::parse("Bücher.de").as_str(), "xn--bcher-kva.de");
        assert_eq!(Domain::parse("bücher.de"), Domain::parse("https://bücher.de/kasse"));
    }

    #[test]
    fn test_bare_host_fallback() {
        assert_eq!(bare_host("a b.example/path"), "a b.example");
        assert_eq!(bare_host("host:port"), "host");
    }

    #[test]
    fn test_domain_keeps_www_prefix() {
        assert_ne!(Domain::parse("www.example.com"), Domain::parse("example.com"));
    }

    #[test]
    fn test_empty_and_broken_input() {
        assert!(Domain::parse("").is_empty());
        assert!(Domain::parse("   ").is_empty());
        assert!(Domain::parse("http://").is_empty());
    }

    #[test]
    fn test_domain_serializes_as_string() {
        let json = serde_json::to_string(&Domain::parse("nu.nl")).expect("serialize domain");
        assert_eq!(json, "\"nu.nl\"");
    }
}
