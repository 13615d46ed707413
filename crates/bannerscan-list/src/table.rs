//! In-memory banner table keyed by domain.

use crate::error::{ListError, Result};
use bannerscan_core::{DetectionConfig, SanityRange, GLOBAL_KEY, UNKNOWN_KEY};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Immutable mapping from normalized domain to an ordered selector list.
///
/// The two reserved keys are held in dedicated fields, so a table that
/// exists always has non-empty `__global__` and `__unknown__` selectors.
/// Regular domain keys are lower-cased, unique, and keep the order in which
/// they first appeared in the source. Every selector sequence is non-empty
/// and free of exact duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerTable {
    global: Vec<String>,
    unknown: Vec<String>,
    /// Domain keys in source order
    order: Vec<String>,
    entries: HashMap<String, Vec<String>>,
}

impl BannerTable {
    /// Selectors checked on every page.
    #[must_use]
    pub fn global(&self) -> &[String] {
        &self.global
    }

    /// Selectors used when a page's domain has no entry.
    #[must_use]
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    /// Selectors for `key`, which must already be lower-cased.
    ///
    /// The reserved keys resolve to their sections as well.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        match key {
            GLOBAL_KEY => Some(&self.global),
            UNKNOWN_KEY => Some(&self.unknown),
            _ => self.entries.get(key).map(Vec::as_slice),
        }
    }

    /// Whether `key` has a dedicated entry (reserved keys excluded).
    #[must_use]
    pub fn contains_domain(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys in the table, reserved keys included.
    #[must_use]
    pub fn domain_count(&self) -> usize {
        self.entries.len() + 2
    }

    /// Total number of selectors across all keys.
    #[must_use]
    pub fn selector_count(&self) -> usize {
        self.global.len() + self.unknown.len() + self.entries.values().map(Vec::len).sum::<usize>()
    }

    /// Regular domain entries in source order.
    pub fn domains(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|sel| (key.as_str(), sel.as_slice())))
    }

    /// Compare the table's size against expected bounds.
    ///
    /// Returns every bound the table falls outside of. An empty result means
    /// the table looks like a real list snapshot.
    #[must_use]
    pub fn check_sanity(&self, bounds: &DetectionConfig) -> Vec<SanityViolation> {
        [
            ("domains", self.domain_count(), bounds.domain_bounds),
            (GLOBAL_KEY, self.global.len(), bounds.global_bounds),
            (UNKNOWN_KEY, self.unknown.len(), bounds.unknown_bounds),
        ]
        .into_iter()
        .filter(|(_, count, range)| !range.contains(*count))
        .map(|(what, count, expected)| SanityViolation {
            what,
            count,
            expected,
        })
        .collect()
    }
}

/// A table size outside of its expected bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityViolation {
    /// Which count is out of bounds
    pub what: &'static str,
    /// Observed count
    pub count: usize,
    /// Expected exclusive bounds
    pub expected: SanityRange,
}

impl fmt::Display for SanityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} count {} outside expected range ({}, {})",
            self.what, self.count, self.expected.min, self.expected.max
        )
    }
}

/// Accumulates selectors per key and validates the reserved sections.
#[derive(Debug, Default)]
pub struct BannerTableBuilder {
    order: Vec<String>,
    sections: HashMap<String, Section>,
}

#[derive(Debug, Default)]
struct Section {
    selectors: Vec<String>,
    seen: HashSet<String>,
}

impl BannerTableBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `selector` to `key`'s sequence.
    ///
    /// The key is lower-cased. Blank selectors and exact duplicates within
    /// the key are ignored. Returns `true` if the selector was added.
    pub fn push(&mut self, key: &str, selector: &str) -> bool {
        let key = key.trim().to_lowercase();
        let selector = selector.trim();

        if key.is_empty() || selector.is_empty() {
            return false;
        }

        if !self.sections.contains_key(&key) {
            self.order.push(key.clone());
        }
        let section = self.sections.entry(key).or_default();

        if !section.seen.insert(selector.to_string()) {
            return false;
        }
        section.selectors.push(selector.to_string());
        true
    }

    /// Finish the table.
    ///
    /// # Errors
    /// Returns [`ListError::Format`] if `__global__` or `__unknown__` has no
    /// selectors. `origin` names the source in the error.
    pub fn build(mut self, origin: &str) -> Result<BannerTable> {
        let global = self.take_reserved(GLOBAL_KEY, origin)?;
        let unknown = self.take_reserved(UNKNOWN_KEY, origin)?;

        let entries: HashMap<String, Vec<String>> = self
            .sections
            .into_iter()
            .filter(|(_, section)| !section.selectors.is_empty())
            .map(|(key, section)| (key, section.selectors))
            .collect();
        let order = self
            .order
            .into_iter()
            .filter(|key| entries.contains_key(key))
            .collect();

        Ok(BannerTable {
            global,
            unknown,
            order,
            entries,
        })
    }

    fn take_reserved(&mut self, key: &str, origin: &str) -> Result<Vec<String>> {
        match self.sections.remove(key) {
            Some(section) if !section.selectors.is_empty() => Ok(section.selectors),
            _ => Err(ListError::Format {
                path: origin.to_string(),
                reason: format!("missing {key} section"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_builder() -> BannerTableBuilder {
        let mut builder = BannerTableBuilder::new();
        builder.push(GLOBAL_KEY, "#cookie-notice");
        builder.push(GLOBAL_KEY, ".cc-window");
        builder.push(UNKNOWN_KEY, ".cookie-bar");
        builder.push("Motorola.de", "#Privacy_banner");
        builder.push("nu.nl", "#cmp");
        builder
    }

    #[test]
    fn test_build_keeps_reserved_sections_apart() {
        let table = sample_builder().build("<test>").expect("build table");

        assert_eq!(table.global(), ["#cookie-notice", ".cc-window"]);
        assert_eq!(table.unknown(), [".cookie-bar"]);
        assert!(!table.contains_domain(GLOBAL_KEY));
        assert_eq!(table.get(GLOBAL_KEY), Some(table.global()));
        assert_eq!(table.domain_count(), 4);
        assert_eq!(table.selector_count(), 5);
    }

    #[test]
    fn test_keys_are_lowercased() {
        let table = sample_builder().build("<test>").expect("build table");
        assert!(table.contains_domain("motorola.de"));
        assert!(!table.contains_domain("Motorola.de"));
    }

    #[test]
    fn test_duplicates_removed_order_preserved() {
        let mut builder = sample_builder();
        assert!(builder.push("example.com", ".b"));
        assert!(builder.push("example.com", ".a"));
        assert!(!builder.push("example.com", ".b"));
        assert!(builder.push("example.com", ".c"));

        let table = builder.build("<test>").expect("build table");
        assert_eq!(
            table.get("example.com").expect("example.com entry"),
            [".b", ".a", ".c"]
        );
    }

    #[test]
    fn test_domains_iterate_in_source_order() {
        let table = sample_builder().build("<test>").expect("build table");
        let keys: Vec<&str> = table.domains().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["motorola.de", "nu.nl"]);
    }

    #[test]
    fn test_blank_selectors_do_not_create_entries() {
        let mut builder = sample_builder();
        assert!(!builder.push("empty.org", "   "));
        let table = builder.build("<test>").expect("build table");
        assert!(!table.contains_domain("empty.org"));
    }

    #[test]
    fn test_missing_reserved_section_is_format_error() {
        let mut builder = BannerTableBuilder::new();
        builder.push(GLOBAL_KEY, "#cookie-notice");
        builder.push("example.com", "#banner");

        let err = builder.build("list.txt").unwrap_err();
        match err {
            ListError::Format { path, reason } => {
                assert_eq!(path, "list.txt");
                assert!(reason.contains(UNKNOWN_KEY));
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_sanity_check_reports_small_tables() {
        let table = sample_builder().build("<test>").expect("build table");
        let violations = table.check_sanity(&DetectionConfig::default());

        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].what, "domains");
        assert_eq!(violations[0].count, 4);
        assert!(violations[2].to_string().contains("__unknown__ count 1"));
    }

    #[test]
    fn test_sanity_check_within_bounds() {
        let table = sample_builder().build("<test>").expect("build table");
        let bounds = DetectionConfig {
            domain_bounds: SanityRange::new(1, 10),
            global_bounds: SanityRange::new(1, 10),
            unknown_bounds: SanityRange::new(0, 10),
        };
        assert!(table.check_sanity(&bounds).is_empty());
    }
}
