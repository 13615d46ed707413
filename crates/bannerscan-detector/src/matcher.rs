//! Banner detection on a parsed page.

use crate::engine::{DomEngine, ScraperEngine};
use crate::error::Result;
use crate::resolver::resolve;
use bannerscan_list::BannerTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// One element identified as a banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerMatch {
    /// The highest-priority selector that matched the element
    pub selector: String,
    /// Lower-cased tag name
    pub tag: String,
    /// `id` attribute, empty if absent
    pub id: String,
    /// Text content, trimmed at both ends
    pub text: String,
}

/// Result of one detection call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Number of candidate selectors evaluated for the page's domain
    pub candidate_count: usize,
    /// Matches ordered by selector priority, then document order
    pub matches: Vec<BannerMatch>,
    /// Candidates the engine could not evaluate
    pub skipped_selectors: usize,
}

impl Detection {
    /// Number of matches claimed by each selector.
    #[must_use]
    pub fn count_by_selector(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for banner in &self.matches {
            *counts.entry(banner.selector.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Detects banners with a given DOM engine.
///
/// Holds no per-page state; a single detector can serve any number of
/// pages and tables.
#[derive(Debug, Clone, Default)]
pub struct BannerDetector<E = ScraperEngine> {
    engine: E,
}

impl BannerDetector<ScraperEngine> {
    /// Create a detector backed by `scraper`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_engine(ScraperEngine)
    }
}

impl<E: DomEngine> BannerDetector<E> {
    /// Create a detector backed by a custom engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Find banner elements on a page.
    ///
    /// `domain` may be a bare host name or the page URL. Candidates are
    /// evaluated in priority order and each element is recorded once, under
    /// the first selector that matched it. Selectors the engine rejects are
    /// skipped.
    ///
    /// # Errors
    /// Returns [`DetectError::Parse`](crate::DetectError::Parse) if the
    /// document is empty or has no parseable structure.
    pub fn detect(&self, domain: &str, html: &str, table: &BannerTable) -> Result<Detection> {
        let candidates = resolve(table, domain);
        let candidate_count = candidates.len();

        let document = self.engine.parse(html)?;

        let mut seen = HashSet::new();
        let mut matches = Vec::new();
        let mut skipped_selectors = 0;

        for selector in candidates.iter() {
            let claimed = self
                .engine
                .select_claimed(&document, selector, &mut |handle| seen.insert(handle));
            let elements = match claimed {
                Ok(elements) => elements,
                Err(e) => {
                    skipped_selectors += 1;
                    debug!(error = %e, "skipping selector");
                    continue;
                }
            };

            matches.extend(elements.into_iter().map(|element| BannerMatch {
                selector: selector.to_string(),
                tag: element.tag,
                id: element.id,
                text: element.text,
            }));
        }

        debug!(
            domain,
            source = ?candidates.source(),
            candidates = candidate_count,
            matches = matches.len(),
            skipped = skipped_selectors,
            "banner detection finished"
        );

        Ok(Detection {
            candidate_count,
            matches,
            skipped_selectors,
        })
    }
}

/// Find banner elements on a page using the default engine.
///
/// # Errors
/// Returns [`DetectError::Parse`](crate::DetectError::Parse) if the document
/// is empty or has no parseable structure.
pub fn find_banners(domain: &str, html: &str, table: &BannerTable) -> Result<Detection> {
    BannerDetector::new().detect(domain, html, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ElementSnapshot, NodeHandle, SelectorError};
    use crate::error::DetectError;
    use bannerscan_list::BannerListParser;
    use std::cell::Cell;

    fn table(text: &str) -> BannerTable {
        BannerListParser::new()
            .parse_str(text)
            .expect("parse test list")
    }

    #[test]
    fn test_first_selector_claims_element() {
        let table = table("##.banner\n##div\n~x.org###notice\n");
        let html = r#"<div id="notice" class="banner">Cookies</div><div>Other</div>"#;

        let detection = find_banners("example.com", html, &table).expect("detect");

        assert_eq!(detection.candidate_count, 3);
        assert_eq!(detection.matches.len(), 2);
        assert_eq!(detection.matches[0].selector, "#notice");
        assert_eq!(detection.matches[0].id, "notice");
        assert_eq!(detection.matches[1].selector, "div");
        assert_eq!(detection.matches[1].text, "Other");
    }

    #[test]
    fn test_equal_content_is_not_deduplicated() {
        let table = table("##.cookie\n~x.org##.none\n");
        let html = r#"<p class="cookie">OK</p><p class="cookie">OK</p>"#;

        let detection = find_banners("", html, &table).expect("detect");

        assert_eq!(detection.matches.len(), 2);
        assert_eq!(detection.matches[0], detection.matches[1]);
    }

    #[test]
    fn test_invalid_selectors_are_skipped() {
        let table = table("##div[\n##:nth-child(\n##.cookie\n~x.org##>>>\n");
        let html = r#"<section class="cookie">We use cookies</section>"#;

        let detection = find_banners("example.com", html, &table).expect("detect");

        assert_eq!(detection.candidate_count, 4);
        assert_eq!(detection.skipped_selectors, 3);
        assert_eq!(detection.matches.len(), 1);
        assert_eq!(detection.matches[0].tag, "section");
    }

    #[test]
    fn test_empty_document_is_parse_error() {
        let table = table("##.cookie\n~x.org##.none\n");
        assert!(matches!(
            find_banners("example.com", "", &table),
            Err(DetectError::Parse(_))
        ));
    }

    #[test]
    fn test_count_by_selector() {
        let table = table("##li\n~x.org###cmp\n");
        let html = r#"<div id="cmp">Consent</div><ul><li>a</li><li>b</li><li>c</li></ul>"#;

        let detection = find_banners("example.com", html, &table).expect("detect");
        let counts = detection.count_by_selector();

        assert_eq!(counts.get("li"), Some(&3));
        assert_eq!(counts.get("#cmp"), Some(&1));
    }

    /// Engine over a flat list of `(tag, classes)` elements.
    #[derive(Default)]
    struct ListEngine {
        snapshots: Cell<usize>,
    }

    impl DomEngine for ListEngine {
        type Document = Vec<(&'static str, &'static str)>;

        fn parse(&self, html: &str) -> Result<Self::Document> {
            if html.is_empty() {
                return Err(DetectError::Parse("empty".to_string()));
            }
            Ok(vec![("div", "a b"), ("span", "b")])
        }

        fn select_claimed(
            &self,
            document: &Self::Document,
            selector: &str,
            claim: &mut dyn FnMut(NodeHandle) -> bool,
        ) -> std::result::Result<Vec<ElementSnapshot>, SelectorError> {
            let class = selector.strip_prefix('.').ok_or_else(|| SelectorError {
                selector: selector.to_string(),
                reason: "only class selectors".to_string(),
            })?;

            Ok(document
                .iter()
                .enumerate()
                .filter(|(_, (_, classes))| classes.split(' ').any(|c| c == class))
                .filter(|(index, _)| claim(NodeHandle::new(*index)))
                .map(|(index, (tag, _))| {
                    self.snapshots.set(self.snapshots.get() + 1);
                    ElementSnapshot {
                        handle: NodeHandle::new(index),
                        tag: (*tag).to_string(),
                        id: String::new(),
                        text: String::new(),
                    }
                })
                .collect())
        }
    }

    #[test]
    fn test_custom_engine() {
        let table = table("##.b\n##div\n~x.org##.a\n");
        let detector = BannerDetector::with_engine(ListEngine::default());

        let detection = detector.detect("y.org", "doc", &table).expect("detect");

        assert_eq!(detection.skipped_selectors, 1);
        let selectors: Vec<&str> = detection.matches.iter().map(|m| m.selector.as_str()).collect();
        assert_eq!(selectors, vec![".a", ".b"]);
        assert_eq!(detection.matches[1].tag, "span");
    }

    #[test]
    fn test_claimed_elements_are_snapshotted_once() {
        // `.a` claims the div first; later selectors only snapshot the span
        let table = table("##.a
##.b
##.b
~x.org##.a
");
        let detector = BannerDetector::with_engine(ListEngine::default());

        let detection = detector.detect("y.org", "doc", &table).expect("detect");

        assert_eq!(detection.matches.len(), 2);
        assert_eq!(detector.engine.snapshots.get(), 2);
    }
}
