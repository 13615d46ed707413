//! Banner list parsing.
//!
//! The list is line oriented. Two syntaxes are understood and may be mixed:
//!
//! ```text
//! ! comment
//! [__global__]
//! #cookie-notice
//! .cc-window
//!
//! [__unknown__]
//! .cookie-bar
//!
//! [motorola.de]
//! #Privacy_banner
//!
//! nu.nl,nu.be###cmp
//! ~example.org##.consent
//! ##.cookie-wall
//! ```
//!
//! A `[name]` header opens a section for `__global__`, `__unknown__` or a
//! host name with at least one dot; following lines are that section's
//! selectors. Element-hiding rules (`domains##selector`) assign a selector
//! directly: no domains means `__global__`, only negated domains means
//! `__unknown__`, otherwise each positive domain. Wildcard domains
//! (`google.*`) can never equal a page host and are dropped; a rule left
//! with no target is skipped. Domain keys are stored the way
//! [`Domain::parse`] normalizes page hosts, so internationalized names are
//! kept in punycode.

use crate::error::{ListError, Result};
use crate::table::{BannerTable, BannerTableBuilder};
use bannerscan_core::{DetectionConfig, Domain, GLOBAL_KEY, UNKNOWN_KEY};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Parse the list file at `path` into a table.
///
/// # Errors
/// Returns [`ListError::Format`] if the file cannot be read or lacks a
/// reserved section.
pub fn parse_list(path: impl AsRef<Path>) -> Result<BannerTable> {
    BannerListParser::new().parse_file(path)
}

/// Parser for cookie banner lists.
#[derive(Debug, Clone, Default)]
pub struct BannerListParser {
    bounds: Option<DetectionConfig>,
}

/// One classified list line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Comment,
    Section(Vec<&'a str>),
    Rule { domains: &'a str, selector: &'a str },
    Unsupported,
    Selector(&'a str),
}

#[derive(Debug, Default)]
struct ParseStats {
    selectors: usize,
    duplicates: usize,
    skipped: usize,
}

impl BannerListParser {
    /// Create a parser without load-sanity bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that logs a warning when a loaded table falls outside
    /// the configured size bounds.
    #[must_use]
    pub fn with_sanity_bounds(bounds: DetectionConfig) -> Self {
        Self {
            bounds: Some(bounds),
        }
    }

    /// Read and parse a list file.
    ///
    /// # Errors
    /// Returns [`ListError::Format`] if the file cannot be read or lacks a
    /// reserved section.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<BannerTable> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ListError::Format {
            path: path.display().to_string(),
            reason: format!("cannot read list: {e}"),
        })?;

        self.parse_source(&contents, &path.display().to_string())
    }

    /// Parse list text held in memory.
    ///
    /// # Errors
    /// Returns [`ListError::Format`] if a reserved section is missing.
    pub fn parse_str(&self, text: &str) -> Result<BannerTable> {
        self.parse_source(text, "<inline>")
    }

    fn parse_source(&self, text: &str, origin: &str) -> Result<BannerTable> {
        let mut builder = BannerTableBuilder::new();
        let mut stats = ParseStats::default();
        let mut current: Vec<&str> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;

            match classify(raw) {
                Line::Blank | Line::Comment => {}
                Line::Section(keys) => current = keys,
                Line::Rule { domains, selector } => {
                    let targets = rule_targets(domains);
                    if targets.is_empty() {
                        stats.skipped += 1;
                        debug!(
                            line = line_no,
                            origin,
                            domains,
                            "rule has only wildcard domains, skipping"
                        );
                    }
                    for key in targets {
                        stats.record(builder.push(&table_key(key), selector));
                    }
                }
                Line::Selector(selector) if !current.is_empty() => {
                    for key in &current {
                        stats.record(builder.push(&table_key(key), selector));
                    }
                }
                Line::Selector(_) => {
                    stats.skipped += 1;
                    warn!(line = line_no, origin, "selector outside of any section, skipping");
                }
                Line::Unsupported => {
                    stats.skipped += 1;
                    debug!(line = line_no, origin, "unsupported filter rule, skipping");
                }
            }
        }

        let table = builder.build(origin)?;

        info!(
            origin,
            domains = table.domain_count(),
            global = table.global().len(),
            unknown = table.unknown().len(),
            selectors = stats.selectors,
            duplicates = stats.duplicates,
            skipped = stats.skipped,
            "loaded banner list"
        );

        if let Some(bounds) = &self.bounds {
            for violation in table.check_sanity(bounds) {
                warn!(origin, %violation, "banner list size outside expected bounds");
            }
        }

        Ok(table)
    }
}

impl ParseStats {
    fn record(&mut self, added: bool) {
        if added {
            self.selectors += 1;
        } else {
            self.duplicates += 1;
        }
    }
}

fn classify(raw: &str) -> Line<'_> {
    static SECTION: OnceLock<Regex> = OnceLock::new();
    static RULE: OnceLock<Regex> = OnceLock::new();
    static EXCEPTION: OnceLock<Regex> = OnceLock::new();

    let line = raw.trim();

    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('!') || line.to_ascii_lowercase().starts_with("[adblock") {
        return Line::Comment;
    }
    // Network rules can never be CSS selectors
    if line.starts_with("||") || line.starts_with("@@") {
        return Line::Unsupported;
    }

    let section = SECTION.get_or_init(|| {
        Regex::new(r"^\[\s*([\w.,\s-]+?)\s*\]$").expect("valid section regex")
    });
    if let Some(inner) = section.captures(line).and_then(|caps| caps.get(1)) {
        let keys: Vec<&str> = inner.as_str().split(',').map(str::trim).collect();
        if keys.iter().all(|key| is_section_key(key)) {
            return Line::Section(keys);
        }
    }

    let exception = EXCEPTION.get_or_init(|| {
        Regex::new(r"^[\w~.,*-]*#(@#|\?#|\$#|@\?#|@\$#)").expect("valid exception regex")
    });
    if exception.is_match(line) {
        return Line::Unsupported;
    }

    let rule = RULE.get_or_init(|| {
        Regex::new(r"^([\w~.,*-]*)##(.+)$").expect("valid rule regex")
    });
    if let Some(caps) = rule.captures(line) {
        if let (Some(domains), Some(selector)) = (caps.get(1), caps.get(2)) {
            return Line::Rule {
                domains: domains.as_str(),
                selector: selector.as_str().trim(),
            };
        }
    }

    // `##` inside an attribute value or pseudo-class argument belongs to a
    // selector; anywhere else it marks a rule with a domain list we cannot use
    if let Some((prefix, _)) = line.split_once("##") {
        if !prefix.contains(['[', '(', '\'', '"']) {
            return Line::Unsupported;
        }
    }

    Line::Selector(line)
}

/// Header names are reserved keys or dotted host names.
fn is_section_key(key: &str) -> bool {
    static HOST: OnceLock<Regex> = OnceLock::new();
    let host = HOST.get_or_init(|| {
        Regex::new(r"^[\w-]+(\.[\w-]+)+$").expect("valid host regex")
    });

    key == GLOBAL_KEY || key == UNKNOWN_KEY || host.is_match(key)
}

/// Table keys an element-hiding rule applies to.
fn rule_targets(domains: &str) -> Vec<&str> {
    let listed: Vec<&str> = domains
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();

    if listed.is_empty() {
        return vec![GLOBAL_KEY];
    }

    let positive: Vec<&str> = listed.iter().copied().filter(|d| !d.starts_with('~')).collect();
    if positive.is_empty() {
        return vec![UNKNOWN_KEY];
    }

    positive.into_iter().filter(|d| !d.contains('*')).collect()
}

/// Key under which a section or rule target is stored.
fn table_key(key: &str) -> String {
    if key == GLOBAL_KEY || key == UNKNOWN_KEY {
        key.to_string()
    } else {
        Domain::parse(key).as_str().to_string()
    }
}
