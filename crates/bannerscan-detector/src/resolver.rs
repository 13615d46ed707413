//! Selection of the candidate selectors for a page.

use bannerscan_core::Domain;
use bannerscan_list::BannerTable;

/// Which table section supplied the leading selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// The page's domain has a dedicated entry
    Domain,
    /// No dedicated entry; the `__unknown__` fallback was used
    Unknown,
}

/// Ordered selectors to evaluate for one page.
///
/// Leading selectors (domain entry or `__unknown__`) come first, followed by
/// `__global__`. Position is the priority used when several selectors match
/// the same element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSet<'t> {
    leading: &'t [String],
    global: &'t [String],
    source: CandidateSource,
}

impl<'t> CandidateSet<'t> {
    /// Number of candidate selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leading.len() + self.global.len()
    }

    /// Whether there is nothing to evaluate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Where the leading selectors came from.
    #[must_use]
    pub fn source(&self) -> CandidateSource {
        self.source
    }

    /// Selectors in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &'t str> + 't {
        let (leading, global) = (self.leading, self.global);
        leading.iter().chain(global).map(String::as_str)
    }

    /// Selectors in priority order, collected.
    #[must_use]
    pub fn to_vec(&self) -> Vec<&'t str> {
        self.iter().collect()
    }
}

/// Resolve a page domain or URL against the table.
///
/// See [`Domain::parse`] for how the input is normalized. Never fails: a
/// domain without an entry, including an empty one, gets the `__unknown__`
/// selectors.
#[must_use]
pub fn resolve<'t>(table: &'t BannerTable, domain: &str) -> CandidateSet<'t> {
    resolve_domain(table, &Domain::parse(domain))
}

/// Resolve an already normalized domain against the table.
#[must_use]
pub fn resolve_domain<'t>(table: &'t BannerTable, domain: &Domain) -> CandidateSet<'t> {
    let key = domain.as_str();
    let dedicated = if table.contains_domain(key) {
        table.get(key)
    } else {
        None
    };

    let (leading, source) = match dedicated {
        Some(selectors) => (selectors, CandidateSource::Domain),
        None => (table.unknown(), CandidateSource::Unknown),
    };

    CandidateSet {
        leading,
        global: table.global(),
        source,
    }
}
