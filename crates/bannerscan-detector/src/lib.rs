//! Bannerscan Detector - Cookie banner detection on parsed pages.
//!
//! Given a loaded [`BannerTable`](bannerscan_list::BannerTable), this crate
//! resolves which selectors apply to a page and evaluates them against the
//! page's DOM, recording each matched element once.
//!
//! # Features
//!
//! - Domain-specific or fallback selectors, always followed by the global ones
//! - Identity-based deduplication: the highest-priority selector claims an element
//! - Invalid selectors are skipped without aborting the page
//! - Pluggable DOM capability ([`DomEngine`]) with a `scraper` implementation
//! - Mapping of matches onto the downstream persistence record
//!
//! # Example
//!
//! ```rust
//! use bannerscan_detector::find_banners;
//! use bannerscan_list::BannerListParser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = BannerListParser::new().parse_str("##.cc-window\n~a.org##.cookie-bar\n")?;
//! let html = r#"<html><body><div class="cc-window">We use cookies</div></body></html>"#;
//!
//! let detection = find_banners("http://example.com", html, &table)?;
//! assert_eq!(detection.candidate_count, 2);
//! assert_eq!(detection.matches[0].text, "We use cookies");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod engine;
pub mod error;
pub mod matcher;
pub mod record;
pub mod resolver;

// Re-export commonly used types
pub use engine::{DomEngine, ElementSnapshot, NodeHandle, ScraperEngine, SelectorError};
pub use error::{DetectError, Result};
pub use matcher::{find_banners, BannerDetector, BannerMatch, Detection};
pub use record::{locate_banners, BannerRecord, ElementGeometry, GeometryProbe, VisitContext};
pub use resolver::{resolve, resolve_domain, CandidateSet, CandidateSource};
