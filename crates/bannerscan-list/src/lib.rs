//! Bannerscan List - Cookie banner selector list handling.
//!
//! This crate turns the community-maintained cookie banner list into an
//! immutable, domain-keyed [`BannerTable`] of CSS selectors.
//!
//! # Architecture
//!
//! - **Table** ([`table`]): The loaded domain → selectors mapping with its two reserved keys
//! - **Parser** ([`parser`]): Line-oriented list parsing into a table
//! - **Fetch** ([`fetch`]): One-shot download of the current list
//! - **Registry** ([`registry`]): Publication of refreshed tables to concurrent readers
//! - **Errors** ([`error`]): List-specific error types
//!
//! # Example
//!
//! ```rust
//! use bannerscan_list::BannerListParser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = BannerListParser::new().parse_str(
//!     "[__global__]\n#cookie-notice\n\n[__unknown__]\n.cc-banner\n\n[motorola.de]\n#Privacy_banner\n",
//! )?;
//!
//! assert_eq!(table.get("motorola.de"), Some(&["#Privacy_banner".to_string()][..]));
//! assert_eq!(table.global(), ["#cookie-notice".to_string()]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod fetch;
pub mod parser;
pub mod registry;
pub mod table;

// Re-export commonly used types
pub use error::{ListError, Result};
pub use fetch::{fetch_list, FetchOptions};
pub use parser::{parse_list, BannerListParser};
pub use registry::BannerListRegistry;
pub use table::{BannerTable, BannerTableBuilder, SanityViolation};
