//! Bannerscan Core - Foundation crate for consent-banner detection.
//!
//! This crate provides the shared error types, configuration management and
//! domain primitives that the list, detector and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`Domain`)
//!
//! # Example
//!
//! ```rust
//! use bannerscan_core::{AppConfig, Domain};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.list.file_name, "bannerlist.txt");
//!
//! let domain = Domain::parse("https://WWW.Example.org/path");
//! assert_eq!(domain.as_str(), "www.example.org");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, DetectionConfig, ListConfig, SanityRange};
pub use error::{BannerscanError, ConfigError, ConfigResult, Result};
pub use types::{Domain, GLOBAL_KEY, UNKNOWN_KEY};
