//! Download of the current banner list.

use crate::error::{ListError, Result};
use bannerscan_core::config::{ListConfig, DEFAULT_LIST_FILE, DEFAULT_LIST_URL};
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Where and how to retrieve the list.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Remote location of the list
    pub url: String,
    /// File name written inside the destination directory
    pub file_name: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// User agent sent with the request
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&ListConfig::default())
    }
}

impl From<&ListConfig> for FetchOptions {
    fn from(config: &ListConfig) -> Self {
        let url = if config.url.is_empty() {
            DEFAULT_LIST_URL.to_string()
        } else {
            config.url.clone()
        };
        let file_name = if config.file_name.is_empty() {
            DEFAULT_LIST_FILE.to_string()
        } else {
            config.file_name.clone()
        };

        Self {
            url,
            file_name,
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Retrieve the list and store it verbatim as `dest_dir/<file_name>`.
///
/// An existing copy is overwritten. The body is staged in a temporary file
/// inside `dest_dir` and renamed into place, so a failed fetch leaves the
/// previous copy (or no file) behind. No retries are attempted.
///
/// # Errors
/// Returns [`ListError::Network`] on transport failure or a non-success HTTP
/// status, and [`ListError::Io`] if the file cannot be written.
pub async fn fetch_list(dest_dir: impl AsRef<Path>, options: &FetchOptions) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    let network = |reason: String| ListError::Network {
        url: options.url.clone(),
        reason,
    };

    let client = Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .build()
        .map_err(|e| network(format!("failed to create HTTP client: {e}")))?;

    debug!(url = %options.url, "fetching banner list");

    let body = client
        .get(&options.url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| network(e.to_string()))?
        .bytes()
        .await
        .map_err(|e| network(e.to_string()))?;

    std::fs::create_dir_all(dest_dir)?;
    let target = dest_dir.join(&options.file_name);

    let mut staged = NamedTempFile::new_in(dest_dir)?;
    staged.write_all(&body)?;
    staged.flush()?;
    staged.persist(&target).map_err(|e| ListError::Io(e.error))?;

    info!(
        url = %options.url,
        path = %target.display(),
        bytes = body.len(),
        "stored banner list"
    );

    Ok(target)
}
