//! Command implementations.
//!
//! Each command returns a serializable report; printing is left to `main`.

use bannerscan_core::{AppConfig, BannerscanError, Result};
use bannerscan_detector::{
    locate_banners, BannerDetector, BannerMatch, DetectError, Detection, ElementGeometry,
    VisitContext,
};
use bannerscan_list::{fetch_list, BannerListParser, BannerTable, FetchOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Summary of a loaded list.
#[derive(Debug, Serialize)]
pub struct ListStats {
    pub path: PathBuf,
    pub domains: usize,
    pub global: usize,
    pub unknown: usize,
    pub selectors: usize,
    pub violations: Vec<String>,
}

/// Outcome of detection on one page.
#[derive(Debug, Serialize)]
pub struct DetectReport {
    pub url: String,
    pub candidate_count: usize,
    pub skipped_selectors: usize,
    /// The page had no parseable structure and `--allow-empty` was given
    pub empty_page: bool,
    pub records: Vec<bannerscan_detector::BannerRecord>,
}

/// Options for the `detect` command.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    pub url: String,
    pub html: PathBuf,
    pub visit_id: i64,
    pub crawl_id: i64,
    pub allow_empty: bool,
}

/// Download the list into `dir`, or the configured list directory.
pub async fn fetch(config: &AppConfig, dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir,
        None => config.list_dir()?,
    };

    let path = fetch_list(&dir, &FetchOptions::from(&config.list)).await?;
    Ok(path)
}

/// Load the list at `list`, or at the configured location.
pub fn load_table(config: &AppConfig, list: Option<&Path>) -> Result<(PathBuf, BannerTable)> {
    let path = match list {
        Some(path) => path.to_path_buf(),
        None => config.list_path()?,
    };

    let parser = BannerListParser::with_sanity_bounds(config.detection.clone());
    let table = parser.parse_file(&path)?;
    Ok((path, table))
}

pub fn stats(config: &AppConfig, list: Option<&Path>) -> Result<ListStats> {
    let (path, table) = load_table(config, list)?;

    Ok(ListStats {
        path,
        domains: table.domain_count(),
        global: table.global().len(),
        unknown: table.unknown().len(),
        selectors: table.selector_count(),
        violations: table
            .check_sanity(&config.detection)
            .iter()
            .map(ToString::to_string)
            .collect(),
    })
}

pub fn detect(table: &BannerTable, options: &DetectOptions) -> Result<DetectReport> {
    let bytes = std::fs::read(&options.html)?;
    let html = String::from_utf8_lossy(&bytes);

    let (detection, empty_page) = match BannerDetector::new().detect(&options.url, &html, table) {
        Ok(detection) => (detection, false),
        Err(DetectError::Parse(reason)) if options.allow_empty => {
            warn!(url = %options.url, %reason, "page has no parseable structure");
            let empty = Detection {
                candidate_count: bannerscan_detector::resolve(table, &options.url).len(),
                matches: Vec::new(),
                skipped_selectors: 0,
            };
            (empty, true)
        }
        Err(e) => return Err(BannerscanError::from(e)),
    };

    let visit = VisitContext {
        visit_id: options.visit_id,
        crawl_id: options.crawl_id,
        url: options.url.clone(),
    };
    // Geometry needs a live browser; offline detection records none.
    let unlocated = |_: &BannerMatch, _: usize| -> Option<ElementGeometry> { None };
    let records = locate_banners(&visit, &detection, &unlocated);

    info!(
        url = %options.url,
        candidates = detection.candidate_count,
        banners = records.len(),
        "detection complete"
    );

    Ok(DetectReport {
        url: options.url.clone(),
        candidate_count: detection.candidate_count,
        skipped_selectors: detection.skipped_selectors,
        empty_page,
        records,
    })
}
