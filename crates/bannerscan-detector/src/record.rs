//! Mapping of matches onto the stored banner record.
//!
//! Geometry comes from the live browser session and is supplied through
//! [`GeometryProbe`]; this crate never talks to a browser itself.

use crate::matcher::{BannerMatch, Detection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Bounding box of an element as rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementGeometry {
    /// Left edge in CSS pixels
    pub pos_x: i64,
    /// Top edge in CSS pixels
    pub pos_y: i64,
    /// Rendered width
    pub size_w: i64,
    /// Rendered height
    pub size_h: i64,
}

/// Source of element geometry, implemented by the browser collaborator.
pub trait GeometryProbe {
    /// Bounding box of the `nth` element (zero-based) matched by
    /// `banner.selector`, if it can be located.
    fn bounding_box(&self, banner: &BannerMatch, nth: usize) -> Option<ElementGeometry>;
}

impl<F> GeometryProbe for F
where
    F: Fn(&BannerMatch, usize) -> Option<ElementGeometry>,
{
    fn bounding_box(&self, banner: &BannerMatch, nth: usize) -> Option<ElementGeometry> {
        self(banner, nth)
    }
}

/// The page visit a detection belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitContext {
    /// Visit identifier assigned by the crawler
    pub visit_id: i64,
    /// Crawl (browser instance) identifier
    pub crawl_id: i64,
    /// Page URL
    pub url: String,
}

/// One stored banner row.
///
/// Field names are the column names of the downstream store.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerRecord {
    /// Row id, assigned by the store
    pub id: Option<i64>,
    pub visit_id: i64,
    pub crawl_id: i64,
    pub url: String,
    pub css_selector: String,
    pub selected_tag: String,
    pub selected_id: String,
    pub pos_x: i64,
    pub pos_y: i64,
    pub size_h: i64,
    pub size_w: i64,
    pub text: String,
}

impl BannerRecord {
    /// Combine a match with its geometry.
    #[must_use]
    pub fn from_match(
        visit: &VisitContext,
        banner: &BannerMatch,
        geometry: ElementGeometry,
    ) -> Self {
        Self {
            id: None,
            visit_id: visit.visit_id,
            crawl_id: visit.crawl_id,
            url: visit.url.clone(),
            css_selector: banner.selector.clone(),
            selected_tag: banner.tag.clone(),
            selected_id: banner.id.clone(),
            pos_x: geometry.pos_x,
            pos_y: geometry.pos_y,
            size_h: geometry.size_h,
            size_w: geometry.size_w,
            text: banner.text.clone(),
        }
    }
}

/// Build one record per match, in match order.
///
/// Matches the probe cannot locate keep zeroed geometry.
pub fn locate_banners(
    visit: &VisitContext,
    detection: &Detection,
    probe: &impl GeometryProbe,
) -> Vec<BannerRecord> {
    let mut seen_per_selector: HashMap<&str, usize> = HashMap::new();

    detection
        .matches
        .iter()
        .map(|banner| {
            let nth = seen_per_selector.entry(banner.selector.as_str()).or_insert(0);
            let geometry = probe.bounding_box(banner, *nth).unwrap_or_else(|| {
                debug!(selector = %banner.selector, nth = *nth, "banner geometry unavailable");
                ElementGeometry::default()
            });
            *nth += 1;

            BannerRecord::from_match(visit, banner, geometry)
        })
        .collect()
}
