//! Publication point for the currently loaded banner table.

use crate::error::Result;
use crate::parser::BannerListParser;
use crate::table::BannerTable;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Holds the banner table that detections should use.
///
/// Published tables are never mutated. Readers take an `Arc` snapshot with
/// [`current`](Self::current) and keep using it for the whole detection,
/// even if a newer table is published meanwhile.
#[derive(Clone)]
pub struct BannerListRegistry {
    current: Arc<RwLock<Arc<BannerTable>>>,
}

impl BannerListRegistry {
    /// Create a registry publishing `table`.
    #[must_use]
    pub fn new(table: BannerTable) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// Create a registry from a list file.
    ///
    /// # Errors
    /// Returns error if the list cannot be loaded.
    pub fn load_from(parser: &BannerListParser, path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(parser.parse_file(path)?))
    }

    /// Snapshot of the current table.
    #[must_use]
    pub fn current(&self) -> Arc<BannerTable> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the current table, returning the previous one.
    pub fn publish(&self, table: BannerTable) -> Arc<BannerTable> {
        let table = Arc::new(table);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);

        info!(
            domains = table.domain_count(),
            selectors = table.selector_count(),
            "published banner table"
        );

        std::mem::replace(&mut *guard, table)
    }

    /// Parse the list at `path` and publish it.
    ///
    /// On failure the current table stays in place.
    ///
    /// # Errors
    /// Returns error if the list cannot be loaded.
    pub fn reload(&self, parser: &BannerListParser, path: impl AsRef<Path>) -> Result<()> {
        let table = parser.parse_file(path)?;
        self.publish(table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn table(global: &str) -> BannerTable {
        BannerListParser::new()
            .parse_str(&format!("##{global}\n~a.com##.fallback\nb.com###banner\n"))
            .expect("parse test list")
    }

    #[test]
    fn test_current_returns_published_table() {
        let registry = BannerListRegistry::new(table(".first"));
        assert_eq!(registry.current().global(), [".first"]);
    }

    #[test]
    fn test_publish_swaps_without_touching_snapshots() {
        let registry = BannerListRegistry::new(table(".first"));
        let snapshot = registry.current();

        let previous = registry.publish(table(".second"));

        assert!(Arc::ptr_eq(&previous, &snapshot));
        assert_eq!(snapshot.global(), [".first"]);
        assert_eq!(registry.current().global(), [".second"]);
    }

    #[test]
    fn test_failed_reload_keeps_current_table() {
        let registry = BannerListRegistry::new(table(".first"));
        let result = registry.reload(&BannerListParser::new(), "/nonexistent/bannerlist.txt");

        assert!(result.is_err());
        assert_eq!(registry.current().global(), [".first"]);
    }

    #[test]
    fn test_concurrent_readers() {
        let registry = BannerListRegistry::new(table(".first"));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || registry.current().domain_count())
            })
            .collect();
        registry.publish(table(".second"));

        for handle in handles {
            assert_eq!(handle.join().expect("reader thread"), 3);
        }
    }
}
