use kizuna_core::{
    CatalogGenreUrls, OverflowPolicy, ReconcileSettings,
    reconcile::DEFAULT_FETCH_TIMEOUT,
};
use std::time::Duration;
use url::Url;

/// Resolved reconciler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Upper bound for a single counterpart fetch. A fetch running longer is
    /// abandoned and the record is returned unenriched.
    pub fetch_timeout: Duration,
    /// Placement of primary episodes numbered past the reference window.
    pub overflow: OverflowPolicy,
    /// Catalog that genre links point at.
    pub genre_catalog_url: Url,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            overflow: OverflowPolicy::default(),
            genre_catalog_url: CatalogGenreUrls::default().base().clone(),
        }
    }
}

impl ReconcileConfig {
    pub fn settings(&self) -> ReconcileSettings {
        ReconcileSettings {
            fetch_timeout: self.fetch_timeout,
            overflow: self.overflow,
        }
    }

    pub fn genre_urls(&self) -> CatalogGenreUrls {
        CatalogGenreUrls::new(self.genre_catalog_url.clone())
    }
}
