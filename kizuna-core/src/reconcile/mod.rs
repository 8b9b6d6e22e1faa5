//! Merging of title records across the two catalogs.

pub mod fields;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kizuna_model::{
    CatalogId, MappingEntry, MetaType, PrimaryId, PrimaryMetadata,
    ReferenceMetadata,
};
use tracing::{debug, warn};

use crate::alignment::{
    OverflowPolicy, align_primary_to_reference_with, align_reference_videos,
    fetch_primary_catalogs, needs_primary_catalogs,
    reference_videos_from_catalogs,
};
use crate::error::{ReconcileError, Result};
use crate::mapping::MappingTable;
use crate::providers::{
    GenreUrlResolver, PrimaryMetadataSource, ReferenceMetadataSource,
};
use crate::prune::Prune;

pub use fields::{AnimationGenre, GENERIC_ANIMATION_GENRE, merge_details};

/// Default bound on a single counterpart fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables of a [`MetadataReconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSettings {
    pub fetch_timeout: Duration,
    pub overflow: OverflowPolicy,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            overflow: OverflowPolicy::default(),
        }
    }
}

/// Enriches title records of one catalog with data from the other.
///
/// Enrichment is strictly secondary: a missing mapping, a failed fetch or a
/// timed-out fetch all leave the record as it was handed in. Successful merges
/// never overwrite populated fields, so merging an enriched record again
/// yields the same record.
#[derive(Clone)]
pub struct MetadataReconciler {
    mappings: Arc<MappingTable>,
    genre_urls: Arc<dyn GenreUrlResolver>,
    settings: ReconcileSettings,
}

impl fmt::Debug for MetadataReconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataReconciler")
            .field("mappings", &self.mappings.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl MetadataReconciler {
    pub fn new(
        mappings: Arc<MappingTable>,
        genre_urls: Arc<dyn GenreUrlResolver>,
    ) -> Self {
        Self {
            mappings,
            genre_urls,
            settings: ReconcileSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ReconcileSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    pub fn mappings(&self) -> &MappingTable {
        &self.mappings
    }

    /// Whether `id` (either catalog) has a mapping and can be enriched.
    pub fn has_mapping(&self, id: &CatalogId) -> bool {
        self.mappings.has_mapping(id)
    }

    pub fn mapping_for(&self, id: &PrimaryId) -> Option<&MappingEntry> {
        self.mappings.entry_for_primary(id)
    }

    /// Enriches a primary record with its reference counterpart and aligns
    /// its episodes onto reference numbering.
    pub async fn merge_primary_with_reference(
        &self,
        meta: PrimaryMetadata,
        source: &dyn ReferenceMetadataSource,
    ) -> PrimaryMetadata {
        let Some(entry) = self.mappings.entry_for_primary(&meta.primary_id)
        else {
            return meta;
        };

        match self.enrich_primary(&meta, entry, source).await {
            Ok(merged) => merged,
            Err(err) => {
                warn!(
                    primary_id = %meta.primary_id,
                    reference_id = %entry.reference_id,
                    source = source.name(),
                    error = %err,
                    "reference enrichment failed; returning record unchanged"
                );
                meta
            }
        }
    }

    /// Enriches a reference record with its primary counterparts and tags
    /// each of its episodes with the owning primary episode.
    pub async fn merge_reference_with_primary(
        &self,
        meta: ReferenceMetadata,
        source: &dyn PrimaryMetadataSource,
    ) -> ReferenceMetadata {
        let entries = self.mappings.entries_for_reference(&meta.reference_id);
        if entries.is_empty() {
            return meta;
        }

        match self.enrich_reference(&meta, entries, source).await {
            Ok(merged) => merged,
            Err(err) => {
                warn!(
                    reference_id = %meta.reference_id,
                    source = source.name(),
                    error = %err,
                    "primary enrichment failed; returning record unchanged"
                );
                meta
            }
        }
    }

    async fn enrich_primary(
        &self,
        meta: &PrimaryMetadata,
        entry: &MappingEntry,
        source: &dyn ReferenceMetadataSource,
    ) -> Result<PrimaryMetadata> {
        let counterpart = self
            .bounded(
                entry.reference_id.as_str(),
                source
                    .reference_metadata(&entry.reference_id, meta.details.meta_type),
            )
            .await?;

        debug!(
            primary_id = %meta.primary_id,
            reference_id = %entry.reference_id,
            reference_videos = counterpart.videos.len(),
            "merging reference record"
        );

        let mut merged = meta.clone();
        merged.reference_id = Some(entry.reference_id.clone());
        merge_details(
            &mut merged.details,
            &counterpart.details,
            self.genre_urls.as_ref(),
            AnimationGenre::Drop,
        );
        merged.videos = align_primary_to_reference_with(
            &meta.videos,
            entry,
            self.mappings.siblings(entry),
            &counterpart.videos,
            self.settings.overflow,
        );

        Ok(merged.prune())
    }

    async fn enrich_reference(
        &self,
        meta: &ReferenceMetadata,
        entries: &[MappingEntry],
        source: &dyn PrimaryMetadataSource,
    ) -> Result<ReferenceMetadata> {
        let first = entries.first().ok_or_else(|| {
            ReconcileError::InvalidMapping(format!(
                "no entries for {}",
                meta.reference_id
            ))
        })?;

        let (counterpart, videos) =
            if needs_primary_catalogs(meta.details.meta_type, &meta.videos) {
                let catalogs = self
                    .bounded(
                        meta.reference_id.as_str(),
                        fetch_primary_catalogs(entries, source),
                    )
                    .await?;
                let videos = reference_videos_from_catalogs(entries, &catalogs);
                // catalogs come back in entry order
                let counterpart =
                    catalogs.into_iter().next().ok_or_else(|| {
                        ReconcileError::InvalidMapping(format!(
                            "no catalog for {}",
                            first.primary_id
                        ))
                    })?;
                (counterpart, videos)
            } else {
                let counterpart = self
                    .bounded(
                        first.primary_id.as_str(),
                        source.primary_metadata(&first.primary_id),
                    )
                    .await?;
                let videos = match meta.details.meta_type {
                    Some(MetaType::Movie) => meta.videos.clone(),
                    _ => align_reference_videos(&meta.videos, entries),
                };
                (counterpart, videos)
            };

        debug!(
            reference_id = %meta.reference_id,
            primary_ids = entries.len(),
            videos = videos.len(),
            "merging primary record"
        );

        let mut merged = meta.clone();
        merged.primary_ids =
            entries.iter().map(|entry| entry.primary_id.clone()).collect();
        merge_details(
            &mut merged.details,
            &counterpart.details,
            self.genre_urls.as_ref(),
            AnimationGenre::Keep,
        );
        merged.videos = videos;

        Ok(merged.prune())
    }

    /// Runs `fetch` under the configured timeout.
    async fn bounded<T, E, F>(&self, id: &str, fetch: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Into<ReconcileError>,
    {
        let after = self.settings.fetch_timeout;
        match tokio::time::timeout(after, fetch).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(ReconcileError::Timeout {
                id: id.to_string(),
                after,
            }),
        }
    }
}
