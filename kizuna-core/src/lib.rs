//! # Kizuna Core
//!
//! Episode alignment and metadata reconciliation between two catalogs of the
//! same title: a *primary* catalog numbering episodes `1..N` per title, and a
//! *reference* catalog numbering them by `(season, episode)` across a run
//! that may span several primary titles.
//!
//! ## Overview
//!
//! - **Mapping Table**: static entries placing each primary title at a start
//!   slot of a reference run
//! - **Episode Aligner**: forward (primary to reference) and inverse
//!   (reference to primary) episode translation
//! - **Metadata Reconciler**: fill-if-empty merge of runtime, rating, genres
//!   and links, with aligned episode lists
//! - **Adapters**: normalization of upstream record shapes
//!
//! ## Architecture
//!
//! - [`mapping`]: the [`MappingTable`] lookup
//! - [`alignment`]: season windows, release date repair and both aligners
//! - [`reconcile`]: [`MetadataReconciler`] and the field merge rules
//! - [`providers`]: source contracts implemented by callers
//! - [`adapters`]: raw upstream types
//! - [`prune`]: blank-field removal applied to returned records
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kizuna_core::{
//!     CatalogGenreUrls, MappingTable, MetadataReconciler,
//!     ReferenceMetadataSource,
//!     model::{MappingEntry, PrimaryId, PrimaryMetadata, ReferenceId},
//! };
//!
//! async fn enrich(
//!     meta: PrimaryMetadata,
//!     source: &dyn ReferenceMetadataSource,
//! ) -> Result<PrimaryMetadata, Box<dyn std::error::Error>> {
//!     let entry = MappingEntry::new(
//!         PrimaryId::new("kitsu:1376")?,
//!         ReferenceId::new("tt0409591")?,
//!     );
//!     let reconciler = MetadataReconciler::new(
//!         Arc::new(MappingTable::new([entry])),
//!         Arc::new(CatalogGenreUrls::default()),
//!     );
//!     Ok(reconciler.merge_primary_with_reference(meta, source).await)
//! }
//! ```

#![allow(missing_docs)]

pub mod adapters;
pub mod alignment;
pub mod error;
pub mod mapping;
pub mod providers;
pub mod prune;
pub mod reconcile;

pub use alignment::{
    OverflowPolicy, align_primary_to_reference, align_primary_to_reference_with,
    align_reference_to_primary, align_reference_videos,
};
pub use error::{ReconcileError, Result};
pub use mapping::MappingTable;
pub use providers::{
    CatalogGenreUrls, GenreUrlResolver, PrimaryMetadataSource, ProviderError,
    ReferenceMetadataSource,
};
pub use prune::Prune;
pub use reconcile::{MetadataReconciler, ReconcileSettings};

pub use kizuna_model as model;
