//! Core data model definitions shared across Kizuna crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod error;
pub mod ids;
pub mod mapping;
pub mod meta;
pub mod video;

pub use error::{ModelError, Result as ModelResult};
pub use ids::{CatalogId, PrimaryId, ReferenceId};
pub use mapping::{EpisodeSlot, MappingEntry};
pub use meta::{
    GENRE_LINK_CATEGORY, MetaDetails, MetaLink, MetaType, PrimaryMetadata,
    RATING_LINK_CATEGORY, ReferenceMetadata,
};
pub use video::{
    PrimaryPosition, PrimaryVideo, ReferencePosition, ReferenceVideo,
};
