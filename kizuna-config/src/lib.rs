//! Configuration loading for Kizuna.
//!
//! Loads the static mapping table and the reconciler settings from files,
//! `.env` and environment variables, and assembles a ready-to-use
//! [`kizuna_core::MetadataReconciler`].

pub mod loader;
pub mod models;
pub mod util;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError,
};
pub use models::{
    EnvConfig, FileConfig, MappingFile, MappingRecord, MappingTableSource,
    ReconcileConfig,
};
