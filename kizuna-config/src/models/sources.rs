use kizuna_core::OverflowPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::util::non_empty_var;

pub const CONFIG_PATH_ENV: &str = "KIZUNA_CONFIG";
pub const FETCH_TIMEOUT_ENV: &str = "KIZUNA_FETCH_TIMEOUT";
pub const OVERFLOW_POLICY_ENV: &str = "KIZUNA_OVERFLOW_POLICY";
pub const GENRE_CATALOG_URL_ENV: &str = "KIZUNA_GENRE_CATALOG_URL";

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_path: Option<PathBuf>,
    #[serde(default)]
    pub reconcile: FileReconcileConfig,
    #[serde(default)]
    pub genres: FileGenresConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileReconcileConfig {
    /// Human readable duration, e.g. `"10s"` or `"1500ms"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<OverflowPolicy>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileGenresConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_url: Option<String>,
}

/// Overrides read from the process environment. The mapping file variables
/// are read by [`super::MappingFile::load`].
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub fetch_timeout: Option<String>,
    pub overflow: Option<String>,
    pub genre_catalog_url: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: non_empty_var(CONFIG_PATH_ENV).map(PathBuf::from),
            fetch_timeout: non_empty_var(FETCH_TIMEOUT_ENV),
            overflow: non_empty_var(OVERFLOW_POLICY_ENV),
            genre_catalog_url: non_empty_var(GENRE_CATALOG_URL_ENV),
        }
    }
}
