use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("config file {path} does not exist")]
    MissingConfig { path: PathBuf },
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid duration '{value}' for {key}")]
    InvalidDuration {
        key: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("{key} must be greater than zero")]
    ZeroFetchTimeout { key: &'static str },
    #[error("invalid overflow policy for {key}: {reason}")]
    InvalidOverflowPolicy { key: &'static str, reason: String },
    #[error("invalid genre catalog URL '{value}'")]
    InvalidGenreCatalogUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to load mapping table: {0}")]
    Mapping(#[source] anyhow::Error),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
