pub mod error;

use kizuna_core::{MappingTable, MetadataReconciler, OverflowPolicy};
use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::{debug, info};
use url::Url;

use crate::models::{
    EnvConfig, FileConfig, MappingFile, MappingTableSource, ReconcileConfig,
    sources::{FETCH_TIMEOUT_ENV, GENRE_CATALOG_URL_ENV, OVERFLOW_POLICY_ENV},
};
use error::ConfigLoadError;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("kizuna.toml"),
        PathBuf::from("config/kizuna.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub mapping_path: Option<PathBuf>,
}

/// Everything needed to build a [`MetadataReconciler`].
#[derive(Debug)]
pub struct ConfigLoad {
    pub reconcile: ReconcileConfig,
    pub mappings: MappingTable,
    pub mapping_source: MappingTableSource,
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

impl ConfigLoad {
    pub fn into_reconciler(self) -> MetadataReconciler {
        let settings = self.reconcile.settings();
        MetadataReconciler::new(
            Arc::new(self.mappings),
            Arc::new(self.reconcile.genre_urls()),
        )
        .with_settings(settings)
    }
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_mapping_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.mapping_path = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();
        let (file_config, config_path) = self.load_file_config(&env_config)?;
        let reconcile = compose_reconcile(&file_config, &env_config)?;

        let configured_mapping = file_config
            .mapping_path
            .as_deref()
            .map(|path| relative_to(config_path.as_deref(), path));
        let (mapping_file, mapping_source) = MappingFile::load(
            self.options.mapping_path.as_deref(),
            configured_mapping.as_deref(),
        )
        .map_err(ConfigLoadError::Mapping)?;
        let mappings = mapping_file.into_table();

        info!(
            mappings = mappings.len(),
            mapping_source = ?mapping_source,
            config = ?config_path,
            fetch_timeout = ?reconcile.fetch_timeout,
            overflow = %reconcile.overflow,
            "configuration loaded"
        );

        Ok(ConfigLoad {
            reconcile,
            mappings,
            mapping_source,
            config_path,
            env_file_loaded,
        })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(FileConfig, Option<PathBuf>), ConfigLoadError> {
        let requested = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match requested {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(path) => path.clone(),
                None => {
                    debug!("no config file found; using defaults");
                    return Ok((FileConfig::default(), None));
                }
            },
        };

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((file_config, Some(path)))
    }
}

/// Environment overrides win over the config file, which wins over defaults.
fn compose_reconcile(
    file: &FileConfig,
    env: &EnvConfig,
) -> Result<ReconcileConfig, ConfigLoadError> {
    let defaults = ReconcileConfig::default();

    let fetch_timeout = match (&env.fetch_timeout, &file.reconcile.fetch_timeout)
    {
        (Some(raw), _) => parse_timeout(FETCH_TIMEOUT_ENV, raw)?,
        (None, Some(raw)) => parse_timeout("reconcile.fetch_timeout", raw)?,
        (None, None) => defaults.fetch_timeout,
    };

    let overflow = match &env.overflow {
        Some(raw) => raw.parse::<OverflowPolicy>().map_err(|reason| {
            ConfigLoadError::InvalidOverflowPolicy {
                key: OVERFLOW_POLICY_ENV,
                reason,
            }
        })?,
        None => file.reconcile.overflow.unwrap_or(defaults.overflow),
    };

    let genre_catalog_url = match env
        .genre_catalog_url
        .as_ref()
        .or(file.genres.catalog_url.as_ref())
    {
        Some(raw) => Url::parse(raw).map_err(|source| {
            ConfigLoadError::InvalidGenreCatalogUrl {
                value: raw.clone(),
                source,
            }
        })?,
        None => defaults.genre_catalog_url,
    };

    if env.genre_catalog_url.is_some() {
        debug!(var = GENRE_CATALOG_URL_ENV, "genre catalog overridden");
    }

    Ok(ReconcileConfig {
        fetch_timeout,
        overflow,
        genre_catalog_url,
    })
}

fn parse_timeout(
    key: &'static str,
    raw: &str,
) -> Result<Duration, ConfigLoadError> {
    let duration = humantime::parse_duration(raw).map_err(|source| {
        ConfigLoadError::InvalidDuration {
            key,
            value: raw.to_string(),
            source,
        }
    })?;
    if duration.is_zero() {
        return Err(ConfigLoadError::ZeroFetchTimeout { key });
    }
    Ok(duration)
}

/// Resolves `path` against the directory of the config file it came from.
fn relative_to(config_path: Option<&Path>, path: &Path) -> PathBuf {
    match config_path.and_then(Path::parent) {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}
