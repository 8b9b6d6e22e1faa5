//! File-backed title records: one `<id>.json` file per title.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kizuna_core::{
    PrimaryMetadataSource, ProviderError, ReferenceMetadataSource,
    adapters::{
        RawPrimaryVideo, RawReferenceVideo, parse_release_date,
        placeholder_catalog, primary_videos_from_raw, rating_from_average,
        reference_videos_from_raw,
    },
};
use kizuna_model::{
    MetaType, PrimaryId, PrimaryMetadata, ReferenceId, ReferenceMetadata,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Directory of JSON title records.
///
/// Primary records live in `<dir>/<primary id>.json` (`1376.json`), reference
/// records in `<dir>/<reference id>.json` (`tt0409591.json`). Videos are read
/// in the loose upstream shapes and normalized on the way in. A primary
/// record without videos but with `episode_count` gets placeholder episodes.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    root: PathBuf,
}

impl JsonCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    async fn read_object(
        &self,
        id: &str,
    ) -> Result<Map<String, Value>, ProviderError> {
        let path = self.path_for(id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "record file not found");
                return Err(ProviderError::NotFound);
            }
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(ProviderError::ParseError(format!(
                "{} does not hold a JSON object",
                path.display()
            ))),
        }
    }
}

#[async_trait]
impl ReferenceMetadataSource for JsonCatalog {
    async fn reference_metadata(
        &self,
        id: &ReferenceId,
        meta_type: Option<MetaType>,
    ) -> Result<ReferenceMetadata, ProviderError> {
        let mut map = self.read_object(id.as_str()).await?;
        let raw_videos = take_array::<RawReferenceVideo>(&mut map, "videos")?;
        map.entry("id").or_insert_with(|| id.as_str().into());
        map.insert("reference_id".into(), id.as_str().into());

        let mut meta: ReferenceMetadata =
            serde_json::from_value(Value::Object(map))?;
        if meta.details.meta_type.is_none() {
            meta.details.meta_type = meta_type;
        }
        meta.videos = reference_videos_from_raw(id, raw_videos);
        Ok(meta)
    }

    fn name(&self) -> &'static str {
        "json-catalog"
    }
}

#[async_trait]
impl PrimaryMetadataSource for JsonCatalog {
    async fn primary_metadata(
        &self,
        id: &PrimaryId,
    ) -> Result<PrimaryMetadata, ProviderError> {
        let mut map = self.read_object(id.as_str()).await?;
        let has_videos = map.contains_key("videos");
        let raw_videos = take_array::<RawPrimaryVideo>(&mut map, "videos")?;
        let series_start = map
            .get("start_date")
            .and_then(Value::as_str)
            .and_then(parse_release_date)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let episode_count = map
            .get("episode_count")
            .and_then(Value::as_u64)
            .and_then(|count| u32::try_from(count).ok());
        let average_rating =
            map.get("average_rating").and_then(Value::as_f64);

        map.insert("id".into(), id.qualified().into());
        map.insert("primary_id".into(), id.as_str().into());

        let mut meta: PrimaryMetadata =
            serde_json::from_value(Value::Object(map))?;
        meta.videos = match episode_count {
            Some(count) if !has_videos => {
                placeholder_catalog(id, count, series_start)
            }
            _ => primary_videos_from_raw(id, raw_videos, series_start),
        };
        if meta.details.rating.is_none() {
            meta.details.rating = average_rating.and_then(rating_from_average);
        }
        Ok(meta)
    }

    fn name(&self) -> &'static str {
        "json-catalog"
    }
}

fn take_array<T>(
    map: &mut Map<String, Value>,
    key: &str,
) -> Result<Vec<T>, ProviderError>
where
    T: serde::de::DeserializeOwned,
{
    match map.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}
