use anyhow::{Context, anyhow};
use kizuna_core::MappingTable;
use kizuna_model::{MappingEntry, ModelResult, PrimaryId, ReferenceId};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub const MAPPING_PATH_ENV: &str = "KIZUNA_MAPPING_PATH";
pub const MAPPING_JSON_ENV: &str = "KIZUNA_MAPPING_JSON";

/// Source that produced the mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MappingTableSource {
    #[default]
    Default,
    Explicit(PathBuf),
    EnvPath(PathBuf),
    EnvInline,
    ConfigFile(PathBuf),
    File(PathBuf),
}

/// One record of the mapping file, keyed by primary id.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MappingRecord {
    /// Reference run this primary title belongs to. Records without one are
    /// ignored.
    #[serde(default, alias = "imdb_id")]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// First reference season of the title. Defaults to 1.
    #[serde(default, alias = "fromSeason")]
    pub from_season: Option<u32>,
    /// First reference episode inside `from_season`. Defaults to 1.
    #[serde(default, alias = "fromEpisode")]
    pub from_episode: Option<u32>,
    /// Primary episodes with no counterpart in the reference catalog.
    #[serde(default, alias = "nonImdbEpisodes")]
    pub excluded_primary_episodes: Vec<u32>,
}

impl MappingRecord {
    fn into_entry(self, primary_id: &str) -> ModelResult<Option<MappingEntry>> {
        let Some(reference_id) =
            self.reference_id.filter(|id| !id.trim().is_empty())
        else {
            return Ok(None);
        };

        let mut entry = MappingEntry::new(
            PrimaryId::new(primary_id)?,
            ReferenceId::new(reference_id)?,
        )
        .starting_at(
            self.from_season.unwrap_or(1),
            self.from_episode.unwrap_or(1),
        )?
        .excluding(self.excluded_primary_episodes);
        if let Some(title) = self.title {
            entry = entry.with_title(title);
        }
        Ok(Some(entry))
    }
}

/// Contents of a mapping file: records keyed by primary id.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct MappingFile {
    pub records: BTreeMap<String, MappingRecord>,
}

impl MappingFile {
    /// Load the mapping file.
    /// Evaluation order:
    /// 1) `explicit` (usually a command line flag),
    /// 2) `$KIZUNA_MAPPING_PATH` (TOML or JSON file),
    /// 3) `$KIZUNA_MAPPING_JSON` (inline JSON),
    /// 4) `configured` (the `mapping_path` of the config file),
    /// 5) the first default file that exists,
    /// 6) an empty table.
    pub fn load(
        explicit: Option<&Path>,
        configured: Option<&Path>,
    ) -> anyhow::Result<(Self, MappingTableSource)> {
        if let Some(path) = explicit {
            let file = Self::load_from_file(path)?;
            return Ok((file, MappingTableSource::Explicit(path.to_path_buf())));
        }

        if let Ok(path_str) = env::var(MAPPING_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let file = Self::load_from_file(&path)?;
            return Ok((file, MappingTableSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var(MAPPING_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {MAPPING_JSON_ENV}"))?;
            return Ok((parsed, MappingTableSource::EnvInline));
        }

        if let Some(path) = configured {
            let file = Self::load_from_file(path)?;
            return Ok((
                file,
                MappingTableSource::ConfigFile(path.to_path_buf()),
            ));
        }

        if let Some(path) = Self::find_default_file() {
            let file = Self::load_from_file(&path)?;
            return Ok((file, MappingTableSource::File(path)));
        }

        Ok((Self::default(), MappingTableSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read mapping file {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid mapping file {}", path.display())
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!("invalid mapping file {}: {}", path.display(), err)
                })
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // JSON first: that is what mapping dumps are usually shipped as.
        serde_json::from_str(contents).or_else(|json_err| {
            toml::from_str(contents).map_err(|toml_err| {
                anyhow!(
                    "failed to parse mapping file {}: json error: {}; toml error: {}",
                    origin,
                    json_err,
                    toml_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid mapping json: {err}"))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Converts records into mapping entries. Records without a reference id
    /// are skipped silently, invalid records with a warning.
    pub fn into_entries(self) -> Vec<MappingEntry> {
        self.records
            .into_iter()
            .filter_map(|(primary_id, record)| {
                match record.into_entry(&primary_id) {
                    Ok(Some(entry)) => Some(entry),
                    Ok(None) => {
                        debug!(
                            primary_id = %primary_id,
                            "mapping record has no reference id"
                        );
                        None
                    }
                    Err(err) => {
                        warn!(
                            primary_id = %primary_id,
                            error = %err,
                            "skipping invalid mapping record"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    pub fn into_table(self) -> MappingTable {
        MappingTable::new(self.into_entries())
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "mapping.json",
            "mapping.toml",
            "config/mapping.json",
            "config/mapping.toml",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(|path| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kizuna_model::{CatalogId, EpisodeSlot};

    #[test]
    fn legacy_field_names_are_accepted() {
        let file = MappingFile::parse_json(
            r#"{
                "1376": {"imdb_id": "tt0409591", "title": "Naruto"},
                "6448": {
                    "imdb_id": "tt2560140",
                    "fromSeason": 2,
                    "fromEpisode": 13,
                    "nonImdbEpisodes": [7, 8]
                },
                "99": {"title": "No reference"}
            }"#,
        )
        .unwrap();
        assert_eq!(file.len(), 3);

        let table = file.into_table();
        assert_eq!(table.len(), 2);
        let entry = table
            .entry_for_primary(&PrimaryId::new("6448").unwrap())
            .unwrap();
        assert_eq!(entry.start(), EpisodeSlot::new(2, 13));
        assert!(entry.is_excluded(8));
        assert!(!table.has_mapping(&CatalogId::parse("99").unwrap()));
    }

    #[test]
    fn invalid_records_are_skipped() {
        let file = MappingFile::parse_json(
            r#"{
                "1": {"reference_id": "tt1", "from_season": 0},
                "2": {"reference_id": "tt2"}
            }"#,
        )
        .unwrap();
        let table = file.into_table();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn toml_mapping_parses() {
        let file = MappingFile::parse_from_str(
            r#"
                [1376]
                reference_id = "tt0409591"
                title = "Naruto"

                [1555]
                reference_id = "tt0988824"
                from_season = 1
                excluded_primary_episodes = [1]
            "#,
            "inline",
        )
        .unwrap();
        assert_eq!(file.into_entries().len(), 2);
    }
}
