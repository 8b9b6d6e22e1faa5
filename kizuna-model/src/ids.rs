use std::fmt;

use crate::error::{ModelError, Result};

const PRIMARY_PREFIX: &str = "kitsu:";
const REFERENCE_PREFIX: &str = "tt";

/// Identifier of a title in the primary (sequentially numbered) catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PrimaryId(String);

impl PrimaryId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyId("primary"));
        }
        let bare = trimmed.strip_prefix(PRIMARY_PREFIX).unwrap_or(trimmed);
        if bare.is_empty() {
            return Err(ModelError::EmptyId("primary"));
        }
        Ok(Self(bare.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog-qualified form, e.g. `kitsu:1376`.
    pub fn qualified(&self) -> String {
        format!("{PRIMARY_PREFIX}{}", self.0)
    }
}

impl fmt::Display for PrimaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a title in the reference (season/episode) catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ReferenceId(String);

impl ReferenceId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyId("reference"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Video id of one reference episode, e.g. `tt0388629:2:5`.
    pub fn video_id(&self, season: u32, episode: u32) -> String {
        format!("{}:{season}:{episode}", self.0)
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An incoming id whose catalog has not been decided yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogId {
    Primary(PrimaryId),
    Reference(ReferenceId),
}

impl CatalogId {
    /// Ids starting with `tt` belong to the reference catalog, everything else
    /// (`kitsu:123`, `123`) to the primary catalog.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.starts_with(REFERENCE_PREFIX) {
            ReferenceId::new(trimmed).map(CatalogId::Reference)
        } else {
            PrimaryId::new(trimmed).map(CatalogId::Primary)
        }
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogId::Primary(id) => write!(f, "{}", id.qualified()),
            CatalogId::Reference(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_id_strips_catalog_prefix() {
        let id = PrimaryId::new("kitsu:1376").unwrap();
        assert_eq!(id.as_str(), "1376");
        assert_eq!(id.qualified(), "kitsu:1376");
        assert_eq!(PrimaryId::new("1376").unwrap(), id);
    }

    #[test]
    fn empty_ids_are_rejected() {
        assert_eq!(PrimaryId::new("  "), Err(ModelError::EmptyId("primary")));
        assert_eq!(PrimaryId::new("kitsu:"), Err(ModelError::EmptyId("primary")));
        assert_eq!(ReferenceId::new(""), Err(ModelError::EmptyId("reference")));
    }

    #[test]
    fn catalog_id_dispatches_on_prefix() {
        assert!(matches!(
            CatalogId::parse("tt0388629").unwrap(),
            CatalogId::Reference(_)
        ));
        assert!(matches!(
            CatalogId::parse("kitsu:12").unwrap(),
            CatalogId::Primary(_)
        ));
        assert_eq!(
            ReferenceId::new("tt0388629").unwrap().video_id(2, 5),
            "tt0388629:2:5"
        );
    }
}
