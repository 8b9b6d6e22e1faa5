use std::fmt;

use crate::ids::{PrimaryId, ReferenceId};
use crate::video::{PrimaryVideo, ReferenceVideo};

/// Link category used for the rating badge link.
pub const RATING_LINK_CATEGORY: &str = "imdb";
/// Link category used for genre links.
pub const GENRE_LINK_CATEGORY: &str = "Genres";

/// Kind of title a metadata record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MetaType {
    Movie,
    Series,
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaType::Movie => write!(f, "movie"),
            MetaType::Series => write!(f, "series"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaLink {
    pub name: String,
    pub category: String,
    pub url: String,
}

impl MetaLink {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            url: url.into(),
        }
    }

    pub fn is_rating(&self) -> bool {
        self.category == RATING_LINK_CATEGORY
    }

    pub fn is_genre(&self) -> bool {
        self.category == GENRE_LINK_CATEGORY
    }
}

/// Descriptive fields shared by primary and reference records.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaDetails {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "type",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub meta_type: Option<MetaType>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub poster: Option<String>,
    /// Display runtime such as `24 min`.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub runtime: Option<String>,
    /// One-decimal rating on a 0-10 scale.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub rating: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genres: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub links: Vec<MetaLink>,
}

impl MetaDetails {
    pub fn is_movie(&self) -> bool {
        self.meta_type == Some(MetaType::Movie)
    }

    pub fn has_rating_link(&self) -> bool {
        self.links.iter().any(MetaLink::is_rating)
    }

    pub fn has_genre_links(&self) -> bool {
        self.links.iter().any(MetaLink::is_genre)
    }
}

/// Title record from the primary catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryMetadata {
    pub id: String,
    pub primary_id: PrimaryId,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub reference_id: Option<ReferenceId>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub details: MetaDetails,
    #[cfg_attr(feature = "serde", serde(default))]
    pub videos: Vec<PrimaryVideo>,
}

impl PrimaryMetadata {
    pub fn new(primary_id: PrimaryId, details: MetaDetails) -> Self {
        Self {
            id: primary_id.qualified(),
            primary_id,
            reference_id: None,
            details,
            videos: Vec::new(),
        }
    }
}

/// Title record from the reference catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceMetadata {
    pub id: String,
    pub reference_id: ReferenceId,
    /// Primary titles covering this reference run, in mapping order.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub primary_ids: Vec<PrimaryId>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub details: MetaDetails,
    #[cfg_attr(feature = "serde", serde(default))]
    pub videos: Vec<ReferenceVideo>,
}

impl ReferenceMetadata {
    pub fn new(reference_id: ReferenceId, details: MetaDetails) -> Self {
        Self {
            id: reference_id.to_string(),
            reference_id,
            primary_ids: Vec::new(),
            details,
            videos: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_categories_are_recognised() {
        let details = MetaDetails {
            links: vec![
                MetaLink::new("8.4", RATING_LINK_CATEGORY, "https://x/1"),
                MetaLink::new("Action", GENRE_LINK_CATEGORY, "https://x/2"),
            ],
            ..MetaDetails::default()
        };
        assert!(details.has_rating_link());
        assert!(details.has_genre_links());
        assert!(!MetaDetails::default().has_rating_link());
    }

    #[test]
    fn new_primary_metadata_uses_qualified_id() {
        let meta = PrimaryMetadata::new(
            PrimaryId::new("11").unwrap(),
            MetaDetails::default(),
        );
        assert_eq!(meta.id, "kitsu:11");
        assert!(meta.reference_id.is_none());
    }
}
