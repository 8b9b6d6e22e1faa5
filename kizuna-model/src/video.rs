use chrono::{DateTime, Utc};

use crate::error::{ModelError, Result};
use crate::ids::{PrimaryId, ReferenceId};
use crate::mapping::EpisodeSlot;

/// Where a primary episode sits in reference numbering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferencePosition {
    pub reference_id: ReferenceId,
    pub reference_season: u32,
    pub reference_episode: u32,
}

impl ReferencePosition {
    pub fn new(reference_id: ReferenceId, slot: EpisodeSlot) -> Self {
        Self {
            reference_id,
            reference_season: slot.season,
            reference_episode: slot.episode,
        }
    }

    pub fn slot(&self) -> EpisodeSlot {
        EpisodeSlot::new(self.reference_season, self.reference_episode)
    }
}

/// Where a reference episode sits in a primary catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryPosition {
    pub primary_id: PrimaryId,
    pub primary_episode: u32,
}

impl PrimaryPosition {
    pub fn new(primary_id: PrimaryId, primary_episode: u32) -> Self {
        Self {
            primary_id,
            primary_episode,
        }
    }
}

/// One episode of a primary catalog. After forward alignment `reference`
/// holds its reference coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryVideo {
    pub id: String,
    pub title: String,
    pub episode: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub thumbnail: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub overview: Option<String>,
    pub released: DateTime<Utc>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub reference: Option<ReferencePosition>,
}

impl PrimaryVideo {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        episode: u32,
        released: DateTime<Utc>,
    ) -> Result<Self> {
        if episode == 0 {
            return Err(ModelError::InvalidEpisode(episode));
        }
        Ok(Self {
            id: id.into(),
            title: title.into(),
            episode,
            thumbnail: None,
            overview: None,
            released,
            reference: None,
        })
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }
}

/// One episode of a reference catalog, keyed by `(reference_id, season,
/// episode)`. After inverse alignment `primary` names its owning primary
/// episode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceVideo {
    pub reference_id: ReferenceId,
    pub season: u32,
    pub episode: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub title: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub thumbnail: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub overview: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub released: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub primary: Option<PrimaryPosition>,
}

impl ReferenceVideo {
    pub fn new(reference_id: ReferenceId, season: u32, episode: u32) -> Self {
        Self {
            reference_id,
            season,
            episode,
            title: None,
            thumbnail: None,
            overview: None,
            released: None,
            primary: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_released(mut self, released: DateTime<Utc>) -> Self {
        self.released = Some(released);
        self
    }

    pub fn slot(&self) -> EpisodeSlot {
        EpisodeSlot::new(self.season, self.episode)
    }

    /// Catalog video id, e.g. `tt0388629:2:5`.
    pub fn id(&self) -> String {
        self.reference_id.video_id(self.season, self.episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn primary_video_rejects_episode_zero() {
        let released = Utc.with_ymd_and_hms(2004, 10, 3, 0, 0, 0).unwrap();
        assert_eq!(
            PrimaryVideo::new("kitsu:1:0", "Episode 0", 0, released),
            Err(ModelError::InvalidEpisode(0))
        );
    }

    #[test]
    fn reference_video_id_joins_coordinates() {
        let video =
            ReferenceVideo::new(ReferenceId::new("tt0388629").unwrap(), 3, 12);
        assert_eq!(video.id(), "tt0388629:3:12");
        assert_eq!(video.slot(), EpisodeSlot::new(3, 12));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn aligned_primary_video_flattens_reference_position() {
        let released = Utc.with_ymd_and_hms(2004, 10, 3, 0, 0, 0).unwrap();
        let mut video =
            PrimaryVideo::new("kitsu:1:1", "Enter: Naruto", 1, released)
                .unwrap();
        video.reference = Some(ReferencePosition::new(
            ReferenceId::new("tt0409591").unwrap(),
            EpisodeSlot::new(1, 1),
        ));

        let value = serde_json::to_value(&video).unwrap();
        assert_eq!(value["reference_id"], "tt0409591");
        assert_eq!(value["reference_season"], 1);
        assert!(value.get("thumbnail").is_none());

        let back: PrimaryVideo = serde_json::from_value(value).unwrap();
        assert_eq!(back, video);
    }
}
