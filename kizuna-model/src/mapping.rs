use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ModelError, Result};
use crate::ids::{PrimaryId, ReferenceId};

/// A `(season, episode)` pair in reference numbering. Ordering is
/// lexicographic, season first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeSlot {
    pub season: u32,
    pub episode: u32,
}

impl EpisodeSlot {
    pub const fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }
}

impl fmt::Display for EpisodeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02}", self.season, self.episode)
    }
}

#[cfg(feature = "serde")]
fn first_position() -> u32 {
    1
}

/// Links one primary title to the position in a reference run where its
/// episodes begin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MappingEntry {
    pub primary_id: PrimaryId,
    pub reference_id: ReferenceId,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "first_position"))]
    from_season: u32,
    #[cfg_attr(feature = "serde", serde(default = "first_position"))]
    from_episode: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeSet::is_empty")
    )]
    excluded_primary_episodes: BTreeSet<u32>,
}

impl MappingEntry {
    /// Entry starting at season 1, episode 1 with no exclusions.
    pub fn new(primary_id: PrimaryId, reference_id: ReferenceId) -> Self {
        Self {
            primary_id,
            reference_id,
            title: None,
            from_season: 1,
            from_episode: 1,
            excluded_primary_episodes: BTreeSet::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn starting_at(mut self, season: u32, episode: u32) -> Result<Self> {
        if season == 0 {
            return Err(ModelError::InvalidPosition {
                field: "from_season",
                value: season,
            });
        }
        if episode == 0 {
            return Err(ModelError::InvalidPosition {
                field: "from_episode",
                value: episode,
            });
        }
        self.from_season = season;
        self.from_episode = episode;
        Ok(self)
    }

    pub fn excluding<I>(mut self, episodes: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.excluded_primary_episodes.extend(episodes);
        self
    }

    pub fn from_season(&self) -> u32 {
        self.from_season
    }

    pub fn from_episode(&self) -> u32 {
        self.from_episode
    }

    /// First reference slot owned by this entry.
    pub fn start(&self) -> EpisodeSlot {
        EpisodeSlot::new(self.from_season, self.from_episode)
    }

    pub fn excluded_primary_episodes(&self) -> &BTreeSet<u32> {
        &self.excluded_primary_episodes
    }

    /// Whether the primary episode has no counterpart in reference numbering.
    pub fn is_excluded(&self, primary_episode: u32) -> bool {
        self.excluded_primary_episodes.contains(&primary_episode)
    }

    /// Re-checks invariants after deserialization.
    pub fn validate(&self) -> Result<()> {
        if self.from_season == 0 {
            return Err(ModelError::InvalidPosition {
                field: "from_season",
                value: 0,
            });
        }
        if self.from_episode == 0 {
            return Err(ModelError::InvalidPosition {
                field: "from_episode",
                value: 0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> MappingEntry {
        MappingEntry::new(
            PrimaryId::new("42").unwrap(),
            ReferenceId::new("tt0000042").unwrap(),
        )
    }

    #[test]
    fn defaults_start_at_first_episode() {
        let entry = entry();
        assert_eq!(entry.start(), EpisodeSlot::new(1, 1));
        assert!(entry.excluded_primary_episodes().is_empty());
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn zero_positions_are_rejected() {
        assert_eq!(
            entry().starting_at(0, 3).unwrap_err(),
            ModelError::InvalidPosition {
                field: "from_season",
                value: 0
            }
        );
        assert!(entry().starting_at(2, 0).is_err());
    }

    #[test]
    fn slots_order_season_first() {
        assert!(EpisodeSlot::new(1, 24) < EpisodeSlot::new(2, 1));
        assert!(EpisodeSlot::new(2, 13) > EpisodeSlot::new(2, 12));
        assert_eq!(EpisodeSlot::new(3, 7).to_string(), "S03E07");
    }

    #[test]
    fn exclusions_are_queryable() {
        let entry = entry().excluding([7, 13]);
        assert!(entry.is_excluded(7));
        assert!(!entry.is_excluded(8));
    }
}
