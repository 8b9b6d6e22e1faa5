use kizuna_model::{ReferenceId, ReferenceVideo};
use serde::Deserialize;
use tracing::debug;

use super::parse_release_date;
use crate::prune::prune_text;

/// Reference catalog video as returned upstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReferenceVideo {
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, alias = "description")]
    pub overview: Option<String>,
    #[serde(default, alias = "firstAired")]
    pub released: Option<String>,
}

impl RawReferenceVideo {
    /// Converts into a canonical video. Returns `None` when the season or
    /// the episode number is missing.
    pub fn into_video(self, reference_id: &ReferenceId) -> Option<ReferenceVideo> {
        let season = self.season?;
        let episode = self.episode.or(self.number)?;

        let mut video = ReferenceVideo::new(reference_id.clone(), season, episode);
        video.title = prune_text(self.title).or_else(|| prune_text(self.name));
        video.thumbnail = prune_text(self.thumbnail);
        video.overview = prune_text(self.overview);
        video.released = self.released.as_deref().and_then(parse_release_date);
        Some(video)
    }
}

/// Converts a raw reference catalog, dropping videos it cannot place.
pub fn reference_videos_from_raw(
    reference_id: &ReferenceId,
    raw: Vec<RawReferenceVideo>,
) -> Vec<ReferenceVideo> {
    let total = raw.len();
    let videos: Vec<_> = raw
        .into_iter()
        .filter_map(|video| video.into_video(reference_id))
        .collect();
    if videos.len() < total {
        debug!(
            reference_id = %reference_id,
            dropped = total - videos.len(),
            "dropped reference videos without season or episode"
        );
    }
    videos
}
