use chrono::{DateTime, Utc};
use kizuna_model::{PrimaryId, PrimaryVideo};
use serde::Deserialize;

use super::parse_release_date;
use crate::prune::prune_text;

/// Primary catalog video as returned upstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrimaryVideo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub episode: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
}

/// Converts raw primary videos. Videos without a usable episode number are
/// dropped; a missing or malformed release date is replaced by the previous
/// video's date, or by `series_start` for the first one.
pub fn primary_videos_from_raw(
    primary_id: &PrimaryId,
    raw: Vec<RawPrimaryVideo>,
    series_start: DateTime<Utc>,
) -> Vec<PrimaryVideo> {
    let mut previous = series_start;
    raw.into_iter()
        .filter_map(|video| {
            let episode = video.episode.or(video.number).filter(|n| *n > 0)?;
            let released = video
                .released
                .as_deref()
                .and_then(parse_release_date)
                .unwrap_or(previous);
            previous = released;

            let mut out = PrimaryVideo::new(
                video
                    .id
                    .unwrap_or_else(|| video_id(primary_id, episode)),
                prune_text(video.title)
                    .unwrap_or_else(|| placeholder_title(episode)),
                episode,
                released,
            )
            .ok()?;
            out.thumbnail = prune_text(video.thumbnail);
            out.overview = prune_text(video.overview);
            Some(out)
        })
        .collect()
}

/// Episode record of the primary catalog's episode listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    pub number: u32,
    #[serde(default, alias = "canonicalTitle")]
    pub title: Option<String>,
    #[serde(default)]
    pub airdate: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
}

/// Builds a primary catalog from its episode listing.
///
/// An air date is trusted only when it is strictly after the last accepted
/// date and not after the next episode's air date; otherwise the last
/// accepted date is reused. The result is sorted by episode number.
pub fn primary_catalog_from_episodes(
    primary_id: &PrimaryId,
    records: &[EpisodeRecord],
    series_start: DateTime<Utc>,
) -> Vec<PrimaryVideo> {
    let mut last = series_start;
    let mut videos: Vec<PrimaryVideo> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.number > 0)
        .filter_map(|(index, record)| {
            let airdate = air_date(record);
            let next = records.get(index + 1).and_then(air_date).or(airdate);
            let released = match (airdate, next) {
                (Some(airdate), Some(next)) if airdate > last && airdate <= next => {
                    airdate
                }
                _ => last,
            };
            last = released;

            let mut video = PrimaryVideo::new(
                video_id(primary_id, record.number),
                prune_text(record.title.clone())
                    .unwrap_or_else(|| placeholder_title(record.number)),
                record.number,
                released,
            )
            .ok()?;
            video.thumbnail = prune_text(record.thumbnail.clone());
            video.overview = prune_text(record.synopsis.clone());
            Some(video)
        })
        .collect();

    videos.sort_by_key(|video| video.episode);
    videos
}

/// Placeholder catalog of `count` episodes, all released at `series_start`.
pub fn placeholder_catalog(
    primary_id: &PrimaryId,
    count: u32,
    series_start: DateTime<Utc>,
) -> Vec<PrimaryVideo> {
    (1..=count)
        .filter_map(|episode| {
            PrimaryVideo::new(
                video_id(primary_id, episode),
                placeholder_title(episode),
                episode,
                series_start,
            )
            .ok()
        })
        .collect()
}

/// Rescales a 0-100 average rating to a one-decimal 0-10 rating.
pub fn rating_from_average(average: f64) -> Option<String> {
    if !average.is_finite() || average <= 0.0 {
        return None;
    }
    Some(format!("{:.1}", average.round() / 10.0))
}

fn air_date(record: &EpisodeRecord) -> Option<DateTime<Utc>> {
    record.airdate.as_deref().and_then(parse_release_date)
}

fn video_id(primary_id: &PrimaryId, episode: u32) -> String {
    format!("{}:{episode}", primary_id.qualified())
}

fn placeholder_title(episode: u32) -> String {
    format!("Episode {episode}")
}
