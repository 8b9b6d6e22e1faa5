use futures::future::try_join_all;
use kizuna_model::{
    MappingEntry, MetaType, PrimaryMetadata, PrimaryPosition, ReferenceVideo,
};
use tracing::debug;

use super::release::ReleaseClamp;
use crate::error::Result;
use crate::providers::PrimaryMetadataSource;

/// Assigns every reference video to the primary episode owning its slot.
///
/// `entries` are the mapping entries of one reference run, in mapping order.
/// The owner of a slot is the last entry starting at or before it; each entry
/// hands out its primary episode numbers in slot order, skipping excluded
/// numbers. Videos before the first entry's start (specials in season 0, for
/// instance) are returned unchanged. Output order follows input order.
pub fn align_reference_videos(
    videos: &[ReferenceVideo],
    entries: &[MappingEntry],
) -> Vec<ReferenceVideo> {
    let mut order: Vec<usize> = (0..videos.len()).collect();
    order.sort_by_key(|&index| videos[index].slot());

    let mut cursors = vec![1u32; entries.len()];
    let mut aligned = videos.to_vec();

    for index in order {
        let slot = videos[index].slot();
        let Some(owner) = entries.iter().rposition(|entry| entry.start() <= slot)
        else {
            continue;
        };
        let entry = &entries[owner];

        let mut episode = cursors[owner];
        while entry.is_excluded(episode) {
            episode += 1;
        }
        cursors[owner] = episode + 1;

        aligned[index].primary =
            Some(PrimaryPosition::new(entry.primary_id.clone(), episode));
    }

    aligned
}

/// Whether the reference videos have to be rebuilt from the primary
/// catalogs: the record type is unknown, or a series lists no videos.
pub fn needs_primary_catalogs(
    meta_type: Option<MetaType>,
    videos: &[ReferenceVideo],
) -> bool {
    match meta_type {
        Some(MetaType::Movie) => false,
        Some(_) => videos.is_empty(),
        None => true,
    }
}

/// Fetches the primary catalog of every entry concurrently, in entry order.
pub async fn fetch_primary_catalogs(
    entries: &[MappingEntry],
    source: &dyn PrimaryMetadataSource,
) -> Result<Vec<PrimaryMetadata>> {
    debug!(
        entries = entries.len(),
        source = source.name(),
        "fetching primary catalogs"
    );
    let catalogs = try_join_all(
        entries
            .iter()
            .map(|entry| source.primary_metadata(&entry.primary_id)),
    )
    .await?;
    Ok(catalogs)
}

/// Lays the primary catalogs out in reference numbering, one entry after
/// the other.
///
/// Excluded primary episodes have no reference slot and are left out. The
/// remaining episodes of an entry take consecutive slots from its start, so
/// [`align_reference_videos`] run over the result assigns the same primary
/// episodes again. Release dates are clamped to never decrease over the
/// whole list.
pub fn reference_videos_from_catalogs(
    entries: &[MappingEntry],
    catalogs: &[PrimaryMetadata],
) -> Vec<ReferenceVideo> {
    let mut clamp = ReleaseClamp::new();
    let mut out = Vec::new();

    for (entry, catalog) in entries.iter().zip(catalogs) {
        let mut skipped = 0u32;
        for video in &catalog.videos {
            if entry.is_excluded(video.episode) {
                skipped += 1;
                continue;
            }
            let sequence = video.episode.saturating_sub(skipped).max(1);
            let (next, released) = clamp.step(video.released);
            clamp = next;

            out.push(ReferenceVideo {
                reference_id: entry.reference_id.clone(),
                season: entry.from_season(),
                episode: entry.from_episode() + sequence - 1,
                title: Some(video.title.clone()),
                thumbnail: video.thumbnail.clone(),
                overview: video.overview.clone(),
                released: Some(released),
                primary: Some(PrimaryPosition::new(
                    entry.primary_id.clone(),
                    video.episode,
                )),
            });
        }
    }

    out
}

/// Aligns a reference catalog onto its primary catalogs.
///
/// Movies come back unchanged. When the reference catalog lists no videos,
/// or the record type is unknown, the primary catalog of every entry is
/// fetched and laid out with [`reference_videos_from_catalogs`]. Any failed
/// fetch fails the whole alignment.
pub async fn align_reference_to_primary(
    meta_type: Option<MetaType>,
    videos: &[ReferenceVideo],
    entries: &[MappingEntry],
    source: &dyn PrimaryMetadataSource,
) -> Result<Vec<ReferenceVideo>> {
    if meta_type == Some(MetaType::Movie) {
        return Ok(videos.to_vec());
    }
    if !needs_primary_catalogs(meta_type, videos) {
        return Ok(align_reference_videos(videos, entries));
    }

    let catalogs = fetch_primary_catalogs(entries, source).await?;
    Ok(reference_videos_from_catalogs(entries, &catalogs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use kizuna_model::{MetaDetails, PrimaryId, PrimaryVideo, ReferenceId};

    use super::*;
    use crate::error::ReconcileError;
    use crate::providers::ProviderError;

    fn entry(primary: &str, season: u32, episode: u32) -> MappingEntry {
        MappingEntry::new(
            PrimaryId::new(primary).unwrap(),
            ReferenceId::new("tt200").unwrap(),
        )
        .starting_at(season, episode)
        .unwrap()
    }

    fn video(season: u32, episode: u32) -> ReferenceVideo {
        ReferenceVideo::new(ReferenceId::new("tt200").unwrap(), season, episode)
    }

    fn owners(videos: &[ReferenceVideo]) -> Vec<Option<(String, u32)>> {
        videos
            .iter()
            .map(|v| {
                v.primary.as_ref().map(|p| {
                    (p.primary_id.as_str().to_string(), p.primary_episode)
                })
            })
            .collect()
    }

    struct Catalogs(HashMap<PrimaryId, PrimaryMetadata>);

    impl Catalogs {
        fn with(id: &str, episodes: u32) -> Self {
            let mut map = HashMap::new();
            map.insert(PrimaryId::new(id).unwrap(), catalog(id, episodes));
            Self(map)
        }

        fn and(mut self, id: &str, episodes: u32) -> Self {
            self.0.insert(PrimaryId::new(id).unwrap(), catalog(id, episodes));
            self
        }
    }

    fn catalog(id: &str, episodes: u32) -> PrimaryMetadata {
        let primary_id = PrimaryId::new(id).unwrap();
        let mut meta = PrimaryMetadata::new(primary_id, MetaDetails::default());
        meta.videos = (1..=episodes)
            .map(|n| {
                PrimaryVideo::new(
                    format!("kitsu:{id}:{n}"),
                    format!("Episode {n}"),
                    n,
                    Utc.with_ymd_and_hms(2019, 1, n, 0, 0, 0).unwrap(),
                )
                .unwrap()
            })
            .collect();
        meta
    }

    #[async_trait]
    impl PrimaryMetadataSource for Catalogs {
        async fn primary_metadata(
            &self,
            id: &PrimaryId,
        ) -> std::result::Result<PrimaryMetadata, ProviderError> {
            self.0.get(id).cloned().ok_or(ProviderError::NotFound)
        }

        fn name(&self) -> &'static str {
            "catalogs"
        }
    }

    #[test]
    fn cursors_advance_per_owning_entry() {
        let entries = vec![entry("1", 1, 1), entry("2", 2, 1)];
        let videos = vec![
            video(2, 2),
            video(1, 1),
            video(1, 2),
            video(2, 1),
            video(0, 1),
        ];

        let aligned = align_reference_videos(&videos, &entries);
        assert_eq!(
            owners(&aligned),
            [
                Some(("2".into(), 2)),
                Some(("1".into(), 1)),
                Some(("1".into(), 2)),
                Some(("2".into(), 1)),
                None,
            ]
        );
        assert_eq!(aligned[4], videos[4]);
    }

    #[test]
    fn excluded_cursor_values_are_skipped() {
        let entries = vec![entry("1", 1, 1).excluding([2, 3])];
        let videos: Vec<_> = (1..=3).map(|e| video(1, e)).collect();

        let aligned = align_reference_videos(&videos, &entries);
        assert_eq!(
            owners(&aligned),
            [
                Some(("1".into(), 1)),
                Some(("1".into(), 4)),
                Some(("1".into(), 5)),
            ]
        );
    }

    #[test]
    fn entries_split_a_season_mid_way() {
        let entries = vec![entry("1", 1, 1), entry("2", 1, 13)];
        let videos: Vec<_> = (1..=14).map(|e| video(1, e)).collect();

        let aligned = align_reference_videos(&videos, &entries);
        assert_eq!(
            owners(&aligned)[11..],
            [
                Some(("1".into(), 12)),
                Some(("2".into(), 1)),
                Some(("2".into(), 2)),
            ]
        );
    }

    #[tokio::test]
    async fn movies_bypass_alignment() {
        let videos = vec![video(1, 1)];
        let aligned = align_reference_to_primary(
            Some(MetaType::Movie),
            &videos,
            &[entry("1", 1, 1)],
            &Catalogs(HashMap::new()),
        )
        .await
        .unwrap();
        assert_eq!(aligned, videos);
    }

    #[tokio::test]
    async fn empty_catalog_is_built_from_primary_catalogs() {
        let entries = vec![entry("1", 1, 1), entry("2", 2, 3)];
        let source = Catalogs::with("1", 2).and("2", 2);

        let aligned = align_reference_to_primary(
            Some(MetaType::Series),
            &[],
            &entries,
            &source,
        )
        .await
        .unwrap();

        let slots: Vec<_> =
            aligned.iter().map(|v| (v.season, v.episode)).collect();
        assert_eq!(slots, [(1, 1), (1, 2), (2, 3), (2, 4)]);
        assert_eq!(
            owners(&aligned)[2],
            Some(("2".into(), 1))
        );
        assert_eq!(aligned[0].title.as_deref(), Some("Episode 1"));
        assert!(aligned.iter().all(|v| v.released.is_some()));
    }

    #[test]
    fn excluded_primary_episodes_get_no_slot() {
        let entries = vec![entry("1", 1, 1).excluding([2])];
        let built =
            reference_videos_from_catalogs(&entries, &[catalog("1", 3)]);

        let slots: Vec<_> =
            built.iter().map(|v| (v.season, v.episode)).collect();
        assert_eq!(slots, [(1, 1), (1, 2)]);
        assert_eq!(
            owners(&built),
            [Some(("1".into(), 1)), Some(("1".into(), 3))]
        );

        let mut untagged = built.clone();
        for video in &mut untagged {
            video.primary = None;
        }
        assert_eq!(align_reference_videos(&untagged, &entries), built);
    }

    #[test]
    fn built_release_dates_never_go_back() {
        let entries = vec![entry("1", 1, 1), entry("2", 2, 1)];
        let mut later = catalog("1", 3);
        for video in &mut later.videos {
            video.released = Utc
                .with_ymd_and_hms(2021, 1, video.episode, 0, 0, 0)
                .unwrap();
        }
        let earlier = catalog("2", 2);

        let built = reference_videos_from_catalogs(&entries, &[later, earlier]);
        assert_eq!(built.len(), 5);
        assert!(built.windows(2).all(|w| w[0].released <= w[1].released));
        assert_eq!(built[3].released, built[2].released);
    }

    #[test]
    fn only_unknown_or_empty_series_need_catalogs() {
        assert!(needs_primary_catalogs(None, &[video(1, 1)]));
        assert!(needs_primary_catalogs(Some(MetaType::Series), &[]));
        assert!(!needs_primary_catalogs(Some(MetaType::Series), &[video(1, 1)]));
        assert!(!needs_primary_catalogs(Some(MetaType::Movie), &[]));
    }

    #[tokio::test]
    async fn unknown_type_fetches_even_with_videos() {
        let source = Catalogs::with("1", 1);
        let aligned = align_reference_to_primary(
            None,
            &[video(5, 5)],
            &[entry("1", 1, 1)],
            &source,
        )
        .await
        .unwrap();
        assert_eq!(aligned.len(), 1);
        assert_eq!((aligned[0].season, aligned[0].episode), (1, 1));
    }

    #[tokio::test]
    async fn one_failed_fetch_fails_the_alignment() {
        let source = Catalogs::with("1", 2);
        let result = align_reference_to_primary(
            Some(MetaType::Series),
            &[],
            &[entry("1", 1, 1), entry("2", 2, 1)],
            &source,
        )
        .await;
        assert!(matches!(
            result,
            Err(ReconcileError::Provider(ProviderError::NotFound))
        ));
    }
}
