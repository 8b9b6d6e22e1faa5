use std::collections::HashMap;

use kizuna_model::{
    EpisodeSlot, MappingEntry, PrimaryVideo, ReferencePosition, ReferenceVideo,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::release::ReleaseClamp;
use super::window::SeasonWindow;
use super::OverflowPolicy;
use crate::prune::{fill_if_empty, is_blank};

static PLACEHOLDER_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Episode \d+$").expect("valid placeholder regex"));

/// Whether a title is a generated `Episode N` placeholder.
pub fn is_placeholder_title(title: &str) -> bool {
    PLACEHOLDER_TITLE.is_match(title)
}

/// How one primary episode was placed in reference numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Inside the window; reference data may be borrowed.
    Window(EpisodeSlot),
    /// Outside known reference data; coordinates only.
    Detached(EpisodeSlot),
}

impl Placement {
    fn slot(self) -> EpisodeSlot {
        match self {
            Placement::Window(slot) | Placement::Detached(slot) => slot,
        }
    }
}

/// Aligns a primary catalog onto reference numbering with the default
/// [`OverflowPolicy`].
pub fn align_primary_to_reference(
    primary_videos: &[PrimaryVideo],
    entry: &MappingEntry,
    siblings: &[MappingEntry],
    reference_videos: &[ReferenceVideo],
) -> Vec<PrimaryVideo> {
    align_primary_to_reference_with(
        primary_videos,
        entry,
        siblings,
        reference_videos,
        OverflowPolicy::default(),
    )
}

/// Aligns a primary catalog onto reference numbering.
///
/// Returns one video per input, in input order. Each non-excluded video gets
/// its reference coordinates; when the reference catalog lists that slot,
/// placeholder titles are replaced and missing thumbnail/overview are filled
/// from it. Release dates prefer the reference date and are clamped so the
/// output never goes back in time.
pub fn align_primary_to_reference_with(
    primary_videos: &[PrimaryVideo],
    entry: &MappingEntry,
    siblings: &[MappingEntry],
    reference_videos: &[ReferenceVideo],
    overflow: OverflowPolicy,
) -> Vec<PrimaryVideo> {
    let window = SeasonWindow::new(entry, siblings, reference_videos);
    let by_slot: HashMap<EpisodeSlot, &ReferenceVideo> = reference_videos
        .iter()
        .filter(|video| video.reference_id == entry.reference_id)
        .map(|video| (video.slot(), video))
        .collect();

    debug!(
        primary_id = %entry.primary_id,
        reference_id = %entry.reference_id,
        counts = ?window.counts(),
        videos = primary_videos.len(),
        "aligning primary catalog"
    );

    let mut clamp = ReleaseClamp::new();
    let mut skipped = 0u32;
    let mut aligned = Vec::with_capacity(primary_videos.len());

    for video in primary_videos {
        let mut out = video.clone();

        if entry.is_excluded(video.episode) {
            skipped += 1;
            let (next, released) = clamp.step(out.released);
            clamp = next;
            out.released = released;
            aligned.push(out);
            continue;
        }

        let placement = place(&window, entry, video.episode, skipped, overflow);
        let counterpart = match placement {
            Placement::Window(slot) => by_slot.get(&slot).copied(),
            Placement::Detached(_) => None,
        };

        if let Some(reference) = counterpart {
            borrow_details(&mut out, reference);
        }

        let candidate = counterpart
            .and_then(|reference| reference.released)
            .unwrap_or(video.released);
        let (next, released) = clamp.step(candidate);
        clamp = next;
        out.released = released;
        out.reference = Some(ReferencePosition::new(
            entry.reference_id.clone(),
            placement.slot(),
        ));

        aligned.push(out);
    }

    aligned
}

fn place(
    window: &SeasonWindow,
    entry: &MappingEntry,
    episode: u32,
    skipped: u32,
    overflow: OverflowPolicy,
) -> Placement {
    if window.is_empty() {
        return Placement::Detached(linear_slot(entry, episode));
    }

    let sequence = episode.saturating_sub(skipped).max(1);
    if let Some(slot) = window.locate(sequence) {
        return Placement::Window(slot);
    }

    let slot = match overflow {
        OverflowPolicy::ExtendLastSeason => window
            .project_past_end(sequence)
            .unwrap_or_else(|| linear_slot(entry, episode)),
        OverflowPolicy::Linear => linear_slot(entry, episode),
    };
    debug!(
        primary_id = %entry.primary_id,
        episode,
        slot = %slot,
        ?overflow,
        "episode past the end of the reference window"
    );
    Placement::Detached(slot)
}

fn linear_slot(entry: &MappingEntry, episode: u32) -> EpisodeSlot {
    EpisodeSlot::new(entry.from_season(), entry.from_episode() - 1 + episode)
}

fn borrow_details(video: &mut PrimaryVideo, reference: &ReferenceVideo) {
    if is_placeholder_title(&video.title)
        && let Some(title) = reference.title.as_deref()
        && !is_blank(Some(title))
    {
        video.title = title.to_string();
    }
    fill_if_empty(&mut video.thumbnail, reference.thumbnail.as_ref());
    fill_if_empty(&mut video.overview, reference.overview.as_ref());
}
