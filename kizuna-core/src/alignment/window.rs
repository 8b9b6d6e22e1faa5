use std::collections::BTreeSet;

use kizuna_model::{EpisodeSlot, MappingEntry, ReferenceVideo};

/// The span of reference slots owned by one mapping entry together with the
/// number of known reference episodes in each of its seasons.
///
/// The span is half-open: it starts at the entry's start slot and ends just
/// before the start slot of the next entry of the same reference run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonWindow {
    start: EpisodeSlot,
    end: Option<EpisodeSlot>,
    counts: Vec<u32>,
}

impl SeasonWindow {
    /// Counts the reference episodes of `videos` falling inside the window of
    /// `entry`, bounded by the next entry in `siblings`.
    pub fn new(
        entry: &MappingEntry,
        siblings: &[MappingEntry],
        videos: &[ReferenceVideo],
    ) -> Self {
        let start = entry.start();
        let end = next_start(entry, siblings);

        let slots: BTreeSet<EpisodeSlot> = videos
            .iter()
            .filter(|video| video.reference_id == entry.reference_id)
            .map(ReferenceVideo::slot)
            .filter(|slot| within(start, end, *slot))
            .collect();

        let mut counts = Vec::new();
        for slot in slots {
            let index = (slot.season - start.season) as usize;
            if counts.len() <= index {
                counts.resize(index + 1, 0);
            }
            counts[index] += 1;
        }

        Self { start, end, counts }
    }

    /// Window with explicit per-season counts, starting at `start`.
    pub fn from_counts(start: EpisodeSlot, counts: Vec<u32>) -> Self {
        Self {
            start,
            end: None,
            counts,
        }
    }

    pub fn start(&self) -> EpisodeSlot {
        self.start
    }

    /// First slot past the window, if another entry follows.
    pub fn end(&self) -> Option<EpisodeSlot> {
        self.end
    }

    /// Episodes per season, index 0 being the start season.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// `true` when no reference episode is known inside the window.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|count| *count == 0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn contains(&self, slot: EpisodeSlot) -> bool {
        within(self.start, self.end, slot)
    }

    /// Reference slot of the `sequence`-th (1-based) episode of the window, or
    /// `None` when the window holds fewer episodes.
    pub fn locate(&self, sequence: u32) -> Option<EpisodeSlot> {
        let mut before = 0;
        for (index, count) in self.counts.iter().enumerate() {
            if before + count >= sequence {
                return Some(self.slot_in_bucket(index, sequence - before));
            }
            before += count;
        }
        None
    }

    /// Slot for a sequence past the end of the window, continuing the
    /// numbering of the last season.
    pub fn project_past_end(&self, sequence: u32) -> Option<EpisodeSlot> {
        let last = self.counts.len().checked_sub(1)?;
        let before_last = self.total() - self.counts[last];
        Some(self.slot_in_bucket(last, sequence.saturating_sub(before_last)))
    }

    fn slot_in_bucket(&self, index: usize, offset: u32) -> EpisodeSlot {
        // Only the first season starts mid-way; later seasons start at 1.
        let first_episode = if index == 0 { self.start.episode } else { 1 };
        EpisodeSlot::new(
            self.start.season + index as u32,
            first_episode - 1 + offset,
        )
    }
}

fn next_start(
    entry: &MappingEntry,
    siblings: &[MappingEntry],
) -> Option<EpisodeSlot> {
    let start = entry.start();
    siblings
        .iter()
        .filter(|sibling| {
            sibling.reference_id == entry.reference_id
                && sibling.primary_id != entry.primary_id
        })
        .map(MappingEntry::start)
        .filter(|slot| *slot > start)
        .min()
}

fn within(
    start: EpisodeSlot,
    end: Option<EpisodeSlot>,
    slot: EpisodeSlot,
) -> bool {
    slot >= start && end.is_none_or(|end| slot < end)
}
