//! Static table linking primary titles to positions in reference runs.

use std::collections::HashMap;

use kizuna_model::{CatalogId, MappingEntry, PrimaryId, ReferenceId};
use tracing::warn;

/// Lookup over the configured mapping entries, indexed both ways.
///
/// Entries sharing a reference id are kept sorted by their start slot, so
/// consecutive entries describe consecutive windows of the reference run.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    by_primary: HashMap<PrimaryId, MappingEntry>,
    by_reference: HashMap<ReferenceId, Vec<MappingEntry>>,
}

impl MappingTable {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = MappingEntry>,
    {
        let mut by_primary: HashMap<PrimaryId, MappingEntry> = HashMap::new();
        for entry in entries {
            if let Some(previous) =
                by_primary.insert(entry.primary_id.clone(), entry)
            {
                warn!(
                    primary_id = %previous.primary_id,
                    "duplicate mapping entry replaced"
                );
            }
        }

        let mut by_reference: HashMap<ReferenceId, Vec<MappingEntry>> =
            HashMap::new();
        for entry in by_primary.values() {
            by_reference
                .entry(entry.reference_id.clone())
                .or_default()
                .push(entry.clone());
        }
        for group in by_reference.values_mut() {
            group.sort_by(|a, b| {
                a.start()
                    .cmp(&b.start())
                    .then_with(|| a.primary_id.cmp(&b.primary_id))
            });
        }

        Self {
            by_primary,
            by_reference,
        }
    }

    pub fn len(&self) -> usize {
        self.by_primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_primary.is_empty()
    }

    pub fn entry_for_primary(&self, id: &PrimaryId) -> Option<&MappingEntry> {
        self.by_primary.get(id)
    }

    /// All entries of a reference run, ordered by start slot.
    pub fn entries_for_reference(&self, id: &ReferenceId) -> &[MappingEntry] {
        self.by_reference.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries sharing the reference run of `entry`, including itself.
    pub fn siblings(&self, entry: &MappingEntry) -> &[MappingEntry] {
        self.entries_for_reference(&entry.reference_id)
    }

    pub fn entries_for(&self, id: &CatalogId) -> Vec<&MappingEntry> {
        match id {
            CatalogId::Primary(id) => {
                self.entry_for_primary(id).into_iter().collect()
            }
            CatalogId::Reference(id) => {
                self.entries_for_reference(id).iter().collect()
            }
        }
    }

    pub fn has_mapping(&self, id: &CatalogId) -> bool {
        match id {
            CatalogId::Primary(id) => self.by_primary.contains_key(id),
            CatalogId::Reference(id) => self.by_reference.contains_key(id),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingEntry> {
        self.by_primary.values()
    }
}

impl FromIterator<MappingEntry> for MappingTable {
    fn from_iter<T: IntoIterator<Item = MappingEntry>>(iter: T) -> Self {
        Self::new(iter)
    }
}
