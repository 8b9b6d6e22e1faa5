use anyhow::{Context, anyhow};
use kizuna_core::{
    MetadataReconciler, PrimaryMetadataSource, ReferenceMetadataSource,
    align_primary_to_reference_with,
};
use kizuna_model::{CatalogId, MappingEntry, PrimaryId, PrimaryVideo};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::catalog::JsonCatalog;

/// Mapping entries known for one id.
#[derive(Debug, Serialize)]
pub struct LookupReport<'a> {
    pub id: String,
    pub has_mapping: bool,
    pub entries: Vec<&'a MappingEntry>,
}

pub fn lookup<'a>(
    reconciler: &'a MetadataReconciler,
    raw_id: &str,
) -> anyhow::Result<LookupReport<'a>> {
    let id = CatalogId::parse(raw_id)
        .with_context(|| format!("invalid id '{raw_id}'"))?;
    let entries = reconciler.mappings().entries_for(&id);
    Ok(LookupReport {
        id: id.to_string(),
        has_mapping: reconciler.has_mapping(&id),
        entries,
    })
}

/// Aligns the episodes of a primary record without merging anything else.
pub async fn align(
    reconciler: &MetadataReconciler,
    catalog: &JsonCatalog,
    raw_id: &str,
) -> anyhow::Result<Vec<PrimaryVideo>> {
    let primary_id = PrimaryId::new(raw_id)
        .with_context(|| format!("invalid primary id '{raw_id}'"))?;
    let entry = reconciler
        .mapping_for(&primary_id)
        .ok_or_else(|| anyhow!("no mapping entry for {primary_id}"))?;

    let primary = catalog
        .primary_metadata(&primary_id)
        .await
        .with_context(|| format!("failed to read primary record {primary_id}"))?;
    let reference = catalog
        .reference_metadata(&entry.reference_id, primary.details.meta_type)
        .await
        .with_context(|| {
            format!("failed to read reference record {}", entry.reference_id)
        })?;

    info!(
        primary_id = %primary_id,
        reference_id = %entry.reference_id,
        "aligning episodes"
    );

    Ok(align_primary_to_reference_with(
        &primary.videos,
        entry,
        reconciler.mappings().siblings(entry),
        &reference.videos,
        reconciler.settings().overflow,
    ))
}

/// Reads the record for `raw_id` and merges its counterpart into it. The
/// record itself must exist; a missing counterpart leaves it unenriched.
pub async fn merge(
    reconciler: &MetadataReconciler,
    catalog: &JsonCatalog,
    raw_id: &str,
) -> anyhow::Result<Value> {
    let id = CatalogId::parse(raw_id)
        .with_context(|| format!("invalid id '{raw_id}'"))?;

    let merged = match id {
        CatalogId::Primary(primary_id) => {
            let record = catalog
                .primary_metadata(&primary_id)
                .await
                .with_context(|| {
                    format!("failed to read primary record {primary_id}")
                })?;
            let merged = reconciler
                .merge_primary_with_reference(record, catalog)
                .await;
            serde_json::to_value(merged)?
        }
        CatalogId::Reference(reference_id) => {
            let record = catalog
                .reference_metadata(&reference_id, None)
                .await
                .with_context(|| {
                    format!("failed to read reference record {reference_id}")
                })?;
            let merged = reconciler
                .merge_reference_with_primary(record, catalog)
                .await;
            serde_json::to_value(merged)?
        }
    };

    Ok(merged)
}
