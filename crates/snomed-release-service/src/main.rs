//! Export service binary.
//!
//! Loads an RF2 release directory, builds the branch hierarchy and runs one
//! export end to end. Configured through environment variables:
//!
//! - `SNOMED_DATA_PATH`: RF2 release directory (required)
//! - `SNOMED_EXPORT_DIR`: archive output directory (default `exports`)

use std::sync::Arc;

use snomed_release_service::{ExportService, ExportState};
use snomed_rf2_release::{
    discover_release_files, ExportConfiguration, ImportConfig, ReleaseStore, ReleaseType,
    Rf2ReleaseFiles,
};
use snomed_taxonomy::{HierarchyCache, HierarchySnapshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let data_path = std::env::var("SNOMED_DATA_PATH")
        .map_err(|_| "SNOMED_DATA_PATH must point to an RF2 release directory")?;
    let export_dir =
        std::env::var("SNOMED_EXPORT_DIR").unwrap_or_else(|_| "exports".to_string());

    tracing::info!("Loading SNOMED CT release from: {}", data_path);
    let files = discover_release_files(&data_path)?;
    tracing::info!("Discovered release date: {:?}", files.release_date);

    let mut store = ReleaseStore::new();
    let config = ImportConfig::default();

    load_core_files(&mut store, &files, &config)?;

    for text_definition_file in &files.text_definition_files {
        store.load_descriptions(text_definition_file, config.clone())?;
    }
    for language_file in &files.language_refset_files {
        store.load_language_members(language_file, config.clone())?;
    }
    for simple_file in &files.simple_refset_files {
        store.load_simple_members(simple_file, config.clone())?;
    }
    for owl_file in &files.owl_expression_files {
        store.load_owl_members(owl_file, config.clone())?;
    }
    if let Some(mrcm_file) = &files.mrcm_domain_file {
        store.load_mrcm_domain_members(mrcm_file, config.clone())?;
    }

    tracing::info!(
        "Store ready: {} concepts, {} descriptions, {} relationships, {} members",
        store.concept_count(),
        store.description_count(),
        store.relationship_count(),
        store.member_count()
    );

    // Branch head is approximated by the release date for a file-based load.
    let head_timestamp: u64 = files
        .release_date
        .as_deref()
        .and_then(|date| date.parse().ok())
        .unwrap_or(0);

    let cache = HierarchyCache::new();
    let snapshot = cache.get_or_build("MAIN", head_timestamp, || {
        HierarchySnapshot::from_source(&store)
    })?;

    tracing::info!(
        "Hierarchy ready: {} concepts, {} roots",
        snapshot.concept_count(),
        snapshot.roots().len()
    );

    let store = Arc::new(store);
    let service = ExportService::new(Arc::clone(&store), &export_dir);

    let export_config = ExportConfiguration::builder(ReleaseType::Snapshot, "MAIN").build();
    let export_id = service.submit(export_config)?;
    tracing::info!("Submitted export {}", export_id);

    let status = service
        .wait(export_id)
        .await
        .ok_or("export job disappeared")?;

    match status.state {
        ExportState::Completed { archive } => {
            tracing::info!("Export completed: {}", archive.display());
            Ok(())
        }
        ExportState::Failed { issues } => Err(format!("export failed: {}", issues.join("; ")).into()),
        other => Err(format!("unexpected terminal state: {other:?}").into()),
    }
}

/// Loads the three core files, in parallel when the feature allows it.
fn load_core_files(
    store: &mut ReleaseStore,
    files: &Rf2ReleaseFiles,
    config: &ImportConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let concept_file = files
        .concept_file
        .as_ref()
        .ok_or("release is missing the concept file")?;
    let relationship_file = files
        .relationship_file
        .as_ref()
        .ok_or("release is missing the relationship file")?;
    let description_file = files.description_files.first();

    #[cfg(feature = "parallel")]
    if let Some(description_file) = description_file {
        let (concepts, descriptions, relationships) =
            store.load_core_parallel(concept_file, description_file, relationship_file, config)?;
        tracing::info!(
            "Loaded {} concepts, {} descriptions, {} relationships",
            concepts,
            descriptions,
            relationships
        );
        return Ok(());
    }

    store.load_concepts(concept_file, config.clone())?;
    if let Some(description_file) = description_file {
        store.load_descriptions(description_file, config.clone())?;
    }
    store.load_relationships(relationship_file, config.clone())?;
    Ok(())
}
