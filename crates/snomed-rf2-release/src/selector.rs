//! Release row selection.
//!
//! [`select_rows`] turns a one-shot stream of [`ReleaseRow`]s into the lazy
//! stream of `(FileKey, row)` pairs an archive is assembled from. All
//! configuration problems are rejected before the first row is consumed; per
//! row, the gates run in a fixed order:
//!
//! 1. release-type gate (FULL / SNAPSHOT / DELTA temporal semantics)
//! 2. publication gate (unpublished rows need `include_unpublished`)
//! 3. date-range gate (DELTA with explicit bounds)
//! 4. transient effective time substitution (unpublished rows only)
//! 5. characteristic-type routing (relationships)
//! 6. language/type routing (descriptions and language members)
//! 7. `concepts_and_relationships_only` suppression

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use snomed_rf2_types::{ReleaseRow, SctId};

use crate::config::{ExportConfiguration, RefSetExportLayout, ReleaseType};
use crate::filename::{ComponentFile, FileKey};
use crate::types::ReleaseResult;

/// Shared cancellation flag for an in-flight export.
///
/// The selection stream checks the flag between rows and ends early once it
/// is set.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Resolves the language code of a description by its id.
///
/// Language refset members carry no language field of their own; on export
/// they follow the description they reference, so the selector needs this
/// lookup to route them to per-language files.
pub trait DescriptionLanguageLookup {
    /// Returns the language code of the description, if known.
    fn language_of_description(&self, description_id: SctId) -> Option<String>;
}

impl DescriptionLanguageLookup for std::collections::HashMap<SctId, String> {
    fn language_of_description(&self, description_id: SctId) -> Option<String> {
        self.get(&description_id).cloned()
    }
}

/// Selects and routes release rows per the export configuration.
///
/// Lazy, finite and single-pass: rows are typically sourced from a one-shot
/// index scan, so the returned stream is not restartable. For SNAPSHOT
/// exports the caller supplies one (latest) version per component; the
/// selector applies the publication gate only.
///
/// # Errors
///
/// Fails eagerly with [`InvalidConfiguration`] before consuming any row when
/// the branch path is missing or a delta range sets only one bound.
///
/// [`InvalidConfiguration`]: crate::ReleaseError::InvalidConfiguration
pub fn select_rows<'a, I, L>(
    rows: I,
    config: &'a ExportConfiguration,
    languages: &'a L,
    cancellation: CancellationFlag,
) -> ReleaseResult<SelectedRows<'a, I::IntoIter, L>>
where
    I: IntoIterator<Item = ReleaseRow>,
    L: DescriptionLanguageLookup + ?Sized,
{
    config.validate()?;

    Ok(SelectedRows {
        rows: rows.into_iter(),
        config,
        languages,
        cancellation,
    })
}

/// The lazy stream returned by [`select_rows`].
pub struct SelectedRows<'a, I, L: ?Sized> {
    rows: I,
    config: &'a ExportConfiguration,
    languages: &'a L,
    cancellation: CancellationFlag,
}

impl<I, L> Iterator for SelectedRows<'_, I, L>
where
    I: Iterator<Item = ReleaseRow>,
    L: DescriptionLanguageLookup + ?Sized,
{
    type Item = (FileKey, ReleaseRow);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.cancellation.is_cancelled() {
                tracing::debug!("export cancelled, stopping row selection");
                return None;
            }

            let row = self.rows.next()?;

            if !passes_gates(&row, self.config) {
                continue;
            }

            let Some(key) = route(&row, self.config, self.languages) else {
                continue;
            };

            return Some((key, substitute_transient_time(row, self.config)));
        }
    }
}

/// Gates 1-3: release type, publication and date range.
fn passes_gates(row: &ReleaseRow, config: &ExportConfiguration) -> bool {
    // Publication gate applies to every release type.
    if !row.is_published() && !config.include_unpublished {
        return false;
    }

    match config.release_type {
        // Full history and latest-version snapshots take every row the data
        // source hands them; only the publication gate above applies.
        ReleaseType::Full | ReleaseType::Snapshot => true,
        ReleaseType::Delta => {
            match (config.start_effective_time, config.end_effective_time) {
                (Some(start), Some(end)) => match row.effective_time() {
                    Some(effective_time) => start <= effective_time && effective_time <= end,
                    // An unpublished row has no time to compare; it is here
                    // because unpublished inclusion is on.
                    None => true,
                },
                // Without bounds a delta carries unpublished content only.
                _ => !row.is_published(),
            }
        }
    }
}

/// Gate 4: substitute the displayed effective time of unpublished rows.
///
/// Published rows are never rewritten, and the row's released flag is not
/// touched either way.
fn substitute_transient_time(row: ReleaseRow, config: &ExportConfiguration) -> ReleaseRow {
    match config.transient_effective_time {
        Some(transient) if !row.is_published() => row.with_effective_time(Some(transient)),
        _ => row,
    }
}

/// Gates 5-7: routing to a target file, or `None` when suppressed.
fn route<L: DescriptionLanguageLookup + ?Sized>(
    row: &ReleaseRow,
    config: &ExportConfiguration,
    languages: &L,
) -> Option<FileKey> {
    let release_type = config.release_type;

    let key = match row {
        ReleaseRow::Concept(_) => FileKey::new(ComponentFile::Concept, release_type),
        ReleaseRow::Description(description) => {
            let component = if description.is_text_definition() {
                ComponentFile::TextDefinition
            } else {
                ComponentFile::Description
            };
            FileKey::with_language(component, release_type, description.language_code.clone())
        }
        ReleaseRow::Relationship(relationship) => {
            let component = if relationship.is_stated() {
                ComponentFile::StatedRelationship
            } else {
                ComponentFile::Relationship
            };
            FileKey::new(component, release_type)
        }
        ReleaseRow::LanguageMember(member) => {
            // Routed by the referenced description's language, not by any
            // metadata of the reference set itself.
            let Some(language) = languages.language_of_description(member.referenced_component_id)
            else {
                tracing::warn!(
                    member = %member.id,
                    description = member.referenced_component_id,
                    "language member references unknown description, row skipped"
                );
                return None;
            };
            FileKey::with_language(ComponentFile::LanguageRefset, release_type, language)
        }
        ReleaseRow::SimpleMember(member) => match config.refset_export_layout {
            RefSetExportLayout::Combined => {
                FileKey::new(ComponentFile::SimpleRefset, release_type)
            }
            RefSetExportLayout::PerReferenceSet => FileKey::with_refset_label(
                ComponentFile::SimpleRefset,
                release_type,
                member.refset_id.to_string(),
            ),
        },
        ReleaseRow::OwlMember(_) => FileKey::new(ComponentFile::OwlExpressionRefset, release_type),
        ReleaseRow::MrcmDomainMember(_) => {
            FileKey::new(ComponentFile::MrcmDomainRefset, release_type)
        }
    };

    if config.concepts_and_relationships_only
        && key
            .component
            .suppressed_when_concepts_and_relationships_only()
    {
        return None;
    }

    Some(key)
}
