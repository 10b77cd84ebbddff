//! # snomed-rf2-release
//!
//! RF2 release export and import pipeline for SNOMED CT.
//!
//! The export half is the core of this crate:
//!
//! - [`ExportConfiguration`] describes one export request (release type,
//!   branch, effective time range, unpublished handling) and validates it
//!   before any row is scanned;
//! - [`select_rows`] lazily gates and routes a stream of
//!   [`ReleaseRow`](snomed_rf2_types::ReleaseRow)s to their target
//!   [`FileKey`]s, observing a [`CancellationFlag`] between rows;
//! - [`ReleaseArchiveBuilder`] writes the grouped rows into a zip archive,
//!   including the per-language placeholder files RF2 consumers require.
//!
//! The import half is the streaming [`Rf2Parser`] and the [`ReleaseStore`]
//! it fills, which also serves as the edge source for
//! [`snomed_taxonomy::HierarchySnapshot`] builds.
//!
//! ```no_run
//! use std::collections::{BTreeMap, BTreeSet};
//! use snomed_rf2_release::{
//!     select_rows, CancellationFlag, ExportConfiguration, ImportConfig,
//!     ReleaseArchiveBuilder, ReleaseStore, ReleaseType,
//! };
//!
//! let mut store = ReleaseStore::new();
//! store.load_concepts("sct2_Concept_Snapshot_INT_20170731.txt", ImportConfig::default())?;
//!
//! let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN")
//!     .with_include_unpublished(true)
//!     .build();
//!
//! let mut grouped = BTreeMap::new();
//! for (key, row) in select_rows(store.release_rows(), &config, &store, CancellationFlag::new())? {
//!     grouped.entry(key).or_insert_with(Vec::new).push(row);
//! }
//!
//! let archive = ReleaseArchiveBuilder::new("exports", "SnomedCT_Export_1")
//!     .write(&config, &grouped, &store.language_codes())?;
//! # Ok::<(), snomed_rf2_release::ReleaseError>(())
//! ```

#![warn(missing_docs)]

mod archive;
mod config;
mod discover;
mod filename;
mod parser;
mod records;
mod selector;
mod store;
mod types;

pub use archive::ReleaseArchiveBuilder;
pub use config::{ExportConfiguration, ExportConfigurationBuilder, RefSetExportLayout, ReleaseType};
pub use discover::{discover_release_files, Rf2ReleaseFiles};
pub use filename::{ComponentFile, FileKey};
pub use parser::{parse, Rf2Parser, Rf2Record};
pub use selector::{select_rows, CancellationFlag, DescriptionLanguageLookup, SelectedRows};
pub use store::ReleaseStore;
pub use types::{ImportConfig, ReleaseError, ReleaseResult};
