//! Release archive assembly.
//!
//! Writes the selected rows of one export into a zip archive. Rows are
//! grouped per output file; every file gets its fixed RF2 header line, and
//! the description-family files (Description, TextDefinition, Language
//! refset) are created per language code even when no row qualified - RF2
//! consumers require the placeholder files to exist.
//!
//! The archive is assembled in a temporary file and only persisted to its
//! final name on success, so a failed export never leaves a partial archive
//! behind.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::PathBuf;

use snomed_rf2_types::ReleaseRow;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::config::ExportConfiguration;
use crate::filename::{ComponentFile, FileKey};
use crate::types::{ReleaseError, ReleaseResult};

/// Assembles one export's output files into a zip archive.
///
/// # Examples
///
/// ```no_run
/// use std::collections::{BTreeMap, BTreeSet};
/// use snomed_rf2_release::{ExportConfiguration, ReleaseArchiveBuilder, ReleaseType};
///
/// let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN").build();
/// let builder = ReleaseArchiveBuilder::new("/tmp/exports", "SnomedCT_Export_1234");
/// let archive = builder.write(&config, &BTreeMap::new(), &BTreeSet::new())?;
/// # Ok::<(), snomed_rf2_release::ReleaseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReleaseArchiveBuilder {
    output_dir: PathBuf,
    archive_name: String,
}

impl ReleaseArchiveBuilder {
    /// Creates a builder writing `<output_dir>/<archive_name>.zip`.
    ///
    /// The archive name should carry a request-scoped unique id so that
    /// concurrent exports never collide.
    pub fn new(output_dir: impl Into<PathBuf>, archive_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            archive_name: archive_name.into(),
        }
    }

    /// The final archive path this builder writes to.
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.zip", self.archive_name))
    }

    /// Writes the grouped rows into the archive and returns its path.
    ///
    /// `language_codes` is the language inventory of the dataset; it drives
    /// the placeholder guarantee for the description-family files. The
    /// placeholders are skipped only when the configuration suppresses those
    /// files entirely.
    ///
    /// # Errors
    ///
    /// Any I/O failure surfaces as [`ReleaseError::ArchiveWrite`]; the
    /// partially written archive is discarded, not returned.
    pub fn write(
        &self,
        config: &ExportConfiguration,
        grouped_rows: &BTreeMap<FileKey, Vec<ReleaseRow>>,
        language_codes: &BTreeSet<String>,
    ) -> ReleaseResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let mut temp = tempfile::NamedTempFile::new_in(&self.output_dir)?;
        self.write_entries(temp.as_file_mut(), config, grouped_rows, language_codes)
            .map_err(|error| ReleaseError::ArchiveWrite {
                reason: error.to_string(),
            })?;

        let final_path = self.archive_path();
        temp.persist(&final_path)
            .map_err(|error| ReleaseError::ArchiveWrite {
                reason: error.to_string(),
            })?;

        tracing::info!(archive = %final_path.display(), "release archive written");
        Ok(final_path)
    }

    fn write_entries(
        &self,
        file: &mut std::fs::File,
        config: &ExportConfiguration,
        grouped_rows: &BTreeMap<FileKey, Vec<ReleaseRow>>,
        language_codes: &BTreeSet<String>,
    ) -> ReleaseResult<()> {
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        let empty: Vec<ReleaseRow> = Vec::new();

        let mut file_keys: BTreeSet<FileKey> = grouped_rows.keys().cloned().collect();
        if !config.concepts_and_relationships_only {
            for key in placeholder_keys(config, language_codes) {
                file_keys.insert(key);
            }
        }

        for key in file_keys {
            let entry_name = format!("{}/{}.txt", subdirectory(key.component), key.file_name());
            zip.start_file(entry_name, options)?;

            let rows = grouped_rows.get(&key).unwrap_or(&empty);
            let mut writer = csv::WriterBuilder::new()
                .delimiter(b'\t')
                .quote_style(csv::QuoteStyle::Never)
                .from_writer(&mut zip);

            writer.write_record(key.component.header())?;
            for row in rows {
                writer.write_record(row.columns())?;
            }
            writer.flush()?;
        }

        zip.finish()?.flush()?;
        Ok(())
    }
}

/// The description-family files every export must contain per language.
///
/// A dataset with no descriptions has no language inventory, yet consumers
/// still require the files; `en` stands in for that case.
fn placeholder_keys(
    config: &ExportConfiguration,
    language_codes: &BTreeSet<String>,
) -> Vec<FileKey> {
    let fallback = BTreeSet::from(["en".to_string()]);
    let language_codes = if language_codes.is_empty() {
        &fallback
    } else {
        language_codes
    };

    let mut keys = Vec::new();
    for language in language_codes {
        for component in [
            ComponentFile::Description,
            ComponentFile::TextDefinition,
            ComponentFile::LanguageRefset,
        ] {
            keys.push(FileKey::with_language(
                component,
                config.release_type,
                language.clone(),
            ));
        }
    }
    keys
}

fn subdirectory(component: ComponentFile) -> &'static str {
    match component {
        ComponentFile::Concept
        | ComponentFile::Description
        | ComponentFile::TextDefinition
        | ComponentFile::Relationship
        | ComponentFile::StatedRelationship
        | ComponentFile::OwlExpressionRefset => "Terminology",
        ComponentFile::LanguageRefset => "Refset/Language",
        ComponentFile::SimpleRefset => "Refset/Content",
        ComponentFile::MrcmDomainRefset => "Refset/Metadata",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReleaseType;
    use snomed_rf2_types::{well_known, DefinitionStatus, Rf2Concept};
    use std::io::Read;
    use std::path::Path;

    fn read_archive(path: &Path) -> BTreeMap<String, String> {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut contents = BTreeMap::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).unwrap();
            let mut text = String::new();
            entry.read_to_string(&mut text).unwrap();
            contents.insert(entry.name().to_string(), text);
        }
        contents
    }

    fn concept_row() -> ReleaseRow {
        ReleaseRow::Concept(Rf2Concept {
            id: 404684003,
            effective_time: Some(20170301),
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            definition_status_id: DefinitionStatus::PRIMITIVE_ID,
            released: true,
        })
    }

    #[test]
    fn test_writes_rows_under_headers() {
        let dir = tempfile::tempdir().unwrap();
        let builder = ReleaseArchiveBuilder::new(dir.path(), "SnomedCT_Export_test");
        let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN").build();

        let mut grouped = BTreeMap::new();
        grouped.insert(
            FileKey::new(ComponentFile::Concept, ReleaseType::Delta),
            vec![concept_row()],
        );

        let path = builder.write(&config, &grouped, &BTreeSet::new()).unwrap();
        let contents = read_archive(&path);

        let concept_file = &contents["Terminology/sct2_Concept_Delta.txt"];
        let mut lines = concept_file.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id\teffectiveTime\tactive\tmoduleId\tdefinitionStatusId"
        );
        assert_eq!(
            lines.next().unwrap(),
            "404684003\t20170301\t1\t900000000000207008\t900000000000074008"
        );
    }

    #[test]
    fn test_placeholder_files_for_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let builder = ReleaseArchiveBuilder::new(dir.path(), "SnomedCT_Export_placeholders");
        let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN").build();

        let languages = BTreeSet::from(["en".to_string()]);
        let path = builder.write(&config, &BTreeMap::new(), &languages).unwrap();
        let contents = read_archive(&path);

        for name in [
            "Terminology/sct2_Description_Delta-en.txt",
            "Terminology/sct2_TextDefinition_Delta-en.txt",
            "Refset/Language/der2_cRefset_LanguageDelta-en.txt",
        ] {
            let text = contents.get(name).unwrap_or_else(|| panic!("missing {name}"));
            assert_eq!(text.lines().count(), 1, "{name} should be header-only");
        }
    }

    #[test]
    fn test_no_description_placeholders_when_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let builder = ReleaseArchiveBuilder::new(dir.path(), "SnomedCT_Export_core_only");
        let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN")
            .with_concepts_and_relationships_only(true)
            .build();

        let languages = BTreeSet::from(["en".to_string()]);
        let path = builder.write(&config, &BTreeMap::new(), &languages).unwrap();
        let contents = read_archive(&path);

        assert!(contents.keys().all(|name| !name.contains("Description")));
    }

    #[test]
    fn test_description_free_dataset_still_gets_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let builder = ReleaseArchiveBuilder::new(dir.path(), "SnomedCT_Export_no_descriptions");
        let config = ExportConfiguration::builder(ReleaseType::Snapshot, "MAIN").build();

        let path = builder
            .write(&config, &BTreeMap::new(), &BTreeSet::new())
            .unwrap();
        let contents = read_archive(&path);

        assert!(contents.contains_key("Terminology/sct2_Description_Snapshot-en.txt"));
        assert!(contents.contains_key("Terminology/sct2_TextDefinition_Snapshot-en.txt"));
        assert!(contents.contains_key("Refset/Language/der2_cRefset_LanguageSnapshot-en.txt"));
    }

    #[test]
    fn test_archive_name_is_request_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let first = ReleaseArchiveBuilder::new(dir.path(), "SnomedCT_Export_a");
        let second = ReleaseArchiveBuilder::new(dir.path(), "SnomedCT_Export_b");

        assert_ne!(first.archive_path(), second.archive_path());
    }
}
