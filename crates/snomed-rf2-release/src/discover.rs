//! RF2 release directory discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{ReleaseError, ReleaseResult};

/// Discovered RF2 files in a release directory.
#[derive(Debug, Clone, Default)]
pub struct Rf2ReleaseFiles {
    /// Path to concept file.
    pub concept_file: Option<PathBuf>,
    /// Paths to description files (one per language).
    pub description_files: Vec<PathBuf>,
    /// Paths to text definition files.
    pub text_definition_files: Vec<PathBuf>,
    /// Path to relationship file.
    pub relationship_file: Option<PathBuf>,
    /// Path to stated relationship file (if separate).
    pub stated_relationship_file: Option<PathBuf>,
    /// Paths to OWL expression reference set files.
    pub owl_expression_files: Vec<PathBuf>,
    /// Paths to language reference set files.
    pub language_refset_files: Vec<PathBuf>,
    /// Paths to simple reference set files.
    pub simple_refset_files: Vec<PathBuf>,
    /// Path to MRCM domain reference set file.
    pub mrcm_domain_file: Option<PathBuf>,
    /// Release date extracted from filename (YYYYMMDD).
    pub release_date: Option<String>,
}

impl Rf2ReleaseFiles {
    /// Returns true if the files needed to build a hierarchy are present.
    pub fn has_taxonomy_files(&self) -> bool {
        self.concept_file.is_some() && self.relationship_file.is_some()
    }
}

/// Discovers RF2 files in a SNOMED CT release directory.
///
/// Searches the Snapshot/Terminology layout for the core component files and
/// the Refset subdirectories for language, content and metadata refset files.
pub fn discover_release_files<P: AsRef<Path>>(path: P) -> ReleaseResult<Rf2ReleaseFiles> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ReleaseError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let terminology_dir = find_terminology_dir(path)?;
    let mut files = Rf2ReleaseFiles::default();

    for entry in fs::read_dir(&terminology_dir)? {
        let entry = entry?;
        let filename = entry.file_name();
        let filename_str = filename.to_string_lossy();

        if !filename_str.ends_with(".txt") {
            continue;
        }

        if filename_str.starts_with("sct2_Concept_") {
            if let Some(date) = extract_release_date(&filename_str) {
                files.release_date = Some(date);
            }
            files.concept_file = Some(entry.path());
        } else if filename_str.starts_with("sct2_Description_") {
            files.description_files.push(entry.path());
        } else if filename_str.starts_with("sct2_TextDefinition_") {
            files.text_definition_files.push(entry.path());
        } else if filename_str.starts_with("sct2_StatedRelationship_") {
            files.stated_relationship_file = Some(entry.path());
        } else if filename_str.starts_with("sct2_Relationship_") {
            files.relationship_file = Some(entry.path());
        } else if filename_str.contains("Refset_OWLExpression")
            || filename_str.contains("sRefset_OWL")
        {
            files.owl_expression_files.push(entry.path());
        }
    }

    if let Some(snapshot_dir) = terminology_dir.parent() {
        let refset_dir = snapshot_dir.join("Refset");
        discover_refset_files(&refset_dir, &mut files)?;
    }

    Ok(files)
}

fn discover_refset_files(refset_dir: &Path, files: &mut Rf2ReleaseFiles) -> ReleaseResult<()> {
    if !refset_dir.exists() {
        return Ok(());
    }

    for subdir in ["Language", "Content", "Metadata"] {
        let dir = refset_dir.join(subdir);
        if !dir.exists() {
            continue;
        }

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let filename = entry.file_name();
            let filename_str = filename.to_string_lossy();

            if !filename_str.ends_with(".txt") {
                continue;
            }

            if filename_str.contains("cRefset_Language") {
                files.language_refset_files.push(entry.path());
            } else if filename_str.contains("Refset_Simple") {
                files.simple_refset_files.push(entry.path());
            } else if filename_str.contains("MRCMDomain") && !filename_str.contains("ModuleScope") {
                files.mrcm_domain_file = Some(entry.path());
            }
        }
    }

    Ok(())
}

/// Finds the Terminology directory within an RF2 release structure.
fn find_terminology_dir(base: &Path) -> ReleaseResult<PathBuf> {
    if base.ends_with("Terminology") && base.is_dir() {
        return Ok(base.to_path_buf());
    }

    let snapshot_term = base.join("Snapshot").join("Terminology");
    if snapshot_term.exists() {
        return Ok(snapshot_term);
    }

    let term = base.join("Terminology");
    if term.exists() {
        return Ok(term);
    }

    // Search one level deep for a directory containing the structure
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let subdir = entry.path();

            let sub_snapshot_term = subdir.join("Snapshot").join("Terminology");
            if sub_snapshot_term.exists() {
                return Ok(sub_snapshot_term);
            }

            let sub_term = subdir.join("Terminology");
            if sub_term.exists() {
                return Ok(sub_term);
            }
        }
    }

    Err(ReleaseError::DirectoryNotFound {
        path: format!("Terminology directory not found in {}", base.display()),
    })
}

/// Extracts the release date from an RF2 filename.
///
/// RF2 files have names like `sct2_Concept_Snapshot_INT_20170731.txt`.
fn extract_release_date(filename: &str) -> Option<String> {
    let without_ext = filename.trim_end_matches(".txt");
    let parts: Vec<&str> = without_ext.split('_').collect();

    if let Some(&last) = parts.last() {
        if last.len() == 8 && last.chars().all(|c| c.is_ascii_digit()) {
            return Some(last.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_release_date() {
        assert_eq!(
            extract_release_date("sct2_Concept_Snapshot_INT_20170731.txt"),
            Some("20170731".to_string())
        );
        assert_eq!(
            extract_release_date("sct2_Description_Snapshot-en_INT_20170731.txt"),
            Some("20170731".to_string())
        );
        assert_eq!(extract_release_date("invalid_filename.txt"), None);
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let result = discover_release_files("/definitely/not/here");
        assert!(matches!(
            result,
            Err(ReleaseError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_discover_snapshot_layout() {
        let dir = tempfile::tempdir().unwrap();
        let terminology = dir.path().join("Snapshot/Terminology");
        let language = dir.path().join("Snapshot/Refset/Language");
        std::fs::create_dir_all(&terminology).unwrap();
        std::fs::create_dir_all(&language).unwrap();

        for name in [
            "sct2_Concept_Snapshot_INT_20170731.txt",
            "sct2_Description_Snapshot-en_INT_20170731.txt",
            "sct2_Relationship_Snapshot_INT_20170731.txt",
            "sct2_StatedRelationship_Snapshot_INT_20170731.txt",
        ] {
            std::fs::write(terminology.join(name), "").unwrap();
        }
        std::fs::write(
            language.join("der2_cRefset_LanguageSnapshot-en_INT_20170731.txt"),
            "",
        )
        .unwrap();

        let files = discover_release_files(dir.path()).unwrap();
        assert!(files.has_taxonomy_files());
        assert!(files.stated_relationship_file.is_some());
        assert_eq!(files.description_files.len(), 1);
        assert_eq!(files.language_refset_files.len(), 1);
        assert_eq!(files.release_date, Some("20170731".to_string()));
    }
}
