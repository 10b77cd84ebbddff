//! Export configuration.

use serde::{Deserialize, Serialize};

use crate::types::{ReleaseError, ReleaseResult};

/// RF2 release type requested for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReleaseType {
    /// Every version of every row ever existing (full history).
    Full,
    /// The most recent version of each row.
    Snapshot,
    /// Only the versions changed in the requested range.
    Delta,
}

impl ReleaseType {
    /// Returns the infix used in RF2 file names, e.g. `Delta` in
    /// `sct2_Concept_Delta`.
    pub fn file_infix(&self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::Snapshot => "Snapshot",
            Self::Delta => "Delta",
        }
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_infix())
    }
}

/// How reference set members are distributed over output files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefSetExportLayout {
    /// One file per reference set type.
    #[default]
    Combined,
    /// One file per reference set, named after the reference set.
    PerReferenceSet,
}

/// Configuration of one export request.
///
/// Constructed once per request (usually through the builder), validated
/// before any row scanning starts, consumed exactly once to produce an
/// archive, then retained only as a record for status polling.
///
/// # Examples
///
/// ```
/// use snomed_rf2_release::{ExportConfiguration, ReleaseType};
///
/// let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN")
///     .with_effective_time_range(20170131, 20170301)
///     .with_include_unpublished(true)
///     .build();
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfiguration {
    /// The release type to produce.
    #[serde(rename = "type")]
    pub release_type: ReleaseType,
    /// The branch to export from.
    pub branch_path: String,
    /// Inclusive lower bound on effective times (YYYYMMDD).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_effective_time: Option<u32>,
    /// Inclusive upper bound on effective times (YYYYMMDD).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_effective_time: Option<u32>,
    /// Whether rows without an effective time are included.
    #[serde(default)]
    pub include_unpublished: bool,
    /// Substitute effective time displayed for unpublished rows.
    ///
    /// Applied only to unpublished rows at emit time; never marks a row as
    /// released, and never touches rows that are already published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transient_effective_time: Option<u32>,
    /// When set, only concept and relationship files are populated.
    #[serde(default)]
    pub concepts_and_relationships_only: bool,
    /// How reference set members are distributed over files.
    #[serde(default)]
    pub refset_export_layout: RefSetExportLayout,
}

impl ExportConfiguration {
    /// Creates a builder with the two required fields.
    pub fn builder(release_type: ReleaseType, branch_path: impl Into<String>) -> ExportConfigurationBuilder {
        ExportConfigurationBuilder {
            release_type,
            branch_path: branch_path.into(),
            start_effective_time: None,
            end_effective_time: None,
            include_unpublished: false,
            transient_effective_time: None,
            concepts_and_relationships_only: false,
            refset_export_layout: RefSetExportLayout::Combined,
        }
    }

    /// Validates the configuration.
    ///
    /// Rejected configurations never reach row scanning:
    ///
    /// - the branch path must be set,
    /// - a delta range must set both bounds or neither (asymmetric bounds are
    ///   rejected, not silently defaulted),
    /// - a complete range must be ordered.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::InvalidConfiguration`] naming the violation.
    pub fn validate(&self) -> ReleaseResult<()> {
        if self.branch_path.trim().is_empty() {
            return Err(ReleaseError::InvalidConfiguration {
                reason: "branchPath must be set".to_string(),
            });
        }

        if self.release_type == ReleaseType::Delta {
            match (self.start_effective_time, self.end_effective_time) {
                (Some(_), None) | (None, Some(_)) => {
                    return Err(ReleaseError::InvalidConfiguration {
                        reason: "startEffectiveTime and endEffectiveTime must be set together"
                            .to_string(),
                    });
                }
                _ => {}
            }
        }

        if let (Some(start), Some(end)) = (self.start_effective_time, self.end_effective_time) {
            if start > end {
                return Err(ReleaseError::InvalidConfiguration {
                    reason: format!(
                        "startEffectiveTime {start} is after endEffectiveTime {end}"
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Builder for [`ExportConfiguration`].
#[derive(Debug, Clone)]
pub struct ExportConfigurationBuilder {
    release_type: ReleaseType,
    branch_path: String,
    start_effective_time: Option<u32>,
    end_effective_time: Option<u32>,
    include_unpublished: bool,
    transient_effective_time: Option<u32>,
    concepts_and_relationships_only: bool,
    refset_export_layout: RefSetExportLayout,
}

impl ExportConfigurationBuilder {
    /// Sets the inclusive effective time range.
    pub fn with_effective_time_range(mut self, start: u32, end: u32) -> Self {
        self.start_effective_time = Some(start);
        self.end_effective_time = Some(end);
        self
    }

    /// Sets only the lower effective time bound.
    pub fn with_start_effective_time(mut self, start: u32) -> Self {
        self.start_effective_time = Some(start);
        self
    }

    /// Sets only the upper effective time bound.
    pub fn with_end_effective_time(mut self, end: u32) -> Self {
        self.end_effective_time = Some(end);
        self
    }

    /// Includes rows without an effective time.
    pub fn with_include_unpublished(mut self, include: bool) -> Self {
        self.include_unpublished = include;
        self
    }

    /// Sets the substitute effective time for unpublished rows.
    pub fn with_transient_effective_time(mut self, effective_time: u32) -> Self {
        self.transient_effective_time = Some(effective_time);
        self
    }

    /// Restricts output to concept and relationship files.
    pub fn with_concepts_and_relationships_only(mut self, restricted: bool) -> Self {
        self.concepts_and_relationships_only = restricted;
        self
    }

    /// Sets the reference set file layout.
    pub fn with_refset_export_layout(mut self, layout: RefSetExportLayout) -> Self {
        self.refset_export_layout = layout;
        self
    }

    /// Builds the configuration. Call
    /// [`validate`](ExportConfiguration::validate) before use.
    pub fn build(self) -> ExportConfiguration {
        ExportConfiguration {
            release_type: self.release_type,
            branch_path: self.branch_path,
            start_effective_time: self.start_effective_time,
            end_effective_time: self.end_effective_time,
            include_unpublished: self.include_unpublished,
            transient_effective_time: self.transient_effective_time,
            concepts_and_relationships_only: self.concepts_and_relationships_only,
            refset_export_layout: self.refset_export_layout,
        }
    }
}
