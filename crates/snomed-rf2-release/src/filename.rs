//! RF2 file naming.
//!
//! Output file names must be reproduced exactly for downstream RF2
//! consumers: `<prefix><component>_<ReleaseType>[-<languageCode>]`, with
//! `sct2_` for core terminology files and `der2_` for reference set files.
//! The letters between `der2_` and `Refset` encode the reference set's
//! extra-field signature (`c` = one concept-id field, `s` = one string
//! field), e.g. `der2_cRefset_LanguageDelta-en` or
//! `der2_sssssssRefset_MRCMDomainSnapshot`.

use crate::config::ReleaseType;

/// The RF2 file family a row is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentFile {
    /// `sct2_Concept_*`
    Concept,
    /// `sct2_Description_*`
    Description,
    /// `sct2_TextDefinition_*`
    TextDefinition,
    /// `sct2_Relationship_*` (inferred and additional relationships)
    Relationship,
    /// `sct2_StatedRelationship_*`
    StatedRelationship,
    /// `der2_cRefset_Language*`
    LanguageRefset,
    /// `der2_Refset_Simple*`
    SimpleRefset,
    /// `der2_sRefset_OWLExpression*`
    OwlExpressionRefset,
    /// `der2_sssssssRefset_MRCMDomain*`
    MrcmDomainRefset,
}

impl ComponentFile {
    /// Returns true for `sct2_` core terminology files.
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            Self::Concept
                | Self::Description
                | Self::TextDefinition
                | Self::Relationship
                | Self::StatedRelationship
        )
    }

    /// The component name used in the file name.
    pub fn base_name(&self) -> &'static str {
        match self {
            Self::Concept => "Concept",
            Self::Description => "Description",
            Self::TextDefinition => "TextDefinition",
            Self::Relationship => "Relationship",
            Self::StatedRelationship => "StatedRelationship",
            Self::LanguageRefset => "Language",
            Self::SimpleRefset => "Simple",
            Self::OwlExpressionRefset => "OWLExpression",
            Self::MrcmDomainRefset => "MRCMDomain",
        }
    }

    /// The extra-field signature letters of a reference set file.
    ///
    /// Empty for core files and for refsets without extra fields.
    pub fn refset_signature(&self) -> &'static str {
        match self {
            Self::LanguageRefset => "c",
            Self::OwlExpressionRefset => "s",
            Self::MrcmDomainRefset => "sssssss",
            _ => "",
        }
    }

    /// The header row of this file, in fixed RF2 column order.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Self::Concept => &["id", "effectiveTime", "active", "moduleId", "definitionStatusId"],
            Self::Description | Self::TextDefinition => &[
                "id",
                "effectiveTime",
                "active",
                "moduleId",
                "conceptId",
                "languageCode",
                "typeId",
                "term",
                "caseSignificanceId",
            ],
            Self::Relationship | Self::StatedRelationship => &[
                "id",
                "effectiveTime",
                "active",
                "moduleId",
                "sourceId",
                "destinationId",
                "relationshipGroup",
                "typeId",
                "characteristicTypeId",
                "modifierId",
            ],
            Self::SimpleRefset => &[
                "id",
                "effectiveTime",
                "active",
                "moduleId",
                "refsetId",
                "referencedComponentId",
            ],
            Self::LanguageRefset => &[
                "id",
                "effectiveTime",
                "active",
                "moduleId",
                "refsetId",
                "referencedComponentId",
                "acceptabilityId",
            ],
            Self::OwlExpressionRefset => &[
                "id",
                "effectiveTime",
                "active",
                "moduleId",
                "refsetId",
                "referencedComponentId",
                "owlExpression",
            ],
            Self::MrcmDomainRefset => &[
                "id",
                "effectiveTime",
                "active",
                "moduleId",
                "refsetId",
                "referencedComponentId",
                "domainConstraint",
                "parentDomain",
                "proximalPrimitiveConstraint",
                "proximalPrimitiveRefinement",
                "domainTemplateForPrecoordination",
                "domainTemplateForPostcoordination",
                "guideURL",
            ],
        }
    }

    /// Returns true if this file is suppressed when an export requests
    /// concepts and relationships only.
    ///
    /// Only the description-shaped families and their language refset are
    /// dropped; other reference set member files (OWL, MRCM, simple) are
    /// unaffected.
    pub fn suppressed_when_concepts_and_relationships_only(&self) -> bool {
        matches!(
            self,
            Self::Description | Self::TextDefinition | Self::LanguageRefset
        )
    }
}

/// Identity of one output file within an export.
///
/// # Examples
///
/// ```
/// use snomed_rf2_release::{ComponentFile, FileKey, ReleaseType};
///
/// let key = FileKey::with_language(ComponentFile::LanguageRefset, ReleaseType::Delta, "en");
/// assert_eq!(key.file_name(), "der2_cRefset_LanguageDelta-en");
///
/// let key = FileKey::new(ComponentFile::StatedRelationship, ReleaseType::Delta);
/// assert_eq!(key.file_name(), "sct2_StatedRelationship_Delta");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileKey {
    /// The file family.
    pub component: ComponentFile,
    /// The release type infix.
    pub release_type: ReleaseType,
    /// Per-language variant, e.g. `en` in `sct2_Description_Delta-en`.
    pub language_code: Option<String>,
    /// Per-reference-set file label, replacing the component base name.
    ///
    /// Used by the per-reference-set export layout, which names each simple
    /// refset file after the reference set itself.
    pub refset_label: Option<String>,
}

impl FileKey {
    /// Creates a key without a language variant.
    pub fn new(component: ComponentFile, release_type: ReleaseType) -> Self {
        Self {
            component,
            release_type,
            language_code: None,
            refset_label: None,
        }
    }

    /// Creates a key for a per-language file variant.
    pub fn with_language(
        component: ComponentFile,
        release_type: ReleaseType,
        language_code: impl Into<String>,
    ) -> Self {
        Self {
            component,
            release_type,
            language_code: Some(language_code.into()),
            refset_label: None,
        }
    }

    /// Creates a key for a per-reference-set file.
    pub fn with_refset_label(
        component: ComponentFile,
        release_type: ReleaseType,
        refset_label: impl Into<String>,
    ) -> Self {
        Self {
            component,
            release_type,
            language_code: None,
            refset_label: Some(refset_label.into()),
        }
    }

    /// Renders the RF2 file name (without extension).
    pub fn file_name(&self) -> String {
        let prefix = if self.component.is_core() {
            "sct2"
        } else {
            "der2"
        };
        let base = self
            .refset_label
            .as_deref()
            .unwrap_or_else(|| self.component.base_name());
        let language_suffix = match &self.language_code {
            Some(code) => format!("-{code}"),
            None => String::new(),
        };

        if self.component.is_core() {
            format!(
                "{prefix}_{base}_{release}{language_suffix}",
                release = self.release_type.file_infix()
            )
        } else {
            format!(
                "{prefix}_{signature}Refset_{base}{release}{language_suffix}",
                signature = self.component.refset_signature(),
                release = self.release_type.file_infix()
            )
        }
    }
}
