//! SNOMED CT Description row.

use crate::{DescriptionType, SctId};

/// A SNOMED CT description row.
///
/// Covers both `sct2_Description_*` and `sct2_TextDefinition_*` content: text
/// definitions share the description shape and are told apart by `type_id`,
/// which is what drives their export-file routing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2Description {
    /// Unique identifier for this description (SCTID).
    pub id: SctId,
    /// Effective date in YYYYMMDD format; `None` for unpublished edits.
    pub effective_time: Option<u32>,
    /// Whether this description is active.
    pub active: bool,
    /// The module containing this description.
    pub module_id: SctId,
    /// The concept this description names.
    pub concept_id: SctId,
    /// ISO 639-1 language code, e.g. `en`, `da`.
    pub language_code: String,
    /// Description type (FSN, synonym or text definition).
    pub type_id: SctId,
    /// The term text.
    pub term: String,
    /// Case significance of the term.
    pub case_significance_id: SctId,
    /// Whether this row has ever been part of a published release.
    pub released: bool,
}

impl Rf2Description {
    /// Returns true if this row carries a published effective time.
    pub fn is_published(&self) -> bool {
        self.effective_time.is_some()
    }

    /// Returns the description type enum value, if recognized.
    pub fn description_type(&self) -> Option<DescriptionType> {
        DescriptionType::from_id(self.type_id)
    }

    /// Returns true if this is a Fully Specified Name.
    pub fn is_fsn(&self) -> bool {
        self.type_id == DescriptionType::FSN_ID
    }

    /// Returns true if this is a synonym.
    pub fn is_synonym(&self) -> bool {
        self.type_id == DescriptionType::SYNONYM_ID
    }

    /// Returns true if this is a text definition.
    ///
    /// Text definitions route to the `sct2_TextDefinition_*` file family on
    /// export; all other types route to `sct2_Description_*`.
    pub fn is_text_definition(&self) -> bool {
        self.type_id == DescriptionType::TEXT_DEFINITION_ID
    }
}
