//! SNOMED CT Concept row.

use crate::{DefinitionStatus, SctId};

/// A SNOMED CT concept row from (or destined for) an `sct2_Concept_*` file.
///
/// # Examples
///
/// ```
/// use snomed_rf2_types::{Rf2Concept, DefinitionStatus};
///
/// let concept = Rf2Concept {
///     id: 73211009,
///     effective_time: Some(20020131),
///     active: true,
///     module_id: 900000000000207008,
///     definition_status_id: DefinitionStatus::PRIMITIVE_ID,
///     released: true,
/// };
///
/// assert!(concept.is_published());
/// assert!(concept.is_primitive());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2Concept {
    /// Unique identifier for this concept (SCTID).
    pub id: SctId,
    /// Effective date in YYYYMMDD format; `None` for unpublished edits.
    pub effective_time: Option<u32>,
    /// Whether this concept is active.
    pub active: bool,
    /// The module containing this concept.
    pub module_id: SctId,
    /// Whether this concept is primitive or fully defined.
    pub definition_status_id: SctId,
    /// Whether this row has ever been part of a published release.
    ///
    /// Independent of `effective_time`: an exporter may blank or substitute
    /// the displayed effective time without changing this flag.
    pub released: bool,
}

impl Rf2Concept {
    /// Returns true if this row carries a published effective time.
    pub fn is_published(&self) -> bool {
        self.effective_time.is_some()
    }

    /// Returns the definition status enum value.
    ///
    /// Returns `None` if the definition status ID is not recognized.
    pub fn definition_status(&self) -> Option<DefinitionStatus> {
        DefinitionStatus::from_id(self.definition_status_id)
    }

    /// Returns true if this concept is primitively defined.
    pub fn is_primitive(&self) -> bool {
        self.definition_status_id == DefinitionStatus::PRIMITIVE_ID
    }

    /// Returns true if this concept is fully defined.
    pub fn is_fully_defined(&self) -> bool {
        self.definition_status_id == DefinitionStatus::FULLY_DEFINED_ID
    }
}
