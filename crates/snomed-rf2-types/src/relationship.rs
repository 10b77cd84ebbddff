//! SNOMED CT Relationship row.

use crate::{CharacteristicType, ModifierType, SctId};

/// A SNOMED CT relationship row.
///
/// Stated relationships are written to `sct2_StatedRelationship_*` on export;
/// inferred and additional relationships share `sct2_Relationship_*`.
///
/// # Examples
///
/// ```
/// use snomed_rf2_types::{Rf2Relationship, CharacteristicType, ModifierType, well_known};
///
/// let relationship = Rf2Relationship {
///     id: 100000028,
///     effective_time: Some(20020131),
///     active: true,
///     module_id: well_known::SNOMED_CT_CORE_MODULE,
///     source_id: 73211009,
///     destination_id: 362969004,
///     relationship_group: 0,
///     type_id: well_known::IS_A,
///     characteristic_type_id: CharacteristicType::INFERRED_ID,
///     modifier_id: ModifierType::EXISTENTIAL_ID,
///     released: true,
/// };
///
/// assert!(relationship.is_is_a());
/// assert!(relationship.is_inferred());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2Relationship {
    /// Unique identifier for this relationship (SCTID).
    pub id: SctId,
    /// Effective date in YYYYMMDD format; `None` for unpublished edits.
    pub effective_time: Option<u32>,
    /// Whether this relationship is active.
    pub active: bool,
    /// The module containing this relationship.
    pub module_id: SctId,
    /// Source concept (subject).
    pub source_id: SctId,
    /// Destination concept (object).
    pub destination_id: SctId,
    /// Role group number (0 = ungrouped).
    pub relationship_group: u16,
    /// Relationship type (e.g. IS_A, Finding site).
    pub type_id: SctId,
    /// Stated, inferred or additional.
    pub characteristic_type_id: SctId,
    /// Modifier (existential or universal).
    pub modifier_id: SctId,
    /// Whether this row has ever been part of a published release.
    pub released: bool,
}

impl Rf2Relationship {
    /// SCTID for the IS_A relationship type.
    pub const IS_A_TYPE_ID: SctId = 116680003;

    /// Returns true if this row carries a published effective time.
    pub fn is_published(&self) -> bool {
        self.effective_time.is_some()
    }

    /// Returns true if this is an IS_A (subtype) relationship.
    pub fn is_is_a(&self) -> bool {
        self.type_id == Self::IS_A_TYPE_ID
    }

    /// Returns the characteristic type enum value, if recognized.
    pub fn characteristic_type(&self) -> Option<CharacteristicType> {
        CharacteristicType::from_id(self.characteristic_type_id)
    }

    /// Returns true if this is a stated relationship.
    pub fn is_stated(&self) -> bool {
        self.characteristic_type_id == CharacteristicType::STATED_ID
    }

    /// Returns true if this is an inferred relationship.
    pub fn is_inferred(&self) -> bool {
        self.characteristic_type_id == CharacteristicType::INFERRED_ID
    }

    /// Returns true if this is an additional (non-defining) relationship.
    pub fn is_additional(&self) -> bool {
        self.characteristic_type_id == CharacteristicType::ADDITIONAL_ID
    }

    /// Returns the modifier type enum value, if recognized.
    pub fn modifier_type(&self) -> Option<ModifierType> {
        ModifierType::from_id(self.modifier_id)
    }
}
