//! SNOMED CT coded-value enumerations.
//!
//! Enum representations for the coded values referenced by RF2 rows:
//! definition status, description type, case significance, characteristic
//! type, modifier and language-refset acceptability.

use crate::SctId;

/// Definition status for a SNOMED CT concept.
///
/// # Examples
///
/// ```
/// use snomed_rf2_types::DefinitionStatus;
///
/// let status = DefinitionStatus::from_id(900000000000074008);
/// assert_eq!(status, Some(DefinitionStatus::Primitive));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionStatus {
    /// Concept is primitively defined (necessary conditions only).
    Primitive,
    /// Concept is fully defined (necessary and sufficient conditions).
    FullyDefined,
}

impl DefinitionStatus {
    /// SCTID for primitive definition status.
    pub const PRIMITIVE_ID: SctId = 900000000000074008;
    /// SCTID for fully defined definition status.
    pub const FULLY_DEFINED_ID: SctId = 900000000000073002;

    /// Creates a DefinitionStatus from its SCTID.
    ///
    /// Returns `None` if the ID doesn't match a known definition status.
    pub fn from_id(id: SctId) -> Option<Self> {
        match id {
            Self::PRIMITIVE_ID => Some(Self::Primitive),
            Self::FULLY_DEFINED_ID => Some(Self::FullyDefined),
            _ => None,
        }
    }

    /// Returns the SCTID for this definition status.
    pub fn to_id(self) -> SctId {
        match self {
            Self::Primitive => Self::PRIMITIVE_ID,
            Self::FullyDefined => Self::FULLY_DEFINED_ID,
        }
    }
}

/// Description type for SNOMED CT descriptions.
///
/// Text definitions are stored in the same RF2 shape as descriptions but are
/// exported into their own file family, so the type matters for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DescriptionType {
    /// Fully Specified Name - unambiguous description with semantic tag.
    Fsn,
    /// Synonym - additional acceptable term for the concept.
    Synonym,
    /// Text definition - narrative definition of the concept.
    TextDefinition,
}

impl DescriptionType {
    /// SCTID for Fully Specified Name type.
    pub const FSN_ID: SctId = 900000000000003001;
    /// SCTID for Synonym type.
    pub const SYNONYM_ID: SctId = 900000000000013009;
    /// SCTID for Text Definition type.
    pub const TEXT_DEFINITION_ID: SctId = 900000000000550004;

    /// Creates a DescriptionType from its SCTID.
    ///
    /// Returns `None` if the ID doesn't match a known description type.
    pub fn from_id(id: SctId) -> Option<Self> {
        match id {
            Self::FSN_ID => Some(Self::Fsn),
            Self::SYNONYM_ID => Some(Self::Synonym),
            Self::TEXT_DEFINITION_ID => Some(Self::TextDefinition),
            _ => None,
        }
    }

    /// Returns the SCTID for this description type.
    pub fn to_id(self) -> SctId {
        match self {
            Self::Fsn => Self::FSN_ID,
            Self::Synonym => Self::SYNONYM_ID,
            Self::TextDefinition => Self::TEXT_DEFINITION_ID,
        }
    }
}

/// Case significance for SNOMED CT descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseSignificance {
    /// Entire term is case insensitive.
    CaseInsensitive,
    /// Entire term is case sensitive.
    CaseSensitive,
    /// Only the initial character is case insensitive.
    InitialCharacterCaseInsensitive,
}

impl CaseSignificance {
    /// SCTID for "entire term case insensitive".
    pub const CASE_INSENSITIVE_ID: SctId = 900000000000448009;
    /// SCTID for "entire term case sensitive".
    pub const CASE_SENSITIVE_ID: SctId = 900000000000017005;
    /// SCTID for "only initial character case insensitive".
    pub const INITIAL_CHARACTER_CASE_INSENSITIVE_ID: SctId = 900000000000020002;

    /// Creates a CaseSignificance from its SCTID.
    ///
    /// Returns `None` if the ID doesn't match a known case significance.
    pub fn from_id(id: SctId) -> Option<Self> {
        match id {
            Self::CASE_INSENSITIVE_ID => Some(Self::CaseInsensitive),
            Self::CASE_SENSITIVE_ID => Some(Self::CaseSensitive),
            Self::INITIAL_CHARACTER_CASE_INSENSITIVE_ID => {
                Some(Self::InitialCharacterCaseInsensitive)
            }
            _ => None,
        }
    }

    /// Returns the SCTID for this case significance.
    pub fn to_id(self) -> SctId {
        match self {
            Self::CaseInsensitive => Self::CASE_INSENSITIVE_ID,
            Self::CaseSensitive => Self::CASE_SENSITIVE_ID,
            Self::InitialCharacterCaseInsensitive => Self::INITIAL_CHARACTER_CASE_INSENSITIVE_ID,
        }
    }
}

/// Characteristic type for SNOMED CT relationships.
///
/// Stated relationships are exported into their own RF2 file; inferred and
/// additional relationships share the general relationship file.
///
/// # Examples
///
/// ```
/// use snomed_rf2_types::CharacteristicType;
///
/// let stated = CharacteristicType::from_id(900000000000010007);
/// assert_eq!(stated, Some(CharacteristicType::Stated));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacteristicType {
    /// Relationship as authored by editors.
    Stated,
    /// Relationship computed by the classifier.
    Inferred,
    /// Additional (non-defining) relationship.
    Additional,
}

impl CharacteristicType {
    /// SCTID for stated relationships.
    pub const STATED_ID: SctId = 900000000000010007;
    /// SCTID for inferred relationships.
    pub const INFERRED_ID: SctId = 900000000000011006;
    /// SCTID for additional relationships.
    pub const ADDITIONAL_ID: SctId = 900000000000227009;

    /// Creates a CharacteristicType from its SCTID.
    ///
    /// Returns `None` if the ID doesn't match a known characteristic type.
    pub fn from_id(id: SctId) -> Option<Self> {
        match id {
            Self::STATED_ID => Some(Self::Stated),
            Self::INFERRED_ID => Some(Self::Inferred),
            Self::ADDITIONAL_ID => Some(Self::Additional),
            _ => None,
        }
    }

    /// Returns the SCTID for this characteristic type.
    pub fn to_id(self) -> SctId {
        match self {
            Self::Stated => Self::STATED_ID,
            Self::Inferred => Self::INFERRED_ID,
            Self::Additional => Self::ADDITIONAL_ID,
        }
    }
}

/// Relationship modifier (existential or universal restriction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierType {
    /// Existential restriction (some).
    Existential,
    /// Universal restriction (all).
    Universal,
}

impl ModifierType {
    /// SCTID for existential restriction modifier.
    pub const EXISTENTIAL_ID: SctId = 900000000000451002;
    /// SCTID for universal restriction modifier.
    pub const UNIVERSAL_ID: SctId = 900000000000450001;

    /// Creates a ModifierType from its SCTID.
    ///
    /// Returns `None` if the ID doesn't match a known modifier.
    pub fn from_id(id: SctId) -> Option<Self> {
        match id {
            Self::EXISTENTIAL_ID => Some(Self::Existential),
            Self::UNIVERSAL_ID => Some(Self::Universal),
            _ => None,
        }
    }

    /// Returns the SCTID for this modifier.
    pub fn to_id(self) -> SctId {
        match self {
            Self::Existential => Self::EXISTENTIAL_ID,
            Self::Universal => Self::UNIVERSAL_ID,
        }
    }
}

/// Acceptability of a description within a language reference set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Acceptability {
    /// The preferred term for the dialect.
    Preferred,
    /// An acceptable (but not preferred) term for the dialect.
    Acceptable,
}

impl Acceptability {
    /// SCTID for "Preferred" acceptability.
    pub const PREFERRED_ID: SctId = 900000000000548007;
    /// SCTID for "Acceptable" acceptability.
    pub const ACCEPTABLE_ID: SctId = 900000000000549004;

    /// Creates an Acceptability from its SCTID.
    ///
    /// Returns `None` if the ID doesn't match a known acceptability.
    pub fn from_id(id: SctId) -> Option<Self> {
        match id {
            Self::PREFERRED_ID => Some(Self::Preferred),
            Self::ACCEPTABLE_ID => Some(Self::Acceptable),
            _ => None,
        }
    }

    /// Returns the SCTID for this acceptability.
    pub fn to_id(self) -> SctId {
        match self {
            Self::Preferred => Self::PREFERRED_ID,
            Self::Acceptable => Self::ACCEPTABLE_ID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_status_roundtrip() {
        for status in [DefinitionStatus::Primitive, DefinitionStatus::FullyDefined] {
            assert_eq!(DefinitionStatus::from_id(status.to_id()), Some(status));
        }
        assert_eq!(DefinitionStatus::from_id(1), None);
    }

    #[test]
    fn test_description_type_roundtrip() {
        for desc_type in [
            DescriptionType::Fsn,
            DescriptionType::Synonym,
            DescriptionType::TextDefinition,
        ] {
            assert_eq!(DescriptionType::from_id(desc_type.to_id()), Some(desc_type));
        }
    }

    #[test]
    fn test_characteristic_type_roundtrip() {
        for char_type in [
            CharacteristicType::Stated,
            CharacteristicType::Inferred,
            CharacteristicType::Additional,
        ] {
            assert_eq!(
                CharacteristicType::from_id(char_type.to_id()),
                Some(char_type)
            );
        }
        assert_eq!(CharacteristicType::from_id(116680003), None);
    }

    #[test]
    fn test_acceptability_roundtrip() {
        assert_eq!(
            Acceptability::from_id(Acceptability::PREFERRED_ID),
            Some(Acceptability::Preferred)
        );
        assert_eq!(
            Acceptability::from_id(Acceptability::ACCEPTABLE_ID),
            Some(Acceptability::Acceptable)
        );
    }
}
