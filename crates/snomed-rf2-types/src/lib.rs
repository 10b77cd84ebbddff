//! # snomed-rf2-types
//!
//! Component row types for SNOMED CT Release Format 2 (RF2) files.
//!
//! This crate models the rows of an RF2 release as they flow through an
//! export or import pipeline: concepts, descriptions, relationships and
//! reference set members, together with the coded-value enums and well-known
//! identifiers they reference.
//!
//! Unlike a snapshot-only loader, every row here carries its full publication
//! state: the effective time is optional (`None` marks an unpublished,
//! in-progress edit) and the persisted `released` flag is kept separately,
//! because an exporter may substitute a display effective time without ever
//! marking the row as released.
//!
//! ## Features
//!
//! - `serde` (default): serialization/deserialization support via serde.
//!
//! ## Usage
//!
//! ```rust
//! use snomed_rf2_types::{Rf2Concept, ReleaseRow, well_known};
//!
//! let concept = Rf2Concept {
//!     id: 73211009,
//!     effective_time: Some(20020131),
//!     active: true,
//!     module_id: well_known::SNOMED_CT_CORE_MODULE,
//!     definition_status_id: well_known::PRIMITIVE,
//!     released: true,
//! };
//!
//! let row = ReleaseRow::Concept(concept);
//! assert!(row.is_published());
//! assert_eq!(row.columns()[1], "20020131");
//! ```

#![warn(missing_docs)]

mod concept;
mod description;
mod enums;
pub mod refset;
mod relationship;
mod row;
mod sctid;
mod time;
pub mod well_known;

pub use concept::Rf2Concept;
pub use description::Rf2Description;
pub use enums::{
    Acceptability, CaseSignificance, CharacteristicType, DefinitionStatus, DescriptionType,
    ModifierType,
};
pub use refset::{
    Rf2LanguageRefsetMember, Rf2MrcmDomainMember, Rf2OwlExpressionMember, Rf2SimpleRefsetMember,
};
pub use relationship::Rf2Relationship;
pub use row::ReleaseRow;
pub use sctid::SctId;
pub use time::format_effective_time;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _id: SctId = 73211009;
        let _status = DefinitionStatus::Primitive;
        let _desc_type = DescriptionType::Synonym;
        let _char_type = CharacteristicType::Stated;
        let _acceptability = Acceptability::Preferred;
        let _modifier = ModifierType::Existential;
        let _case_sig = CaseSignificance::CaseInsensitive;
    }

    #[test]
    fn test_well_known_accessible() {
        assert_eq!(well_known::IS_A, 116680003);
        assert_eq!(well_known::ROOT_CONCEPT, 138875005);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let concept = Rf2Concept {
            id: 404684003,
            effective_time: None,
            active: true,
            module_id: 900000000000207008,
            definition_status_id: 900000000000074008,
            released: false,
        };

        let json = serde_json::to_string(&concept).unwrap();
        let parsed: Rf2Concept = serde_json::from_str(&json).unwrap();
        assert_eq!(concept, parsed);
    }
}
