//! SNOMED CT Reference Set member rows.
//!
//! Reference sets attach extra structured data to components. The member
//! shapes here are the ones the release pipeline exports:
//!
//! - **Simple** members: plain membership
//! - **Language** members: preferred/acceptable terms per dialect
//! - **OWL expression** members: OWL 2 EL axioms
//! - **MRCM domain** members: machine-readable concept model domains
//!
//! Member rows are identified by UUID, not SCTID.

use uuid::Uuid;

use crate::{Acceptability, SctId};

/// A simple reference set member (`der2_Refset_*` files).
///
/// # Examples
///
/// ```
/// use snomed_rf2_types::refset::Rf2SimpleRefsetMember;
/// use uuid::Uuid;
///
/// let member = Rf2SimpleRefsetMember {
///     id: Uuid::new_v4(),
///     effective_time: Some(20200101),
///     active: true,
///     module_id: 900000000000207008,
///     refset_id: 723264001,
///     referenced_component_id: 80146002,
///     released: true,
/// };
///
/// assert!(member.is_published());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2SimpleRefsetMember {
    /// Unique identifier for this member.
    pub id: Uuid,
    /// Effective date in YYYYMMDD format; `None` for unpublished edits.
    pub effective_time: Option<u32>,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The reference set this member belongs to.
    pub refset_id: SctId,
    /// The component (usually a concept) that is a member.
    pub referenced_component_id: SctId,
    /// Whether this row has ever been part of a published release.
    pub released: bool,
}

impl Rf2SimpleRefsetMember {
    /// Returns true if this row carries a published effective time.
    pub fn is_published(&self) -> bool {
        self.effective_time.is_some()
    }
}

/// A language reference set member (`der2_cRefset_Language*` files).
///
/// Marks a description as preferred or acceptable in a dialect. The member
/// itself has no language field; on export it routes to the per-language file
/// of the description it references.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2LanguageRefsetMember {
    /// Unique identifier for this member.
    pub id: Uuid,
    /// Effective date in YYYYMMDD format; `None` for unpublished edits.
    pub effective_time: Option<u32>,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The language reference set (dialect) this member belongs to.
    pub refset_id: SctId,
    /// The description this member applies to.
    pub referenced_component_id: SctId,
    /// Preferred or Acceptable.
    pub acceptability_id: SctId,
    /// Whether this row has ever been part of a published release.
    pub released: bool,
}

impl Rf2LanguageRefsetMember {
    /// Returns true if this row carries a published effective time.
    pub fn is_published(&self) -> bool {
        self.effective_time.is_some()
    }

    /// Returns true if the referenced description is preferred in this dialect.
    pub fn is_preferred(&self) -> bool {
        self.acceptability_id == Acceptability::PREFERRED_ID
    }

    /// Returns true if the referenced description is acceptable in this dialect.
    pub fn is_acceptable(&self) -> bool {
        self.acceptability_id == Acceptability::ACCEPTABLE_ID
    }
}

/// An OWL expression reference set member (`der2_sRefset_OWL*` files).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2OwlExpressionMember {
    /// Unique identifier for this member.
    pub id: Uuid,
    /// Effective date in YYYYMMDD format; `None` for unpublished edits.
    pub effective_time: Option<u32>,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The OWL axiom reference set.
    pub refset_id: SctId,
    /// The concept this axiom defines.
    pub referenced_component_id: SctId,
    /// OWL 2 EL functional syntax expression.
    pub owl_expression: String,
    /// Whether this row has ever been part of a published release.
    pub released: bool,
}

impl Rf2OwlExpressionMember {
    /// Returns true if this row carries a published effective time.
    pub fn is_published(&self) -> bool {
        self.effective_time.is_some()
    }
}

/// An MRCM domain reference set member (`der2_sssssssRefset_MRCMDomain*` files).
///
/// Carries the seven string-valued constraint fields of the MRCM domain
/// metamodel. Constraint *enforcement* is out of scope; this is the row as it
/// appears in a release.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2MrcmDomainMember {
    /// Unique identifier for this member.
    pub id: Uuid,
    /// Effective date in YYYYMMDD format; `None` for unpublished edits.
    pub effective_time: Option<u32>,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The MRCM domain reference set.
    pub refset_id: SctId,
    /// The domain concept.
    pub referenced_component_id: SctId,
    /// ECL constraint defining the domain.
    pub domain_constraint: String,
    /// Parent domain concept, if nested.
    pub parent_domain: Option<SctId>,
    /// ECL constraint for proximal primitive modeling.
    pub proximal_primitive_constraint: String,
    /// Refinement of the proximal primitive constraint.
    pub proximal_primitive_refinement: Option<String>,
    /// Template for precoordinated content.
    pub domain_template_for_precoordination: String,
    /// Template for postcoordinated content.
    pub domain_template_for_postcoordination: String,
    /// Editorial guide URL.
    pub guide_url: Option<String>,
    /// Whether this row has ever been part of a published release.
    pub released: bool,
}

impl Rf2MrcmDomainMember {
    /// Returns true if this row carries a published effective time.
    pub fn is_published(&self) -> bool {
        self.effective_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well_known;

    #[test]
    fn test_language_member_preferred() {
        let member = Rf2LanguageRefsetMember {
            id: Uuid::new_v4(),
            effective_time: Some(20200101),
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            refset_id: well_known::US_ENGLISH_LANG_REFSET,
            referenced_component_id: 754786011,
            acceptability_id: Acceptability::PREFERRED_ID,
            released: true,
        };

        assert!(member.is_preferred());
        assert!(!member.is_acceptable());
    }

    #[test]
    fn test_unpublished_member() {
        let member = Rf2SimpleRefsetMember {
            id: Uuid::new_v4(),
            effective_time: None,
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            refset_id: well_known::REFSET_SIMPLE_TYPE,
            referenced_component_id: 80146002,
            released: false,
        };

        assert!(!member.is_published());
    }
}
