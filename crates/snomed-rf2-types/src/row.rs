//! The release row model.
//!
//! [`ReleaseRow`] is the unit the release pipeline works in: one exportable
//! record of any component type, with uniform access to the publication
//! attributes the selection rules gate on, and a fixed-order column rendering
//! for RF2 output.

use crate::refset::{
    Rf2LanguageRefsetMember, Rf2MrcmDomainMember, Rf2OwlExpressionMember, Rf2SimpleRefsetMember,
};
use crate::time::format_effective_time;
use crate::{Rf2Concept, Rf2Description, Rf2Relationship, SctId};

/// One exportable RF2 record.
///
/// Wraps the concrete component row types behind the uniform accessors the
/// row-selection rules need (`effective_time`, `active`, `is_published`,
/// `released`), plus [`columns`](ReleaseRow::columns) for writing the row in
/// its file's fixed column order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReleaseRow {
    /// A concept row.
    Concept(Rf2Concept),
    /// A description or text definition row.
    Description(Rf2Description),
    /// A relationship row.
    Relationship(Rf2Relationship),
    /// A simple reference set member row.
    SimpleMember(Rf2SimpleRefsetMember),
    /// A language reference set member row.
    LanguageMember(Rf2LanguageRefsetMember),
    /// An OWL expression reference set member row.
    OwlMember(Rf2OwlExpressionMember),
    /// An MRCM domain reference set member row.
    MrcmDomainMember(Rf2MrcmDomainMember),
}

impl ReleaseRow {
    /// Returns the row's effective time; `None` for unpublished edits.
    pub fn effective_time(&self) -> Option<u32> {
        match self {
            Self::Concept(c) => c.effective_time,
            Self::Description(d) => d.effective_time,
            Self::Relationship(r) => r.effective_time,
            Self::SimpleMember(m) => m.effective_time,
            Self::LanguageMember(m) => m.effective_time,
            Self::OwlMember(m) => m.effective_time,
            Self::MrcmDomainMember(m) => m.effective_time,
        }
    }

    /// Returns true if the row carries a published effective time.
    pub fn is_published(&self) -> bool {
        self.effective_time().is_some()
    }

    /// Returns the row's active flag.
    pub fn active(&self) -> bool {
        match self {
            Self::Concept(c) => c.active,
            Self::Description(d) => d.active,
            Self::Relationship(r) => r.active,
            Self::SimpleMember(m) => m.active,
            Self::LanguageMember(m) => m.active,
            Self::OwlMember(m) => m.active,
            Self::MrcmDomainMember(m) => m.active,
        }
    }

    /// Returns the row's module.
    pub fn module_id(&self) -> SctId {
        match self {
            Self::Concept(c) => c.module_id,
            Self::Description(d) => d.module_id,
            Self::Relationship(r) => r.module_id,
            Self::SimpleMember(m) => m.module_id,
            Self::LanguageMember(m) => m.module_id,
            Self::OwlMember(m) => m.module_id,
            Self::MrcmDomainMember(m) => m.module_id,
        }
    }

    /// Returns the persisted released flag.
    ///
    /// Not derived from `effective_time`: the two are independent, and
    /// substituting a display effective time must not change this.
    pub fn released(&self) -> bool {
        match self {
            Self::Concept(c) => c.released,
            Self::Description(d) => d.released,
            Self::Relationship(r) => r.released,
            Self::SimpleMember(m) => m.released,
            Self::LanguageMember(m) => m.released,
            Self::OwlMember(m) => m.released,
            Self::MrcmDomainMember(m) => m.released,
        }
    }

    /// Returns a copy of this row with the displayed effective time replaced.
    ///
    /// The `released` flag is left untouched; this is the substitution used
    /// for transient effective times, which produce as-if-versioned output
    /// without marking anything as actually released.
    pub fn with_effective_time(&self, effective_time: Option<u32>) -> Self {
        let mut row = self.clone();
        match &mut row {
            Self::Concept(c) => c.effective_time = effective_time,
            Self::Description(d) => d.effective_time = effective_time,
            Self::Relationship(r) => r.effective_time = effective_time,
            Self::SimpleMember(m) => m.effective_time = effective_time,
            Self::LanguageMember(m) => m.effective_time = effective_time,
            Self::OwlMember(m) => m.effective_time = effective_time,
            Self::MrcmDomainMember(m) => m.effective_time = effective_time,
        }
        row
    }

    /// Renders the row's RF2 column values in their fixed order.
    ///
    /// The first four columns are always id, effectiveTime, active and
    /// moduleId; the remainder are component-type specific.
    pub fn columns(&self) -> Vec<String> {
        match self {
            Self::Concept(c) => vec![
                c.id.to_string(),
                format_effective_time(c.effective_time),
                active_column(c.active),
                c.module_id.to_string(),
                c.definition_status_id.to_string(),
            ],
            Self::Description(d) => vec![
                d.id.to_string(),
                format_effective_time(d.effective_time),
                active_column(d.active),
                d.module_id.to_string(),
                d.concept_id.to_string(),
                d.language_code.clone(),
                d.type_id.to_string(),
                d.term.clone(),
                d.case_significance_id.to_string(),
            ],
            Self::Relationship(r) => vec![
                r.id.to_string(),
                format_effective_time(r.effective_time),
                active_column(r.active),
                r.module_id.to_string(),
                r.source_id.to_string(),
                r.destination_id.to_string(),
                r.relationship_group.to_string(),
                r.type_id.to_string(),
                r.characteristic_type_id.to_string(),
                r.modifier_id.to_string(),
            ],
            Self::SimpleMember(m) => vec![
                m.id.to_string(),
                format_effective_time(m.effective_time),
                active_column(m.active),
                m.module_id.to_string(),
                m.refset_id.to_string(),
                m.referenced_component_id.to_string(),
            ],
            Self::LanguageMember(m) => vec![
                m.id.to_string(),
                format_effective_time(m.effective_time),
                active_column(m.active),
                m.module_id.to_string(),
                m.refset_id.to_string(),
                m.referenced_component_id.to_string(),
                m.acceptability_id.to_string(),
            ],
            Self::OwlMember(m) => vec![
                m.id.to_string(),
                format_effective_time(m.effective_time),
                active_column(m.active),
                m.module_id.to_string(),
                m.refset_id.to_string(),
                m.referenced_component_id.to_string(),
                m.owl_expression.clone(),
            ],
            Self::MrcmDomainMember(m) => vec![
                m.id.to_string(),
                format_effective_time(m.effective_time),
                active_column(m.active),
                m.module_id.to_string(),
                m.refset_id.to_string(),
                m.referenced_component_id.to_string(),
                m.domain_constraint.clone(),
                m.parent_domain.map(|id| id.to_string()).unwrap_or_default(),
                m.proximal_primitive_constraint.clone(),
                m.proximal_primitive_refinement.clone().unwrap_or_default(),
                m.domain_template_for_precoordination.clone(),
                m.domain_template_for_postcoordination.clone(),
                m.guide_url.clone().unwrap_or_default(),
            ],
        }
    }
}

fn active_column(active: bool) -> String {
    if active { "1" } else { "0" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{well_known, CharacteristicType, DefinitionStatus, ModifierType};

    fn make_concept_row(effective_time: Option<u32>, released: bool) -> ReleaseRow {
        ReleaseRow::Concept(Rf2Concept {
            id: 404684003,
            effective_time,
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            definition_status_id: DefinitionStatus::PRIMITIVE_ID,
            released,
        })
    }

    #[test]
    fn test_concept_columns() {
        let row = make_concept_row(Some(20020131), true);
        assert_eq!(
            row.columns(),
            vec![
                "404684003",
                "20020131",
                "1",
                "900000000000207008",
                "900000000000074008",
            ]
        );
    }

    #[test]
    fn test_unpublished_row_renders_empty_effective_time() {
        let row = make_concept_row(None, false);
        assert_eq!(row.columns()[1], "");
        assert!(!row.is_published());
    }

    #[test]
    fn test_with_effective_time_preserves_released() {
        let row = make_concept_row(None, false);
        let substituted = row.with_effective_time(Some(20170301));

        assert_eq!(substituted.effective_time(), Some(20170301));
        assert!(!substituted.released());
        // Original is untouched.
        assert_eq!(row.effective_time(), None);
    }

    #[test]
    fn test_relationship_columns_order() {
        let row = ReleaseRow::Relationship(Rf2Relationship {
            id: 100000028,
            effective_time: Some(20170301),
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            source_id: 64572001,
            destination_id: 408731000,
            relationship_group: 0,
            type_id: well_known::IS_A,
            characteristic_type_id: CharacteristicType::STATED_ID,
            modifier_id: ModifierType::EXISTENTIAL_ID,
            released: true,
        });

        let columns = row.columns();
        assert_eq!(columns.len(), 10);
        assert_eq!(columns[4], "64572001");
        assert_eq!(columns[5], "408731000");
        assert_eq!(columns[8], CharacteristicType::STATED_ID.to_string());
    }

    #[test]
    fn test_mrcm_member_has_thirteen_columns() {
        let row = ReleaseRow::MrcmDomainMember(Rf2MrcmDomainMember {
            id: uuid::Uuid::new_v4(),
            effective_time: Some(20200101),
            active: true,
            module_id: well_known::MODEL_COMPONENT_MODULE,
            refset_id: well_known::MRCM_DOMAIN_REFSET,
            referenced_component_id: well_known::CLINICAL_FINDING,
            domain_constraint: "<< 404684003 |Clinical finding|".to_string(),
            parent_domain: None,
            proximal_primitive_constraint: "<< 404684003".to_string(),
            proximal_primitive_refinement: None,
            domain_template_for_precoordination: "[[+id]]".to_string(),
            domain_template_for_postcoordination: "[[+scg]]".to_string(),
            guide_url: None,
            released: true,
        });

        let columns = row.columns();
        assert_eq!(columns.len(), 13);
        assert_eq!(columns[7], ""); // no parent domain
    }
}
