//! RF2 record parsing for the component row types.
//!
//! Implements [`Rf2Record`] for each importable row. A row read back from a
//! release file is released exactly when it carries an effective time; the
//! persisted flag and the display value only diverge inside an editing
//! session, which a file import never observes.

use csv::StringRecord;

use snomed_rf2_types::refset::{
    Rf2LanguageRefsetMember, Rf2MrcmDomainMember, Rf2OwlExpressionMember, Rf2SimpleRefsetMember,
};
use snomed_rf2_types::{Rf2Concept, Rf2Description, Rf2Relationship};

use crate::parser::{parse, Rf2Record};
use crate::types::{ImportConfig, ReleaseResult};

impl Rf2Record for Rf2Concept {
    const EXPECTED_COLUMNS: &'static [&'static str] =
        &["id", "effectiveTime", "active", "moduleId", "definitionStatusId"];

    fn from_record(record: &StringRecord) -> ReleaseResult<Self> {
        let effective_time = parse::effective_time(record.get(1).unwrap_or(""))?;
        Ok(Rf2Concept {
            id: parse::sctid(record.get(0).unwrap_or(""))?,
            effective_time,
            active: parse::boolean(record.get(2).unwrap_or(""))?,
            module_id: parse::sctid(record.get(3).unwrap_or(""))?,
            definition_status_id: parse::sctid(record.get(4).unwrap_or(""))?,
            released: effective_time.is_some(),
        })
    }

    fn passes_filter(&self, config: &ImportConfig) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for Rf2Description {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
        "id",
        "effectiveTime",
        "active",
        "moduleId",
        "conceptId",
        "languageCode",
        "typeId",
        "term",
        "caseSignificanceId",
    ];

    fn from_record(record: &StringRecord) -> ReleaseResult<Self> {
        let effective_time = parse::effective_time(record.get(1).unwrap_or(""))?;
        Ok(Rf2Description {
            id: parse::sctid(record.get(0).unwrap_or(""))?,
            effective_time,
            active: parse::boolean(record.get(2).unwrap_or(""))?,
            module_id: parse::sctid(record.get(3).unwrap_or(""))?,
            concept_id: parse::sctid(record.get(4).unwrap_or(""))?,
            language_code: record.get(5).unwrap_or("").to_string(),
            type_id: parse::sctid(record.get(6).unwrap_or(""))?,
            term: record.get(7).unwrap_or("").to_string(),
            case_significance_id: parse::sctid(record.get(8).unwrap_or(""))?,
            released: effective_time.is_some(),
        })
    }

    fn passes_filter(&self, config: &ImportConfig) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for Rf2Relationship {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
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
    ];

    fn from_record(record: &StringRecord) -> ReleaseResult<Self> {
        let effective_time = parse::effective_time(record.get(1).unwrap_or(""))?;
        Ok(Rf2Relationship {
            id: parse::sctid(record.get(0).unwrap_or(""))?,
            effective_time,
            active: parse::boolean(record.get(2).unwrap_or(""))?,
            module_id: parse::sctid(record.get(3).unwrap_or(""))?,
            source_id: parse::sctid(record.get(4).unwrap_or(""))?,
            destination_id: parse::sctid(record.get(5).unwrap_or(""))?,
            relationship_group: parse::integer(record.get(6).unwrap_or(""))?,
            type_id: parse::sctid(record.get(7).unwrap_or(""))?,
            characteristic_type_id: parse::sctid(record.get(8).unwrap_or(""))?,
            modifier_id: parse::sctid(record.get(9).unwrap_or(""))?,
            released: effective_time.is_some(),
        })
    }

    fn passes_filter(&self, config: &ImportConfig) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for Rf2SimpleRefsetMember {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
        "id",
        "effectiveTime",
        "active",
        "moduleId",
        "refsetId",
        "referencedComponentId",
    ];

    fn from_record(record: &StringRecord) -> ReleaseResult<Self> {
        let effective_time = parse::effective_time(record.get(1).unwrap_or(""))?;
        Ok(Rf2SimpleRefsetMember {
            id: parse::member_id(record.get(0).unwrap_or(""))?,
            effective_time,
            active: parse::boolean(record.get(2).unwrap_or(""))?,
            module_id: parse::sctid(record.get(3).unwrap_or(""))?,
            refset_id: parse::sctid(record.get(4).unwrap_or(""))?,
            referenced_component_id: parse::sctid(record.get(5).unwrap_or(""))?,
            released: effective_time.is_some(),
        })
    }

    fn passes_filter(&self, config: &ImportConfig) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for Rf2LanguageRefsetMember {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
        "id",
        "effectiveTime",
        "active",
        "moduleId",
        "refsetId",
        "referencedComponentId",
        "acceptabilityId",
    ];

    fn from_record(record: &StringRecord) -> ReleaseResult<Self> {
        let effective_time = parse::effective_time(record.get(1).unwrap_or(""))?;
        Ok(Rf2LanguageRefsetMember {
            id: parse::member_id(record.get(0).unwrap_or(""))?,
            effective_time,
            active: parse::boolean(record.get(2).unwrap_or(""))?,
            module_id: parse::sctid(record.get(3).unwrap_or(""))?,
            refset_id: parse::sctid(record.get(4).unwrap_or(""))?,
            referenced_component_id: parse::sctid(record.get(5).unwrap_or(""))?,
            acceptability_id: parse::sctid(record.get(6).unwrap_or(""))?,
            released: effective_time.is_some(),
        })
    }

    fn passes_filter(&self, config: &ImportConfig) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for Rf2OwlExpressionMember {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
        "id",
        "effectiveTime",
        "active",
        "moduleId",
        "refsetId",
        "referencedComponentId",
        "owlExpression",
    ];

    fn from_record(record: &StringRecord) -> ReleaseResult<Self> {
        let effective_time = parse::effective_time(record.get(1).unwrap_or(""))?;
        Ok(Rf2OwlExpressionMember {
            id: parse::member_id(record.get(0).unwrap_or(""))?,
            effective_time,
            active: parse::boolean(record.get(2).unwrap_or(""))?,
            module_id: parse::sctid(record.get(3).unwrap_or(""))?,
            refset_id: parse::sctid(record.get(4).unwrap_or(""))?,
            referenced_component_id: parse::sctid(record.get(5).unwrap_or(""))?,
            owl_expression: record.get(6).unwrap_or("").to_string(),
            released: effective_time.is_some(),
        })
    }

    fn passes_filter(&self, config: &ImportConfig) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for Rf2MrcmDomainMember {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
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
    ];

    fn from_record(record: &StringRecord) -> ReleaseResult<Self> {
        let effective_time = parse::effective_time(record.get(1).unwrap_or(""))?;
        Ok(Rf2MrcmDomainMember {
            id: parse::member_id(record.get(0).unwrap_or(""))?,
            effective_time,
            active: parse::boolean(record.get(2).unwrap_or(""))?,
            module_id: parse::sctid(record.get(3).unwrap_or(""))?,
            refset_id: parse::sctid(record.get(4).unwrap_or(""))?,
            referenced_component_id: parse::sctid(record.get(5).unwrap_or(""))?,
            domain_constraint: record.get(6).unwrap_or("").to_string(),
            parent_domain: parse::optional_sctid(record.get(7).unwrap_or(""))?,
            proximal_primitive_constraint: record.get(8).unwrap_or("").to_string(),
            proximal_primitive_refinement: parse::optional_string(record.get(9).unwrap_or("")),
            domain_template_for_precoordination: record.get(10).unwrap_or("").to_string(),
            domain_template_for_postcoordination: record.get(11).unwrap_or("").to_string(),
            guide_url: parse::optional_string(record.get(12).unwrap_or("")),
            released: effective_time.is_some(),
        })
    }

    fn passes_filter(&self, config: &ImportConfig) -> bool {
        !config.active_only || self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Rf2Parser;

    fn make_record(fields: &[&str]) -> StringRecord {
        let mut record = StringRecord::new();
        for field in fields {
            record.push_field(field);
        }
        record
    }

    #[test]
    fn test_parse_concept_record() {
        let record = make_record(&[
            "404684003",
            "20020131",
            "1",
            "900000000000207008",
            "900000000000074008",
        ]);

        let concept = Rf2Concept::from_record(&record).unwrap();
        assert_eq!(concept.id, 404684003);
        assert_eq!(concept.effective_time, Some(20020131));
        assert!(concept.active);
        assert!(concept.released);
    }

    #[test]
    fn test_parse_unpublished_concept_record() {
        let record = make_record(&["404684003", "", "1", "900000000000207008", "900000000000074008"]);

        let concept = Rf2Concept::from_record(&record).unwrap();
        assert_eq!(concept.effective_time, None);
        assert!(!concept.released);
    }

    #[test]
    fn test_parse_description_record() {
        let record = make_record(&[
            "754786011",
            "20020131",
            "1",
            "900000000000207008",
            "73211009",
            "en",
            "900000000000013009",
            "Diabetes mellitus",
            "900000000000448009",
        ]);

        let description = Rf2Description::from_record(&record).unwrap();
        assert_eq!(description.concept_id, 73211009);
        assert_eq!(description.language_code, "en");
        assert!(description.is_synonym());
    }

    #[test]
    fn test_parse_language_member_record() {
        let record = make_record(&[
            "800aa109-431f-4407-a431-6fe65e9db160",
            "20020131",
            "1",
            "900000000000207008",
            "900000000000509007",
            "754786011",
            "900000000000548007",
        ]);

        let member = Rf2LanguageRefsetMember::from_record(&record).unwrap();
        assert_eq!(member.referenced_component_id, 754786011);
        assert!(member.is_preferred());
    }

    #[test]
    fn test_parse_mrcm_domain_record_with_blank_optionals() {
        let record = make_record(&[
            "7181b671-c28f-4a0c-9bad-b1b610c06a7b",
            "20200309",
            "1",
            "900000000000012004",
            "723560006",
            "404684003",
            "<< 404684003 |Clinical finding (finding)|",
            "",
            "<< 404684003 |Clinical finding (finding)|",
            "",
            "[[+id]]",
            "[[+scg]]",
            "",
        ]);

        let member = Rf2MrcmDomainMember::from_record(&record).unwrap();
        assert_eq!(member.parent_domain, None);
        assert_eq!(member.proximal_primitive_refinement, None);
        assert_eq!(member.guide_url, None);
    }

    #[test]
    fn test_streaming_parse_with_bom_header() {
        let data = "\u{feff}id\teffectiveTime\tactive\tmoduleId\tdefinitionStatusId\n\
                    404684003\t20020131\t1\t900000000000207008\t900000000000074008\n\
                    73211009\t\t1\t900000000000207008\t900000000000073002\n";

        let parser: Rf2Parser<_, Rf2Concept> =
            Rf2Parser::from_reader(data.as_bytes(), ImportConfig::default()).unwrap();
        let concepts: Vec<Rf2Concept> = parser.flatten().collect();

        assert_eq!(concepts.len(), 2);
        assert!(!concepts[1].released);
    }

    #[test]
    fn test_header_mismatch_is_rejected() {
        let data = "id\teffectiveTime\tactive\tmoduleId\twrongColumn\n";

        let result: ReleaseResult<Rf2Parser<_, Rf2Concept>> =
            Rf2Parser::from_reader(data.as_bytes(), ImportConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_active_only_filter() {
        let data = "id\teffectiveTime\tactive\tmoduleId\tdefinitionStatusId\n\
                    404684003\t20020131\t1\t900000000000207008\t900000000000074008\n\
                    73211009\t20020131\t0\t900000000000207008\t900000000000073002\n";

        let config = ImportConfig {
            active_only: true,
            ..ImportConfig::default()
        };
        let parser: Rf2Parser<_, Rf2Concept> =
            Rf2Parser::from_reader(data.as_bytes(), config).unwrap();
        let concepts: Vec<Rf2Concept> = parser.flatten().collect();

        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].id, 404684003);
    }
}
