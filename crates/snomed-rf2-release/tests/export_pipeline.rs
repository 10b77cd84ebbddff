//! End-to-end export tests: store -> row selection -> archive.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use uuid::Uuid;

use snomed_rf2_release::{
    select_rows, CancellationFlag, ExportConfiguration, FileKey, ReleaseArchiveBuilder,
    ReleaseStore, ReleaseType,
};
use snomed_rf2_types::refset::Rf2LanguageRefsetMember;
use snomed_rf2_types::{
    well_known, Acceptability, CharacteristicType, DefinitionStatus, DescriptionType,
    ModifierType, ReleaseRow, Rf2Concept, Rf2Description, Rf2Relationship, SctId,
};

const DISEASE: SctId = 64572001;
const TEMPORAL_CONTEXT: SctId = 410510008;
const FINDING_CONTEXT: SctId = 408729009;

fn relationship(
    id: SctId,
    source_id: SctId,
    characteristic_type_id: SctId,
    effective_time: Option<u32>,
) -> Rf2Relationship {
    Rf2Relationship {
        id,
        effective_time,
        active: true,
        module_id: well_known::SNOMED_CT_CORE_MODULE,
        source_id,
        destination_id: TEMPORAL_CONTEXT,
        relationship_group: 0,
        type_id: FINDING_CONTEXT,
        characteristic_type_id,
        modifier_id: ModifierType::EXISTENTIAL_ID,
        released: effective_time.is_some(),
    }
}

fn description(id: SctId, language_code: &str, effective_time: Option<u32>) -> Rf2Description {
    Rf2Description {
        id,
        effective_time,
        active: true,
        module_id: well_known::SNOMED_CT_CORE_MODULE,
        concept_id: DISEASE,
        language_code: language_code.to_string(),
        type_id: DescriptionType::SYNONYM_ID,
        term: format!("Term {id}"),
        case_significance_id: 900000000000448009,
        released: effective_time.is_some(),
    }
}

fn language_member(description_id: SctId, refset_id: SctId) -> Rf2LanguageRefsetMember {
    Rf2LanguageRefsetMember {
        id: Uuid::new_v4(),
        effective_time: Some(20170301),
        active: true,
        module_id: well_known::SNOMED_CT_CORE_MODULE,
        refset_id,
        referenced_component_id: description_id,
        acceptability_id: Acceptability::ACCEPTABLE_ID,
        released: true,
    }
}

fn export_to_archive(
    store: &ReleaseStore,
    config: &ExportConfiguration,
    dir: &Path,
    name: &str,
) -> BTreeMap<String, String> {
    let mut grouped: BTreeMap<FileKey, Vec<ReleaseRow>> = BTreeMap::new();
    for (key, row) in
        select_rows(store.release_rows(), config, store, CancellationFlag::new()).unwrap()
    {
        grouped.entry(key).or_default().push(row);
    }

    let archive = ReleaseArchiveBuilder::new(dir, name)
        .write(config, &grouped, &store.language_codes())
        .unwrap();

    let file = std::fs::File::open(archive).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let mut contents = BTreeMap::new();
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).unwrap();
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        contents.insert(entry.name().to_string(), text);
    }
    contents
}

fn lines_of<'a>(contents: &'a BTreeMap<String, String>, suffix: &str) -> Vec<&'a str> {
    let (_, text) = contents
        .iter()
        .find(|(name, _)| name.ends_with(suffix))
        .unwrap_or_else(|| panic!("no archive entry ending in {suffix}"));
    text.lines().skip(1).collect()
}

#[test]
fn characteristic_types_route_to_their_files() {
    let mut store = ReleaseStore::new();
    store.insert_relationships([
        relationship(1001, DISEASE, CharacteristicType::STATED_ID, Some(20170301)),
        relationship(1002, DISEASE, CharacteristicType::INFERRED_ID, Some(20170301)),
        relationship(1003, DISEASE, CharacteristicType::ADDITIONAL_ID, Some(20170301)),
    ]);

    let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN")
        .with_effective_time_range(20170301, 20170301)
        .build();

    let dir = tempfile::tempdir().unwrap();
    let contents = export_to_archive(&store, &config, dir.path(), "routing");

    let stated = lines_of(&contents, "sct2_StatedRelationship_Delta.txt");
    assert_eq!(stated.len(), 1);
    assert!(stated[0].starts_with("1001\t"));

    let general = lines_of(&contents, "sct2_Relationship_Delta.txt");
    assert_eq!(general.len(), 2);
    assert!(general.iter().any(|line| line.starts_with("1002\t")));
    assert!(general.iter().any(|line| line.starts_with("1003\t")));
}

#[test]
fn transient_effective_time_substitutes_unpublished_rows_only() {
    let mut store = ReleaseStore::new();
    store.insert_relationships([
        relationship(2001, DISEASE, CharacteristicType::STATED_ID, None),
        relationship(2002, DISEASE, CharacteristicType::STATED_ID, Some(20170301)),
    ]);

    let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN")
        .with_effective_time_range(20170301, 20170301)
        .with_include_unpublished(true)
        .with_transient_effective_time(20170301)
        .build();

    let dir = tempfile::tempdir().unwrap();
    let contents = export_to_archive(&store, &config, dir.path(), "transient");

    let stated = lines_of(&contents, "sct2_StatedRelationship_Delta.txt");
    assert_eq!(stated.len(), 2);
    for line in stated {
        let columns: Vec<&str> = line.split('\t').collect();
        assert_eq!(columns[1], "20170301");
    }
}

#[test]
fn unpublished_rows_are_absent_without_the_flag() {
    let mut store = ReleaseStore::new();
    store.insert_relationships([relationship(
        3001,
        DISEASE,
        CharacteristicType::STATED_ID,
        None,
    )]);

    let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN").build();

    let dir = tempfile::tempdir().unwrap();
    let contents = export_to_archive(&store, &config, dir.path(), "no_unpublished");

    assert!(!contents
        .keys()
        .any(|name| name.contains("StatedRelationship")));
}

#[test]
fn descriptions_and_language_members_route_per_language() {
    let mut store = ReleaseStore::new();
    store.insert_concepts([Rf2Concept {
        id: DISEASE,
        effective_time: Some(20170301),
        active: true,
        module_id: well_known::SNOMED_CT_CORE_MODULE,
        definition_status_id: DefinitionStatus::PRIMITIVE_ID,
        released: true,
    }]);
    store.insert_descriptions([
        description(4001, "en", Some(20170301)),
        description(4002, "da", Some(20170301)),
    ]);
    store.insert_language_members([
        language_member(4001, well_known::US_ENGLISH_LANG_REFSET),
        // A UK-acceptable member attached to the Danish description follows
        // the description's language, not the refset's metadata.
        language_member(4002, well_known::GB_ENGLISH_LANG_REFSET),
    ]);

    let config = ExportConfiguration::builder(ReleaseType::Delta, "MAIN")
        .with_effective_time_range(20170301, 20170301)
        .build();

    let dir = tempfile::tempdir().unwrap();
    let contents = export_to_archive(&store, &config, dir.path(), "per_language");

    let danish_descriptions = lines_of(&contents, "sct2_Description_Delta-da.txt");
    assert_eq!(danish_descriptions.len(), 1);
    assert!(danish_descriptions[0].starts_with("4002\t"));

    let english_descriptions = lines_of(&contents, "sct2_Description_Delta-en.txt");
    assert_eq!(english_descriptions.len(), 1);
    assert!(english_descriptions[0].starts_with("4001\t"));

    let danish_members = lines_of(&contents, "der2_cRefset_LanguageDelta-da.txt");
    assert_eq!(danish_members.len(), 1);
    assert!(danish_members[0].contains("\t4002\t"));

    let english_members = lines_of(&contents, "der2_cRefset_LanguageDelta-en.txt");
    assert_eq!(english_members.len(), 1);
    assert!(english_members[0].contains("\t4001\t"));
}

#[test]
fn zero_description_export_still_contains_description_family_files() {
    let mut store = ReleaseStore::new();
    store.insert_concepts([Rf2Concept {
        id: DISEASE,
        effective_time: Some(20170301),
        active: true,
        module_id: well_known::SNOMED_CT_CORE_MODULE,
        definition_status_id: DefinitionStatus::PRIMITIVE_ID,
        released: true,
    }]);

    let config = ExportConfiguration::builder(ReleaseType::Snapshot, "MAIN").build();

    let dir = tempfile::tempdir().unwrap();
    let contents = export_to_archive(&store, &config, dir.path(), "placeholders");

    for suffix in [
        "sct2_Description_Snapshot-en.txt",
        "sct2_TextDefinition_Snapshot-en.txt",
        "der2_cRefset_LanguageSnapshot-en.txt",
    ] {
        let lines = contents
            .iter()
            .find(|(name, _)| name.ends_with(suffix))
            .map(|(_, text)| text.lines().count())
            .unwrap_or_else(|| panic!("missing placeholder {suffix}"));
        assert_eq!(lines, 1, "{suffix} should be header-only");
    }
}
