//! In-memory release store.
//!
//! Holds the full row set of one branch and feeds the two consumers of this
//! crate: the hierarchy snapshot builder (concept ids + IS-A edges) and the
//! export row selector (the release row stream, the description-language
//! lookup and the language inventory for placeholder files).
//!
//! The store is mutable while loading and read-only afterwards; concurrent
//! exports share it behind an `Arc` without further locking.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

#[cfg(feature = "parallel")]
use std::fs::File;
#[cfg(feature = "parallel")]
use std::io::{BufRead, BufReader};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use snomed_rf2_types::refset::{
    Rf2LanguageRefsetMember, Rf2MrcmDomainMember, Rf2OwlExpressionMember, Rf2SimpleRefsetMember,
};
use snomed_rf2_types::{ReleaseRow, Rf2Concept, Rf2Description, Rf2Relationship, SctId};
use snomed_taxonomy::{IsAEdge, TaxonomySource};

#[cfg(feature = "parallel")]
use crate::parser::parse;
use crate::parser::Rf2Parser;
use crate::selector::DescriptionLanguageLookup;
use crate::types::{ImportConfig, ReleaseResult};

/// In-memory store for the rows of one branch.
///
/// # Example
///
/// ```ignore
/// use snomed_rf2_release::{ImportConfig, ReleaseStore};
///
/// let mut store = ReleaseStore::new();
/// store.load_concepts("sct2_Concept_Snapshot_INT_20170731.txt", ImportConfig::default())?;
/// store.load_relationships("sct2_Relationship_Snapshot_INT_20170731.txt", ImportConfig::default())?;
///
/// let snapshot = snomed_taxonomy::HierarchySnapshot::from_source(&store)?;
/// ```
#[derive(Default)]
pub struct ReleaseStore {
    /// Concepts indexed by SCTID.
    concepts: HashMap<SctId, Rf2Concept>,
    /// Descriptions (and text definitions) indexed by description SCTID.
    descriptions: HashMap<SctId, Rf2Description>,
    /// Relationships indexed by SCTID.
    relationships: HashMap<SctId, Rf2Relationship>,
    /// Simple reference set members.
    simple_members: Vec<Rf2SimpleRefsetMember>,
    /// Language reference set members.
    language_members: Vec<Rf2LanguageRefsetMember>,
    /// OWL expression reference set members.
    owl_members: Vec<Rf2OwlExpressionMember>,
    /// MRCM domain reference set members.
    mrcm_domain_members: Vec<Rf2MrcmDomainMember>,
}

impl std::fmt::Debug for ReleaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseStore")
            .field("concepts", &self.concepts.len())
            .field("descriptions", &self.descriptions.len())
            .field("relationships", &self.relationships.len())
            .field("simple_members", &self.simple_members.len())
            .field("language_members", &self.language_members.len())
            .field("owl_members", &self.owl_members.len())
            .field("mrcm_domain_members", &self.mrcm_domain_members.len())
            .finish()
    }
}

impl ReleaseStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Loading

    /// Loads concepts from an RF2 file.
    pub fn load_concepts<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: ImportConfig,
    ) -> ReleaseResult<usize> {
        let parser = Rf2Parser::<_, Rf2Concept>::from_path(path, config)?;
        let mut count = 0;

        for concept in parser.flatten() {
            self.concepts.insert(concept.id, concept);
            count += 1;
        }

        Ok(count)
    }

    /// Loads descriptions (or text definitions) from an RF2 file.
    pub fn load_descriptions<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: ImportConfig,
    ) -> ReleaseResult<usize> {
        let parser = Rf2Parser::<_, Rf2Description>::from_path(path, config)?;
        let mut count = 0;

        for description in parser.flatten() {
            self.descriptions.insert(description.id, description);
            count += 1;
        }

        Ok(count)
    }

    /// Loads relationships from an RF2 file.
    pub fn load_relationships<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: ImportConfig,
    ) -> ReleaseResult<usize> {
        let parser = Rf2Parser::<_, Rf2Relationship>::from_path(path, config)?;
        let mut count = 0;

        for relationship in parser.flatten() {
            self.relationships.insert(relationship.id, relationship);
            count += 1;
        }

        Ok(count)
    }

    /// Loads language reference set members from an RF2 file.
    pub fn load_language_members<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: ImportConfig,
    ) -> ReleaseResult<usize> {
        let parser = Rf2Parser::<_, Rf2LanguageRefsetMember>::from_path(path, config)?;
        let before = self.language_members.len();
        self.language_members.extend(parser.flatten());
        Ok(self.language_members.len() - before)
    }

    /// Loads simple reference set members from an RF2 file.
    pub fn load_simple_members<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: ImportConfig,
    ) -> ReleaseResult<usize> {
        let parser = Rf2Parser::<_, Rf2SimpleRefsetMember>::from_path(path, config)?;
        let before = self.simple_members.len();
        self.simple_members.extend(parser.flatten());
        Ok(self.simple_members.len() - before)
    }

    /// Loads OWL expression reference set members from an RF2 file.
    pub fn load_owl_members<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: ImportConfig,
    ) -> ReleaseResult<usize> {
        let parser = Rf2Parser::<_, Rf2OwlExpressionMember>::from_path(path, config)?;
        let before = self.owl_members.len();
        self.owl_members.extend(parser.flatten());
        Ok(self.owl_members.len() - before)
    }

    /// Loads MRCM domain reference set members from an RF2 file.
    pub fn load_mrcm_domain_members<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: ImportConfig,
    ) -> ReleaseResult<usize> {
        let parser = Rf2Parser::<_, Rf2MrcmDomainMember>::from_path(path, config)?;
        let before = self.mrcm_domain_members.len();
        self.mrcm_domain_members.extend(parser.flatten());
        Ok(self.mrcm_domain_members.len() - before)
    }

    /// Loads the three core files using parallel line parsing.
    ///
    /// Reads all lines into memory and parses them with rayon; significantly
    /// faster for full releases on multi-core machines.
    #[cfg(feature = "parallel")]
    pub fn load_core_parallel<P: AsRef<Path>>(
        &mut self,
        concept_path: P,
        description_path: P,
        relationship_path: P,
        config: &ImportConfig,
    ) -> ReleaseResult<(usize, usize, usize)> {
        let concept_lines = read_lines_skip_header(concept_path)?;
        let description_lines = read_lines_skip_header(description_path)?;
        let relationship_lines = read_lines_skip_header(relationship_path)?;

        let ((concepts, descriptions), relationships) = rayon::join(
            || {
                rayon::join(
                    || {
                        concept_lines
                            .par_iter()
                            .filter_map(|line| parse_concept_line(line, config))
                            .collect::<Vec<_>>()
                    },
                    || {
                        description_lines
                            .par_iter()
                            .filter_map(|line| parse_description_line(line, config))
                            .collect::<Vec<_>>()
                    },
                )
            },
            || {
                relationship_lines
                    .par_iter()
                    .filter_map(|line| parse_relationship_line(line, config))
                    .collect::<Vec<_>>()
            },
        );

        let counts = (concepts.len(), descriptions.len(), relationships.len());

        self.insert_concepts(concepts);
        self.insert_descriptions(descriptions);
        self.insert_relationships(relationships);

        Ok(counts)
    }

    // Bulk insertion

    /// Bulk inserts concepts.
    pub fn insert_concepts(&mut self, concepts: impl IntoIterator<Item = Rf2Concept>) {
        for concept in concepts {
            self.concepts.insert(concept.id, concept);
        }
    }

    /// Bulk inserts descriptions.
    pub fn insert_descriptions(&mut self, descriptions: impl IntoIterator<Item = Rf2Description>) {
        for description in descriptions {
            self.descriptions.insert(description.id, description);
        }
    }

    /// Bulk inserts relationships.
    pub fn insert_relationships(
        &mut self,
        relationships: impl IntoIterator<Item = Rf2Relationship>,
    ) {
        for relationship in relationships {
            self.relationships.insert(relationship.id, relationship);
        }
    }

    /// Bulk inserts simple reference set members.
    pub fn insert_simple_members(
        &mut self,
        members: impl IntoIterator<Item = Rf2SimpleRefsetMember>,
    ) {
        self.simple_members.extend(members);
    }

    /// Bulk inserts language reference set members.
    pub fn insert_language_members(
        &mut self,
        members: impl IntoIterator<Item = Rf2LanguageRefsetMember>,
    ) {
        self.language_members.extend(members);
    }

    /// Bulk inserts OWL expression reference set members.
    pub fn insert_owl_members(
        &mut self,
        members: impl IntoIterator<Item = Rf2OwlExpressionMember>,
    ) {
        self.owl_members.extend(members);
    }

    /// Bulk inserts MRCM domain reference set members.
    pub fn insert_mrcm_domain_members(
        &mut self,
        members: impl IntoIterator<Item = Rf2MrcmDomainMember>,
    ) {
        self.mrcm_domain_members.extend(members);
    }

    // Queries

    /// Gets a concept by its ID.
    pub fn get_concept(&self, id: SctId) -> Option<&Rf2Concept> {
        self.concepts.get(&id)
    }

    /// Gets a description by its ID.
    pub fn get_description(&self, id: SctId) -> Option<&Rf2Description> {
        self.descriptions.get(&id)
    }

    /// Returns the number of concepts in the store.
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Returns the number of descriptions in the store.
    pub fn description_count(&self) -> usize {
        self.descriptions.len()
    }

    /// Returns the number of relationships in the store.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Returns the number of reference set members of all types.
    pub fn member_count(&self) -> usize {
        self.simple_members.len()
            + self.language_members.len()
            + self.owl_members.len()
            + self.mrcm_domain_members.len()
    }

    /// Returns the language codes present in the dataset, sorted.
    ///
    /// Drives the per-language placeholder files of an export.
    pub fn language_codes(&self) -> BTreeSet<String> {
        self.descriptions
            .values()
            .map(|description| description.language_code.clone())
            .collect()
    }

    /// Returns the full release row stream for an export.
    ///
    /// One row per component, in store order: concepts, descriptions,
    /// relationships, then members. This is the latest-version view the
    /// store holds, so SNAPSHOT exports can consume it directly.
    pub fn release_rows(&self) -> impl Iterator<Item = ReleaseRow> + '_ {
        self.concepts
            .values()
            .cloned()
            .map(ReleaseRow::Concept)
            .chain(
                self.descriptions
                    .values()
                    .cloned()
                    .map(ReleaseRow::Description),
            )
            .chain(
                self.relationships
                    .values()
                    .cloned()
                    .map(ReleaseRow::Relationship),
            )
            .chain(
                self.simple_members
                    .iter()
                    .cloned()
                    .map(ReleaseRow::SimpleMember),
            )
            .chain(
                self.language_members
                    .iter()
                    .cloned()
                    .map(ReleaseRow::LanguageMember),
            )
            .chain(self.owl_members.iter().cloned().map(ReleaseRow::OwlMember))
            .chain(
                self.mrcm_domain_members
                    .iter()
                    .cloned()
                    .map(ReleaseRow::MrcmDomainMember),
            )
    }
}

impl TaxonomySource for ReleaseStore {
    fn active_concept_ids(&self) -> Vec<SctId> {
        self.concepts
            .values()
            .filter(|concept| concept.active)
            .map(|concept| concept.id)
            .collect()
    }

    /// The inferred view of the taxonomy: active, inferred IS-A edges.
    fn active_is_a_edges(&self) -> Vec<IsAEdge> {
        self.relationships
            .values()
            .filter(|relationship| {
                relationship.active && relationship.is_is_a() && relationship.is_inferred()
            })
            .map(|relationship| {
                IsAEdge::new(relationship.source_id, relationship.destination_id)
            })
            .collect()
    }
}

impl DescriptionLanguageLookup for ReleaseStore {
    fn language_of_description(&self, description_id: SctId) -> Option<String> {
        self.descriptions
            .get(&description_id)
            .map(|description| description.language_code.clone())
    }
}

// Parallel parsing helpers

/// Reads all lines from a file, skipping the header row.
#[cfg(feature = "parallel")]
fn read_lines_skip_header<P: AsRef<Path>>(path: P) -> ReleaseResult<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines: Vec<String> = reader
        .lines()
        .skip(1)
        .filter_map(Result::ok)
        .filter(|line| !line.is_empty())
        .collect();
    Ok(lines)
}

/// Parses a single concept line.
#[cfg(feature = "parallel")]
fn parse_concept_line(line: &str, config: &ImportConfig) -> Option<Rf2Concept> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 5 {
        return None;
    }

    let active = parse::boolean(fields[2]).ok()?;
    if config.active_only && !active {
        return None;
    }

    let effective_time = parse::effective_time(fields[1]).ok()?;
    Some(Rf2Concept {
        id: parse::sctid(fields[0]).ok()?,
        effective_time,
        active,
        module_id: parse::sctid(fields[3]).ok()?,
        definition_status_id: parse::sctid(fields[4]).ok()?,
        released: effective_time.is_some(),
    })
}

/// Parses a single description line.
#[cfg(feature = "parallel")]
fn parse_description_line(line: &str, config: &ImportConfig) -> Option<Rf2Description> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 9 {
        return None;
    }

    let active = parse::boolean(fields[2]).ok()?;
    if config.active_only && !active {
        return None;
    }

    let effective_time = parse::effective_time(fields[1]).ok()?;
    Some(Rf2Description {
        id: parse::sctid(fields[0]).ok()?,
        effective_time,
        active,
        module_id: parse::sctid(fields[3]).ok()?,
        concept_id: parse::sctid(fields[4]).ok()?,
        language_code: fields[5].to_string(),
        type_id: parse::sctid(fields[6]).ok()?,
        term: fields[7].to_string(),
        case_significance_id: parse::sctid(fields[8]).ok()?,
        released: effective_time.is_some(),
    })
}

/// Parses a single relationship line.
#[cfg(feature = "parallel")]
fn parse_relationship_line(line: &str, config: &ImportConfig) -> Option<Rf2Relationship> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 10 {
        return None;
    }

    let active = parse::boolean(fields[2]).ok()?;
    if config.active_only && !active {
        return None;
    }

    let effective_time = parse::effective_time(fields[1]).ok()?;
    Some(Rf2Relationship {
        id: parse::sctid(fields[0]).ok()?,
        effective_time,
        active,
        module_id: parse::sctid(fields[3]).ok()?,
        source_id: parse::sctid(fields[4]).ok()?,
        destination_id: parse::sctid(fields[5]).ok()?,
        relationship_group: parse::integer(fields[6]).ok()?,
        type_id: parse::sctid(fields[7]).ok()?,
        characteristic_type_id: parse::sctid(fields[8]).ok()?,
        modifier_id: parse::sctid(fields[9]).ok()?,
        released: effective_time.is_some(),
    })
}
