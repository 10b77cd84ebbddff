//! Hierarchy snapshot building and closure queries.
//!
//! A [`HierarchySnapshot`] holds the IS-A graph of one branch as two
//! array-of-array adjacency matrices over dense internal indices. The build
//! runs two counting passes (count, then allocate exact-size arrays, then
//! fill) so no adjacency array is ever resized; with 300k+ concepts and 1M+
//! edges this is the hot path of every reindex.
//!
//! Unknown concepts are never errors on the query side: a concept absent from
//! the snapshot (inactive, or simply never indexed) has no parents, children,
//! ancestors or descendants. Callers that need an existence check use
//! [`HierarchySnapshot::contains`].

use std::collections::HashMap;
use std::collections::HashSet;

use snomed_rf2_types::SctId;

use crate::error::{InvalidEdge, MissingConcept, TaxonomyError, TaxonomyResult};

/// One IS-A edge: `source_id` is a subtype of `destination_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsAEdge {
    /// The subtype (subject) concept.
    pub source_id: SctId,
    /// The supertype (object) concept.
    pub destination_id: SctId,
}

impl IsAEdge {
    /// Creates an edge stating `source_id` IS-A `destination_id`.
    pub fn new(source_id: SctId, destination_id: SctId) -> Self {
        Self {
            source_id,
            destination_id,
        }
    }
}

/// A read-only provider of the two inputs a snapshot build needs.
///
/// The two scans are independent; [`HierarchySnapshot::from_source`] runs
/// them in parallel when the `parallel` feature is enabled.
pub trait TaxonomySource: Sync {
    /// All active concept ids on the branch.
    fn active_concept_ids(&self) -> Vec<SctId>;

    /// All active IS-A edges on the branch.
    fn active_is_a_edges(&self) -> Vec<IsAEdge>;
}

/// An immutable, densely indexed snapshot of one branch's IS-A hierarchy.
///
/// Internal indices (`0..N-1`) are assigned from the concept-id input order
/// at build time and are only meaningful within this snapshot. No method
/// mutates the adjacency after [`build`](HierarchySnapshot::build) returns,
/// so a snapshot can be shared freely between concurrent readers.
pub struct HierarchySnapshot {
    /// External concept id -> internal index.
    internal_ids: HashMap<SctId, u32>,
    /// Internal index -> external concept id.
    concept_ids: Vec<SctId>,
    /// Direct supertypes per internal index.
    super_types: Vec<Vec<u32>>,
    /// Direct subtypes per internal index.
    sub_types: Vec<Vec<u32>>,
    /// Internal indices with zero supertypes, ascending.
    roots: Vec<u32>,
}

impl HierarchySnapshot {
    /// Builds a snapshot from a concept set and its IS-A edges.
    ///
    /// Duplicate concept ids collapse to one node. Every edge referencing a
    /// concept outside the concept set is collected, and a non-empty
    /// collection fails the whole build with
    /// [`TaxonomyError::InvalidGraph`] before any snapshot is observable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGraph` listing every dangling edge.
    pub fn build(
        concept_ids: impl IntoIterator<Item = SctId>,
        edges: impl IntoIterator<Item = IsAEdge>,
    ) -> TaxonomyResult<Self> {
        let mut internal_ids: HashMap<SctId, u32> = HashMap::new();
        let mut ids: Vec<SctId> = Vec::new();

        for concept_id in concept_ids {
            if !internal_ids.contains_key(&concept_id) {
                internal_ids.insert(concept_id, ids.len() as u32);
                ids.push(concept_id);
            }
        }

        let concept_count = ids.len();
        let mut outgoing_histogram = vec![0u32; concept_count];
        let mut incoming_histogram = vec![0u32; concept_count];

        // First pass: resolve both ends of every edge once, counting the
        // adjacency sizes and collecting dangling references.
        let mut resolved_edges: Vec<(u32, u32)> = Vec::new();
        let mut issues: Vec<InvalidEdge> = Vec::new();

        for edge in edges {
            let source = internal_ids.get(&edge.source_id).copied();
            let destination = internal_ids.get(&edge.destination_id).copied();

            if source.is_none() {
                issues.push(InvalidEdge {
                    source_id: edge.source_id,
                    destination_id: edge.destination_id,
                    missing: MissingConcept::Source,
                });
            }
            if destination.is_none() {
                issues.push(InvalidEdge {
                    source_id: edge.source_id,
                    destination_id: edge.destination_id,
                    missing: MissingConcept::Destination,
                });
            }

            if let (Some(source), Some(destination)) = (source, destination) {
                outgoing_histogram[source as usize] += 1;
                incoming_histogram[destination as usize] += 1;
                resolved_edges.push((source, destination));
            }
        }

        if !issues.is_empty() {
            tracing::warn!(
                invalid_edges = issues.len(),
                "hierarchy build aborted, edges reference missing concepts"
            );
            return Err(TaxonomyError::InvalidGraph { issues });
        }

        // Second pass: allocate each adjacency array at its exact final size
        // and fill.
        let mut super_types: Vec<Vec<u32>> = outgoing_histogram
            .iter()
            .map(|&count| Vec::with_capacity(count as usize))
            .collect();
        let mut sub_types: Vec<Vec<u32>> = incoming_histogram
            .iter()
            .map(|&count| Vec::with_capacity(count as usize))
            .collect();

        for (source, destination) in resolved_edges {
            super_types[source as usize].push(destination);
            sub_types[destination as usize].push(source);
        }

        // Ascending by construction, which is what the binary search in
        // is_root relies on.
        let roots: Vec<u32> = (0..concept_count as u32)
            .filter(|&index| super_types[index as usize].is_empty())
            .collect();

        tracing::debug!(
            concepts = concept_count,
            roots = roots.len(),
            "hierarchy snapshot built"
        );

        Ok(Self {
            internal_ids,
            concept_ids: ids,
            super_types,
            sub_types,
            roots,
        })
    }

    /// Builds a snapshot by scanning a [`TaxonomySource`].
    ///
    /// With the `parallel` feature the concept-id scan and the edge scan run
    /// concurrently; they have no data dependency.
    #[cfg(feature = "parallel")]
    pub fn from_source<S: TaxonomySource>(source: &S) -> TaxonomyResult<Self> {
        let (concept_ids, edges) = rayon::join(
            || source.active_concept_ids(),
            || source.active_is_a_edges(),
        );
        Self::build(concept_ids, edges)
    }

    /// Builds a snapshot by scanning a [`TaxonomySource`].
    #[cfg(not(feature = "parallel"))]
    pub fn from_source<S: TaxonomySource>(source: &S) -> TaxonomyResult<Self> {
        Self::build(source.active_concept_ids(), source.active_is_a_edges())
    }

    /// Returns the number of concepts in the snapshot.
    pub fn concept_count(&self) -> usize {
        self.concept_ids.len()
    }

    /// Returns true if the concept is part of this snapshot.
    pub fn contains(&self, concept_id: SctId) -> bool {
        self.internal_ids.contains_key(&concept_id)
    }

    /// Returns an iterator over all concept ids in the snapshot.
    pub fn concept_ids(&self) -> impl Iterator<Item = SctId> + '_ {
        self.concept_ids.iter().copied()
    }

    /// Returns the direct supertypes of a concept.
    ///
    /// The empty set for unknown concepts; never an error.
    pub fn direct_super_types(&self, concept_id: SctId) -> HashSet<SctId> {
        self.direct_of(concept_id, &self.super_types)
    }

    /// Returns the direct subtypes of a concept.
    ///
    /// The empty set for unknown concepts; never an error.
    pub fn direct_sub_types(&self, concept_id: SctId) -> HashSet<SctId> {
        self.direct_of(concept_id, &self.sub_types)
    }

    /// Returns all transitive supertypes (ancestors) of a concept.
    ///
    /// The empty set for unknown concepts; never an error.
    pub fn all_super_types(&self, concept_id: SctId) -> HashSet<SctId> {
        self.transitive_of(concept_id, &self.super_types)
    }

    /// Returns all transitive subtypes (descendants) of a concept.
    ///
    /// The empty set for unknown concepts; never an error.
    pub fn all_sub_types(&self, concept_id: SctId) -> HashSet<SctId> {
        self.transitive_of(concept_id, &self.sub_types)
    }

    /// Returns true if the concept is in the snapshot and has no supertypes.
    pub fn is_root(&self, concept_id: SctId) -> bool {
        match self.internal_ids.get(&concept_id) {
            Some(&index) => self.roots.binary_search(&index).is_ok(),
            None => false,
        }
    }

    /// Returns the external ids of all root concepts.
    pub fn roots(&self) -> HashSet<SctId> {
        self.roots
            .iter()
            .map(|&index| self.concept_ids[index as usize])
            .collect()
    }

    fn direct_of(&self, concept_id: SctId, adjacency: &[Vec<u32>]) -> HashSet<SctId> {
        match self.internal_ids.get(&concept_id) {
            Some(&index) => adjacency[index as usize]
                .iter()
                .map(|&neighbor| self.concept_ids[neighbor as usize])
                .collect(),
            None => HashSet::new(),
        }
    }

    /// Depth-first traversal with an explicit work stack.
    ///
    /// Every node is marked visited before it is pushed, so each node is
    /// expanded at most once; a cycle therefore cannot loop, it only stops
    /// the walk early on the already-visited node.
    fn transitive_of(&self, concept_id: SctId, adjacency: &[Vec<u32>]) -> HashSet<SctId> {
        let Some(&start) = self.internal_ids.get(&concept_id) else {
            return HashSet::new();
        };

        let mut visited = vec![false; self.concept_ids.len()];
        let mut stack: Vec<u32> = Vec::new();
        let mut result: HashSet<SctId> = HashSet::new();

        for &neighbor in &adjacency[start as usize] {
            if !visited[neighbor as usize] {
                visited[neighbor as usize] = true;
                stack.push(neighbor);
            }
        }

        while let Some(current) = stack.pop() {
            result.insert(self.concept_ids[current as usize]);

            for &neighbor in &adjacency[current as usize] {
                if !visited[neighbor as usize] {
                    visited[neighbor as usize] = true;
                    stack.push(neighbor);
                }
            }
        }

        result
    }
}

impl std::fmt::Debug for HierarchySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchySnapshot")
            .field("concepts", &self.concept_ids.len())
            .field("roots", &self.roots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds the test hierarchy:
    /// ```text
    /// 100 (root)
    ///  |-- 200
    ///  |    |-- 400
    ///  |    |-- 500
    ///  |-- 300
    ///       |-- 600
    /// ```
    fn build_test_snapshot() -> HierarchySnapshot {
        HierarchySnapshot::build(
            vec![100, 200, 300, 400, 500, 600],
            vec![
                IsAEdge::new(200, 100),
                IsAEdge::new(300, 100),
                IsAEdge::new(400, 200),
                IsAEdge::new(500, 200),
                IsAEdge::new(600, 300),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_direct_super_types() {
        let snapshot = build_test_snapshot();

        assert_eq!(snapshot.direct_super_types(400), HashSet::from([200]));
        assert_eq!(snapshot.direct_super_types(100), HashSet::new());
    }

    #[test]
    fn test_direct_sub_types() {
        let snapshot = build_test_snapshot();

        assert_eq!(snapshot.direct_sub_types(100), HashSet::from([200, 300]));
        assert_eq!(snapshot.direct_sub_types(400), HashSet::new());
    }

    #[test]
    fn test_all_super_types() {
        let snapshot = build_test_snapshot();

        assert_eq!(snapshot.all_super_types(400), HashSet::from([200, 100]));
        assert_eq!(snapshot.all_super_types(100), HashSet::new());
    }

    #[test]
    fn test_all_sub_types() {
        let snapshot = build_test_snapshot();

        assert_eq!(
            snapshot.all_sub_types(100),
            HashSet::from([200, 300, 400, 500, 600])
        );
        assert_eq!(snapshot.all_sub_types(200), HashSet::from([400, 500]));
    }

    #[test]
    fn test_roots() {
        let snapshot = build_test_snapshot();

        assert!(snapshot.is_root(100));
        assert!(!snapshot.is_root(200));
        assert!(!snapshot.is_root(999));
        assert_eq!(snapshot.roots(), HashSet::from([100]));
    }

    #[test]
    fn test_unknown_concept_yields_empty_sets() {
        let snapshot = build_test_snapshot();

        assert!(snapshot.direct_super_types(999).is_empty());
        assert!(snapshot.direct_sub_types(999).is_empty());
        assert!(snapshot.all_super_types(999).is_empty());
        assert!(snapshot.all_sub_types(999).is_empty());
        assert!(!snapshot.contains(999));
    }

    #[test]
    fn test_diamond_inheritance() {
        // 400 IS-A 200, 400 IS-A 300, both IS-A 100.
        let snapshot = HierarchySnapshot::build(
            vec![100, 200, 300, 400],
            vec![
                IsAEdge::new(200, 100),
                IsAEdge::new(300, 100),
                IsAEdge::new(400, 200),
                IsAEdge::new(400, 300),
            ],
        )
        .unwrap();

        assert_eq!(
            snapshot.all_super_types(400),
            HashSet::from([200, 300, 100])
        );
        assert_eq!(snapshot.all_sub_types(100), HashSet::from([200, 300, 400]));
    }

    #[test]
    fn test_dangling_source_fails_build() {
        let result = HierarchySnapshot::build(
            vec![100, 200],
            vec![IsAEdge::new(200, 100), IsAEdge::new(999, 100)],
        );

        let Err(TaxonomyError::InvalidGraph { issues }) = result else {
            panic!("expected InvalidGraph");
        };
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].source_id, 999);
        assert_eq!(issues[0].missing, MissingConcept::Source);
    }

    #[test]
    fn test_dangling_destination_fails_build() {
        let result = HierarchySnapshot::build(vec![100], vec![IsAEdge::new(100, 999)]);

        let Err(TaxonomyError::InvalidGraph { issues }) = result else {
            panic!("expected InvalidGraph");
        };
        assert_eq!(issues[0].missing, MissingConcept::Destination);
    }

    #[test]
    fn test_all_dangling_edges_are_reported() {
        let result = HierarchySnapshot::build(
            vec![100],
            vec![
                IsAEdge::new(998, 100),
                IsAEdge::new(100, 997),
                IsAEdge::new(996, 995),
            ],
        );

        let Err(TaxonomyError::InvalidGraph { issues }) = result else {
            panic!("expected InvalidGraph");
        };
        // The edge with both ends missing is reported once per end.
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_duplicate_concept_ids_collapse() {
        let snapshot =
            HierarchySnapshot::build(vec![100, 200, 100], vec![IsAEdge::new(200, 100)]).unwrap();

        assert_eq!(snapshot.concept_count(), 2);
        assert_eq!(snapshot.direct_sub_types(100), HashSet::from([200]));
    }

    #[test]
    fn test_cycle_terminates() {
        // 100 <-> 200 is not a valid taxonomy, but the traversal must not
        // loop on it.
        let snapshot = HierarchySnapshot::build(
            vec![100, 200],
            vec![IsAEdge::new(100, 200), IsAEdge::new(200, 100)],
        )
        .unwrap();

        let ancestors = snapshot.all_super_types(100);
        assert!(ancestors.contains(&200));
    }

    #[test]
    fn test_from_source() {
        struct FixedSource;

        impl TaxonomySource for FixedSource {
            fn active_concept_ids(&self) -> Vec<SctId> {
                vec![100, 200]
            }

            fn active_is_a_edges(&self) -> Vec<IsAEdge> {
                vec![IsAEdge::new(200, 100)]
            }
        }

        let snapshot = HierarchySnapshot::from_source(&FixedSource).unwrap();
        assert_eq!(snapshot.concept_count(), 2);
        assert!(snapshot.is_root(100));
    }
}
