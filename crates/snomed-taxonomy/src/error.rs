//! Error types for taxonomy building.

use snomed_rf2_types::SctId;
use thiserror::Error;

/// Which end of an IS-A edge referenced a missing concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingConcept {
    /// The edge's source concept is not in the snapshot's concept set.
    Source,
    /// The edge's destination concept is not in the snapshot's concept set.
    Destination,
}

/// One IS-A edge that could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEdge {
    /// Source concept of the offending edge.
    pub source_id: SctId,
    /// Destination concept of the offending edge.
    pub destination_id: SctId,
    /// Which end was missing.
    pub missing: MissingConcept,
}

impl std::fmt::Display for InvalidEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let end = match self.missing {
            MissingConcept::Source => "source",
            MissingConcept::Destination => "destination",
        };
        write!(
            f,
            "{} -> {} ({} concept missing)",
            self.source_id, self.destination_id, end
        )
    }
}

/// Errors that can occur while building a hierarchy snapshot.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// The edge input referenced concepts absent from the concept set.
    ///
    /// The build aborts before any snapshot is observable; `issues` lists
    /// every dangling edge found, not just the first.
    #[error("invalid taxonomy graph: {count} edge(s) reference missing concepts", count = issues.len())]
    InvalidGraph {
        /// Every dangling edge encountered during the build.
        issues: Vec<InvalidEdge>,
    },
}

/// Result type for taxonomy operations.
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;
