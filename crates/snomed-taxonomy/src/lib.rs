//! # snomed-taxonomy
//!
//! Array-based IS-A hierarchy snapshot and transitive closure queries for
//! SNOMED CT.
//!
//! The central type is [`HierarchySnapshot`]: an immutable, densely indexed
//! view of the IS-A graph of one branch, built once from a flat stream of
//! concept ids and edges. Sparse 64-bit concept ids map to internal array
//! indices at build time, so both directions of the hierarchy are plain
//! array-of-array lookups, and the transitive queries run a bit-set guarded
//! depth-first traversal over them.
//!
//! ```
//! use snomed_taxonomy::{HierarchySnapshot, IsAEdge};
//!
//! let snapshot = HierarchySnapshot::build(
//!     vec![138875005, 404684003, 73211009],
//!     vec![
//!         IsAEdge::new(404684003, 138875005),
//!         IsAEdge::new(73211009, 404684003),
//!     ],
//! )?;
//!
//! assert!(snapshot.is_root(138875005));
//! assert!(snapshot.all_super_types(73211009).contains(&138875005));
//! # Ok::<(), snomed_taxonomy::TaxonomyError>(())
//! ```
//!
//! Snapshots are immutable after construction and therefore safe to share
//! across concurrent readers; [`HierarchyCache`] keeps one per branch, keyed
//! by the branch head timestamp so a rebased branch never serves a stale
//! hierarchy.

#![warn(missing_docs)]

mod cache;
mod error;
mod hierarchy;

pub use cache::HierarchyCache;
pub use error::{InvalidEdge, MissingConcept, TaxonomyError, TaxonomyResult};
pub use hierarchy::{HierarchySnapshot, IsAEdge, TaxonomySource};
