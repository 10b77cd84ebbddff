//! Branch-keyed snapshot cache with head-change invalidation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::TaxonomyResult;
use crate::hierarchy::HierarchySnapshot;

struct CacheEntry {
    head_timestamp: u64,
    snapshot: Arc<HierarchySnapshot>,
}

/// Caches one [`HierarchySnapshot`] per branch path.
///
/// Every entry is keyed by the branch head timestamp it was built from. A
/// lookup with a different head timestamp evicts the entry and rebuilds, so a
/// rebased or updated branch can never be served a stale hierarchy.
///
/// # Examples
///
/// ```
/// use snomed_taxonomy::{HierarchyCache, HierarchySnapshot, IsAEdge};
///
/// let cache = HierarchyCache::new();
/// let snapshot = cache.get_or_build("MAIN", 1000, || {
///     HierarchySnapshot::build(vec![100, 200], vec![IsAEdge::new(200, 100)])
/// })?;
/// assert!(snapshot.is_root(100));
///
/// // Same head: the cached snapshot is reused, the closure is not called.
/// let again = cache.get_or_build("MAIN", 1000, || unreachable!())?;
/// assert_eq!(again.concept_count(), 2);
/// # Ok::<(), snomed_taxonomy::TaxonomyError>(())
/// ```
#[derive(Default)]
pub struct HierarchyCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl HierarchyCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached snapshot for the branch, rebuilding when absent or
    /// when the branch head moved since the entry was built.
    ///
    /// # Errors
    ///
    /// Propagates the builder's error; a failed build leaves no cache entry.
    pub fn get_or_build<F>(
        &self,
        branch_path: &str,
        head_timestamp: u64,
        build: F,
    ) -> TaxonomyResult<Arc<HierarchySnapshot>>
    where
        F: FnOnce() -> TaxonomyResult<HierarchySnapshot>,
    {
        {
            let entries = self.entries.read();
            if let Some(entry) = entries.get(branch_path) {
                if entry.head_timestamp == head_timestamp {
                    return Ok(Arc::clone(&entry.snapshot));
                }
            }
        }

        tracing::info!(branch = branch_path, head_timestamp, "building hierarchy snapshot");
        let snapshot = Arc::new(build()?);

        let mut entries = self.entries.write();
        // A concurrent builder may have raced us here; last write wins, both
        // snapshots were built from the same branch state.
        entries.insert(
            branch_path.to_string(),
            CacheEntry {
                head_timestamp,
                snapshot: Arc::clone(&snapshot),
            },
        );

        Ok(snapshot)
    }

    /// Drops the cached snapshot for a branch.
    ///
    /// Returns true if an entry was present.
    pub fn invalidate(&self, branch_path: &str) -> bool {
        self.entries.write().remove(branch_path).is_some()
    }

    /// Drops all cached snapshots.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of cached branches.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no branch is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
