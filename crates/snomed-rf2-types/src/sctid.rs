//! SNOMED CT identifier type.

/// A SNOMED CT identifier (SCTID).
///
/// SCTIDs are numeric strings that fit in a 64-bit unsigned integer and
/// uniquely identify core components (concepts, descriptions, relationships)
/// within a release. Reference set members use UUIDs instead.
///
/// # Examples
///
/// ```
/// use snomed_rf2_types::SctId;
///
/// let root: SctId = 138875005;      // SNOMED CT Concept (root)
/// let is_a: SctId = 116680003;      // IS_A relationship type
/// ```
pub type SctId = u64;
