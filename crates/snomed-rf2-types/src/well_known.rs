//! Well-known SNOMED CT identifiers.
//!
//! Frequently referenced SCTIDs grouped by role. The list is intentionally
//! small; anything not needed by the hierarchy or the release pipeline stays
//! out.

use crate::SctId;

// Hierarchy

/// The root concept of SNOMED CT.
pub const ROOT_CONCEPT: SctId = 138875005;
/// IS_A relationship type, the backbone of the taxonomy.
pub const IS_A: SctId = 116680003;
/// Clinical finding top-level concept.
pub const CLINICAL_FINDING: SctId = 404684003;
/// Procedure top-level concept.
pub const PROCEDURE: SctId = 71388002;

// Modules

/// SNOMED CT core module.
pub const SNOMED_CT_CORE_MODULE: SctId = 900000000000207008;
/// SNOMED CT model component module.
pub const MODEL_COMPONENT_MODULE: SctId = 900000000000012004;

// Definition status

/// Primitive definition status.
pub const PRIMITIVE: SctId = 900000000000074008;
/// Fully defined definition status.
pub const FULLY_DEFINED: SctId = 900000000000073002;

// Language reference sets

/// US English language reference set.
pub const US_ENGLISH_LANG_REFSET: SctId = 900000000000509007;
/// GB English language reference set.
pub const GB_ENGLISH_LANG_REFSET: SctId = 900000000000508004;

// Other reference sets

/// Simple type reference set concept.
pub const REFSET_SIMPLE_TYPE: SctId = 446609009;
/// OWL axiom reference set.
pub const OWL_AXIOM_REFSET: SctId = 733073007;
/// MRCM domain international reference set.
pub const MRCM_DOMAIN_REFSET: SctId = 723560006;
