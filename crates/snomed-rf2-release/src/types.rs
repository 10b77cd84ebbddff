//! Errors and configuration for RF2 release processing.

use thiserror::Error;

/// Errors that can occur in the release pipeline.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// I/O error reading or writing release content.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Zip container error.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed export configuration, rejected before any row scanning.
    #[error("Invalid export configuration: {reason}")]
    InvalidConfiguration {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Failure while assembling the output archive.
    ///
    /// The partial archive is discarded, never returned.
    #[error("Archive write failed: {reason}")]
    ArchiveWrite {
        /// The underlying failure.
        reason: String,
    },

    /// Invalid SCTID format.
    #[error("Invalid SCTID format: {value}")]
    InvalidSctId {
        /// The invalid value that was encountered.
        value: String,
    },

    /// Invalid member UUID format.
    #[error("Invalid member UUID: {value}")]
    InvalidUuid {
        /// The invalid value that was encountered.
        value: String,
    },

    /// Invalid date format.
    #[error("Invalid date format: {value}")]
    InvalidDate {
        /// The invalid date value.
        value: String,
    },

    /// Invalid boolean value.
    #[error("Invalid boolean value: {value} (expected 0 or 1)")]
    InvalidBoolean {
        /// The invalid boolean value.
        value: String,
    },

    /// Invalid integer value.
    #[error("Invalid integer value: {value}")]
    InvalidInteger {
        /// The invalid integer value.
        value: String,
    },

    /// Invalid header - column count mismatch.
    #[error("Invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Unexpected column name.
    #[error("Unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// The column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },
}

/// Result type for release operations.
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Configuration for RF2 file import.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Whether to keep active records only.
    ///
    /// A release store that will feed exports keeps inactive rows too, so
    /// this defaults to false (unlike a query-only loader).
    pub active_only: bool,
    /// Batch size for processing (affects memory usage).
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            active_only: false,
            batch_size: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_config_default_keeps_inactive_rows() {
        let config = ImportConfig::default();
        assert!(!config.active_only);
        assert_eq!(config.batch_size, 10_000);
    }

    #[test]
    fn test_invalid_configuration_display() {
        let err = ReleaseError::InvalidConfiguration {
            reason: "branchPath must be set".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid export configuration: branchPath must be set"
        );
    }
}
