//! Generic RF2 file parser.
//!
//! Streaming parser for SNOMED CT RF2 tab-delimited files. Unlike a
//! snapshot-only loader, the parser accepts blank effective time fields: a
//! delta file may legitimately carry unpublished rows.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{ImportConfig, ReleaseError, ReleaseResult};

/// Trait for types that can be parsed from RF2 records.
pub trait Rf2Record: Sized {
    /// Expected column names for this record type.
    const EXPECTED_COLUMNS: &'static [&'static str];

    /// Parses a record from a CSV StringRecord.
    fn from_record(record: &StringRecord) -> ReleaseResult<Self>;

    /// Returns true if this record passes the given filter config.
    fn passes_filter(&self, config: &ImportConfig) -> bool;
}

/// A streaming parser for RF2 files.
///
/// Reads record-by-record to avoid loading entire files into memory.
pub struct Rf2Parser<R: Read, T: Rf2Record> {
    reader: Reader<R>,
    config: ImportConfig,
    records_read: usize,
    _marker: PhantomData<T>,
}

impl<T: Rf2Record> Rf2Parser<BufReader<File>, T> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or has invalid headers.
    pub fn from_path<P: AsRef<Path>>(path: P, config: ImportConfig) -> ReleaseResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ReleaseError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader, config)
    }

    /// Counts the data lines in the file (for progress reporting).
    pub fn count_lines<P: AsRef<Path>>(path: P) -> ReleaseResult<usize> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let count = reader.lines().count();
        // Subtract 1 for header row
        Ok(count.saturating_sub(1))
    }
}

impl<R: Read, T: Rf2Record> Rf2Parser<R, T> {
    /// Creates a new parser from a reader.
    pub fn from_reader(reader: R, config: ImportConfig) -> ReleaseResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader)?;

        Ok(Self {
            reader: csv_reader,
            config,
            records_read: 0,
            _marker: PhantomData,
        })
    }

    /// Validates that the file has the expected column headers.
    fn validate_headers(reader: &mut Reader<R>) -> ReleaseResult<()> {
        let headers = reader.headers()?;
        let expected = T::EXPECTED_COLUMNS;

        if headers.len() < expected.len() {
            return Err(ReleaseError::InvalidHeader {
                expected: expected.len(),
                found: headers.len(),
            });
        }

        for (i, expected_col) in expected.iter().enumerate() {
            let found = headers.get(i).unwrap_or("");
            // Handle UTF-8 BOM at start of file
            let found = found.trim_start_matches('\u{feff}');
            if found != *expected_col {
                return Err(ReleaseError::UnexpectedColumn {
                    position: i,
                    expected: expected_col.to_string(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Returns the number of records read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Returns the parser configuration.
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parses all records into a Vec, applying filters.
    ///
    /// Note: This loads all matching records into memory.
    pub fn parse_all(mut self) -> ReleaseResult<Vec<T>> {
        let mut results = Vec::new();
        for record in self.by_ref().flatten() {
            results.push(record);
        }
        Ok(results)
    }

    /// Parses records in batches, calling the callback for each batch.
    pub fn parse_batched<F>(mut self, mut callback: F) -> ReleaseResult<usize>
    where
        F: FnMut(Vec<T>) -> ReleaseResult<()>,
    {
        let batch_size = self.config.batch_size;
        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0;

        for record in self.by_ref().flatten() {
            batch.push(record);
            if batch.len() >= batch_size {
                total += batch.len();
                callback(std::mem::take(&mut batch))?;
                batch = Vec::with_capacity(batch_size);
            }
        }

        if !batch.is_empty() {
            total += batch.len();
            callback(batch)?;
        }

        Ok(total)
    }
}

impl<R: Read, T: Rf2Record> Iterator for Rf2Parser<R, T> {
    type Item = ReleaseResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.records_read += 1;

                    // Skip empty records
                    if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }

                    match T::from_record(&record) {
                        Ok(parsed) => {
                            if parsed.passes_filter(&self.config) {
                                return Some(Ok(parsed));
                            }
                            continue;
                        }
                        Err(e) => return Some(Err(e)),
                    }
                }
                Ok(false) => return None, // End of file
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Helper functions for parsing RF2 field values.
pub mod parse {
    use snomed_rf2_types::SctId;
    use uuid::Uuid;

    use super::{ReleaseError, ReleaseResult};

    /// Parses an SCTID from a string.
    pub fn sctid(value: &str) -> ReleaseResult<SctId> {
        value.parse::<u64>().map_err(|_| ReleaseError::InvalidSctId {
            value: value.to_string(),
        })
    }

    /// Parses an optional SCTID; the empty string is `None`.
    pub fn optional_sctid(value: &str) -> ReleaseResult<Option<SctId>> {
        if value.is_empty() {
            return Ok(None);
        }
        sctid(value).map(Some)
    }

    /// Parses a reference set member UUID.
    pub fn member_id(value: &str) -> ReleaseResult<Uuid> {
        value.parse::<Uuid>().map_err(|_| ReleaseError::InvalidUuid {
            value: value.to_string(),
        })
    }

    /// Parses a boolean from "0" or "1".
    pub fn boolean(value: &str) -> ReleaseResult<bool> {
        match value {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(ReleaseError::InvalidBoolean {
                value: value.to_string(),
            }),
        }
    }

    /// Parses an effective time column.
    ///
    /// An empty field is a valid unpublished marker, not an error; a
    /// non-empty field must be exactly 8 digits.
    pub fn effective_time(value: &str) -> ReleaseResult<Option<u32>> {
        if value.is_empty() {
            return Ok(None);
        }
        if value.len() != 8 {
            return Err(ReleaseError::InvalidDate {
                value: value.to_string(),
            });
        }
        value
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ReleaseError::InvalidDate {
                value: value.to_string(),
            })
    }

    /// Parses an integer value.
    pub fn integer<T: std::str::FromStr>(value: &str) -> ReleaseResult<T> {
        value.parse::<T>().map_err(|_| ReleaseError::InvalidInteger {
            value: value.to_string(),
        })
    }

    /// Returns `None` for the empty string, the owned value otherwise.
    pub fn optional_string(value: &str) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sctid() {
        assert_eq!(parse::sctid("404684003").unwrap(), 404684003u64);
        assert!(parse::sctid("not_a_number").is_err());
        assert!(parse::sctid("").is_err());
    }

    #[test]
    fn test_parse_boolean() {
        assert!(!parse::boolean("0").unwrap());
        assert!(parse::boolean("1").unwrap());
        assert!(parse::boolean("true").is_err());
    }

    #[test]
    fn test_parse_effective_time_accepts_blank() {
        assert_eq!(parse::effective_time("20020131").unwrap(), Some(20020131));
        assert_eq!(parse::effective_time("").unwrap(), None);
        assert!(parse::effective_time("2020-01-31").is_err());
        assert!(parse::effective_time("2002013").is_err());
    }

    #[test]
    fn test_parse_member_id() {
        assert!(parse::member_id("800aa109-431f-4407-a431-6fe65e9db160").is_ok());
        assert!(parse::member_id("not-a-uuid").is_err());
    }

    #[test]
    fn test_parse_optional_fields() {
        assert_eq!(parse::optional_sctid("").unwrap(), None);
        assert_eq!(parse::optional_sctid("123").unwrap(), Some(123));
        assert_eq!(parse::optional_string(""), None);
        assert_eq!(parse::optional_string("x"), Some("x".to_string()));
    }
}
