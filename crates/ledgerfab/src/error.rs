//! Error types for dataset generation.

use thiserror::Error;

use crate::registry::ReferenceTable;

/// Result type alias for fabric operations.
pub type FabricResult<T> = Result<T, FabricError>;

/// Errors raised while configuring, generating, validating or writing a dataset.
#[derive(Error, Debug)]
pub enum FabricError {
    /// The configuration is internally inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The calendar range is empty.
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidDateRange {
        /// First requested date.
        start: chrono::NaiveDate,
        /// Last requested date.
        end: chrono::NaiveDate,
    },

    /// A generator tried to sample from a reference table with no rows.
    #[error("Cannot sample from empty reference table '{table}'")]
    EmptyReference {
        /// Table that was empty.
        table: ReferenceTable,
    },

    /// More distinct rows were requested than the table holds.
    #[error("Requested {requested} distinct rows from '{table}' but only {available} are available")]
    InsufficientReferences {
        /// Table being sampled.
        table: ReferenceTable,
        /// Number of rows requested.
        requested: usize,
        /// Number of rows available.
        available: usize,
    },

    /// A generated row points at an identifier missing from its reference table.
    #[error("Unresolved reference {key} into '{table}' from {referenced_by}")]
    UnresolvedReference {
        /// Reference table the key should resolve against.
        table: ReferenceTable,
        /// Offending key.
        key: String,
        /// Table of the row holding the key.
        referenced_by: &'static str,
    },

    /// A reference table contains the same identifier twice.
    #[error("Duplicate identifier {key} in '{table}'")]
    DuplicateIdentifier {
        /// Table with the duplicate.
        table: ReferenceTable,
        /// Duplicated key.
        key: String,
    },

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("Config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
