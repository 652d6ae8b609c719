//! Error types for the flattening pipeline
//!
//! Every failure is fatal to the run and is returned to the caller; nothing in
//! this crate retries or terminates the process.

use thiserror::Error;

/// Errors raised while flattening a catalog stream
#[derive(Error, Debug)]
pub enum FlattenError {
    /// The input could not be opened, decoded or parsed
    #[error("cannot read source: {0}")]
    SourceRead(csv::Error),

    /// A record does not carry the columns the grouping depends on
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The destination rejected a write or flush
    #[error("cannot write sink: {0}")]
    SinkWrite(csv::Error),

    /// The flattening configuration is unusable
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FlattenError {
    /// Wrap a sink-side I/O error
    pub(crate) fn sink_io(err: std::io::Error) -> Self {
        FlattenError::SinkWrite(csv::Error::from(err))
    }
}

/// Violations of the record shape the flattener relies on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A required column is absent from the header
    #[error("missing required column `{column}`")]
    MissingColumn {
        /// Name of the absent column
        column: String,
    },

    /// A data row does not line up with the header
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// 1-based line number of the offending row
        line: u64,
        /// Number of header columns
        expected: usize,
        /// Number of fields in the row
        found: usize,
    },

    /// A record's columns differ from those of the first record
    #[error("record {record}: columns differ from the first record")]
    HeaderMismatch {
        /// 1-based position of the offending record in the stream
        record: u64,
    },
}

/// Result type alias for flattening operations
pub type Result<T> = std::result::Result<T, FlattenError>;
