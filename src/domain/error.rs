//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::RecordParseError;

/// Domain errors represent malformed catalog input.
///
/// The catalog itself never fails: duplicates and misses are ordinary
/// `bool` / `Option` results. Only turning raw text into records can.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("line {line}: {source}")]
    RecordParse {
        line: usize,
        #[source]
        source: RecordParseError,
    },
}
