use std::fmt;

use thiserror::Error;

use crate::reader::RawRow;

/// Why a raw row could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("id {0:?} is not an integer")]
    InvalidId(String),

    #[error("value {0:?} is not a number")]
    InvalidValue(String),
}

/// A recovered problem encountered while reading or writing rows.
///
/// Diagnostics never abort a run. They are logged where they happen and
/// handed back to the caller so the outcome can be inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The header row had fewer than the three expected columns.
    MalformedHeader { fields: usize },
    /// A data row failed numeric conversion and was skipped.
    InvalidNumeric { row: RawRow, reason: ConversionError },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedHeader { fields } => write!(
                f,
                "csv header has {fields} column(s), expected (id, name, value)"
            ),
            Diagnostic::InvalidNumeric { row, reason } => {
                write!(f, "skipping row due to invalid numeric data: {row} ({reason})")
            }
        }
    }
}
