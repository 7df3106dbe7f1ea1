use thiserror::Error;

use crate::value::Kind;

/// Failures local to the value tree: wrong-kind accessors, out-of-range
/// indices, and numeric conversions that would lose value.
///
/// These never poison the tree; the value is unchanged after an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A typed accessor was called on a value of the wrong kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    /// An array index was out of range.
    #[error("index {index} out of range for array of length {len}")]
    Index { index: usize, len: usize },

    /// A numeric conversion would lose value, or a non-finite double was
    /// asked to serialize.
    #[error("numeric error: {0}")]
    Numeric(String),
}

impl Error {
    pub(crate) fn type_mismatch(expected: Kind, found: Kind) -> Self {
        Self::TypeMismatch { expected, found }
    }

    pub(crate) fn numeric(reason: impl Into<String>) -> Self {
        Self::Numeric(reason.into())
    }
}
