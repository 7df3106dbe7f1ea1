use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can go wrong acquiring input or parsing a document.
///
/// Parse-time variants carry the 1-based `(line, column)` of the offending
/// byte; columns count bytes from the start of the line.
#[derive(Debug, Error)]
pub enum Error {
    /// Input acquisition failed (open, stat, mmap).
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed token or unexpected byte.
    #[error("syntax error at line {line}, column {col}: {reason}")]
    Syntax { line: u64, col: u64, reason: String },

    /// An integer literal does not fit any numeric carrier.
    #[error("numeric overflow at line {line}, column {col}: {literal}")]
    Numeric { line: u64, col: u64, literal: String },

    /// Duplicate-key policy is `reject` and an object repeated a key.
    #[error("duplicate key \"{key}\" at line {line}, column {col}")]
    DuplicateKey { line: u64, col: u64, key: String },

    /// Container nesting exceeded the parser's depth bound.
    #[error("nesting depth exceeds {limit} at line {line}, column {col}")]
    DepthExceeded { line: u64, col: u64, limit: usize },

    /// The schema hook rejected a completed value.
    #[error("schema violation at \"{path}\": {reason}")]
    Schema { path: String, reason: String },

    /// Unclassified failure; indicates a bug in the parser.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The `(line, column)` the error points at, when it carries one.
    pub fn location(&self) -> Option<(u64, u64)> {
        match self {
            Self::Syntax { line, col, .. }
            | Self::Numeric { line, col, .. }
            | Self::DuplicateKey { line, col, .. }
            | Self::DepthExceeded { line, col, .. } => Some((*line, *col)),
            Self::Io { .. } | Self::Schema { .. } | Self::Internal(_) => None,
        }
    }
}
