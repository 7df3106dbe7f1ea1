//! Pretty error rendering for the CLI.

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A parse failure with a labeled source window.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct ParseDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,
}

/// Wraps a parser error in a miette report, attaching a source window when
/// the error carries a location.
pub fn render(path: &Path, bytes: &[u8], error: &joist_parser::Error) -> miette::Report {
    let Some((line, col)) = error.location() else {
        return miette::Report::msg(error.to_string());
    };
    let content = String::from_utf8_lossy(bytes).into_owned();
    let offset = line_col_to_offset(&content, line, col);
    let len = usize::from(!content.is_empty());
    ParseDiagnostic {
        src: NamedSource::new(path.display().to_string(), content),
        span: SourceSpan::from(offset..offset + len),
        message: error.to_string(),
    }
    .into()
}

/// Converts 1-based `(line, column)` back into a byte offset, clamped to the
/// content.
fn line_col_to_offset(content: &str, line: u64, col: u64) -> usize {
    let mut current = 1_u64;
    let mut offset = 0_usize;
    for chunk in content.split_inclusive('\n') {
        if current == line {
            break;
        }
        offset += chunk.len();
        current += 1;
    }
    let col = usize::try_from(col.saturating_sub(1)).unwrap_or(usize::MAX);
    (offset.saturating_add(col)).min(content.len().saturating_sub(1))
}
