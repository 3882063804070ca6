use std::path::PathBuf;

use thiserror::Error;

use crate::fragment::SyntaxError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("template syntax error in {location}: {message}")]
    TemplateSyntax { location: String, message: String },

    #[error("template refers to unknown field(s): {}", names.join(", "))]
    UnknownFields { names: Vec<String> },

    #[error("not a readable spreadsheet template ({}): {message}", path.display())]
    SpreadsheetFormat { path: PathBuf, message: String },

    #[error("failed to write spreadsheet {}: {message}", path.display())]
    SpreadsheetWrite { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("DOCX generation failed: {0}")]
    Docx(String),
}

impl ReportError {
    pub(crate) fn syntax(location: impl Into<String>, err: SyntaxError) -> Self {
        ReportError::TemplateSyntax {
            location: location.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}
