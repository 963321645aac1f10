//! Error types for document ingestion

use std::path::Path;
use thiserror::Error;

/// Errors that can occur while turning an uploaded file into text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The file could not be opened or decoded
    #[error("Failed to read {file}: {cause}")]
    Extraction {
        /// File name as given by the user
        file: String,
        /// Underlying reason
        cause: String,
    },

    /// The extension is not one of docx, csv, xlsx or pdf
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
}

impl IngestError {
    /// Build an extraction error for `path` from any displayable cause
    pub fn extraction(path: &Path, cause: impl std::fmt::Display) -> Self {
        IngestError::Extraction {
            file: display_name(path),
            cause: cause.to_string(),
        }
    }

    /// Name of the offending file
    pub fn file(&self) -> &str {
        match self {
            IngestError::Extraction { file, .. } => file,
            IngestError::UnsupportedFormat(file) => file,
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
