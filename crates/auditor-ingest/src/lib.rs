//! Auditor Document Ingestion
//!
//! Turns uploaded files into the plain text blobs that fill the prompt
//! templates.
//!
//! # Formats
//!
//! | Extension | Role | Rendering |
//! |---|---|---|
//! | `.docx` | SP (source of truth) | body paragraphs, then every table cell |
//! | `.csv`, `.xlsx` | engineering lists | aligned text table, header first |
//! | `.pdf` | drawings | plain text of all pages |
//!
//! Multi-file uploads go through [`read_batch`], which prefixes each file
//! with a `--- CONTEÚDO DO ARQUIVO: <stem> ---` header and stops at the
//! first failure.
//!
//! # Examples
//!
//! ```no_run
//! use auditor_ingest::{read_batch, FileExtractor};
//! use auditor_domain::traits::DocumentExtractor;
//! use std::path::Path;
//!
//! let extractor = FileExtractor::new();
//! let sp = extractor.extract(Path::new("SP-001.docx")).unwrap();
//! let lists = read_batch(&extractor, &["LME_01.xlsx", "LMM_02.csv"]).unwrap();
//! println!("{} chars, lists {:?}", sp.len() + lists.content.len(), lists.names);
//! ```

#![warn(missing_docs)]

mod batch;
mod error;
mod file;

pub mod docx;
pub mod pdf;
pub mod sheet;

pub use batch::{file_header, file_stem, read_batch, DocumentBatch};
pub use error::IngestError;
pub use file::{extract_text, FileExtractor, FileType};

use auditor_domain::traits::DocumentExtractor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory extractor for tests and dry runs
///
/// Serves canned text per path; unknown paths fail like an unreadable file.
/// Clones share the read log.
#[derive(Debug, Clone, Default)]
pub struct MemoryExtractor {
    files: HashMap<PathBuf, String>,
    reads: Arc<Mutex<Vec<String>>>,
}

impl MemoryExtractor {
    /// Create an extractor with no files
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the text returned for `path`
    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }

    /// Paths requested so far, in call order
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

impl DocumentExtractor for MemoryExtractor {
    type Error = IngestError;

    fn extract(&self, path: &Path) -> Result<String, Self::Error> {
        self.reads.lock().unwrap().push(path.display().to_string());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| IngestError::extraction(path, "file not found"))
    }
}
