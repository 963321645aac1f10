//! File type detection and dispatch to the format readers.

use crate::error::{display_name, IngestError};
use crate::{docx, pdf, sheet};
use auditor_domain::traits::DocumentExtractor;
use std::path::Path;
use tracing::{debug, info};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Word document (the SP)
    Docx,
    /// Comma-separated engineering list
    Csv,
    /// Excel engineering list
    Xlsx,
    /// Technical drawing
    Pdf,
    /// Anything else
    Unknown,
}

impl FileType {
    /// Detect file type from extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "docx" => Self::Docx,
            "csv" => Self::Csv,
            "xlsx" => Self::Xlsx,
            "pdf" => Self::Pdf,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Whether this is a spreadsheet (engineering list) format.
    pub fn is_sheet(&self) -> bool {
        matches!(self, Self::Csv | Self::Xlsx)
    }
}

/// Extract text content from a file, dispatching on its extension.
pub fn extract_text(path: &Path) -> Result<String, IngestError> {
    let file_type = FileType::from_path(path);
    debug!("Reading {} as {:?}", path.display(), file_type);

    let text = match file_type {
        FileType::Docx => docx::read_docx(path)?,
        FileType::Csv => sheet::read_csv(path)?,
        FileType::Xlsx => sheet::read_xlsx(path)?,
        FileType::Pdf => pdf::read_pdf(path)?,
        FileType::Unknown => return Err(IngestError::UnsupportedFormat(display_name(path))),
    };

    info!("Read {} ({} chars)", display_name(path), text.chars().count());
    Ok(text)
}

/// Filesystem-backed [`DocumentExtractor`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl FileExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for FileExtractor {
    type Error = IngestError;

    fn extract(&self, path: &Path) -> Result<String, Self::Error> {
        extract_text(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileType::from_extension("DOCX"), FileType::Docx);
        assert_eq!(FileType::from_extension("csv"), FileType::Csv);
        assert_eq!(FileType::from_extension("Xlsx"), FileType::Xlsx);
        assert_eq!(FileType::from_extension("pdf"), FileType::Pdf);
        assert_eq!(FileType::from_extension("doc"), FileType::Unknown);
        assert!(FileType::Xlsx.is_sheet());
        assert!(!FileType::Pdf.is_sheet());
    }

    #[test]
    fn test_from_path() {
        assert_eq!(FileType::from_path(Path::new("dir/SP-001.docx")), FileType::Docx);
        assert_eq!(FileType::from_path(Path::new("README")), FileType::Unknown);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = FileExtractor::new().extract(Path::new("notes.txt")).unwrap_err();
        assert_eq!(err, IngestError::UnsupportedFormat("notes.txt".to_string()));
    }

    #[test]
    fn test_extract_docx_from_disk() {
        let bytes = crate::docx::tests::build_docx("<w:p><w:r><w:t>Tópico 17</w:t></w:r></w:p>");
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(&bytes).unwrap();

        let text = FileExtractor.extract(file.path()).unwrap();
        assert_eq!(text, "Tópico 17");
    }

    #[test]
    fn test_extract_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        writeln!(file, "Item,Qtd").unwrap();
        writeln!(file, "Motor,3").unwrap();

        let text = FileExtractor.extract(file.path()).unwrap();
        assert!(text.contains("Motor"));
    }
}
