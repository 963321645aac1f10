//! PDF text extraction

use crate::error::IngestError;
use std::path::Path;

/// Extract the plain text of every page of a PDF
pub fn read_pdf(path: &Path) -> Result<String, IngestError> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::extraction(path, e))?;
    pdf_text(&bytes).map_err(|cause| IngestError::extraction(path, cause))
}

/// Extract the plain text of an in-memory PDF
pub fn pdf_text(bytes: &[u8]) -> Result<String, String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| format!("failed to extract text from PDF: {}", e))?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pdf() {
        let err = pdf_text(b"not a pdf at all").unwrap_err();
        assert!(err.starts_with("failed to extract text from PDF"));
    }

    #[test]
    fn test_missing_pdf() {
        let err = read_pdf(Path::new("/nonexistent/PLANTA-01.pdf")).unwrap_err();
        assert_eq!(err.file(), "PLANTA-01.pdf");
    }
}
