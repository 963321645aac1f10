//! Multi-file batches
//!
//! Engineering lists (and drawings) are uploaded several at a time and sent to
//! the model as one blob, each file introduced by a header carrying its stem so
//! the model can cite it in the `NomeLista` column.

use auditor_domain::traits::DocumentExtractor;
use std::path::Path;
use tracing::debug;

/// Concatenated text of several files plus their stems
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentBatch {
    /// All file contents, each preceded by its header
    pub content: String,

    /// File stems, in upload order
    pub names: Vec<String>,
}

impl DocumentBatch {
    /// True when no file contributed any text
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Header line introducing one file inside a batch
pub fn file_header(stem: &str) -> String {
    format!("--- CONTEÚDO DO ARQUIVO: {} ---", stem)
}

/// File name without directories and without its last extension
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read every file into one batch
///
/// Aborts on the first failing file; no partial batch is ever returned.
pub fn read_batch<E, P>(extractor: &E, paths: &[P]) -> Result<DocumentBatch, E::Error>
where
    E: DocumentExtractor,
    P: AsRef<Path>,
{
    let mut sections = Vec::with_capacity(paths.len());
    let mut names = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let content = extractor.extract(path)?;
        let stem = file_stem(path);
        sections.push(format!("{}\n{}\n", file_header(&stem), content));
        names.push(stem);
    }

    debug!("Batched {} files: {:?}", names.len(), names);
    Ok(DocumentBatch {
        content: sections.join("\n"),
        names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IngestError, MemoryExtractor};

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("in/LME_200ELEL5477_REV02.xlsx")), "LME_200ELEL5477_REV02");
        assert_eq!(file_stem(Path::new("lista.final.csv")), "lista.final");
    }

    #[test]
    fn test_batch_headers_and_names() {
        let extractor = MemoryExtractor::new()
            .with_file("a/LME_01.csv", "Bomba 2")
            .with_file("b/LMM-02.xlsx", "Motor 1");

        let batch = read_batch(&extractor, &["a/LME_01.csv", "b/LMM-02.xlsx"]).unwrap();
        assert_eq!(batch.names, vec!["LME_01", "LMM-02"]);
        assert_eq!(
            batch.content,
            "--- CONTEÚDO DO ARQUIVO: LME_01 ---\nBomba 2\n\n--- CONTEÚDO DO ARQUIVO: LMM-02 ---\nMotor 1\n"
        );
        assert!(!batch.is_blank());
    }

    #[test]
    fn test_batch_aborts_on_first_failure() {
        let extractor = MemoryExtractor::new()
            .with_file("ok.csv", "x")
            .with_file("third.csv", "y");

        let err = read_batch(&extractor, &["ok.csv", "broken.csv", "third.csv"]).unwrap_err();
        assert!(matches!(err, IngestError::Extraction { ref file, .. } if file == "broken.csv"));
        // Nothing after the failing file is read
        assert_eq!(extractor.reads(), vec!["ok.csv", "broken.csv"]);
    }

    #[test]
    fn test_empty_batch() {
        let paths: [&str; 0] = [];
        let batch = read_batch(&MemoryExtractor::new(), &paths).unwrap();
        assert!(batch.is_blank());
        assert!(batch.names.is_empty());
    }
}
