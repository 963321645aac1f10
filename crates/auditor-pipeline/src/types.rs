//! Request and response types for pipeline operations

use auditor_domain::OperationKind;
use std::path::PathBuf;

/// Request to run one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    /// Operation to run
    pub kind: OperationKind,

    /// Source-of-truth document (.docx)
    pub sp: Option<PathBuf>,

    /// Engineering lists (.csv/.xlsx); required for audits
    pub lists: Vec<PathBuf>,

    /// Technical drawings (.pdf); required for drawing checks
    pub drawings: Vec<PathBuf>,
}

impl OperationRequest {
    /// Audit of an SP against engineering lists
    pub fn audit(sp: impl Into<PathBuf>, lists: Vec<PathBuf>) -> Self {
        Self {
            kind: OperationKind::Audit,
            sp: Some(sp.into()),
            lists,
            drawings: Vec::new(),
        }
    }

    /// Bill-of-materials extraction from an SP
    pub fn extraction(sp: impl Into<PathBuf>) -> Self {
        Self {
            kind: OperationKind::Extraction,
            sp: Some(sp.into()),
            lists: Vec::new(),
            drawings: Vec::new(),
        }
    }

    /// Cross-check of an SP against drawings
    pub fn drawing_check(sp: impl Into<PathBuf>, drawings: Vec<PathBuf>) -> Self {
        Self {
            kind: OperationKind::DrawingCheck,
            sp: Some(sp.into()),
            lists: Vec::new(),
            drawings,
        }
    }

    /// Check that the uploads required by the operation are present
    pub fn missing_uploads(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sp.is_none() {
            missing.push("SP document (.docx)");
        }
        match self.kind {
            OperationKind::Audit if self.lists.is_empty() => {
                missing.push("engineering lists (.csv/.xlsx)")
            }
            OperationKind::DrawingCheck if self.drawings.is_empty() => {
                missing.push("drawings (.pdf)")
            }
            _ => {}
        }
        missing
    }
}

/// Summary of a completed operation; the result itself is in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Operation that ran
    pub kind: OperationKind,

    /// Model that answered
    pub model_name: String,

    /// Characters of document text sent to the model
    pub sent_chars: usize,

    /// Stems of the supporting files (lists or drawings)
    pub source_names: Vec<String>,

    /// Records recovered from the structured section
    pub record_count: usize,

    /// Table lines that matched no row pattern
    pub skipped_lines: usize,

    /// Wall-clock duration of the whole run
    pub elapsed_ms: u64,
}

/// Free-form question about a set of documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    /// Documents used as context
    pub documents: Vec<PathBuf>,

    /// The question
    pub question: String,
}

/// Answer to an [`AskRequest`]; never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskAnswer {
    /// Model answer, trimmed
    pub text: String,

    /// Characters of document text sent to the model
    pub sent_chars: usize,

    /// Stems of the context documents
    pub source_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_uploads() {
        assert!(OperationRequest::audit("sp.docx", vec!["l.csv".into()]).missing_uploads().is_empty());
        assert_eq!(
            OperationRequest::audit("sp.docx", Vec::new()).missing_uploads(),
            vec!["engineering lists (.csv/.xlsx)"]
        );
        assert!(OperationRequest::extraction("sp.docx").missing_uploads().is_empty());
        assert_eq!(
            OperationRequest::drawing_check("sp.docx", Vec::new()).missing_uploads(),
            vec!["drawings (.pdf)"]
        );

        let mut request = OperationRequest::audit("sp.docx", Vec::new());
        request.sp = None;
        assert_eq!(request.missing_uploads().len(), 2);
    }
}
