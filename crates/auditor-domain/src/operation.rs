//! Operation module - the kinds of LLM-backed runs a session can perform

use std::fmt;

/// Marker that separates the audit report from its structured table
pub const AUDIT_MARKER: &str = "[RESUMO ESTRUTURADO PARA GRÁFICOS]";

/// Marker that separates the extraction report from its structured table
pub const EXTRACTION_MARKER: &str = "[RESUMO ESTRUTURADO PARA EXTRAÇÃO]";

/// Kind of operation, each owning one result slot in the session
///
/// - Audit: SP vs. engineering lists, produces pending items
/// - Extraction: bill of materials from the SP, produces extracted items
/// - DrawingCheck: SP vs. drawings, report only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    /// Compare the SP against engineering lists
    Audit,

    /// Extract a consolidated equipment list from the SP
    Extraction,

    /// Cross-check the SP against technical drawings
    DrawingCheck,
}

impl OperationKind {
    /// All kinds
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Audit,
        OperationKind::Extraction,
        OperationKind::DrawingCheck,
    ];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Audit => "audit",
            OperationKind::Extraction => "extraction",
            OperationKind::DrawingCheck => "drawing-check",
        }
    }

    /// Parse a kind from a string (internal use)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "audit" => Some(OperationKind::Audit),
            "extraction" | "extract" => Some(OperationKind::Extraction),
            "drawing-check" | "check" => Some(OperationKind::DrawingCheck),
            _ => None,
        }
    }

    /// Literal marker the model is told to emit before the structured table
    ///
    /// Drawing checks define no marker and their answer is never split.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            OperationKind::Audit => Some(AUDIT_MARKER),
            OperationKind::Extraction => Some(EXTRACTION_MARKER),
            OperationKind::DrawingCheck => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid operation kind: {}", s))
    }
}
