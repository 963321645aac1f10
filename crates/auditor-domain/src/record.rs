//! Record module - rows recovered from the structured section of an LLM answer

use std::fmt;

/// Label used for pending items the LLM did not attribute to a specific list
/// (reported as `N/A` in the `NomeLista` column).
pub const GENERAL_LIST_LABEL: &str = "Geral/Não Encontrado";

/// Category of a detected discrepancy
///
/// The wire tokens are the values the audit prompt asks the model to put in
/// the `TipoPendencia` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PendingKind {
    /// Item present in the SP but absent from every list (`FALTANTE`)
    Missing,

    /// Technical specification differs between SP and list (`DISCREPANCIA_TECNICA`)
    TechMismatch,

    /// Quantity differs between SP and list (`DISCREPANCIA_QUANTIDADE`)
    QtyMismatch,

    /// Item implied by the SP but not listed anywhere (`IMPLICITO_FALTANTE`)
    ImplicitMissing,
}

impl PendingKind {
    /// All kinds, in the order the report presents them
    pub const ALL: [PendingKind; 4] = [
        PendingKind::Missing,
        PendingKind::TechMismatch,
        PendingKind::QtyMismatch,
        PendingKind::ImplicitMissing,
    ];

    /// Wire token written in the structured table
    pub fn as_token(&self) -> &'static str {
        match self {
            PendingKind::Missing => "FALTANTE",
            PendingKind::TechMismatch => "DISCREPANCIA_TECNICA",
            PendingKind::QtyMismatch => "DISCREPANCIA_QUANTIDADE",
            PendingKind::ImplicitMissing => "IMPLICITO_FALTANTE",
        }
    }

    /// Parse a wire token, ignoring case and surrounding whitespace
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_token().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for PendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl std::str::FromStr for PendingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| format!("Invalid pending kind: {}", s))
    }
}

/// One discrepancy between the SP and an engineering list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingItem {
    /// Discrepancy category
    pub kind: PendingKind,

    /// Normalized list identifier, or [`GENERAL_LIST_LABEL`]
    pub list_name: String,

    /// Free-text description written by the model
    pub detail: String,
}

/// One consolidated equipment entry extracted from the SP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    /// Grouping label (free text)
    pub category: String,

    /// Consolidated item identifier
    pub item_name: String,

    /// Quantity as written by the model, possibly `N/A`
    pub quantity: String,

    /// Technical summary, possibly `N/A`
    pub spec_summary: String,
}

/// A parsed row of either table flavour
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Audit-mode row
    Pending(PendingItem),

    /// Extraction-mode row
    Extracted(ExtractedItem),
}

impl Record {
    /// Column headers matching [`Record::columns`] for this record's flavour
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Record::Pending(_) => &["Tipo", "Lista", "Item"],
            Record::Extracted(_) => &["Categoria", "Item", "Quantidade", "Especificacao"],
        }
    }

    /// Cell values in column order
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Record::Pending(item) => vec![
                item.kind.as_token(),
                item.list_name.as_str(),
                item.detail.as_str(),
            ],
            Record::Extracted(item) => vec![
                item.category.as_str(),
                item.item_name.as_str(),
                item.quantity.as_str(),
                item.spec_summary.as_str(),
            ],
        }
    }

    /// Borrow the pending item, if this is an audit row
    pub fn as_pending(&self) -> Option<&PendingItem> {
        match self {
            Record::Pending(item) => Some(item),
            Record::Extracted(_) => None,
        }
    }

    /// Borrow the extracted item, if this is an extraction row
    pub fn as_extracted(&self) -> Option<&ExtractedItem> {
        match self {
            Record::Extracted(item) => Some(item),
            Record::Pending(_) => None,
        }
    }
}

impl From<PendingItem> for Record {
    fn from(item: PendingItem) -> Self {
        Record::Pending(item)
    }
}

impl From<ExtractedItem> for Record {
    fn from(item: ExtractedItem) -> Self {
        Record::Extracted(item)
    }
}
