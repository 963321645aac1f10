//! Structured table parsing
//!
//! Best-effort recovery of records from the Markdown pipe table the model
//! writes after the marker. The first two lines (header and separator) are
//! discarded; every other line either matches the mode's row pattern or is
//! skipped and counted. Parsing never fails.

use auditor_domain::{
    ExtractedItem, OperationKind, PendingItem, PendingKind, Record, GENERAL_LIST_LABEL,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

static AUDIT_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\|\s*(FALTANTE|DISCREPANCIA_TECNICA|DISCREPANCIA_QUANTIDADE|IMPLICITO_FALTANTE)\s*\|\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|",
    )
    .expect("valid regex")
});

static EXTRACTION_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\|\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|")
        .expect("valid regex")
});

static LIST_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z]+)(?:_|\d|-|$)").expect("valid regex"));

/// Item cell of a separator row that leaked past the header
const SEPARATOR_CELL: &str = ":---";

/// Row shape to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    /// `| TipoPendencia | NomeLista | DetalheItem |`
    Audit,
    /// `| Categoria | Item_Consolidado | Quantidade | Especificacao_Resumida |`
    Extraction,
}

impl TableMode {
    /// Table mode of an operation kind, if it produces a table at all
    pub fn for_kind(kind: OperationKind) -> Option<Self> {
        match kind {
            OperationKind::Audit => Some(TableMode::Audit),
            OperationKind::Extraction => Some(TableMode::Extraction),
            OperationKind::DrawingCheck => None,
        }
    }
}

/// Records recovered from one structured section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    /// One record per matched row, in table order
    pub records: Vec<Record>,

    /// Non-blank data lines that produced no record
    pub skipped_lines: usize,
}

/// Parse the structured section of a completion
pub fn parse_table(section: &str, mode: TableMode) -> ParsedTable {
    let lines: Vec<&str> = section.trim().split('\n').collect();
    if lines.len() < 3 {
        return ParsedTable::default();
    }

    let mut table = ParsedTable::default();
    for line in &lines[2..] {
        match parse_row(line, mode) {
            Some(record) => table.records.push(record),
            None if line.trim().is_empty() => {}
            None => {
                debug!("Skipping unmatched table line: {}", line.trim());
                table.skipped_lines += 1;
            }
        }
    }

    info!(
        "Parsed {} records ({} lines skipped)",
        table.records.len(),
        table.skipped_lines
    );
    table
}

fn parse_row(line: &str, mode: TableMode) -> Option<Record> {
    match mode {
        TableMode::Audit => {
            let caps = AUDIT_ROW.captures(line)?;
            let kind = PendingKind::from_token(&caps[1])?;
            Some(Record::Pending(PendingItem {
                kind,
                list_name: normalize_list_name(caps[2].trim()),
                detail: caps[3].trim().to_string(),
            }))
        }
        TableMode::Extraction => {
            let caps = EXTRACTION_ROW.captures(line)?;
            let item_name = caps[2].trim();
            if item_name == SEPARATOR_CELL {
                return None;
            }
            Some(Record::Extracted(ExtractedItem {
                category: caps[1].trim().to_string(),
                item_name: item_name.to_string(),
                quantity: caps[3].trim().to_string(),
                spec_summary: caps[4].trim().to_string(),
            }))
        }
    }
}

/// Collapse a list reference to its family prefix
///
/// `N/A` (any case) becomes [`GENERAL_LIST_LABEL`]. Otherwise directories and
/// the last extension are stripped and a leading alphabetic run followed by
/// `_`, `-`, a digit or the end is kept (`LME_200ELEL5477_REV02` → `LME`).
/// Names without such a prefix are returned unchanged.
pub fn normalize_list_name(raw: &str) -> String {
    if raw.eq_ignore_ascii_case("N/A") {
        return GENERAL_LIST_LABEL.to_string();
    }

    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let stem = match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    };

    match LIST_PREFIX.captures(stem) {
        Some(caps) => caps[1].to_string(),
        None => raw.to_string(),
    }
}
