//! Response splitting
//!
//! Separates the free-text report from the structured section that follows
//! the operation's marker. Never fails: a missing marker just means there is
//! no structured data.

use auditor_domain::OperationKind;

/// Word the model writes instead of a table when it has nothing to report
pub const NONE_SENTINEL: &str = "Nenhuma";

/// A completion cut in two at the marker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResponse {
    /// Text before the marker, trimmed
    pub report_text: String,

    /// Text after the marker, trimmed; empty when absent or "Nenhuma"
    pub structured_section: String,
}

impl SplitResponse {
    /// Whether there is a section worth handing to the table parser
    pub fn has_structure(&self) -> bool {
        !self.structured_section.is_empty()
    }
}

/// Split `raw` at the first occurrence of `marker`
pub fn split_response(raw: &str, marker: &str) -> SplitResponse {
    match raw.split_once(marker) {
        Some((report, section)) => {
            let section = section.trim();
            let structured_section = if section.eq_ignore_ascii_case(NONE_SENTINEL) {
                String::new()
            } else {
                section.to_string()
            };
            SplitResponse {
                report_text: report.trim().to_string(),
                structured_section,
            }
        }
        None => whole_report(raw),
    }
}

/// Split with the marker of `kind`; kinds without a marker are never split
pub fn split_for(kind: OperationKind, raw: &str) -> SplitResponse {
    match kind.marker() {
        Some(marker) => split_response(raw, marker),
        None => whole_report(raw),
    }
}

fn whole_report(raw: &str) -> SplitResponse {
    SplitResponse {
        report_text: raw.trim().to_string(),
        structured_section: String::new(),
    }
}
