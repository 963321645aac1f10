//! Aggregations behind the result chart, and the notice shown with a result.

use auditor_domain::{AuditResult, PendingKind, Record};
use std::collections::BTreeMap;

/// Phrase the audit template asks for when there are no discrepancies
pub const NO_FINDINGS_PHRASE: &str = "nenhuma pendência encontrada";

/// Count of pending items for one (list, kind) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCount {
    /// Normalized list name
    pub list_name: String,
    /// Discrepancy kind
    pub kind: PendingKind,
    /// Number of records
    pub count: usize,
}

/// Count of extracted items in one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    /// Category label
    pub category: String,
    /// Number of records
    pub count: usize,
}

/// Group audit records by list then kind
pub fn pending_counts(records: &[Record]) -> Vec<PendingCount> {
    let mut counts: BTreeMap<(&str, PendingKind), usize> = BTreeMap::new();
    for item in records.iter().filter_map(Record::as_pending) {
        *counts.entry((item.list_name.as_str(), item.kind)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((list_name, kind), count)| PendingCount {
            list_name: list_name.to_string(),
            kind,
            count,
        })
        .collect()
}

/// Group extraction records by category
pub fn category_counts(records: &[Record]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in records.iter().filter_map(Record::as_extracted) {
        *counts.entry(item.category.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// What to tell the user about a stored result's structured data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultNotice {
    /// The table produced records
    Records(usize),
    /// No records, and the report says nothing was found
    NoFindings,
    /// No records could be recovered; only the report is available
    NoStructuredData,
}

impl ResultNotice {
    /// Classify a result
    pub fn of(result: &AuditResult) -> Self {
        if result.has_records() {
            ResultNotice::Records(result.records.len())
        } else if result.report_text.to_lowercase().contains(NO_FINDINGS_PHRASE) {
            ResultNotice::NoFindings
        } else {
            ResultNotice::NoStructuredData
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditor_domain::{ExtractedItem, PendingItem};

    fn pending(list: &str, kind: PendingKind) -> Record {
        Record::Pending(PendingItem {
            kind,
            list_name: list.to_string(),
            detail: "x".to_string(),
        })
    }

    fn extracted(category: &str) -> Record {
        Record::Extracted(ExtractedItem {
            category: category.to_string(),
            item_name: "i".to_string(),
            quantity: "1".to_string(),
            spec_summary: "N/A".to_string(),
        })
    }

    #[test]
    fn test_pending_counts_grouped_and_ordered() {
        let records = vec![
            pending("LMM", PendingKind::QtyMismatch),
            pending("LME", PendingKind::ImplicitMissing),
            pending("LME", PendingKind::Missing),
            pending("LMM", PendingKind::QtyMismatch),
            pending("LME", PendingKind::Missing),
        ];
        let counts = pending_counts(&records);
        assert_eq!(
            counts,
            vec![
                PendingCount { list_name: "LME".into(), kind: PendingKind::Missing, count: 2 },
                PendingCount { list_name: "LME".into(), kind: PendingKind::ImplicitMissing, count: 1 },
                PendingCount { list_name: "LMM".into(), kind: PendingKind::QtyMismatch, count: 2 },
            ]
        );
    }

    #[test]
    fn test_category_counts() {
        let records = vec![extracted("Mecânica"), extracted("Elétrica"), extracted("Mecânica")];
        let counts = category_counts(&records);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0], CategoryCount { category: "Elétrica".into(), count: 1 });
        assert_eq!(counts[1], CategoryCount { category: "Mecânica".into(), count: 2 });
        assert!(pending_counts(&records).is_empty());
    }

    #[test]
    fn test_notice() {
        let with_records = AuditResult::new(vec![pending("LME", PendingKind::Missing)], "r", 0);
        assert_eq!(ResultNotice::of(&with_records), ResultNotice::Records(1));

        let clean = AuditResult::new(Vec::new(), "Auditoria Concluída. Nenhuma pendência encontrada.", 0);
        assert_eq!(ResultNotice::of(&clean), ResultNotice::NoFindings);

        let garbled = AuditResult::new(Vec::new(), "Resposta sem tabela", 3);
        assert_eq!(ResultNotice::of(&garbled), ResultNotice::NoStructuredData);
    }
}
