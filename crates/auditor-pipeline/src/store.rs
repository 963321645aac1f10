//! Result Store
//!
//! One slot per operation kind. Starting any operation clears every slot, so
//! at most one kind ever holds a result and the session always shows the
//! output of the last successful run.

use auditor_domain::{AuditResult, OperationKind};
use std::collections::BTreeMap;
use tracing::debug;

/// Active results of the session, keyed by operation kind
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    slots: BTreeMap<OperationKind, AuditResult>,
}

impl ResultStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// An operation of `kind` is starting: clear its slot and every other one
    pub fn begin(&mut self, kind: OperationKind) {
        debug!("Store: begin {} (clearing {} results)", kind, self.slots.len());
        self.slots.clear();
    }

    /// Install the result of a finished operation, replacing any previous one
    pub fn complete(&mut self, kind: OperationKind, result: AuditResult) {
        debug!("Store: complete {} ({} records)", kind, result.records.len());
        self.slots.retain(|held, _| *held == kind);
        self.slots.insert(kind, result);
    }

    /// An operation of `kind` failed: clear its slot only
    pub fn fail(&mut self, kind: OperationKind) {
        debug!("Store: fail {}", kind);
        self.slots.remove(&kind);
    }

    /// The single active result, if any
    pub fn active(&self) -> Option<(OperationKind, &AuditResult)> {
        self.slots.iter().next().map(|(kind, result)| (*kind, result))
    }

    /// Result held for `kind`
    pub fn get(&self, kind: OperationKind) -> Option<&AuditResult> {
        self.slots.get(&kind)
    }

    /// Clear everything
    pub fn reset(&mut self) {
        debug!("Store: reset");
        self.slots.clear();
    }

    /// Whether no kind holds a result
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditor_domain::{PendingItem, PendingKind, Record};

    fn result(detail: &str) -> AuditResult {
        AuditResult::new(
            vec![Record::Pending(PendingItem {
                kind: PendingKind::Missing,
                list_name: "LME".to_string(),
                detail: detail.to_string(),
            })],
            "Relatório",
            0,
        )
    }

    #[test]
    fn test_complete_then_active() {
        let mut store = ResultStore::new();
        assert!(store.active().is_none());

        store.begin(OperationKind::Audit);
        store.complete(OperationKind::Audit, result("a"));

        let (kind, active) = store.active().unwrap();
        assert_eq!(kind, OperationKind::Audit);
        assert_eq!(active.report_text, "Relatório");
        assert!(store.get(OperationKind::Audit).is_some());
    }

    #[test]
    fn test_mutual_exclusivity() {
        let mut store = ResultStore::new();
        store.begin(OperationKind::Audit);
        store.complete(OperationKind::Audit, result("a"));

        store.begin(OperationKind::Extraction);
        assert!(store.is_empty());
        store.complete(OperationKind::Extraction, AuditResult::new(Vec::new(), "BOM", 0));

        assert!(store.get(OperationKind::Audit).is_none());
        assert_eq!(store.active().unwrap().0, OperationKind::Extraction);
    }

    #[test]
    fn test_complete_without_begin_keeps_one_slot() {
        let mut store = ResultStore::new();
        store.complete(OperationKind::Audit, result("a"));
        store.complete(OperationKind::DrawingCheck, AuditResult::new(Vec::new(), "ok", 0));

        assert!(store.get(OperationKind::Audit).is_none());
        assert_eq!(store.active().unwrap().0, OperationKind::DrawingCheck);
    }

    #[test]
    fn test_rerun_replaces_wholesale() {
        let mut store = ResultStore::new();
        store.complete(OperationKind::Audit, result("first"));
        store.begin(OperationKind::Audit);
        store.complete(OperationKind::Audit, result("second"));

        let active = store.get(OperationKind::Audit).unwrap();
        assert_eq!(active.records.len(), 1);
        assert_eq!(active.pending_items().next().unwrap().detail, "second");
    }

    #[test]
    fn test_fail_clears_only_its_kind() {
        let mut store = ResultStore::new();
        store.complete(OperationKind::Audit, result("a"));

        store.fail(OperationKind::Extraction);
        assert!(store.get(OperationKind::Audit).is_some());

        store.fail(OperationKind::Audit);
        assert!(store.active().is_none());
    }

    #[test]
    fn test_reset() {
        let mut store = ResultStore::new();
        store.complete(OperationKind::Extraction, result("a"));
        store.reset();
        assert!(store.is_empty());
        assert!(store.active().is_none());
    }
}
