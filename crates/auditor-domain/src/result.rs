//! Result module - the output of one completed operation

use crate::record::{PendingItem, Record};
use std::fmt;

/// Unique identifier for a completed run, based on UUIDv7
///
/// The embedded millisecond timestamp is the generation time; exported report
/// names are stamped from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    ///
    /// # Examples
    ///
    /// ```
    /// use auditor_domain::RunId;
    ///
    /// let id = RunId::new();
    /// assert!(id.timestamp() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RunId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which the run was created
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Records plus report text of one successful LLM run
///
/// Results are replaced wholesale; nothing ever appends to an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditResult {
    /// Identity and generation time
    pub run_id: RunId,

    /// Parsed rows, in table order
    pub records: Vec<Record>,

    /// Markdown text preceding the structured marker
    pub report_text: String,

    /// Data lines of the structured table that matched no row pattern
    pub skipped_lines: usize,
}

impl AuditResult {
    /// Create a result stamped with a fresh run id
    pub fn new(records: Vec<Record>, report_text: impl Into<String>, skipped_lines: usize) -> Self {
        Self {
            run_id: RunId::new(),
            records,
            report_text: report_text.into(),
            skipped_lines,
        }
    }

    /// Whether the run produced any structured rows
    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    /// Iterate over the audit-mode rows
    pub fn pending_items(&self) -> impl Iterator<Item = &PendingItem> {
        self.records.iter().filter_map(Record::as_pending)
    }
}
