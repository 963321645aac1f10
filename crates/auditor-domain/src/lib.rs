//! Auditor Domain Layer
//!
//! Core data model for the engineering audit agent. Like the rest of the
//! domain layer it has no infrastructure dependencies: it defines the records
//! recovered from LLM answers, the operation kinds a session can run, and the
//! trait seams the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Pending item**: a discrepancy between the source-of-truth document (SP)
//!   and an engineering list
//! - **Extracted item**: one consolidated bill-of-materials entry taken from the SP
//! - **Operation kind**: audit, extraction or drawing check; each owns one result slot
//! - **Audit result**: the records plus the free-text Markdown report of one run
//!
//! ## Architecture
//!
//! - `LlmProvider` is implemented by `auditor-llm`
//! - `DocumentExtractor` is implemented by `auditor-ingest`
//! - Orchestration lives in `auditor-pipeline`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod operation;
pub mod record;
pub mod result;
pub mod traits;

// Re-exports for convenience
pub use operation::OperationKind;
pub use record::{ExtractedItem, PendingItem, PendingKind, Record, GENERAL_LIST_LABEL};
pub use result::{AuditResult, RunId};
