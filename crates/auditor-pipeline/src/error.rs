//! Error types for the Pipeline

use auditor_ingest::IngestError;
use auditor_llm::LlmError;
use thiserror::Error;

/// Errors that can end an operation
///
/// Format mismatches in the model's answer are not errors; they yield a
/// result with no records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Missing credential, missing upload or empty content; nothing was sent
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A document could not be turned into text
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The model call failed
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model call exceeded the configured timeout
    #[error("LLM call timed out after {0}s")]
    Timeout(u64),

    /// Extracted text exceeds the configured limit
    #[error("Input too long: {0} chars (max: {1})")]
    InputTooLong(usize, usize),

    /// A template placeholder had no value
    #[error("Missing template variable: {0}")]
    MissingVariable(String),
}

impl PipelineError {
    /// Remediation hint for model failures
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            PipelineError::Llm(e) => Some(e.hint()),
            PipelineError::Timeout(_) => Some("Raise llm_timeout_secs or send fewer documents."),
            PipelineError::InputTooLong(..) => Some("Send fewer lists or raise max_input_chars."),
            _ => None,
        }
    }
}
