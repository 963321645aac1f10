//! Error types for the CLI.

use auditor_pipeline::PipelineError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// No result has been produced in this session
    #[error("No result available. Run audit, extract or check first.")]
    NoResult,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Line editor error
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Remediation hint shown under the error, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Pipeline(e) => e.hint(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditor_llm::LlmError;

    #[test]
    fn test_pipeline_error_keeps_message_and_hint() {
        let err: CliError = PipelineError::Llm(LlmError::QuotaExceeded("429".into())).into();
        assert!(err.to_string().contains("429"));
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_precondition_has_no_hint() {
        let err: CliError = PipelineError::Precondition("GOOGLE_API_KEY is not set".into()).into();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
        assert!(err.hint().is_none());
    }
}
