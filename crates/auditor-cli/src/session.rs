//! The audit session driven by the one-shot commands and the REPL.

use crate::error::{CliError, Result};
use auditor_ingest::FileExtractor;
use auditor_llm::gemini::DEFAULT_ENDPOINT;
use auditor_llm::GeminiProvider;
use auditor_pipeline::{Pipeline, PipelineConfig, PipelineError};
use tracing::debug;

/// A pipeline over the real file readers and the Gemini API
pub type Session = Pipeline<GeminiProvider, FileExtractor>;

/// Open a session for `config`.
///
/// A missing API key is not an error here; operations report it as a failed
/// precondition.
pub fn open_session(config: &PipelineConfig, api_key: Option<String>) -> Result<Session> {
    config.validate().map_err(CliError::Config)?;
    let llm = GeminiProvider::new(DEFAULT_ENDPOINT, config.model.clone(), api_key)
        .map_err(|e| CliError::Pipeline(PipelineError::Llm(e)))?;
    debug!(model = %config.model, credential = llm.has_credential(), "Session opened");
    Ok(Pipeline::new(llm, FileExtractor::new(), config.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditor_pipeline::PipelineState;

    #[test]
    fn test_open_session_without_key() {
        let session = open_session(&PipelineConfig::default(), None).unwrap();
        assert_eq!(session.state(), PipelineState::Idle);
        assert_eq!(session.model_name(), PipelineConfig::default().model);
    }

    #[test]
    fn test_open_session_rejects_invalid_config() {
        let config = PipelineConfig {
            llm_timeout_secs: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(open_session(&config, None), Err(CliError::Config(_))));
    }
}
