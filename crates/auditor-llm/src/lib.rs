//! Auditor LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `auditor-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Generative Language API
//!
//! # Error classification
//!
//! Provider failures arrive as free-form messages. [`LlmError::classify`] sorts
//! them into authentication, quota, missing-model and generic generation
//! errors by case-insensitive keyword matching, so every provider reports the
//! same taxonomy.
//!
//! # Examples
//!
//! ```
//! use auditor_llm::MockProvider;
//! use auditor_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Auditoria Concluída.");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Auditoria Concluída.");
//! ```

#![warn(missing_docs)]

pub mod gemini;

use auditor_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Rejected credential (invalid or revoked API key)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Quota or rate limit exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Requested model does not exist for this credential
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Any other failure while generating
    #[error("Generation error: {0}")]
    Generation(String),

    /// Credential absent from the environment; raised before any network call
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),
}

impl LlmError {
    /// Classify a raw provider error message
    ///
    /// Checks run in order: credential keywords, then quota keywords, then
    /// "model" together with "not found". Anything else is a generic
    /// generation error.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        if lower.contains("api key") || lower.contains("credential") {
            LlmError::Auth(message)
        } else if lower.contains("quota") || lower.contains("limit") || lower.contains("free tier") {
            LlmError::QuotaExceeded(message)
        } else if lower.contains("model") && lower.contains("not found") {
            LlmError::ModelNotFound(message)
        } else {
            LlmError::Generation(message)
        }
    }

    /// Short remediation hint shown next to the raw error
    pub fn hint(&self) -> &'static str {
        match self {
            LlmError::Auth(_) => "Check the API key configured in GOOGLE_API_KEY.",
            LlmError::QuotaExceeded(_) => "API usage limit reached; wait or upgrade the plan.",
            LlmError::ModelNotFound(_) => "Check the configured model name.",
            LlmError::Generation(_) => "The model call failed; try again.",
            LlmError::MissingCredential(_) => "Export GOOGLE_API_KEY before running an operation.",
        }
    }
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use auditor_llm::MockProvider;
/// use auditor_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Per-prompt responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Result<String, String>,
    responses: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    missing_credential: bool,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Ok(response.into()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            missing_credential: false,
        }
    }

    /// Create a MockProvider that fails every call with the given raw message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default_response: Err(message.into()),
            ..Self::default()
        }
    }

    /// Simulate an absent credential; `check_ready` fails
    pub fn without_credential(mut self) -> Self {
        self.missing_credential = true;
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), Ok(response.into()));
    }

    /// Configure a raw error message for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), Err(message.into()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        let outcome = responses.get(prompt).unwrap_or(&self.default_response);

        outcome.clone().map_err(LlmError::classify)
    }

    fn check_ready(&self) -> Result<(), Self::Error> {
        if self.missing_credential {
            return Err(LlmError::MissingCredential(gemini::API_KEY_ENV.to_string()));
        }
        Ok(())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt");
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello").unwrap(), "world");
        assert_eq!(provider.generate("foo").unwrap(), "bar");
        assert_eq!(provider.generate("unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_provider_records_prompts() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").unwrap();
        provider.generate("prompt2").unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);
    }

    #[test]
    fn test_mock_provider_error_is_classified() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt", "Resource has been exhausted (e.g. check quota).");

        let result = provider.generate("bad prompt");
        assert!(matches!(result, Err(LlmError::QuotaExceeded(_))));
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_mock_provider_without_credential() {
        let provider = MockProvider::new("x").without_credential();
        assert!(matches!(provider.check_ready(), Err(LlmError::MissingCredential(_))));
        assert!(MockProvider::new("x").check_ready().is_ok());
    }

    #[test]
    fn test_classify_auth() {
        assert!(matches!(
            LlmError::classify("API key not valid. Please pass a valid API key."),
            LlmError::Auth(_)
        ));
        assert!(matches!(
            LlmError::classify("Could not load default Credentials"),
            LlmError::Auth(_)
        ));
    }

    #[test]
    fn test_classify_quota() {
        assert!(matches!(LlmError::classify("429 Quota exceeded"), LlmError::QuotaExceeded(_)));
        assert!(matches!(LlmError::classify("Rate LIMIT reached"), LlmError::QuotaExceeded(_)));
        assert!(matches!(
            LlmError::classify("not available on the Free Tier"),
            LlmError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn test_classify_model_not_found() {
        assert!(matches!(
            LlmError::classify("models/gemini-x is not found for API version v1beta"),
            LlmError::ModelNotFound(_)
        ));
        // "not found" alone is not enough
        assert!(matches!(LlmError::classify("404 page not found"), LlmError::Generation(_)));
    }

    #[test]
    fn test_classify_precedence() {
        // Credential keywords win over quota keywords
        assert!(matches!(
            LlmError::classify("api key over limit"),
            LlmError::Auth(_)
        ));
    }

    #[test]
    fn test_classify_preserves_message() {
        let err = LlmError::classify("connection reset by peer");
        assert_eq!(err, LlmError::Generation("connection reset by peer".to_string()));
        assert_eq!(err.to_string(), "Generation error: connection reset by peer");
    }
}
