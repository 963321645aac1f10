//! Gemini Provider Implementation
//!
//! Integration with Google's Generative Language API (`generateContent`).
//!
//! # Features
//!
//! - Async HTTP communication, with a blocking `LlmProvider` wrapper
//! - API key read from `GOOGLE_API_KEY`
//! - Retry with exponential backoff for transport and server errors
//! - Error messages classified into the shared `LlmError` taxonomy
//!
//! # Examples
//!
//! ```no_run
//! use auditor_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::from_env("gemini-flash-latest");
//! ```

use crate::LlmError;
use auditor_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Default timeout for a single HTTP request (5 minutes; audits of large lists are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the generateContent API
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response from the generateContent API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL, without the `/models/...` suffix
    /// - `model`: Model to use (e.g., "gemini-flash-latest")
    /// - `api_key`: Credential; `None` makes every operation fail its precondition
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Generation(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider on the default endpoint, reading the key from `GOOGLE_API_KEY`
    ///
    /// A missing variable is not an error here; it is reported by `check_ready`
    /// when an operation is started.
    pub fn from_env(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model, std::env::var(API_KEY_ENV).ok())
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Whether an API key is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Generate text using the Gemini API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No API key is configured
    /// - The API rejects the key, the quota, or the model name
    /// - Network communication fails after all retries
    /// - The response carries no text
    pub async fn generate_async(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::MissingCredential(API_KEY_ENV.to_string()))?;

        let url = self.url();
        let request_body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        info!("Calling model '{}' with {} prompt chars", self.model, prompt.chars().count());

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .map_err(|e| LlmError::Generation(format!("Failed to read response: {}", e)))?;

                    if status.is_success() {
                        return parse_generate_response(&body);
                    }

                    let error = LlmError::classify(describe_error(status.as_u16(), &body));
                    if !status.is_server_error() {
                        // Client errors (bad key, quota, unknown model) will not improve on retry
                        return Err(error);
                    }
                    warn!("Attempt {} failed: {}", attempts + 1, error);
                    last_error = Some(error);
                }
                Err(e) => {
                    warn!("Attempt {} failed: request error: {}", attempts + 1, e);
                    last_error = Some(LlmError::classify(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Generation("Max retries exceeded".to_string())))
    }
}

impl LlmProviderTrait for GeminiProvider {
    type Error = LlmError;

    /// Blocking wrapper around [`GeminiProvider::generate_async`]
    ///
    /// Must not be called from an async task; the pipeline calls it from
    /// `spawn_blocking`, where the ambient runtime handle is reused.
    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.generate_async(prompt)),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Generation(format!("Failed to start runtime: {}", e)))?
                .block_on(self.generate_async(prompt)),
        }
    }

    fn check_ready(&self) -> Result<(), Self::Error> {
        if self.api_key.is_none() {
            return Err(LlmError::MissingCredential(API_KEY_ENV.to_string()));
        }
        Ok(())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Turn a non-2xx response into a message carrying the API's own wording
fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("HTTP {} {}: {}", status, code, envelope.error.message),
            None => format!("HTTP {}: {}", status, envelope.error.message),
        },
        Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
        Err(_) => format!("HTTP {}: {}", status, body.trim()),
    }
}

/// Concatenate the text parts of the first candidate
fn parse_generate_response(body: &str) -> Result<String, LlmError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::Generation(format!("Failed to parse response: {}", e)))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(LlmError::Generation(format!("Empty response: {}", reason)));
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(LlmError::Generation(format!("Empty response (finish reason: {})", reason)));
    }

    debug!("Received {} chars from model", text.chars().count());
    Ok(text)
}
