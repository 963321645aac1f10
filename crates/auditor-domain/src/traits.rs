//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::path::Path;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (auditor-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for a fully rendered prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Check local preconditions (credentials, settings) without any network call
    fn check_ready(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Model identifier, for status messages
    fn model_name(&self) -> &str;
}

/// Trait for converting an uploaded document into plain text
///
/// Implemented by the infrastructure layer (auditor-ingest)
pub trait DocumentExtractor {
    /// Error type for extraction operations
    type Error;

    /// Extract the full text of one file; never returns partial text
    fn extract(&self, path: &Path) -> Result<String, Self::Error>;
}
