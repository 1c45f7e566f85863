//! LLM provider trait for schema-constrained JSON generation

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// What a request is for; providers pick their model from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationTask {
    /// Batch extraction and single-customer completion
    Extraction,
    /// Marketing recommendations
    Recommendation,
}

/// One schema-constrained generation request
#[derive(Debug, Clone, Copy)]
pub struct StructuredRequest<'a> {
    pub task: GenerationTask,
    /// Instruction text, with any data embedded
    pub prompt: &'a str,
    /// Response schema in the provider's OpenAPI-subset format
    pub schema: &'a Value,
}

/// Trait for structured JSON generation
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-2.5-pro / flash)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one request and return the raw JSON text of the response
    ///
    /// Transport problems and non-success statuses are `Error::Transport`; a
    /// response without any text is `Error::SchemaViolation`. The text itself
    /// is not validated here.
    async fn generate_structured(&self, request: StructuredRequest<'_>) -> Result<String>;

    /// Check if the provider is configured and reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
