//! Provider abstraction for the structured-output LLM
//!
//! The pipeline only sees the `LlmProvider` trait, so the Gemini client can be
//! replaced by another backend or by an in-process fake.

pub mod llm;

pub use llm::{GenerationTask, LlmProvider, StructuredRequest};
