//! Prompt and schema construction plus the Gemini client

pub mod gemini;
pub mod prompt;
pub mod schema;

pub use gemini::GeminiClient;
pub use prompt::PromptBuilder;
