//! Configuration for the CLV analytics backend

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::ingestion::DEFAULT_BATCH_SIZE;

/// Environment variables checked (in order) for the Gemini API key
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClvConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Gemini configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Batch ingestion configuration
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

impl ClvConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let config: ClvConfig = toml::from_str(&raw)?;
                tracing::info!("Loaded configuration from {}", path.display());
                config
            }
            None => ClvConfig::default(),
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
        {
            self.llm.api_key = Some(key);
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.ingestion.batch_size == 0 {
            return Err(Error::Config("ingestion.batch_size must be at least 1".to_string()));
        }
        if self.llm.extraction_model.trim().is_empty()
            || self.llm.recommendation_model.trim().is_empty()
        {
            return Err(Error::Config("llm model names must not be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(Error::Config("server.port must not be 0".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 20MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 20 * 1024 * 1024,
        }
    }
}

/// Gemini configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Generative Language API base URL
    pub base_url: String,
    /// API key (normally supplied through the environment)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model used for batch extraction and single-customer completion
    pub extraction_model: String,
    /// Model used for marketing recommendations
    pub recommendation_model: String,
    /// Sampling temperature; `None` leaves the model default
    pub temperature: Option<f32>,
    /// Per-request transport timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            extraction_model: "gemini-2.5-pro".to_string(),
            recommendation_model: "gemini-2.5-flash".to_string(),
            temperature: None,
            timeout_secs: 300, // 100-row batches on the pro model are slow
        }
    }
}

/// Batch ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Maximum data rows per batch
    pub batch_size: usize,
    /// Treat a batch whose record count differs from its row count as a schema violation
    pub strict_row_counts: bool,
    /// Number of customers listed in the dashboard's top-CLV table
    pub top_customers: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            strict_row_counts: false,
            top_customers: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClvConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ingestion.batch_size, 100);
        assert_eq!(config.llm.extraction_model, "gemini-2.5-pro");
        assert_eq!(config.llm.recommendation_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ClvConfig = toml::from_str(
            r#"
            [ingestion]
            batch_size = 25
            strict_row_counts = true

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.ingestion.batch_size, 25);
        assert!(config.ingestion.strict_row_counts);
        assert_eq!(config.ingestion.top_customers, 5);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.timeout_secs, 300);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = ClvConfig::default();
        config.ingestion.batch_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = ClvConfig::default();
        config.llm.api_key = Some("secret".to_string());
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }
}
