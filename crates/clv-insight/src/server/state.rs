//! Application state for the CLV server

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::ClvConfig;
use crate::error::{Error, Result};
use crate::generation::GeminiClient;
use crate::processing::CustomerPipeline;
use crate::providers::LlmProvider;
use crate::types::{Customer, IngestResponse, UploadStatus};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ClvConfig,
    /// Extraction and recommendation pipeline
    pipeline: CustomerPipeline,
    /// Loaded customers, most recent upload or additions first
    customers: RwLock<Vec<Customer>>,
    /// Set while an upload is being processed
    uploading: AtomicBool,
    /// Outcome of the last upload
    last_error: RwLock<Option<String>>,
    last_run: RwLock<Option<IngestResponse>>,
    /// Ready state
    ready: RwLock<bool>,
}

/// Releases the upload slot when dropped
pub struct UploadGuard {
    state: AppState,
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        self.state.inner.uploading.store(false, Ordering::SeqCst);
    }
}

impl AppState {
    /// Create new application state backed by Gemini
    pub async fn new(config: ClvConfig) -> Result<Self> {
        tracing::info!("Initializing CLV application state...");

        let gemini = GeminiClient::new(&config.llm)?;
        tracing::info!(
            "Gemini client initialized (extraction: {}, recommendations: {})",
            config.llm.extraction_model,
            config.llm.recommendation_model
        );

        Ok(Self::with_provider(config, Arc::new(gemini)))
    }

    /// Create application state on top of any provider
    pub fn with_provider(config: ClvConfig, llm: Arc<dyn LlmProvider>) -> Self {
        let pipeline = CustomerPipeline::new(llm, config.ingestion.clone());
        tracing::info!(
            "Pipeline initialized (batch size: {}, strict row counts: {})",
            config.ingestion.batch_size,
            config.ingestion.strict_row_counts
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                customers: RwLock::new(Vec::new()),
                uploading: AtomicBool::new(false),
                last_error: RwLock::new(None),
                last_run: RwLock::new(None),
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &ClvConfig {
        &self.inner.config
    }

    /// Get the processing pipeline
    pub fn pipeline(&self) -> &CustomerPipeline {
        &self.inner.pipeline
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }

    /// Claim the single upload slot
    pub fn begin_upload(&self) -> Result<UploadGuard> {
        if self
            .inner
            .uploading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::Busy("an upload is already being processed".to_string()));
        }
        *self.inner.last_error.write() = None;
        Ok(UploadGuard { state: self.clone() })
    }

    /// Record a successful upload, replacing the customer collection
    pub fn finish_upload(&self, customers: Vec<Customer>, report: IngestResponse) {
        self.replace_customers(customers);
        *self.inner.last_run.write() = Some(report);
    }

    /// Record a failed upload; the existing collection is kept
    pub fn fail_upload(&self, message: impl Into<String>) {
        *self.inner.last_error.write() = Some(message.into());
    }

    /// Current upload status
    pub fn upload_status(&self) -> UploadStatus {
        UploadStatus {
            state: self.inner.pipeline.state(),
            error: self.inner.last_error.read().clone(),
            last_run: self.inner.last_run.read().clone(),
        }
    }

    /// Replace the customer collection
    pub fn replace_customers(&self, customers: Vec<Customer>) {
        *self.inner.customers.write() = customers;
    }

    /// Add a customer at the front of the collection
    ///
    /// A customer with the same id is replaced.
    pub fn add_customer(&self, customer: Customer) {
        let mut customers = self.inner.customers.write();
        customers.retain(|c| c.id != customer.id);
        customers.insert(0, customer);
    }

    /// Get a customer by id
    pub fn get_customer(&self, id: &str) -> Option<Customer> {
        self.inner.customers.read().iter().find(|c| c.id == id).cloned()
    }

    /// Run `f` against the customer collection without copying it
    pub fn with_customers<T>(&self, f: impl FnOnce(&[Customer]) -> T) -> T {
        f(&self.inner.customers.read())
    }
}
