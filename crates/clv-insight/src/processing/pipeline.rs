//! Batch ingestion pipeline
//!
//! A CSV upload is split into batches which are all sent to the extraction
//! model at once and awaited jointly. Results are merged in dispatch order.
//! If any batch fails the whole run fails and nothing is returned; the caller
//! retries by running the upload again.

use futures_util::future::join_all;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::config::IngestionConfig;
use crate::error::{Error, Result};
use crate::generation::{schema, PromptBuilder};
use crate::ingestion::{parse_customer, parse_customers, parse_recommendations, split_batches, Batch};
use crate::providers::{GenerationTask, LlmProvider, StructuredRequest};
use crate::types::{Customer, MarketingAction, PartialCustomer};

/// Lifecycle of one ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing has run yet
    Idle,
    /// Batches are being built and sent
    Dispatching,
    /// Every batch is in flight; waiting for all of them
    AwaitingAll,
    Succeeded,
    Failed,
}

/// Merged result of a successful ingestion run
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Customers in batch order, then in the order the model returned them
    pub customers: Vec<Customer>,
    /// Data rows in the upload
    pub rows: usize,
    /// Batches dispatched
    pub batches: usize,
}

/// Pipeline turning CSV uploads and partial records into validated customers
pub struct CustomerPipeline {
    llm: Arc<dyn LlmProvider>,
    config: IngestionConfig,
    state: RwLock<PipelineState>,
}

impl CustomerPipeline {
    /// Create a new pipeline on top of an LLM provider
    pub fn new(llm: Arc<dyn LlmProvider>, config: IngestionConfig) -> Self {
        Self {
            llm,
            config,
            state: RwLock::new(PipelineState::Idle),
        }
    }

    /// State of the most recent ingestion run
    pub fn state(&self) -> PipelineState {
        *self.state.read()
    }

    /// Get the underlying provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    fn set_state(&self, state: PipelineState) {
        *self.state.write() = state;
    }

    /// Process a CSV document into customers
    pub async fn process_file(&self, csv: &str) -> Result<Vec<Customer>> {
        self.ingest(csv).await.map(|outcome| outcome.customers)
    }

    /// Process a CSV document, returning the customers with run statistics
    pub async fn ingest(&self, csv: &str) -> Result<IngestOutcome> {
        self.set_state(PipelineState::Dispatching);

        let batches = match split_batches(csv, self.config.batch_size) {
            Ok(batches) => batches,
            Err(e) => {
                self.set_state(PipelineState::Failed);
                return Err(e);
            }
        };

        if batches.is_empty() {
            tracing::info!("Upload has no data rows, nothing to process");
            self.set_state(PipelineState::Succeeded);
            return Ok(IngestOutcome {
                customers: Vec::new(),
                rows: 0,
                batches: 0,
            });
        }

        let rows = batches.last().map(|b| b.rows.end).unwrap_or(0);
        let total = batches.len();
        tracing::info!("Processing {} customers in {} batches", rows, total);

        let schema = schema::customer_array_schema();
        let batch_futures: Vec<_> = batches
            .iter()
            .map(|batch| self.process_batch(batch, &schema))
            .collect();

        self.set_state(PipelineState::AwaitingAll);
        let results = join_all(batch_futures).await;

        let mut customers = Vec::with_capacity(rows);
        let mut failed = 0;
        let mut first_error = None;

        for (batch, result) in batches.iter().zip(results) {
            match result {
                Ok(mut batch_customers) => customers.append(&mut batch_customers),
                Err(e) => {
                    failed += 1;
                    tracing::error!(
                        "Batch {}/{} (rows {}-{}) failed: {}",
                        batch.index + 1,
                        total,
                        batch.rows.start + 1,
                        batch.rows.end,
                        e
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(cause) = first_error {
            self.set_state(PipelineState::Failed);
            return Err(Error::IngestionFailed {
                failed,
                total,
                cause: Box::new(cause),
            });
        }

        if customers.len() != rows {
            tracing::warn!(
                "Model returned {} customers for {} input rows",
                customers.len(),
                rows
            );
        }
        tracing::info!("Successfully processed {} customers", customers.len());
        self.set_state(PipelineState::Succeeded);

        Ok(IngestOutcome {
            customers,
            rows,
            batches: total,
        })
    }

    async fn process_batch(&self, batch: &Batch, schema: &Value) -> Result<Vec<Customer>> {
        let prompt = PromptBuilder::build_batch_prompt(&batch.csv);

        tracing::debug!(
            "Dispatching batch {} ({} rows)",
            batch.index + 1,
            batch.row_count()
        );

        let text = self
            .llm
            .generate_structured(StructuredRequest {
                task: GenerationTask::Extraction,
                prompt: &prompt,
                schema,
            })
            .await?;

        let customers = parse_customers(&text)?;

        if customers.len() != batch.row_count() {
            let message = format!(
                "batch {} returned {} customers for {} rows",
                batch.index + 1,
                customers.len(),
                batch.row_count()
            );
            if self.config.strict_row_counts {
                return Err(Error::schema(message));
            }
            tracing::warn!("Row count mismatch: {}", message);
        }

        tracing::debug!("Batch {} returned {} customers", batch.index + 1, customers.len());
        Ok(customers)
    }

    /// Complete a partially known customer into a full record
    pub async fn process_single_customer(&self, partial: &PartialCustomer) -> Result<Customer> {
        let prompt = PromptBuilder::build_single_customer_prompt(partial);
        let schema = schema::customer_schema();

        let text = self
            .llm
            .generate_structured(StructuredRequest {
                task: GenerationTask::Extraction,
                prompt: &prompt,
                schema: &schema,
            })
            .await?;

        let customer = parse_customer(&text)?;

        if let Some(expected) = partial.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            if customer.id != expected {
                return Err(Error::schema(format!(
                    "completed customer has id '{}', expected '{}'",
                    customer.id, expected
                )));
            }
        }

        tracing::info!(
            "Completed customer {} (segment: {}, CLV: {:.2})",
            customer.id,
            customer.segment,
            customer.clv_data.clv_estimate
        );
        Ok(customer)
    }

    /// Generate marketing recommendations for a customer
    pub async fn recommendations(&self, customer: &Customer) -> Result<Vec<MarketingAction>> {
        let prompt = PromptBuilder::build_recommendation_prompt(customer);
        let schema = schema::recommendation_schema();

        let text = self
            .llm
            .generate_structured(StructuredRequest {
                task: GenerationTask::Recommendation,
                prompt: &prompt,
                schema: &schema,
            })
            .await?;

        let actions = parse_recommendations(&text)?;
        tracing::info!("Generated {} recommendations for {}", actions.len(), customer.id);
        Ok(actions)
    }
}
