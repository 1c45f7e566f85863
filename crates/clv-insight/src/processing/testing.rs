//! In-process LLM fake for pipeline and server tests

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::providers::{GenerationTask, LlmProvider, StructuredRequest};
use crate::types::customer::fixtures;
use crate::types::{Customer, CustomerSegment};

pub(crate) const TEST_HEADER: &str = "Customer,State,Income,Monthly Premium Auto";

/// CSV document with `rows` customers named C0001, C0002, ...
pub(crate) fn csv_document(rows: usize) -> String {
    let mut doc = String::from(TEST_HEADER);
    for i in 1..=rows {
        doc.push_str(&format!("\nC{:04},Oregon,{},{}", i, 20000 + i * 10, 60 + i % 40));
    }
    doc
}

/// CSV fragment inside the fenced block of a batch prompt
pub(crate) fn embedded_csv(prompt: &str) -> Option<&str> {
    let start = prompt.find("```csv\n")? + "```csv\n".len();
    let end = start + prompt[start..].find("\n```")?;
    Some(&prompt[start..end])
}

/// Scripted provider answering from the CSV embedded in each prompt
#[derive(Default)]
pub(crate) struct FakeLlm {
    /// Batches containing this customer id fail with a transport error
    pub fail_row: Option<String>,
    /// Batches containing this customer id answer with non-JSON text
    pub malformed_row: Option<String>,
    /// Each batch answer omits its last customer
    pub drop_last_record: bool,
    /// Earlier batches answer later
    pub reverse_completion: bool,
    /// Single-customer completions answer with this id
    pub single_id_override: Option<String>,
    pub fail_recommendations: bool,
    /// Every batch answer is held back this long
    pub batch_delay_ms: u64,
    pub unhealthy: bool,
    pub calls: Mutex<Vec<(GenerationTask, String)>>,
    pub completions: Mutex<Vec<usize>>,
    pub dispatched: AtomicUsize,
}

impl FakeLlm {
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn tasks(&self) -> Vec<GenerationTask> {
        self.calls.lock().iter().map(|(task, _)| *task).collect()
    }

    /// CSV fragments of batch calls, in dispatch order
    pub fn batch_csvs(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|(_, prompt)| embedded_csv(prompt).map(str::to_string))
            .collect()
    }

    /// Customer ids of each batch call, in dispatch order
    pub fn batch_rows(&self) -> Vec<Vec<String>> {
        self.batch_csvs().iter().map(|csv| row_ids(csv)).collect()
    }

    /// Dispatch positions in the order their answers completed
    pub fn completion_order(&self) -> Vec<usize> {
        self.completions.lock().clone()
    }

    async fn answer_batch(&self, csv: &str) -> Result<String> {
        let seq = self.dispatched.fetch_add(1, Ordering::SeqCst);
        if self.reverse_completion {
            let delay = 20 * 10u64.saturating_sub(seq as u64);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.batch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.batch_delay_ms)).await;
        }
        self.completions.lock().push(seq);

        let ids = row_ids(csv);
        if self.fail_row.as_ref().is_some_and(|id| ids.contains(id)) {
            return Err(Error::transport("connection reset by peer"));
        }
        if self.malformed_row.as_ref().is_some_and(|id| ids.contains(id)) {
            return Ok("I could not process this data.".to_string());
        }

        let mut customers: Vec<Customer> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| fixtures::customer(id, 1000.0 + i as f64, CustomerSegment::Loyal))
            .collect();
        if self.drop_last_record {
            customers.pop();
        }

        Ok(serde_json::to_string(&customers)?)
    }

    fn answer_single(&self, prompt: &str) -> Result<String> {
        let id = self.single_id_override.clone().unwrap_or_else(|| {
            prompt
                .lines()
                .find_map(|line| line.strip_prefix("- Customer ID: "))
                .unwrap_or("GENERATED-1")
                .to_string()
        });
        if self.fail_row.as_deref() == Some(id.as_str()) {
            return Err(Error::transport("connection reset by peer"));
        }
        if self.malformed_row.as_deref() == Some(id.as_str()) {
            return Ok("I could not process this data.".to_string());
        }
        let customer = fixtures::customer(&id, 4200.0, CustomerSegment::Newcomer);
        Ok(serde_json::to_string(&customer)?)
    }
}

fn row_ids(csv: &str) -> Vec<String> {
    csv.lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn generate_structured(&self, request: StructuredRequest<'_>) -> Result<String> {
        self.calls
            .lock()
            .push((request.task, request.prompt.to_string()));

        match request.task {
            GenerationTask::Recommendation => {
                if self.fail_recommendations {
                    return Err(Error::transport("503 Service Unavailable"));
                }
                Ok(json!([
                    {"title": "Multi-policy bundle", "description": "Offer home insurance at a bundle discount.", "rationale": "Single policy with steady premium payments."},
                    {"title": "Claim-free reward", "description": "Send a loyalty credit for claim-free years.", "rationale": "Long time since last claim."},
                    {"title": "Coverage review", "description": "Schedule an agent call to review coverage.", "rationale": "Basic coverage with room to grow."}
                ])
                .to_string())
            }
            GenerationTask::Extraction => match embedded_csv(request.prompt) {
                Some(csv) => self.answer_batch(csv).await,
                None => self.answer_single(request.prompt),
            },
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.unhealthy)
    }

    fn name(&self) -> &str {
        "fake"
    }
}
