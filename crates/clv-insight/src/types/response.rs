//! Response types served to dashboard clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::customer::{Customer, CustomerSegment};
use crate::processing::PipelineState;

/// Result of a completed CSV upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// Identifier of this ingestion run
    pub run_id: Uuid,
    /// Filename as sent by the client
    pub filename: String,
    /// Data rows found in the upload (header excluded)
    pub rows: usize,
    /// Batches dispatched to the extraction model
    pub batches: usize,
    /// Customers returned by the model
    pub customers_processed: usize,
    /// Total processing time in milliseconds
    pub processing_time_ms: u64,
    pub completed_at: DateTime<Utc>,
}

/// Upload pipeline status for polling clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    pub state: PipelineState,
    /// Client-facing message of the last failure, cleared when a new upload starts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<IngestResponse>,
}

/// Customer count for one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCount {
    pub name: CustomerSegment,
    pub value: usize,
}

/// Compact customer row for tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: String,
    pub state: String,
    pub policy_type: String,
    pub segment: CustomerSegment,
    pub clv_estimate: f64,
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            state: customer.state.clone(),
            policy_type: customer.policy_type.clone(),
            segment: customer.segment,
            clv_estimate: customer.clv_data.clv_estimate,
        }
    }
}

/// Aggregates behind the dashboard view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_customers: usize,
    pub total_predicted_clv: f64,
    /// 0 when there are no customers
    pub average_clv: f64,
    /// Segments in order of first appearance
    pub segment_counts: Vec<SegmentCount>,
    /// Highest-CLV customers, descending
    pub top_customers: Vec<CustomerSummary>,
}
