//! Dashboard summary endpoint

use axum::{extract::State, Json};

use crate::analytics::summarize;
use crate::server::state::AppState;
use crate::types::DashboardSummary;

/// GET /api/dashboard - Aggregates over the loaded customers
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    let top_n = state.config().ingestion.top_customers;
    Json(state.with_customers(|customers| summarize(customers, top_n)))
}
