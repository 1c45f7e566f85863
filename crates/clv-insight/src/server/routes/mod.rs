//! API routes for the CLV server

pub mod customers;
pub mod dashboard;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Dashboard aggregates
        .route("/dashboard", get(dashboard::get_dashboard))
        // Customer collection
        .route(
            "/customers",
            get(customers::list_customers).post(customers::add_customer),
        )
        // CSV upload - with larger body limit
        .route(
            "/customers/upload",
            post(upload::upload_customers).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/customers/upload/status", get(upload::upload_status))
        .route("/customers/:id", get(customers::get_customer))
        .route(
            "/customers/:id/recommendations",
            get(customers::get_recommendations),
        )
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "clv-insight",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Insurance customer lifetime-value analytics with LLM-backed extraction",
        "endpoints": {
            "GET /api/dashboard": "Total and average CLV, segment counts, top customers",
            "GET /api/customers": "List customers (?search= filters by id, state, policy type)",
            "POST /api/customers": "Complete and add a customer from partial data",
            "POST /api/customers/upload": "Upload a CSV file (multipart field `file`), replacing all customers",
            "GET /api/customers/upload/status": "State of the last upload",
            "GET /api/customers/:id": "Get one customer",
            "GET /api/customers/:id/recommendations": "Marketing recommendations for a customer"
        }
    }))
}
