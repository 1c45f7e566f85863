//! HTTP server for the CLV dashboard

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ClvConfig;
use crate::error::{Error, Result};
use state::AppState;

/// CLV HTTP Server
pub struct ClvServer {
    config: ClvConfig,
    state: AppState,
}

impl ClvServer {
    /// Create a new server backed by Gemini
    pub async fn new(config: ClvConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Shared state, for callers that preload customers
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = build_router(self.state.clone());

        tracing::info!("Starting CLV server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    let max_upload_size = state.config().server.max_upload_size;
    let enable_cors = state.config().server.enable_cors;

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .nest("/api", routes::api_routes(max_upload_size))
        .with_state(state)
        // Middleware layers (order matters - applied bottom to top)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
///
/// Not ready until the LLM provider has answered a health check.
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if !state.is_ready() {
        let provider = state.pipeline().provider();
        if let Ok(true) = provider.health_check().await {
            tracing::info!("{} provider reachable, server is ready", provider.name());
            state.set_ready(true);
        }
    }

    if state.is_ready() {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::processing::testing::{csv_document, FakeLlm};
    use crate::processing::PipelineState;
    use crate::types::customer::fixtures::customer;
    use crate::types::CustomerSegment;

    const BOUNDARY: &str = "clv-test-boundary";

    fn app(llm: FakeLlm) -> (AppState, Router) {
        let state = AppState::with_provider(ClvConfig::default(), Arc::new(llm));
        let router = build_router(state.clone());
        (state, router)
    }

    fn upload_request(csv: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"customers.csv\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
            b = BOUNDARY,
            csv = csv
        );
        Request::builder()
            .method("POST")
            .uri("/api/customers/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_upload_replaces_customers() {
        let (state, router) = app(FakeLlm::default());
        state.replace_customers(vec![customer("OLD", 1.0, CustomerSegment::Lost)]);

        let (status, body) = send(&router, upload_request(&csv_document(250))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"], 250);
        assert_eq!(body["batches"], 3);
        assert_eq!(body["customersProcessed"], 250);
        assert_eq!(body["filename"], "customers.csv");

        let (status, body) = send(&router, get("/api/customers")).await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 250);
        assert_eq!(list[0]["id"], "C0001");
        assert!(state.get_customer("OLD").is_none());

        let (_, body) = send(&router, get("/api/dashboard")).await;
        assert_eq!(body["totalCustomers"], 250);
        assert_eq!(body["topCustomers"].as_array().unwrap().len(), 5);

        let (_, body) = send(&router, get("/api/customers/upload/status")).await;
        assert_eq!(body["state"], "succeeded");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_abandoned_upload_still_replaces_customers() {
        let (state, router) = app(FakeLlm {
            batch_delay_ms: 200,
            ..FakeLlm::default()
        });
        state.replace_customers(vec![customer("OLD", 1.0, CustomerSegment::Lost)]);

        let request = tokio::spawn(router.clone().oneshot(upload_request(&csv_document(250))));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        request.abort();

        for _ in 0..100 {
            if state.upload_status().last_run.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        let status = state.upload_status();
        assert_eq!(status.state, PipelineState::Succeeded);
        assert_eq!(status.last_run.unwrap().customers_processed, 250);
        assert_eq!(state.with_customers(|c| c.len()), 250);
        assert!(state.get_customer("OLD").is_none());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_previous_customers() {
        let (state, router) = app(FakeLlm {
            fail_row: Some("C0042".to_string()),
            ..FakeLlm::default()
        });
        state.replace_customers(vec![customer("OLD", 1.0, CustomerSegment::Lost)]);

        let (status, body) = send(&router, upload_request(&csv_document(120))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["type"], "ingestion_failed");

        assert!(state.get_customer("OLD").is_some());
        assert_eq!(state.with_customers(|c| c.len()), 1);

        let status = state.upload_status();
        assert_eq!(status.state, PipelineState::Failed);
        assert!(status.error.unwrap().contains("try again"));
    }

    #[tokio::test]
    async fn test_header_only_upload_clears_collection() {
        let (state, router) = app(FakeLlm::default());
        state.replace_customers(vec![customer("OLD", 1.0, CustomerSegment::Lost)]);

        let (status, body) = send(&router, upload_request("Customer,State")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["batches"], 0);
        assert_eq!(state.with_customers(|c| c.len()), 0);
    }

    #[tokio::test]
    async fn test_upload_without_file() {
        let (_, router) = app(FakeLlm::default());
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/customers/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "bad_request");
    }

    #[tokio::test]
    async fn test_add_customer_and_fetch() {
        let (_, router) = app(FakeLlm::default());
        let request = Request::builder()
            .method("POST")
            .uri("/api/customers")
            .header("content-type", "application/json")
            .body(Body::from(json!({"id": "X1", "income": 50000}).to_string()))
            .unwrap();

        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "X1");
        let interval = body["clvData"]["confidenceInterval"].as_array().unwrap();
        assert_eq!(interval.len(), 2);
        assert!(interval[0].as_f64().unwrap() <= interval[1].as_f64().unwrap());

        let (status, body) = send(&router, get("/api/customers/X1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["segment"], "Newcomer");
    }

    #[tokio::test]
    async fn test_recommendations_and_not_found() {
        let (state, router) = app(FakeLlm::default());
        state.replace_customers(vec![customer("BU79786", 2763.52, CustomerSegment::Loyal)]);

        let (status, body) = send(&router, get("/api/customers/BU79786/recommendations")).await;
        assert_eq!(status, StatusCode::OK);
        let actions = body.as_array().unwrap();
        assert_eq!(actions.len(), 3);
        assert!(actions.iter().all(|a| !a["title"].as_str().unwrap().is_empty()));

        let (status, body) = send(&router, get("/api/customers/NOPE/recommendations")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found");
    }

    #[tokio::test]
    async fn test_search_filter() {
        let (state, router) = app(FakeLlm::default());
        let mut ohio = customer("QZ44356", 1.0, CustomerSegment::Lost);
        ohio.state = "Ohio".to_string();
        state.replace_customers(vec![customer("BU79786", 2.0, CustomerSegment::Loyal), ohio]);

        let (_, body) = send(&router, get("/api/customers?search=ohio")).await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], "QZ44356");
    }

    #[tokio::test]
    async fn test_readiness_follows_provider_health() {
        let (state, router) = app(FakeLlm {
            unhealthy: true,
            ..FakeLlm::default()
        });
        state.set_ready(false);
        let response = router.clone().oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!state.is_ready());

        let (state, router) = app(FakeLlm::default());
        state.set_ready(false);
        let response = router.oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.is_ready());
    }

    #[tokio::test]
    async fn test_health() {
        let (_, router) = app(FakeLlm::default());
        let response = router.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
