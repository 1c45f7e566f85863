//! clv-insight: Insurance customer lifetime-value analytics backend
//!
//! Customer data arrives as CSV, is split into fixed-size row batches and sent
//! concurrently to a structured-output LLM which returns validated customer
//! records with CLV estimates, segments and SHAP-style drivers. The crate also
//! serves the dashboard views (summary, customer list, recommendations) over HTTP.

pub mod analytics;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod processing;
pub mod providers;
pub mod server;
pub mod types;

pub use config::ClvConfig;
pub use error::{Error, Result};
pub use processing::{CustomerPipeline, PipelineState};
pub use types::{
    customer::{ClvData, Customer, CustomerSegment, Gender, PartialCustomer, ShapValue},
    recommendation::MarketingAction,
};
