//! CSV batching and strict validation of model responses

pub mod batcher;
pub mod validate;

pub use batcher::{split_batches, Batch, DEFAULT_BATCH_SIZE};
pub use validate::{parse_customer, parse_customers, parse_recommendations};
