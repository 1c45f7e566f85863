//! Dashboard aggregates and customer search

pub mod summary;

pub use summary::{filter_customers, summarize};
