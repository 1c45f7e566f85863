//! Customer processing pipeline

pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use pipeline::{CustomerPipeline, IngestOutcome, PipelineState};
