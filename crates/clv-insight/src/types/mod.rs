//! Core types for the CLV system

pub mod customer;
pub mod recommendation;
pub mod response;

pub use customer::{ClvData, Customer, CustomerSegment, Gender, PartialCustomer, ShapValue};
pub use recommendation::MarketingAction;
pub use response::{
    CustomerSummary, DashboardSummary, IngestResponse, SegmentCount, UploadStatus,
};
