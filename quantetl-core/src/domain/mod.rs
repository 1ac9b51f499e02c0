//! Domain types for QuantETL

pub mod frame;
pub mod record;
pub mod report;

pub use frame::Frame;
pub use record::{EnrichedRecord, OhlcvRecord};
pub use report::QualityReportEntry;
