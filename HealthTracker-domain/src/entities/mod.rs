// Domain entities and value objects
pub mod health_record;
pub mod conversions;

// Re-export common types for easier imports
pub use health_record::{CreateHealthRecordRequest, HealthRecord, Pagination};
