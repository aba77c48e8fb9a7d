// Repository module structure
pub mod errors;
mod health_record;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use health_record::{HealthRecordRepository, HealthRecordRepositoryTrait};
pub use storage::DatabaseStorage;
