pub mod health_record;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use health_record::{
    create_health_record_service, HealthRecordService, HealthRecordServiceError, HealthRecordServiceTrait,
};
