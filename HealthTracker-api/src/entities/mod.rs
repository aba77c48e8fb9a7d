// Public entities for the HealthTracker API
// Shapes accepted from and returned to HTTP callers

// Health record transfer model
pub mod health_record;

// Common entities for error handling
pub mod common;
