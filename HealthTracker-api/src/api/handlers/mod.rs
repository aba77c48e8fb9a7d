pub mod health;
pub mod health_record;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use health::{health_check, HealthState};
pub use health_record::{create_entry, latest_entry, list_entries, HealthRecordService};
