use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single weight and blood pressure entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Identifier assigned by storage
    pub id: i64,

    /// When the entry was recorded
    pub date: DateTime<Utc>,

    /// Body weight, unit chosen by the caller
    pub weight: f64,

    /// Systolic blood pressure (the higher number)
    pub systolic: i64,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: i64,
}

/// Input for a new entry; the date is assigned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHealthRecordRequest {
    pub weight: f64,
    pub systolic: i64,
    pub diastolic: i64,
}

/// Offset/limit window over the newest-first history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: usize,
    pub limit: usize,
}

impl Pagination {
    /// Page size used when the caller does not pass one
    pub const DEFAULT_LIMIT: usize = 100;

    /// Largest page a caller can get; bigger limits are clamped
    pub const MAX_LIMIT: usize = 1000;

    /// Build a window, clamping `limit` into `1..=MAX_LIMIT`
    pub fn new(skip: usize, limit: usize) -> Self {
        Self {
            skip,
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}
