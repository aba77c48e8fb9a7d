use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed-width storage format for `health_records.date`.
///
/// Always UTC with microsecond precision, so string order is time order.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Storage model for a health record row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Row identifier assigned by SQLite
    pub id: i64,

    /// When the record was stored
    pub date: DateTime<Utc>,

    /// Body weight, unit chosen by the caller
    pub weight: f64,

    /// Systolic blood pressure (the higher number)
    pub systolic: i64,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: i64,
}

/// Values for a row about to be inserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHealthRecord {
    /// Stored as the insert time when `None`
    pub date: Option<DateTime<Utc>>,
    pub weight: f64,
    pub systolic: i64,
    pub diastolic: i64,
}

/// Render a timestamp in the storage format
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a timestamp written by [`format_date`]
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT).map(|naive| naive.and_utc())
}
