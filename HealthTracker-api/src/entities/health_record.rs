use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public representation of a health record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRecord {
    /// Identifier assigned on insert
    pub id: i64,

    /// When the record was stored (server time)
    pub date: DateTime<Utc>,

    /// Body weight, unit chosen by the caller
    pub weight: f64,

    /// Systolic blood pressure (the higher number)
    pub systolic: i64,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: i64,
}

/// Request payload for creating a health record.
///
/// Numbers may also arrive as numeric strings, and integral floats are
/// accepted for the integer fields. Anything else is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateHealthRecordRequest {
    /// Body weight
    #[serde(deserialize_with = "coerce_f64")]
    pub weight: f64,

    /// Systolic blood pressure
    #[serde(deserialize_with = "coerce_i64")]
    pub systolic: i64,

    /// Diastolic blood pressure
    #[serde(deserialize_with = "coerce_i64")]
    pub diastolic: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn coerce_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Numeric::deserialize(deserializer)
        .map_err(|_: D::Error| de::Error::custom("value is not a valid float"))?
    {
        Numeric::Integer(i) => i as f64,
        Numeric::Float(f) => f,
        Numeric::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("value is not a valid float: {:?}", s)))?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom("value is not a finite float"))
    }
}

fn coerce_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let from_float = |f: f64| -> Result<i64, D::Error> {
        if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            Ok(f as i64)
        } else {
            Err(de::Error::custom(format!("value is not a valid integer: {}", f)))
        }
    };

    match Numeric::deserialize(deserializer)
        .map_err(|_: D::Error| de::Error::custom("value is not a valid integer"))?
    {
        Numeric::Integer(i) => Ok(i),
        Numeric::Float(f) => from_float(f),
        Numeric::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("value is not a valid integer: {:?}", s))),
    }
}
