use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use health_tracker_domain::entities::health_record::{
    CreateHealthRecordRequest as DomainCreateRequest, HealthRecord as DomainHealthRecord, Pagination,
};
use health_tracker_domain::services::HealthRecordServiceTrait;

use crate::api::extractors::{ApiJson, ValidQuery};
use crate::entities::common::ErrorResponse;
use crate::entities::health_record::{CreateHealthRecordRequest, HealthRecord};

/// Service type for dependency injection
pub type HealthRecordService = Arc<dyn HealthRecordServiceTrait + Send + Sync>;

/// Query parameters for listing entries
#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListEntriesParams {
    /// Number of records to skip (default: 0)
    #[validate(range(min = 0, message = "skip must not be negative"))]
    pub skip: Option<i64>,

    /// Maximum number of records (default: 100, capped at 1000)
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: Option<i64>,
}

impl ListEntriesParams {
    fn pagination(&self) -> Pagination {
        let skip = self.skip.unwrap_or(0).max(0) as usize;
        let limit = self
            .limit
            .map(|l| l.clamp(1, Pagination::MAX_LIMIT as i64) as usize)
            .unwrap_or(Pagination::DEFAULT_LIMIT);
        Pagination::new(skip, limit)
    }
}

/// Store a new health record
#[utoipa::path(
    post,
    path = "/api/entries",
    request_body = CreateHealthRecordRequest,
    responses(
        (status = 200, description = "Record stored", body = HealthRecord),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip_all)]
pub async fn create_entry(
    State(service): State<HealthRecordService>,
    ApiJson(request): ApiJson<CreateHealthRecordRequest>,
) -> Result<Json<HealthRecord>, Response> {
    let record = service
        .create_record(convert_to_domain_request(request))
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;

    info!("Stored health record {}", record.id);
    Ok(Json(convert_to_public_record(record)))
}

/// List records, newest first
#[utoipa::path(
    get,
    path = "/api/entries",
    params(ListEntriesParams),
    responses(
        (status = 200, description = "Records, newest first", body = [HealthRecord]),
        (status = 422, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip_all)]
pub async fn list_entries(
    State(service): State<HealthRecordService>,
    ValidQuery(params): ValidQuery<ListEntriesParams>,
) -> Result<Json<Vec<HealthRecord>>, Response> {
    let page = params.pagination();
    debug!("Listing entries: skip={}, limit={}", page.skip, page.limit);

    let records = service
        .list_records(page)
        .await
        .map_err(|e| ErrorResponse::from(e).into_response())?;

    Ok(Json(records.into_iter().map(convert_to_public_record).collect()))
}

/// Most recent record
#[utoipa::path(
    get,
    path = "/api/latest",
    responses(
        (status = 200, description = "Most recent record", body = HealthRecord),
        (status = 404, description = "No entries found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip_all)]
pub async fn latest_entry(State(service): State<HealthRecordService>) -> Result<Json<HealthRecord>, Response> {
    service
        .get_latest_record()
        .await
        .map(|record| Json(convert_to_public_record(record)))
        .map_err(|e| ErrorResponse::from(e).into_response())
}

/// Convert a domain record to its public shape
fn convert_to_public_record(record: DomainHealthRecord) -> HealthRecord {
    HealthRecord {
        id: record.id,
        date: record.date,
        weight: record.weight,
        systolic: record.systolic,
        diastolic: record.diastolic,
    }
}

/// Convert a public request to the domain request
fn convert_to_domain_request(request: CreateHealthRecordRequest) -> DomainCreateRequest {
    DomainCreateRequest {
        weight: request.weight,
        systolic: request.systolic,
        diastolic: request.diastolic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let params = ListEntriesParams { skip: None, limit: None };
        let page = params.pagination();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, Pagination::DEFAULT_LIMIT);
    }

    #[test]
    fn test_large_limit_is_capped() {
        let params = ListEntriesParams {
            skip: Some(5),
            limit: Some(1_000_000),
        };
        let page = params.pagination();
        assert_eq!(page.skip, 5);
        assert_eq!(page.limit, Pagination::MAX_LIMIT);
    }

    #[test]
    fn test_negative_values_fail_validation() {
        assert!(ListEntriesParams { skip: Some(-1), limit: None }.validate().is_err());
        assert!(ListEntriesParams { skip: None, limit: Some(0) }.validate().is_err());
        assert!(ListEntriesParams { skip: Some(0), limit: Some(1) }.validate().is_ok());
    }
}
