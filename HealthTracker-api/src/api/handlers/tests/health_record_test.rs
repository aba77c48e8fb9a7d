use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};

use health_tracker_domain::entities::health_record::HealthRecord as DomainHealthRecord;
use health_tracker_domain::testing::MockHealthRecordService;

use crate::api::extractors::{ApiJson, ValidQuery};
use crate::api::handlers::health_record::{
    create_entry, latest_entry, list_entries, HealthRecordService, ListEntriesParams,
};
use crate::entities::health_record::CreateHealthRecordRequest;

fn domain_record(id: i64, minutes_ago: i64) -> DomainHealthRecord {
    DomainHealthRecord {
        id,
        date: Utc::now() - Duration::minutes(minutes_ago),
        weight: 70.0 + id as f64,
        systolic: 120,
        diastolic: 80,
    }
}

fn params(skip: Option<i64>, limit: Option<i64>) -> ValidQuery<ListEntriesParams> {
    ValidQuery(ListEntriesParams { skip, limit })
}

#[tokio::test]
async fn test_create_entry_returns_stored_record() {
    let service: HealthRecordService = Arc::new(MockHealthRecordService::new());

    let request = CreateHealthRecordRequest {
        weight: 70.5,
        systolic: 120,
        diastolic: 80,
    };
    let record = create_entry(State(service.clone()), ApiJson(request)).await.unwrap().0;

    assert_eq!(record.id, 1);
    assert_eq!(record.weight, 70.5);
    assert_eq!(record.systolic, 120);
    assert_eq!(record.diastolic, 80);
}

#[tokio::test]
async fn test_create_entry_storage_failure_is_500() {
    let service: HealthRecordService = Arc::new(MockHealthRecordService::new().with_storage_failure());

    let request = CreateHealthRecordRequest {
        weight: 70.5,
        systolic: 120,
        diastolic: 80,
    };
    let response = create_entry(State(service), ApiJson(request)).await.unwrap_err();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_list_entries_newest_first_with_paging() {
    let service: HealthRecordService = Arc::new(
        MockHealthRecordService::new()
            .with_record(domain_record(1, 30))
            .with_record(domain_record(2, 20))
            .with_record(domain_record(3, 10)),
    );

    let all = list_entries(State(service.clone()), params(None, None)).await.unwrap().0;
    assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 2, 1]);

    let page = list_entries(State(service), params(Some(1), Some(1))).await.unwrap().0;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, 2);
}

#[tokio::test]
async fn test_latest_entry_not_found() {
    let service: HealthRecordService = Arc::new(MockHealthRecordService::new());

    let response = latest_entry(State(service)).await.unwrap_err();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "No entries found");
}

#[tokio::test]
async fn test_latest_entry_returns_newest() {
    let service: HealthRecordService = Arc::new(
        MockHealthRecordService::new()
            .with_record(domain_record(1, 5))
            .with_record(domain_record(2, 1)),
    );

    let response = latest_entry(State(service)).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["id"], 2);
}
