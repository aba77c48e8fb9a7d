// Testing utilities and mock implementations for the domain layer
// Available to this crate's tests and, through the "mock" feature, to others

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use health_tracker_data::models::health_record as data;
use health_tracker_data::repository::{HealthRecordRepositoryTrait, RepositoryError};
use health_tracker_data::database::DatabaseError;

use crate::entities::health_record::{CreateHealthRecordRequest, HealthRecord, Pagination};
use crate::health::{system_health_from, ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth};
use crate::services::health_record::{HealthRecordServiceError, HealthRecordServiceTrait};

/// Repository whose every call fails like a lost database
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRepository;

impl FailingRepository {
    fn error() -> RepositoryError {
        RepositoryError::Database(DatabaseError::GenericError("database is unavailable".to_string()))
    }
}

#[async_trait]
impl HealthRecordRepositoryTrait for FailingRepository {
    async fn create(&self, _record: data::NewHealthRecord) -> Result<data::HealthRecord, RepositoryError> {
        Err(Self::error())
    }

    async fn list(&self, _skip: usize, _limit: usize) -> Result<Vec<data::HealthRecord>, RepositoryError> {
        Err(Self::error())
    }

    async fn get_latest(&self) -> Result<Option<data::HealthRecord>, RepositoryError> {
        Err(Self::error())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Err(Self::error())
    }
}

/// Mock implementation of the HealthRecordServiceTrait for testing
pub struct MockHealthRecordService {
    records: RwLock<Vec<HealthRecord>>,
    should_fail_storage: bool,
}

impl Default for MockHealthRecordService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthRecordService {
    /// Create a new empty mock service
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            should_fail_storage: false,
        }
    }

    /// Configure the mock to fail every call with a storage error
    pub fn with_storage_failure(mut self) -> Self {
        self.should_fail_storage = true;
        self
    }

    /// Add a pre-defined record to the mock
    pub fn with_record(self, record: HealthRecord) -> Self {
        self.records.write().unwrap().push(record);
        self
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_storage(&self) -> Result<(), HealthRecordServiceError> {
        if self.should_fail_storage {
            Err(HealthRecordServiceError::RepositoryError(
                "mock is configured to fail storage".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn newest_first(&self) -> Vec<HealthRecord> {
        let mut records = self.records.read().unwrap().clone();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        records
    }
}

#[async_trait]
impl HealthRecordServiceTrait for MockHealthRecordService {
    async fn create_record(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError> {
        self.check_storage()?;

        let mut records = self.records.write().unwrap();
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = HealthRecord {
            id,
            date: Utc::now(),
            weight: request.weight,
            systolic: request.systolic,
            diastolic: request.diastolic,
        };
        records.push(record.clone());

        Ok(record)
    }

    async fn list_records(&self, page: Pagination) -> Result<Vec<HealthRecord>, HealthRecordServiceError> {
        self.check_storage()?;

        let page = Pagination::new(page.skip, page.limit);
        Ok(self.newest_first().into_iter().skip(page.skip).take(page.limit).collect())
    }

    async fn get_latest_record(&self) -> Result<HealthRecord, HealthRecordServiceError> {
        self.check_storage()?;

        self.newest_first()
            .into_iter()
            .next()
            .ok_or_else(|| HealthRecordServiceError::NotFound("No entries found".to_string()))
    }
}

/// Health service reporting a fixed database status
#[derive(Debug, Clone)]
pub struct MockHealthService {
    database: ComponentStatus,
    details: Option<String>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    pub fn new() -> Self {
        Self {
            database: ComponentStatus::Healthy,
            details: None,
        }
    }

    pub fn with_database_status(mut self, status: ComponentStatus, details: Option<String>) -> Self {
        self.database = status;
        self.details = details;
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        system_health_from(HealthComponent {
            status: self.database.clone(),
            details: self.details.clone(),
        })
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        match self.database {
            ComponentStatus::Healthy => Ok(true),
            ComponentStatus::Degraded => Ok(false),
            ComponentStatus::Unhealthy => Err(self.details.clone().unwrap_or_default()),
        }
    }
}
