use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use health_tracker_data::database::DatabasePool;
use health_tracker_data::repository::{HealthRecordRepository, HealthRecordRepositoryTrait, RepositoryError};

use crate::entities::conversions;
use crate::entities::health_record::{CreateHealthRecordRequest, HealthRecord, Pagination};

/// Health record service errors
#[derive(Debug, Error)]
pub enum HealthRecordServiceError {
    /// No record matched
    #[error("{0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for health record service operations
#[async_trait]
pub trait HealthRecordServiceTrait {
    /// Store a new record stamped with the current time
    async fn create_record(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError>;

    /// Get a newest-first page of records
    async fn list_records(&self, page: Pagination) -> Result<Vec<HealthRecord>, HealthRecordServiceError>;

    /// Get the most recent record; fails with `NotFound` when there are none
    async fn get_latest_record(&self) -> Result<HealthRecord, HealthRecordServiceError>;
}

/// Health record service for domain logic
pub struct HealthRecordService<R: HealthRecordRepositoryTrait> {
    repository: R,
}

impl<R: HealthRecordRepositoryTrait> HealthRecordService<R> {
    /// Create a new health record service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> HealthRecordServiceError {
        HealthRecordServiceError::RepositoryError(err.to_string())
    }
}

#[async_trait]
impl<R: HealthRecordRepositoryTrait + Send + Sync> HealthRecordServiceTrait for HealthRecordService<R> {
    async fn create_record(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError> {
        let data_record = conversions::convert_to_data_new_record(&request);

        let stored = self
            .repository
            .create(data_record)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Health record created with ID: {}", stored.id);
        Ok(conversions::convert_to_domain_record(stored))
    }

    async fn list_records(&self, page: Pagination) -> Result<Vec<HealthRecord>, HealthRecordServiceError> {
        let page = Pagination::new(page.skip, page.limit);
        debug!("Listing health records: skip={}, limit={}", page.skip, page.limit);

        let records = self
            .repository
            .list(page.skip, page.limit)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(records.into_iter().map(conversions::convert_to_domain_record).collect())
    }

    async fn get_latest_record(&self) -> Result<HealthRecord, HealthRecordServiceError> {
        self.repository
            .get_latest()
            .await
            .map_err(|e| self.map_repo_error(e))?
            .map(conversions::convert_to_domain_record)
            .ok_or_else(|| HealthRecordServiceError::NotFound("No entries found".to_string()))
    }
}

/// Create a health record service backed by the given pool
pub fn create_health_record_service(pool: DatabasePool) -> HealthRecordService<HealthRecordRepository> {
    HealthRecordService::new(HealthRecordRepository::new(pool))
}
