use async_trait::async_trait;
use tracing::{debug, error};

use crate::database::{DatabasePool, Session};
use crate::models::health_record::{HealthRecord, NewHealthRecord};
use super::errors::RepositoryError;
use super::storage::DatabaseStorage;

/// Repository trait for health records
#[async_trait]
pub trait HealthRecordRepositoryTrait {
    /// Store a new record and return it with its assigned id
    async fn create(&self, record: NewHealthRecord) -> Result<HealthRecord, RepositoryError>;

    /// Get a newest-first page of records
    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<HealthRecord>, RepositoryError>;

    /// Get the record with the greatest date
    async fn get_latest(&self) -> Result<Option<HealthRecord>, RepositoryError>;

    /// Count stored records
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// SQLite-backed repository for health records.
///
/// Each call opens its own session on the blocking thread pool and releases it
/// before returning, whatever the outcome.
#[derive(Debug, Clone)]
pub struct HealthRecordRepository {
    pool: DatabasePool,
}

impl HealthRecordRepository {
    /// Create a new repository over the given pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Run `operation` with a scoped session
    async fn with_session<T, F>(&self, operation: F) -> Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Session) -> Result<T, RepositoryError> + Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut session = pool.session()?;
            operation(&mut session)
        })
        .await?
    }
}

#[async_trait]
impl HealthRecordRepositoryTrait for HealthRecordRepository {
    async fn create(&self, record: NewHealthRecord) -> Result<HealthRecord, RepositoryError> {
        debug!("Storing health record in database");

        self.with_session(move |session| DatabaseStorage::insert_record(session, &record))
            .await
            .map_err(|e| {
                error!("Failed to store health record: {}", e);
                e
            })
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<HealthRecord>, RepositoryError> {
        debug!("Getting health records from database");

        self.with_session(move |session| DatabaseStorage::list_records(session, skip, limit))
            .await
            .map_err(|e| {
                error!("Failed to list health records: {}", e);
                e
            })
    }

    async fn get_latest(&self) -> Result<Option<HealthRecord>, RepositoryError> {
        debug!("Getting latest health record from database");

        self.with_session(|session| DatabaseStorage::latest_record(session))
            .await
            .map_err(|e| {
                error!("Failed to get latest health record: {}", e);
                e
            })
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        self.with_session(|session| DatabaseStorage::count_records(session)).await
    }
}
