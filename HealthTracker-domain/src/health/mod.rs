//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use health_tracker_data::database::DatabasePool;
use tracing::warn;

/// Probes slower than this mark the database as degraded
const SLOW_PROBE_THRESHOLD: Duration = Duration::from_secs(1);

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database
    ///
    /// - `Ok(true)` if the database answered promptly
    /// - `Ok(false)` if it answered but slowly
    /// - `Err` if it could not be reached
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Health service that probes the shared database pool
#[derive(Debug, Clone)]
pub struct DatabaseHealthService {
    pool: DatabasePool,
}

impl DatabaseHealthService {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthServiceTrait for DatabaseHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let db_component = match self.check_database_status().await {
            Ok(true) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(self.pool.connection_info()),
            },
            Ok(false) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Database is available but responding slowly".to_string()),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };

        system_health_from(db_component)
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        let pool = self.pool.clone();
        let started = Instant::now();

        tokio::task::spawn_blocking(move || {
            let session = pool.session().map_err(|e| e.to_string())?;
            session
                .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| format!("Database probe did not complete: {}", e))?
        .map_err(|e| {
            warn!("Database health probe failed: {}", e);
            format!("Database connection error: {}", e)
        })?;

        Ok(started.elapsed() < SLOW_PROBE_THRESHOLD)
    }
}

/// Derive the overall status from the database component
pub fn system_health_from(db_component: HealthComponent) -> SystemHealth {
    let overall_status = match db_component.status {
        ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
        ComponentStatus::Degraded => SystemStatus::Degraded,
        ComponentStatus::Healthy => SystemStatus::Healthy,
    };

    SystemHealth {
        status: overall_status,
        components: vec![("database".to_string(), db_component)].into_iter().collect(),
    }
}

/// Create the health service used by the API
pub fn create_health_service(pool: DatabasePool) -> Arc<dyn HealthServiceTrait> {
    Arc::new(DatabaseHealthService::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_system_health() {
        let service = DatabaseHealthService::new(DatabasePool::in_memory().unwrap());

        let health = service.get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);

        let database = &health.components["database"];
        assert_eq!(database.status, ComponentStatus::Healthy);
        assert!(database.details.as_deref().unwrap_or_default().contains("in-memory"));
    }

    #[test]
    fn test_unhealthy_component_makes_system_unhealthy() {
        let health = system_health_from(HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some("Database connection error".to_string()),
        });

        assert_eq!(health.status, SystemStatus::Unhealthy);
    }
}
