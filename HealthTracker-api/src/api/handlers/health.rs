use std::sync::Arc;
use std::time::Instant;

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use health_tracker_domain::health::{ComponentStatus as DomainComponentStatus, HealthServiceTrait, SystemStatus};

/// Health check response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Unix timestamp of when the response was generated
    pub timestamp: i64,
    /// Uptime of the service in seconds
    pub uptime: u64,
    /// Details about the components of the system
    pub components: ComponentStatus,
}

/// Status of individual system components
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Database connection status
    pub database: ComponentHealthStatus,
}

/// Health status for an individual component
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Shared state for the health endpoint
#[derive(Debug, Clone)]
pub struct HealthState {
    pub service: Arc<dyn HealthServiceTrait>,
    pub started_at: Instant,
}

impl HealthState {
    pub fn new(service: Arc<dyn HealthServiceTrait>) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

/// Health check endpoint to verify the API and its database
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy or degraded", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip_all)]
pub async fn health_check(Extension(state): Extension<HealthState>) -> impl IntoResponse {
    info!("Health check requested");

    let system_health = state.service.get_system_health().await;

    let (code, overall_status) = match system_health.status {
        SystemStatus::Healthy => (StatusCode::OK, "ok"),
        SystemStatus::Degraded => (StatusCode::OK, "degraded"),
        SystemStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, "error"),
    };

    let database = system_health.components.get("database");
    let components = ComponentStatus {
        database: ComponentHealthStatus {
            status: map_component_status(
                &database
                    .map(|c| c.status.clone())
                    .unwrap_or(DomainComponentStatus::Unhealthy),
            ),
            message: database.and_then(|c| c.details.clone()),
        },
    };

    if code != StatusCode::OK {
        warn!("Health check failing: {:?}", components.database.message);
    }

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().timestamp(),
        uptime: state.started_at.elapsed().as_secs(),
        components,
    };

    (code, Json(response))
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
    .to_string()
}
