use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::trace::TraceLayer;
use tracing::debug;

use health_tracker_domain::health::HealthServiceTrait;

use crate::api::handlers::{health, health_record, HealthRecordService, HealthState};
use crate::openapi::configure_swagger_routes;

/// Create the application router around the injected services
pub fn create_app(service: HealthRecordService, health_service: Arc<dyn HealthServiceTrait>) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route(
            "/entries",
            get(health_record::list_entries).post(health_record::create_entry),
        )
        .route("/latest", get(health_record::latest_entry))
        .with_state(service);

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(HealthState::new(health_service)));

    let app = Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .merge(configure_swagger_routes())
        .layer(TraceLayer::new_for_http());

    debug!("Swagger UI merged");

    app
}
