use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Entry endpoints
        crate::api::handlers::health_record::create_entry,
        crate::api::handlers::health_record::list_entries,
        crate::api::handlers::health_record::latest_entry,
    ),
    components(
        schemas(
            crate::entities::health_record::HealthRecord,
            crate::entities::health_record::CreateHealthRecordRequest,
            crate::entities::common::ErrorResponse,

            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "entries", description = "Weight and blood pressure records")
    ),
    info(
        title = "HealthTracker API",
        version = "0.1.0",
        description = "Record weight and blood pressure readings and read them back",
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
